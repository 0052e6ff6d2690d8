/// Grid model: cell ids, cells, and the fixed-size cell collection.

use std::fmt;
use std::str::FromStr;

use super::color::HexColor;

pub const DEFAULT_GRID_SIZE: GridSize = GridSize {
    width: 20,
    height: 8,
};

/// Footprint of the click button, centered in the grid.
pub const CLICK_BUTTON_W: u32 = 2;
pub const CLICK_BUTTON_H: u32 = 2;

/// Most cells a grid may hold.
pub const MAX_GRID_CELLS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CellIdError {
    #[error("cell id {0:?} does not have the form cell-<x>-<y>")]
    MissingPrefix(String),
    #[error("cell id {0:?} has a malformed coordinate")]
    BadCoordinate(String),
}

/// Stable identifier of a grid position, rendered as `cell-<x>-<y>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellId {
    pub x: u32,
    pub y: u32,
}

impl CellId {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell-{}-{}", self.x, self.y)
    }
}

/// Only canonical decimal coordinates are accepted, so parsing inverts
/// `Display` exactly: `cell-05-3` and `cell-+5-3` are rejected.
fn parse_coordinate(part: &str, id: &str) -> Result<u32, CellIdError> {
    let bad = || CellIdError::BadCoordinate(id.to_string());
    let canonical = !part.is_empty()
        && part.bytes().all(|b| b.is_ascii_digit())
        && (part == "0" || !part.starts_with('0'));
    if !canonical {
        return Err(bad());
    }
    part.parse().map_err(|_| bad())
}

impl FromStr for CellId {
    type Err = CellIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("cell-")
            .ok_or_else(|| CellIdError::MissingPrefix(s.to_string()))?;
        let (x, y) = rest
            .split_once('-')
            .ok_or_else(|| CellIdError::BadCoordinate(s.to_string()))?;
        Ok(CellId::new(parse_coordinate(x, s)?, parse_coordinate(y, s)?))
    }
}

/// Width and height of the grid, fixed for a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    /// `width * height`, or `None` when it does not fit in `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        let count = u64::from(self.width) * u64::from(self.height);
        usize::try_from(count).ok()
    }

    /// Non-empty and no larger than [`MAX_GRID_CELLS`].
    pub fn is_playable(&self) -> bool {
        self.cell_count()
            .is_some_and(|n| n > 0 && n <= MAX_GRID_CELLS)
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    /// `(start_x, start_y, width, height)` of the centered click button.
    pub fn click_button_area(&self) -> (u32, u32, u32, u32) {
        let w = CLICK_BUTTON_W.min(self.width);
        let h = CLICK_BUTTON_H.min(self.height);
        ((self.width - w) / 2, (self.height - h) / 2, w, h)
    }
}

/// One grid position. Colored cells have `level >= 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub id: CellId,
    pub x: u32,
    pub y: u32,
    pub color: Option<HexColor>,
    pub level: u32,
}

impl Cell {
    pub fn empty(x: u32, y: u32) -> Self {
        Self {
            id: CellId::new(x, y),
            x,
            y,
            color: None,
            level: 0,
        }
    }

    pub fn is_colored(&self) -> bool {
        self.color.is_some()
    }

    pub fn clear(&mut self) {
        self.color = None;
        self.level = 0;
    }
}

/// Row-major collection of every cell; index = `y * width + x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(size: GridSize) -> Self {
        let mut grid = Self {
            size,
            cells: Vec::new(),
        };
        grid.initialize();
        grid
    }

    /// Rebuild from restored cells. Callers validate order and ids first.
    pub(super) fn from_cells(size: GridSize, cells: Vec<Cell>) -> Self {
        Self { size, cells }
    }

    /// Populate one empty cell per position. Runs only on an empty grid;
    /// returns false (and changes nothing) when cells already exist.
    pub fn initialize(&mut self) -> bool {
        if !self.cells.is_empty() {
            return false;
        }
        self.cells.reserve(self.size.cell_count().unwrap_or(0));
        for y in 0..self.size.height {
            for x in 0..self.size.width {
                self.cells.push(Cell::empty(x, y));
            }
        }
        true
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn index_of(&self, id: &CellId) -> Option<usize> {
        if !self.size.contains(id.x, id.y) {
            return None;
        }
        let idx = id.y as usize * self.size.width as usize + id.x as usize;
        (idx < self.cells.len()).then_some(idx)
    }

    pub fn get(&self, id: &CellId) -> Option<&Cell> {
        self.cells.get(self.index_of(id)?)
    }

    pub fn get_mut(&mut self, id: &CellId) -> Option<&mut Cell> {
        let idx = self.index_of(id)?;
        self.cells.get_mut(idx)
    }

    pub fn get_at(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Mutable access to two distinct cells at once.
    pub fn get_pair_mut(&mut self, a: &CellId, b: &CellId) -> Option<(&mut Cell, &mut Cell)> {
        let ia = self.index_of(a)?;
        let ib = self.index_of(b)?;
        if ia == ib {
            return None;
        }
        if ia < ib {
            let (lo, hi) = self.cells.split_at_mut(ib);
            Some((&mut lo[ia], &mut hi[0]))
        } else {
            let (lo, hi) = self.cells.split_at_mut(ia);
            Some((&mut hi[0], &mut lo[ib]))
        }
    }

    /// Whether the position sits under the click button.
    pub fn is_under_button(&self, x: u32, y: u32) -> bool {
        let (bx, by, bw, bh) = self.size.click_button_area();
        x >= bx && x < bx + bw && y >= by && y < by + bh
    }

    pub fn count_color(&self, color: HexColor) -> usize {
        self.cells
            .iter()
            .filter(|c| c.color == Some(color))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_id_format() {
        assert_eq!(CellId::new(5, 3).to_string(), "cell-5-3");
        assert_eq!("cell-5-3".parse::<CellId>(), Ok(CellId::new(5, 3)));
    }

    #[test]
    fn cell_id_rejects_malformed() {
        assert!(matches!(
            "tile-1-2".parse::<CellId>(),
            Err(CellIdError::MissingPrefix(_))
        ));
        for bad in ["cell-1", "cell--2", "cell-1-", "cell-a-2", "cell-05-3", "cell-+5-3", "cell-1-2-3"] {
            assert!(
                matches!(bad.parse::<CellId>(), Err(CellIdError::BadCoordinate(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn grid_initializes_row_major() {
        let grid = Grid::new(GridSize { width: 3, height: 2 });
        assert_eq!(grid.cells().len(), 6);
        assert_eq!(grid.cells()[0].id.to_string(), "cell-0-0");
        assert_eq!(grid.cells()[1].id.to_string(), "cell-1-0");
        assert_eq!(grid.cells()[3].id.to_string(), "cell-0-1");
        assert!(grid.cells().iter().all(|c| c.color.is_none() && c.level == 0));
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut grid = Grid::new(GridSize { width: 2, height: 2 });
        grid.get_mut(&CellId::new(1, 1)).unwrap().level = 7;
        assert!(!grid.initialize());
        assert_eq!(grid.cells().len(), 4);
        assert_eq!(grid.get(&CellId::new(1, 1)).unwrap().level, 7);
    }

    #[test]
    fn lookup_out_of_bounds() {
        let grid = Grid::new(GridSize { width: 2, height: 2 });
        assert!(grid.get(&CellId::new(2, 0)).is_none());
        assert!(grid.get(&CellId::new(0, 2)).is_none());
        assert!(grid.get(&CellId::new(1, 1)).is_some());
    }

    #[test]
    fn pair_mut_in_both_orders() {
        let mut grid = Grid::new(GridSize { width: 3, height: 1 });
        let a = CellId::new(0, 0);
        let b = CellId::new(2, 0);
        {
            let (ca, cb) = grid.get_pair_mut(&a, &b).unwrap();
            ca.level = 1;
            cb.level = 2;
        }
        let (cb, ca) = grid.get_pair_mut(&b, &a).unwrap();
        assert_eq!((ca.level, cb.level), (1, 2));
        assert!(grid.get_pair_mut(&a, &a).is_none());
    }

    #[test]
    fn click_button_centered() {
        let size = DEFAULT_GRID_SIZE;
        assert_eq!(size.click_button_area(), (9, 3, 2, 2));
        let grid = Grid::new(size);
        assert!(grid.is_under_button(9, 3));
        assert!(grid.is_under_button(10, 4));
        assert!(!grid.is_under_button(8, 3));
        assert!(!grid.is_under_button(9, 5));
    }

    #[test]
    fn cell_count_without_overflow() {
        assert_eq!(DEFAULT_GRID_SIZE.cell_count(), Some(160));
        assert!(DEFAULT_GRID_SIZE.is_playable());
        let huge = GridSize {
            width: u32::MAX,
            height: u32::MAX,
        };
        assert!(!huge.is_playable());
        assert!(!GridSize { width: 0, height: 8 }.is_playable());
        assert!(!GridSize { width: 101, height: 100 }.is_playable());
    }

    #[test]
    fn click_button_clamped_to_tiny_grid() {
        let size = GridSize { width: 1, height: 1 };
        assert_eq!(size.click_button_area(), (0, 0, 1, 1));
    }
}
