/// Grid Clicker game state and derived queries.

use std::collections::HashMap;

use super::color::{available_palette, HexColor, COLORS_NEEDED_FOR_SPECIAL};
use super::economy;
use super::grid::{Cell, CellId, Grid, GridSize, DEFAULT_GRID_SIZE};

pub const INITIAL_GOLD: f64 = 0.0;
pub const INITIAL_CLICK_LEVEL: u32 = 0;

/// Slots shown in the collection view, discovered or locked.
pub const COLLECTION_SLOTS: usize = 30;

const MAX_LOG: usize = 30;

/// Log entry shown in the message panel.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

/// Presentation-only state. Not persisted, no effect on the economy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UiState {
    /// Cell picked for color assignment or as a fusion source.
    pub selected_cell: Option<CellId>,
    pub collection_open: bool,
    /// Keyboard cursor position on the grid.
    pub cursor: (u32, u32),
    /// Index into the current palette.
    pub palette_index: usize,
}

/// Full state of a Grid Clicker session.
pub struct GameState {
    /// Gold on hand. Fractional because passive income accrues continuously.
    pub gold: f64,
    pub click_level: u32,
    pub grid: Grid,
    /// Every color ever assigned or fused, in discovery order, no duplicates.
    pub discovered_colors: Vec<HexColor>,
    /// Per-color upgrade level. Missing entries mean level 0.
    pub color_upgrade_levels: HashMap<HexColor, u32>,
    pub ui: UiState,
    pub log: Vec<LogEntry>,
}

impl GameState {
    pub fn new() -> Self {
        Self::with_grid_size(DEFAULT_GRID_SIZE)
    }

    pub fn with_grid_size(size: GridSize) -> Self {
        Self {
            gold: INITIAL_GOLD,
            click_level: INITIAL_CLICK_LEVEL,
            grid: Grid::new(size),
            discovered_colors: Vec::new(),
            color_upgrade_levels: HashMap::new(),
            ui: UiState::default(),
            log: Vec::new(),
        }
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    /// Record a color in the discovered set. Returns true if it was new.
    pub fn discover(&mut self, color: HexColor) -> bool {
        if self.discovered_colors.contains(&color) {
            return false;
        }
        self.discovered_colors.push(color);
        true
    }

    pub fn grid_size(&self) -> GridSize {
        self.grid.size()
    }

    pub fn cells(&self) -> &[Cell] {
        self.grid.cells()
    }

    pub fn click_power(&self) -> f64 {
        economy::click_power(self.click_level)
    }

    pub fn click_upgrade_cost(&self) -> f64 {
        economy::click_upgrade_cost(self.click_level)
    }

    pub fn cell_assign_cost(&self) -> f64 {
        economy::cell_assign_cost(0)
    }

    /// Upgrade cost of a colored cell; `None` for empty or unknown cells.
    pub fn cell_upgrade_cost(&self, id: &CellId) -> Option<f64> {
        let cell = self.cell(id)?;
        cell.is_colored()
            .then(|| economy::cell_upgrade_cost(cell.level))
    }

    pub fn color_level(&self, color: HexColor) -> u32 {
        self.color_upgrade_levels.get(&color).copied().unwrap_or(0)
    }

    pub fn color_upgrade_cost(&self, color: HexColor) -> f64 {
        economy::color_upgrade_cost(self.color_level(color))
    }

    /// Sum of next-level costs over every discovered color.
    pub fn total_color_upgrade_cost(&self) -> f64 {
        self.discovered_colors
            .iter()
            .map(|&c| self.color_upgrade_cost(c))
            .sum()
    }

    /// Gold per second from all colored cells.
    pub fn total_passive_income(&self) -> f64 {
        economy::total_passive_income(self.grid.cells(), &self.color_upgrade_levels)
    }

    pub fn cell(&self, id: &CellId) -> Option<&Cell> {
        self.grid.get(id)
    }

    /// Look up a cell by its string id, e.g. `"cell-3-1"`.
    pub fn cell_by_id(&self, id: &str) -> Option<&Cell> {
        self.cell(&id.parse().ok()?)
    }

    pub fn color_cell_count(&self, color: HexColor) -> usize {
        self.grid.count_color(color)
    }

    /// Cells per discovered color, in discovery order.
    pub fn cell_counts(&self) -> Vec<(HexColor, usize)> {
        self.discovered_colors
            .iter()
            .map(|&c| (c, self.color_cell_count(c)))
            .collect()
    }

    pub fn special_unlocked(&self) -> bool {
        self.discovered_colors.len() >= COLORS_NEEDED_FOR_SPECIAL
    }

    pub fn locked_slots(&self) -> usize {
        COLLECTION_SLOTS.saturating_sub(self.discovered_colors.len())
    }

    pub fn palette(&self) -> Vec<HexColor> {
        available_palette(self.discovered_colors.len())
    }

    /// Palette entry under the palette cursor.
    pub fn palette_color(&self) -> Option<HexColor> {
        let palette = self.palette();
        palette.get(self.ui.palette_index % palette.len().max(1)).copied()
    }

    pub fn cursor_id(&self) -> CellId {
        CellId::new(self.ui.cursor.0, self.ui.cursor.1)
    }

    /// Move the keyboard cursor, clamped to grid bounds.
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let size = self.grid.size();
        let max_x = size.width.saturating_sub(1) as i64;
        let max_y = size.height.saturating_sub(1) as i64;
        let nx = (self.ui.cursor.0 as i64 + dx as i64).clamp(0, max_x);
        let ny = (self.ui.cursor.1 as i64 + dy as i64).clamp(0, max_y);
        self.ui.cursor = (nx as u32, ny as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> HexColor {
        HexColor::parse("#ff0000").unwrap()
    }

    #[test]
    fn initial_state() {
        let s = GameState::new();
        assert_eq!(s.gold, 0.0);
        assert_eq!(s.click_level, 0);
        assert_eq!(s.click_power(), 1.0);
        assert!(s.discovered_colors.is_empty());
        assert!(s.color_upgrade_levels.is_empty());
        assert!(!s.ui.collection_open);
        assert_eq!(s.ui.selected_cell, None);
        assert_eq!(s.cells().len(), 160);
        let first = &s.cells()[0];
        assert_eq!(first.id.to_string(), "cell-0-0");
        assert_eq!((first.x, first.y, first.level), (0, 0, 0));
        assert!(first.color.is_none());
    }

    #[test]
    fn click_upgrade_cost_follows_level() {
        let mut s = GameState::new();
        assert_eq!(s.click_upgrade_cost(), 100.0);
        s.click_level = 1;
        assert_eq!(s.click_upgrade_cost(), 200.0);
        s.click_level = 2;
        assert_eq!(s.click_upgrade_cost(), 400.0);
    }

    #[test]
    fn passive_income_counts_colored_cells() {
        let mut s = GameState::new();
        assert_eq!(s.total_passive_income(), 0.0);
        let cell = s.grid.get_mut(&CellId::new(0, 0)).unwrap();
        cell.color = Some(red());
        cell.level = 1;
        assert_eq!(s.total_passive_income(), 1.0);
    }

    #[test]
    fn count_cells_by_color() {
        let mut s = GameState::new();
        assert_eq!(s.color_cell_count(red()), 0);
        for x in 0..2 {
            let cell = s.grid.get_mut(&CellId::new(x, 0)).unwrap();
            cell.color = Some(red());
            cell.level = 1;
        }
        assert_eq!(s.color_cell_count(red()), 2);
    }

    #[test]
    fn cell_upgrade_cost_only_for_colored_cells() {
        let mut s = GameState::new();
        let id = CellId::new(1, 1);
        assert_eq!(s.cell_upgrade_cost(&id), None);
        let cell = s.grid.get_mut(&id).unwrap();
        cell.color = Some(red());
        cell.level = 2;
        assert_eq!(s.cell_upgrade_cost(&id), Some(200.0));
        assert_eq!(s.cell_upgrade_cost(&CellId::new(99, 99)), None);
    }

    #[test]
    fn lookup_by_string_id() {
        let s = GameState::new();
        assert_eq!(s.cell_by_id("cell-5-3").map(|c| (c.x, c.y)), Some((5, 3)));
        assert!(s.cell_by_id("cell-50-3").is_none());
        assert!(s.cell_by_id("garbage").is_none());
    }

    #[test]
    fn discover_keeps_order_without_duplicates() {
        let mut s = GameState::new();
        let blue = HexColor::parse("#0000ff").unwrap();
        assert!(s.discover(red()));
        assert!(s.discover(blue));
        assert!(!s.discover(red()));
        assert_eq!(s.discovered_colors, vec![red(), blue]);
    }

    #[test]
    fn collection_slots_and_special_unlock() {
        let mut s = GameState::new();
        assert_eq!(s.locked_slots(), COLLECTION_SLOTS);
        for i in 0..COLORS_NEEDED_FOR_SPECIAL as u8 {
            s.discover(HexColor::new(i, 0, 0));
        }
        assert!(s.special_unlocked());
        assert_eq!(s.locked_slots(), COLLECTION_SLOTS - COLORS_NEEDED_FOR_SPECIAL);
        assert_eq!(s.palette().len(), 10);
    }

    #[test]
    fn move_cursor_clamp() {
        let mut s = GameState::new();
        s.move_cursor(-1, -1);
        assert_eq!(s.ui.cursor, (0, 0));
        s.move_cursor(100, 100);
        assert_eq!(s.ui.cursor, (19, 7));
    }

    #[test]
    fn log_truncation() {
        let mut s = GameState::new();
        for i in 0..40 {
            s.add_log(&format!("msg {}", i), false);
        }
        assert_eq!(s.log.len(), MAX_LOG);
        assert_eq!(s.log[0].text, "msg 10");
    }
}
