//! Grid Clicker save/load.
//!
//! ## Versioning
//!
//! - `SAVE_VERSION`: current snapshot format. Bump when fields are added.
//! - `MIN_COMPATIBLE_VERSION`: oldest format that still loads. Bump only on
//!   breaking changes (a field changes meaning or disappears).
//!
//! Snapshots at or above `MIN_COMPATIBLE_VERSION` load with missing fields
//! defaulted. A snapshot that does not describe a consistent grid is
//! discarded and the player starts a fresh session.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::color::{ColorError, HexColor};
use super::economy::MAX_LEVEL;
use super::grid::{Cell, CellId, CellIdError, Grid, GridSize, MAX_GRID_CELLS};
use super::state::GameState;

pub const SAVE_VERSION: u32 = 1;

pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// localStorage key.
pub const STORAGE_KEY: &str = "grid-clicker-game-state";

/// Autosave interval in milliseconds of wall-clock time.
pub const AUTOSAVE_INTERVAL_MS: f64 = 5_000.0;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot version {saved} is older than {min_compatible}")]
    IncompatibleVersion { saved: u32, min_compatible: u32 },
    #[error("snapshot grid {width}x{height} is empty or larger than {max} cells")]
    InvalidGridSize { width: u32, height: u32, max: usize },
    #[error("snapshot has {found} cells, expected {expected} for a {width}x{height} grid")]
    GridMismatch {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
    #[error("snapshot cell {index} is inconsistent: {reason}")]
    CellMismatch { index: usize, reason: &'static str },
    #[error("snapshot currency {0} is not a non-negative number")]
    InvalidCurrency(f64),
    #[error("snapshot {what} level {level} is above {max}")]
    LevelOutOfRange {
        what: &'static str,
        level: u32,
        max: u32,
    },
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error(transparent)]
    CellId(#[from] CellIdError),
}

/// Serialized envelope. UI-only state (selection, cursor, log) is not saved.
#[derive(Serialize, Deserialize)]
struct SaveData {
    version: u32,
    game: GameSave,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct GameSave {
    gold: f64,
    click_level: u32,
    grid_width: u32,
    grid_height: u32,
    /// Row-major, one entry per grid position.
    cells: Vec<CellSave>,
    /// Discovery order.
    discovered_colors: Vec<String>,
    color_upgrade_levels: HashMap<String, u32>,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct CellSave {
    id: String,
    x: u32,
    y: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    level: u32,
}

fn extract_save(state: &GameState) -> SaveData {
    let size = state.grid_size();
    let mut color_upgrade_levels: HashMap<String, u32> = HashMap::new();
    for (color, level) in &state.color_upgrade_levels {
        color_upgrade_levels.insert(color.to_string(), *level);
    }

    SaveData {
        version: SAVE_VERSION,
        game: GameSave {
            gold: state.gold,
            click_level: state.click_level,
            grid_width: size.width,
            grid_height: size.height,
            cells: state
                .cells()
                .iter()
                .map(|c| CellSave {
                    id: c.id.to_string(),
                    x: c.x,
                    y: c.y,
                    color: c.color.map(|col| col.to_string()),
                    level: c.level,
                })
                .collect(),
            discovered_colors: state
                .discovered_colors
                .iter()
                .map(|c| c.to_string())
                .collect(),
            color_upgrade_levels,
        },
    }
}

/// Rebuild the cell at row-major `index`, checking that it sits where its id says.
fn restore_cell(index: usize, size: GridSize, save: &CellSave) -> Result<Cell, SnapshotError> {
    let id: CellId = save.id.parse()?;
    let width = size.width as usize;
    let expected = CellId::new((index % width) as u32, (index / width) as u32);
    if id != expected || save.x != id.x || save.y != id.y {
        return Err(SnapshotError::CellMismatch {
            index,
            reason: "id or position out of order",
        });
    }

    let color = save.color.as_deref().map(HexColor::parse).transpose()?;
    if color.is_some() != (save.level >= 1) {
        return Err(SnapshotError::CellMismatch {
            index,
            reason: "colored cells need level >= 1 and empty cells level 0",
        });
    }
    if save.level > MAX_LEVEL {
        return Err(SnapshotError::CellMismatch {
            index,
            reason: "level above the maximum",
        });
    }

    let mut cell = Cell::empty(id.x, id.y);
    cell.color = color;
    cell.level = save.level;
    Ok(cell)
}

fn check_level(what: &'static str, level: u32) -> Result<(), SnapshotError> {
    if level > MAX_LEVEL {
        return Err(SnapshotError::LevelOutOfRange {
            what,
            level,
            max: MAX_LEVEL,
        });
    }
    Ok(())
}

fn apply_save(save: &GameSave) -> Result<GameState, SnapshotError> {
    if !save.gold.is_finite() || save.gold < 0.0 {
        return Err(SnapshotError::InvalidCurrency(save.gold));
    }

    let size = GridSize {
        width: save.grid_width,
        height: save.grid_height,
    };
    let expected = match size.cell_count() {
        Some(n) if size.is_playable() => n,
        _ => {
            return Err(SnapshotError::InvalidGridSize {
                width: size.width,
                height: size.height,
                max: MAX_GRID_CELLS,
            })
        }
    };
    if save.cells.len() != expected {
        return Err(SnapshotError::GridMismatch {
            width: size.width,
            height: size.height,
            expected,
            found: save.cells.len(),
        });
    }

    check_level("click", save.click_level)?;

    let cells = save
        .cells
        .iter()
        .enumerate()
        .map(|(i, c)| restore_cell(i, size, c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut state = GameState::with_grid_size(size);
    state.grid = Grid::from_cells(size, cells);
    state.gold = save.gold;
    state.click_level = save.click_level;

    for color in &save.discovered_colors {
        state.discover(HexColor::parse(color)?);
    }
    // Colors on the board count as discovered even if the list lost them.
    let on_board: Vec<HexColor> = state.cells().iter().filter_map(|c| c.color).collect();
    for color in on_board {
        state.discover(color);
    }

    // "#F00" and "#ff0000" name the same color; the higher level wins.
    for (color, &level) in &save.color_upgrade_levels {
        let color = HexColor::parse(color)?;
        check_level("color", level)?;
        if level > 0 {
            let entry = state.color_upgrade_levels.entry(color).or_insert(0);
            *entry = (*entry).max(level);
        }
    }

    Ok(state)
}

/// Serialize the persistable part of the state.
pub fn to_json(state: &GameState) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&extract_save(state))?)
}

/// Rebuild a session from a snapshot, rejecting anything inconsistent.
pub fn restore(json: &str) -> Result<GameState, SnapshotError> {
    let save_data: SaveData = serde_json::from_str(json)?;

    if save_data.version < MIN_COMPATIBLE_VERSION {
        return Err(SnapshotError::IncompatibleVersion {
            saved: save_data.version,
            min_compatible: MIN_COMPATIBLE_VERSION,
        });
    }
    if save_data.version < SAVE_VERSION {
        log::info!(
            "migrating snapshot (saved={}, current={})",
            save_data.version,
            SAVE_VERSION
        );
    }

    apply_save(&save_data.game)
}

/// Restore from a snapshot if there is a usable one, else start fresh.
pub fn load_or_new(json: Option<&str>) -> GameState {
    let Some(json) = json else {
        log::info!("no snapshot found, starting a new game");
        return GameState::new();
    };
    match restore(json) {
        Ok(state) => {
            log::info!(
                "snapshot loaded: {} gold, {} colors discovered",
                state.gold,
                state.discovered_colors.len()
            );
            state
        }
        Err(e) => {
            log::warn!("discarding snapshot: {e}");
            GameState::new()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn get_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Write the state to localStorage. Failures are logged and otherwise ignored.
#[cfg(target_arch = "wasm32")]
pub fn save_game(state: &GameState) {
    let json = match to_json(state) {
        Ok(j) => j,
        Err(e) => {
            log::warn!("failed to serialize snapshot: {e}");
            return;
        }
    };
    if let Some(storage) = get_storage() {
        if let Err(e) = storage.set_item(STORAGE_KEY, &json) {
            log::warn!("failed to write localStorage: {e:?}");
        }
    }
}

/// Load the saved session from localStorage, or start a fresh one.
/// A snapshot that fails to load is removed so it is not retried.
#[cfg(target_arch = "wasm32")]
pub fn load_game() -> GameState {
    let json = get_storage().and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
    let Some(json) = json else {
        return load_or_new(None);
    };
    match restore(&json) {
        Ok(state) => {
            log::info!("snapshot loaded from localStorage");
            state
        }
        Err(e) => {
            log::warn!("removing unusable snapshot: {e}");
            delete_save();
            GameState::new()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn delete_save() {
    if let Some(storage) = get_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}
