//! Grid Clicker actions as plain functions over `GameState`.
//!
//! Spending actions check the balance first and leave the state untouched
//! when gold is short. They return `true` only when something changed.
//! No level goes past [`MAX_LEVEL`] and gold never leaves the finite range,
//! so every state can be saved and restored.

use super::color::{ColorError, HexColor};
use super::economy::{add_gold, can_afford, format_number, MAX_GOLD, MAX_LEVEL};
use super::grid::{CellId, Grid};
use super::state::{GameState, UiState, INITIAL_CLICK_LEVEL, INITIAL_GOLD};

/// Manual click: add click power to gold.
pub fn click(state: &mut GameState) {
    state.gold = add_gold(state.gold, state.click_power());
}

/// Buy the next click level. Returns true if successful.
pub fn upgrade_click(state: &mut GameState) -> bool {
    let cost = state.click_upgrade_cost();
    if state.click_level >= MAX_LEVEL || !can_afford(state.gold, cost) {
        return false;
    }
    state.gold -= cost;
    state.click_level += 1;
    log::debug!("click upgraded to level {} for {}", state.click_level, cost);
    state.add_log(
        &format!(
            "Click upgraded! +{} per click",
            format_number(state.click_power())
        ),
        false,
    );
    true
}

/// Color an empty cell. The color string is validated before anything else,
/// so a malformed color is an error even when the action would be a no-op.
pub fn assign_color(state: &mut GameState, id: &CellId, color: &str) -> Result<bool, ColorError> {
    let color = HexColor::parse(color)?;
    Ok(assign_hex(state, id, color))
}

/// Color an empty cell with an already validated color.
pub fn assign_hex(state: &mut GameState, id: &CellId, color: HexColor) -> bool {
    let cost = state.cell_assign_cost();
    if !can_afford(state.gold, cost) {
        return false;
    }
    let Some(cell) = state.grid.get_mut(id) else {
        return false;
    };
    if cell.is_colored() {
        return false;
    }
    cell.color = Some(color);
    cell.level = 1;
    state.gold -= cost;
    let is_new = state.discover(color);
    log::debug!("assigned {} to {} (new color: {})", color, id, is_new);
    if is_new {
        state.add_log(&format!("New color discovered: {}", color), true);
    }
    true
}

/// Raise a colored cell's level by one.
pub fn upgrade_cell(state: &mut GameState, id: &CellId) -> bool {
    let Some(cost) = state.cell_upgrade_cost(id) else {
        return false;
    };
    if !can_afford(state.gold, cost) {
        return false;
    }
    let Some(cell) = state.grid.get_mut(id) else {
        return false;
    };
    if cell.level >= MAX_LEVEL {
        return false;
    }
    cell.level += 1;
    let level = cell.level;
    state.gold -= cost;
    log::debug!("upgraded {} to level {}", id, level);
    true
}

/// Merge `source` into `target`: the target takes the blended color and the
/// summed level, the source is emptied. Free of charge. Refused when the
/// summed level would pass [`MAX_LEVEL`].
pub fn fuse_cells(state: &mut GameState, source: &CellId, target: &CellId) -> bool {
    let Some((src, dst)) = state.grid.get_pair_mut(source, target) else {
        return false;
    };
    let (Some(src_color), Some(dst_color)) = (src.color, dst.color) else {
        return false;
    };
    let level = match src.level.checked_add(dst.level) {
        Some(l) if l <= MAX_LEVEL => l,
        _ => return false,
    };

    let blended = src_color.blend(dst_color);
    dst.color = Some(blended);
    dst.level = level;
    src.clear();

    let is_new = state.discover(blended);
    if state.ui.selected_cell == Some(*source) {
        state.ui.selected_cell = None;
    }
    log::debug!("fused {} into {} -> {} (level {})", source, target, blended, level);
    state.add_log(
        &format!("Fusion! {} + {} = {} (Lv{})", src_color, dst_color, blended, level),
        is_new,
    );
    true
}

/// Buy the next upgrade level of a color. Returns true if successful.
pub fn upgrade_color(state: &mut GameState, color: HexColor) -> bool {
    let cost = state.color_upgrade_cost(color);
    if state.color_level(color) >= MAX_LEVEL || !can_afford(state.gold, cost) {
        return false;
    }
    state.gold -= cost;
    let level = state.color_upgrade_levels.entry(color).or_insert(0);
    *level += 1;
    log::debug!("color {} upgraded to level {}", color, level);
    true
}

/// Upgrade every discovered color that is affordable, in discovery order.
/// Returns how many upgrades were bought.
pub fn upgrade_all_colors(state: &mut GameState) -> usize {
    let colors = state.discovered_colors.clone();
    let bought = colors
        .into_iter()
        .filter(|&c| upgrade_color(state, c))
        .count();
    if bought > 0 {
        state.add_log(&format!("Upgraded {} colors", bought), false);
    }
    bought
}

/// Credit passive income. Negative or non-finite amounts are ignored.
pub fn add_passive_income(state: &mut GameState, amount: f64) -> bool {
    if !amount.is_finite() || amount < 0.0 {
        return false;
    }
    state.gold = add_gold(state.gold, amount);
    true
}

/// Credit `seconds` worth of income at the current rate. Returns the amount.
pub fn accrue(state: &mut GameState, seconds: f64) -> f64 {
    let rate = state.total_passive_income();
    if rate <= 0.0 || seconds <= 0.0 {
        return 0.0;
    }
    let amount = (rate * seconds).min(MAX_GOLD);
    if add_passive_income(state, amount) {
        amount
    } else {
        0.0
    }
}

/// Start over with a fresh grid of the same size.
pub fn reset_game(state: &mut GameState) {
    let size = state.grid.size();
    state.gold = INITIAL_GOLD;
    state.click_level = INITIAL_CLICK_LEVEL;
    state.grid = Grid::new(size);
    state.discovered_colors.clear();
    state.color_upgrade_levels.clear();
    state.ui = UiState::default();
    state.log.clear();
    log::info!("game reset ({}x{})", size.width, size.height);
    state.add_log("New game started", true);
}

pub fn select_cell(state: &mut GameState, id: Option<CellId>) {
    state.ui.selected_cell = id;
}

pub fn open_collection(state: &mut GameState) {
    state.ui.collection_open = true;
}

pub fn close_collection(state: &mut GameState) {
    state.ui.collection_open = false;
}
