//! Balance formulas. Pure functions of integer levels.
//!
//! All values are powers of two scaled by a base. `2^n` is exact in `f64`
//! up to n = 1023, but the base pushes costs out of range earlier:
//!
//! | Formula               | Last finite level |
//! |-----------------------|-------------------|
//! | `click_upgrade_cost`  | 1017              |
//! | `cell_assign_cost`, `cell_upgrade_cost` | 1018 |
//! | `color_upgrade_cost`  | 1016              |
//! | `cell_passive_income` | 1024              |
//!
//! Levels never go past [`MAX_LEVEL`], so every cost the game can ask for is
//! finite. Income sums and gold balances are clamped to [`MAX_GOLD`]; the
//! product of a high cell level and a high color multiplier can still
//! overflow a single term.

use super::color::HexColor;
use super::grid::Cell;
use std::collections::HashMap;

pub const CLICK_UPGRADE_BASE_COST: f64 = 100.0;
pub const CELL_ASSIGN_BASE_COST: f64 = 50.0;
pub const COLOR_UPGRADE_COST_FACTOR: f64 = 5.0;

/// Highest click, cell and color level. Every cost at this level is finite.
pub const MAX_LEVEL: u32 = 1000;

/// Largest gold balance or income rate.
pub const MAX_GOLD: f64 = f64::MAX;

/// Whether `gold` covers `cost`. A non-finite cost is never affordable.
pub fn can_afford(gold: f64, cost: f64) -> bool {
    cost.is_finite() && gold >= cost
}

/// `gold + amount`, kept inside the finite range.
pub fn add_gold(gold: f64, amount: f64) -> f64 {
    (gold + amount).min(MAX_GOLD)
}

/// `2^exp` as an exact `f64`, `+inf` once the exponent leaves the finite range.
pub fn pow2(exp: u32) -> f64 {
    if exp > 1023 {
        f64::INFINITY
    } else {
        2f64.powi(exp as i32)
    }
}

/// Gold earned per manual click.
pub fn click_power(level: u32) -> f64 {
    pow2(level)
}

pub fn click_upgrade_cost(level: u32) -> f64 {
    CLICK_UPGRADE_BASE_COST * pow2(level)
}

/// Cost to color a cell. A fresh assignment is level 0.
pub fn cell_assign_cost(level: u32) -> f64 {
    CELL_ASSIGN_BASE_COST * pow2(level)
}

pub fn cell_upgrade_cost(level: u32) -> f64 {
    CELL_ASSIGN_BASE_COST * pow2(level)
}

/// Gold per second from one colored cell before color multipliers.
pub fn cell_passive_income(level: u32) -> f64 {
    match level {
        0 => 0.0,
        l => pow2(l - 1),
    }
}

pub fn color_upgrade_cost(level: u32) -> f64 {
    CELL_ASSIGN_BASE_COST * COLOR_UPGRADE_COST_FACTOR * pow2(level)
}

/// Multiplier applied to every cell of a color with this upgrade level.
pub fn color_multiplier(level: u32) -> f64 {
    pow2(level)
}

/// Gold per second from all colored cells.
pub fn total_passive_income<'a>(
    cells: impl IntoIterator<Item = &'a Cell>,
    color_levels: &HashMap<HexColor, u32>,
) -> f64 {
    cells
        .into_iter()
        .filter_map(|cell| {
            let color = cell.color?;
            let level = color_levels.get(&color).copied().unwrap_or(0);
            Some(cell_passive_income(cell.level) * color_multiplier(level))
        })
        .sum::<f64>()
        .min(MAX_GOLD)
}

/// Which upgrade a preview is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeKind {
    Click,
    Cell,
    Color,
}

/// Cost of the next level and the benefit before and after buying it.
///
/// The benefit is click power for [`UpgradeKind::Click`], gold per second
/// for [`UpgradeKind::Cell`], and the income multiplier for
/// [`UpgradeKind::Color`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradePreview {
    pub cost: f64,
    pub current: f64,
    pub next: f64,
}

pub fn upgrade_preview(kind: UpgradeKind, level: u32) -> UpgradePreview {
    let next_level = level.saturating_add(1);
    match kind {
        UpgradeKind::Click => UpgradePreview {
            cost: click_upgrade_cost(level),
            current: click_power(level),
            next: click_power(next_level),
        },
        UpgradeKind::Cell => UpgradePreview {
            cost: cell_upgrade_cost(level),
            current: cell_passive_income(level),
            next: cell_passive_income(next_level),
        },
        UpgradeKind::Color => UpgradePreview {
            cost: color_upgrade_cost(level),
            current: color_multiplier(level),
            next: color_multiplier(next_level),
        },
    }
}

/// Compact number display: `999`, `1.5K`, `12.3M`, `1.5B`.
pub fn format_number(n: f64) -> String {
    if n < 1_000.0 {
        format!("{}", n)
    } else if n < 1_000_000.0 {
        format!("{:.1}K", n / 1_000.0)
    } else if n < 1_000_000_000.0 {
        format!("{:.1}M", n / 1_000_000.0)
    } else {
        format!("{:.1}B", n / 1_000_000_000.0)
    }
}

/// Income rate display used next to the gold counter.
pub fn format_income(rate: f64) -> String {
    if rate == 0.0 {
        "0/sec".to_string()
    } else if rate < 1.0 {
        format!("{:.2}/sec", rate)
    } else if rate < 1_000.0 {
        format!("{:.1}/sec", rate)
    } else if rate < 1_000_000.0 {
        format!("{:.1}K/sec", rate / 1_000.0)
    } else {
        format!("{:.1}M/sec", rate / 1_000_000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clicker::grid::CellId;

    fn cell(x: u32, color: Option<&str>, level: u32) -> Cell {
        Cell {
            id: CellId::new(x, 0),
            x,
            y: 0,
            color: color.map(|c| HexColor::parse(c).unwrap()),
            level,
        }
    }

    #[test]
    fn click_power_doubles() {
        assert_eq!(click_power(0), 1.0);
        assert_eq!(click_power(1), 2.0);
        assert_eq!(click_power(2), 4.0);
        assert_eq!(click_power(3), 8.0);
    }

    #[test]
    fn click_upgrade_cost_doubles() {
        assert_eq!(click_upgrade_cost(0), 100.0);
        assert_eq!(click_upgrade_cost(1), 200.0);
        assert_eq!(click_upgrade_cost(2), 400.0);
    }

    #[test]
    fn cell_costs() {
        assert_eq!(cell_assign_cost(0), 50.0);
        assert_eq!(cell_upgrade_cost(1), 100.0);
        assert_eq!(cell_upgrade_cost(3), 400.0);
    }

    #[test]
    fn cell_income() {
        assert_eq!(cell_passive_income(0), 0.0);
        assert_eq!(cell_passive_income(1), 1.0);
        assert_eq!(cell_passive_income(2), 2.0);
        assert_eq!(cell_passive_income(3), 4.0);
    }

    #[test]
    fn color_upgrade_cost_is_250_base() {
        assert_eq!(color_upgrade_cost(0), 250.0);
        assert_eq!(color_upgrade_cost(2), 1000.0);
    }

    #[test]
    fn last_finite_level_per_formula() {
        assert!(pow2(1023).is_finite());
        assert_eq!(pow2(1024), f64::INFINITY);
        assert!(click_upgrade_cost(1017).is_finite());
        assert_eq!(click_upgrade_cost(1018), f64::INFINITY);
        assert!(cell_upgrade_cost(1018).is_finite());
        assert_eq!(cell_assign_cost(1019), f64::INFINITY);
        assert!(color_upgrade_cost(1016).is_finite());
        assert_eq!(color_upgrade_cost(1017), f64::INFINITY);
        assert!(cell_passive_income(1024).is_finite());
        assert_eq!(cell_passive_income(u32::MAX), f64::INFINITY);
    }

    #[test]
    fn costs_at_max_level_are_finite() {
        assert!(click_upgrade_cost(MAX_LEVEL).is_finite());
        assert!(cell_upgrade_cost(MAX_LEVEL).is_finite());
        assert!(color_upgrade_cost(MAX_LEVEL).is_finite());
        assert!(cell_passive_income(MAX_LEVEL).is_finite());
    }

    #[test]
    fn infinite_cost_is_never_affordable() {
        assert!(can_afford(100.0, 100.0));
        assert!(!can_afford(99.0, 100.0));
        assert!(!can_afford(f64::INFINITY, f64::INFINITY));
        assert!(!can_afford(MAX_GOLD, f64::NAN));
    }

    #[test]
    fn add_gold_stays_finite() {
        assert_eq!(add_gold(1.5, 2.0), 3.5);
        assert_eq!(add_gold(MAX_GOLD, MAX_GOLD), MAX_GOLD);
    }

    #[test]
    fn overflowing_income_is_clamped() {
        let cells = vec![cell(0, Some("#ff0000"), MAX_LEVEL), cell(1, Some("#ff0000"), MAX_LEVEL)];
        let mut levels = HashMap::new();
        levels.insert(HexColor::parse("#ff0000").unwrap(), MAX_LEVEL);
        assert_eq!(total_passive_income(&cells, &levels), MAX_GOLD);
    }

    #[test]
    fn total_income_sums_colored_cells() {
        let cells = vec![
            cell(0, Some("#ff0000"), 1),
            cell(1, Some("#00ff00"), 2),
            cell(2, None, 1),
        ];
        assert_eq!(total_passive_income(&cells, &HashMap::new()), 3.0);
    }

    #[test]
    fn total_income_applies_color_multiplier() {
        let cells = vec![cell(0, Some("#ff0000"), 1), cell(1, Some("#00ff00"), 2)];
        let mut levels = HashMap::new();
        levels.insert(HexColor::parse("#ff0000").unwrap(), 1);
        assert_eq!(total_passive_income(&cells, &levels), 4.0);
    }

    #[test]
    fn total_income_empty_is_zero() {
        let cells: Vec<Cell> = Vec::new();
        assert_eq!(total_passive_income(&cells, &HashMap::new()), 0.0);
    }

    #[test]
    fn preview_click() {
        let p = upgrade_preview(UpgradeKind::Click, 2);
        assert_eq!(p.cost, 400.0);
        assert_eq!(p.current, 4.0);
        assert_eq!(p.next, 8.0);
    }

    #[test]
    fn preview_cell_from_uncolored() {
        let p = upgrade_preview(UpgradeKind::Cell, 0);
        assert_eq!(p.cost, 50.0);
        assert_eq!(p.current, 0.0);
        assert_eq!(p.next, 1.0);
    }

    #[test]
    fn preview_color() {
        let p = upgrade_preview(UpgradeKind::Color, 1);
        assert_eq!(p.cost, 500.0);
        assert_eq!(p.current, 2.0);
        assert_eq!(p.next, 4.0);
    }

    #[test]
    fn format_number_small() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(123.0), "123");
        assert_eq!(format_number(999.0), "999");
    }

    #[test]
    fn format_number_suffixes() {
        assert_eq!(format_number(1500.0), "1.5K");
        assert_eq!(format_number(12345.0), "12.3K");
        assert_eq!(format_number(1_500_000.0), "1.5M");
        assert_eq!(format_number(12_345_678.0), "12.3M");
        assert_eq!(format_number(1_500_000_000.0), "1.5B");
    }

    #[test]
    fn format_income_ranges() {
        assert_eq!(format_income(0.0), "0/sec");
        assert_eq!(format_income(0.5), "0.50/sec");
        assert_eq!(format_income(12.0), "12.0/sec");
        assert_eq!(format_income(2500.0), "2.5K/sec");
        assert_eq!(format_income(3_000_000.0), "3.0M/sec");
    }
}
