//! Semantic action IDs for Grid Clicker click targets.
//!
//! Each constant represents a distinct clickable action in the UI.
//! These IDs are registered during render and dispatched via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_BUTTON: u16 = 0;
pub const UPGRADE_CLICK: u16 = 1;

// ── Cursor cell actions ─────────────────────────────────────────
pub const UPGRADE_FOCUSED_CELL: u16 = 10;
pub const UPGRADE_FOCUSED_COLOR: u16 = 11;
pub const CLEAR_SELECTION: u16 = 12;

// ── Color upgrades ──────────────────────────────────────────────
pub const UPGRADE_ALL_COLORS: u16 = 20;

// ── Collection view ─────────────────────────────────────────────
pub const TOGGLE_COLLECTION: u16 = 30;
pub const CLOSE_COLLECTION: u16 = 31;

// ── Session ─────────────────────────────────────────────────────
pub const RESET_GAME: u16 = 40;

// ── Palette swatch (base + palette index 0..9) ──────────────────
pub const PALETTE_BASE: u16 = 200;

// ── Grid cell (base + row-major cell index) ─────────────────────
pub const CELL_BASE: u16 = 1000;
