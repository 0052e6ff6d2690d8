//! Input plumbing: event types, click targets, and pixel → terminal cell conversion.
//!
//! The renderer registers a target for every clickable region each frame;
//! the mouse handler converts the pointer position to a terminal cell and
//! asks [`ClickState::hit_test`] which action it landed on.

use ratzilla::ratatui::layout::Rect;

/// Input events, normalized from keyboard and mouse/touch sources.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key press. Arrow keys, Enter and Esc arrive already mapped to chars.
    Key(char),
    /// A click/tap on a registered target, identified by its action ID.
    Click(u16),
}

/// A region on screen that triggers an action when clicked.
#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cell coordinates.
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets of the last rendered frame plus the terminal size they
/// were laid out for.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Start a new frame at the given terminal size.
    pub fn reset(&mut self, cols: u16, rows: u16) {
        self.terminal_cols = cols;
        self.terminal_rows = rows;
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        if rect.width > 0 && rect.height > 0 {
            self.targets.push(ClickTarget { rect, action_id });
        }
    }

    /// Register a full-width target on one row of `area`. Rows outside the
    /// area are ignored.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Action under a terminal cell. When targets overlap the one registered
    /// last wins, so overlays drawn on top take the click.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }
}

/// Narrow screens stack the side panel under the grid.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 90
}

/// Convert a pixel Y coordinate, relative to the terminal container's top
/// edge, to a row index. `None` outside the container or on degenerate sizes.
pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    pixel_to_index(click_y, grid_height, terminal_rows)
}

/// Convert a pixel X coordinate, relative to the container's left edge, to
/// a column index.
pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    pixel_to_index(click_x, grid_width, terminal_cols)
}

fn pixel_to_index(pos: f64, extent: f64, count: u16) -> Option<u16> {
    if extent <= 0.0 || count == 0 || pos < 0.0 {
        return None;
    }
    let cell = extent / count as f64;
    let index = (pos / cell) as u16;
    (index < count).then_some(index)
}
