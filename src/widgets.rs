//! Reusable clickable UI components.
//!
//! Each component renders itself and registers its own click targets, so
//! the rows and columns that are hit-tested always match what was drawn.
//!
//! - [`ClickableList`]: vertical list with per-row click targets.
//! - [`SwatchRow`]: horizontal strip of color swatches, one target each.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::Paragraph;
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

// ── ClickableList ──────────────────────────────────────────────

/// Lines paired with the action they trigger.
///
/// Annotate lines as clickable while building, then call
/// [`register_targets`](ClickableList::register_targets) once the area is
/// known. Inserting lines above a clickable one moves its target with it.
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line_index, action_id)` pairs.
    actions: Vec<(u16, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len() as u16, action_id));
        self.lines.push(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register one row target per clickable line. Lines are assumed not to
    /// wrap. `top_offset`/`bottom_offset` are the border rows of `area`.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
    ) {
        let content_y = area.y + top_offset;
        let content_end = area.y + area.height.saturating_sub(bottom_offset);
        for &(line_idx, action_id) in &self.actions {
            let row = content_y + line_idx;
            if row < content_end {
                cs.add_row_target(area, row, action_id);
            }
        }
    }
}

// ── SwatchRow ──────────────────────────────────────────────────

/// Width in columns of one swatch, including the gap after it.
pub const SWATCH_STRIDE: u16 = 4;
const SWATCH_WIDTH: u16 = 3;

/// A row of clickable color swatches, wrapping onto further rows when the
/// area is too narrow.
///
/// ```ignore
/// let mut row = SwatchRow::new();
/// for (i, c) in palette.iter().enumerate() {
///     row.swatch(to_color(*c), i == selected, PALETTE_BASE + i as u16);
/// }
/// row.render(f, area, &mut cs);
/// ```
pub struct SwatchRow {
    swatches: Vec<(Color, bool, u16)>,
}

impl SwatchRow {
    pub fn new() -> Self {
        Self {
            swatches: Vec::new(),
        }
    }

    /// Add a swatch. `selected` draws a marker inside it.
    pub fn swatch(&mut self, color: Color, selected: bool, action_id: u16) {
        self.swatches.push((color, selected, action_id));
    }

    /// Screen rect and action of every swatch that fits in `area`.
    pub fn layout(&self, area: Rect) -> Vec<(Rect, u16)> {
        let per_row = (area.width / SWATCH_STRIDE).max(1) as usize;
        self.swatches
            .iter()
            .enumerate()
            .filter_map(|(i, &(_, _, action_id))| {
                let row = (i / per_row) as u16;
                let col = (i % per_row) as u16;
                if row >= area.height {
                    return None;
                }
                let width = SWATCH_WIDTH.min(area.width);
                let rect = Rect::new(area.x + col * SWATCH_STRIDE, area.y + row, width, 1);
                Some((rect, action_id))
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let per_row = (area.width / SWATCH_STRIDE).max(1) as usize;
        let lines: Vec<Line> = self
            .swatches
            .chunks(per_row)
            .map(|chunk| {
                let spans: Vec<Span> = chunk
                    .iter()
                    .flat_map(|&(color, selected, _)| {
                        let mark = if selected { " ◆ " } else { "   " };
                        let style = Style::default()
                            .bg(color)
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD);
                        [Span::styled(mark, style), Span::raw(" ")]
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        f.render_widget(Paragraph::new(lines), area);

        for (rect, action_id) in self.layout(area) {
            cs.add_click_target(rect, action_id);
        }
    }
}
