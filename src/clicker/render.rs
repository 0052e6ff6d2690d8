//! Grid Clicker rendering: header, grid with click button, palette, upgrade
//! panel, message log, and the collection overlay.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, SwatchRow};

use super::actions::*;
use super::color::{Contrast, HexColor, COLORS_NEEDED_FOR_SPECIAL};
use super::economy::{format_income, format_number, upgrade_preview, UpgradeKind};
use super::grid::{Cell, CellId, GridSize};
use super::state::{GameState, COLLECTION_SLOTS};

/// Terminal columns per grid cell.
const CELL_W: u16 = 3;

const PANEL_HEIGHT: u16 = 16;

pub fn render(
    state: &GameState,
    reset_armed: bool,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let size = state.grid_size();
    let grid_width = (size.width as u16).saturating_mul(CELL_W).saturating_add(2);
    let grid_height = (size.height as u16).saturating_add(2);

    // Side panel on the right when wide enough, stacked below otherwise
    let (main_area, side_area) = if is_narrow_layout(area.width) {
        (area, None)
    } else {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(grid_width), Constraint::Min(30)])
            .split(area);
        (h_chunks[0], Some(h_chunks[1]))
    };

    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Length(grid_height),
        Constraint::Length(4),
    ];
    if side_area.is_none() {
        constraints.push(Constraint::Length(PANEL_HEIGHT));
    }
    constraints.push(Constraint::Min(3));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(main_area);

    render_header(state, f, chunks[0]);
    render_grid(state, f, chunks[1], click_state);
    render_palette(state, f, chunks[2], click_state);

    match side_area {
        Some(side) => {
            let side_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(PANEL_HEIGHT), Constraint::Min(3)])
                .split(side);
            render_panel(state, reset_armed, f, side_chunks[0], click_state);
            render_log(state, f, side_chunks[1]);
        }
        None => {
            render_panel(state, reset_armed, f, chunks[3], click_state);
            render_log(state, f, chunks[4]);
        }
    }

    if state.ui.collection_open {
        render_collection(state, f, area, click_state);
    }
}

fn to_color(color: HexColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

fn text_on(color: HexColor) -> Color {
    match color.contrast() {
        Contrast::Black => Color::Black,
        Contrast::White => Color::White,
    }
}

fn cost_style(affordable: bool) -> Style {
    if affordable {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn render_header(state: &GameState, f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!(" Gold {}", format_number(state.gold.floor())),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("+{}", format_income(state.total_passive_income())),
            Style::default().fg(Color::Green),
        ),
        Span::styled("  │  ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Click +{}", format_number(state.click_power())),
            Style::default().fg(Color::Cyan),
        ),
    ]);
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Grid Clicker "),
    );
    f.render_widget(widget, area);
}

/// Screen rect of a grid cell inside the grid block, if it fits.
fn cell_rect(inner: Rect, x: u32, y: u32) -> Option<Rect> {
    let col = u16::try_from(x).ok()?.checked_mul(CELL_W)?;
    let row = u16::try_from(y).ok()?;
    if col.saturating_add(CELL_W) > inner.width || row >= inner.height {
        return None;
    }
    Some(Rect::new(inner.x + col, inner.y + row, CELL_W, 1))
}

fn button_rect(inner: Rect, size: GridSize) -> Option<Rect> {
    let (bx, by, bw, bh) = size.click_button_area();
    let top_left = cell_rect(inner, bx, by)?;
    let width = (bw as u16 * CELL_W).min(inner.right() - top_left.x);
    let height = (bh as u16).min(inner.bottom() - top_left.y);
    Some(Rect::new(top_left.x, top_left.y, width, height))
}

/// One centered label per button row.
fn button_labels(state: &GameState, size: GridSize) -> Vec<String> {
    let (_, _, bw, bh) = size.click_button_area();
    let width = (bw as u16 * CELL_W) as usize;
    let labels = [
        "CLICK!".to_string(),
        format!("+{}", format_number(state.click_power())),
    ];
    (0..bh as usize)
        .map(|i| {
            let label = labels.get(i).map_or("", |s| s.as_str());
            format!("{:^width$}", label, width = width)
        })
        .collect()
}

fn cell_span(cell: &Cell, is_cursor: bool, is_selected: bool) -> Span<'static> {
    let label = match cell.level {
        0 | 1 => String::new(),
        l if l < 100 => l.to_string(),
        _ => "99+".to_string(),
    };
    let mut style = match cell.color {
        Some(color) => Style::default().bg(to_color(color)).fg(text_on(color)),
        None => Style::default().fg(Color::DarkGray),
    };
    let mut text = match (cell.color, label.is_empty()) {
        (None, _) => " · ".to_string(),
        (Some(_), true) => "   ".to_string(),
        (Some(_), false) => format!("{:^3}", label),
    };
    if is_selected {
        style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
        if label.is_empty() {
            text = " ◆ ".to_string();
        }
    }
    if is_cursor {
        style = style.add_modifier(Modifier::UNDERLINED | Modifier::BOLD);
        if label.is_empty() && !is_selected {
            text = if cell.is_colored() { "[ ]" } else { "[·]" }.to_string();
        }
    }
    Span::styled(text, style)
}

fn render_grid(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Grid ");
    let inner = block.inner(area);

    let grid = &state.grid;
    let size = grid.size();
    let (bx, by, _, _) = size.click_button_area();
    let labels = button_labels(state, size);
    let button_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let cursor = state.cursor_id();

    let mut lines: Vec<Line> = Vec::with_capacity(size.height as usize);
    for y in 0..size.height {
        let mut spans: Vec<Span> = Vec::with_capacity(size.width as usize);
        for x in 0..size.width {
            if grid.is_under_button(x, y) {
                let row = &labels[(y - by) as usize];
                let text: String = row
                    .chars()
                    .skip(((x - bx) * CELL_W as u32) as usize)
                    .take(CELL_W as usize)
                    .collect();
                spans.push(Span::styled(text, button_style));
                continue;
            }
            if let Some(cell) = grid.get(&CellId::new(x, y)) {
                let is_selected = state.ui.selected_cell == Some(cell.id);
                spans.push(cell_span(cell, cell.id == cursor, is_selected));
            }
        }
        lines.push(Line::from(spans));
    }
    f.render_widget(Paragraph::new(lines).block(block), area);

    let mut cs = click_state.borrow_mut();
    for (index, cell) in grid.cells().iter().enumerate() {
        if grid.is_under_button(cell.x, cell.y) {
            continue;
        }
        let action = u16::try_from(index)
            .ok()
            .and_then(|i| CELL_BASE.checked_add(i));
        if let (Some(rect), Some(action)) = (cell_rect(inner, cell.x, cell.y), action) {
            cs.add_click_target(rect, action);
        }
    }
    if let Some(rect) = button_rect(inner, size) {
        cs.add_click_target(rect, CLICK_BUTTON);
    }
}

fn render_palette(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let palette = state.palette();
    let current = state.palette_color();
    let title = match current {
        Some(c) => format!(" Palette {} ([ ] to cycle, a to assign) ", c),
        None => " Palette ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta))
        .title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut row = SwatchRow::new();
    for (i, &color) in palette.iter().enumerate() {
        row.swatch(to_color(color), Some(color) == current, PALETTE_BASE + i as u16);
    }
    row.render(f, inner, &mut click_state.borrow_mut());
}

fn render_panel(
    state: &GameState,
    reset_armed: bool,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cl = ClickableList::new();
    let dim = Style::default().fg(Color::DarkGray);

    let click = upgrade_preview(UpgradeKind::Click, state.click_level);
    cl.push_clickable(
        Line::from(Span::styled(
            format!(
                "[u] Click Lv{} +{} → +{}  ({})",
                state.click_level,
                format_number(click.current),
                format_number(click.next),
                format_number(click.cost),
            ),
            cost_style(state.gold >= click.cost),
        )),
        UPGRADE_CLICK,
    );
    cl.push(Line::from(""));

    let cursor = state.cursor_id();
    cl.push(Line::from(Span::styled(
        format!("Cursor {}", cursor),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )));
    match state.cell(&cursor) {
        Some(cell) if state.grid.is_under_button(cell.x, cell.y) => {
            cl.push(Line::from(Span::styled("Under the click button", dim)));
        }
        Some(cell) => match cell.color {
            Some(color) => {
                let color_level = state.color_level(color);
                let cell_up = upgrade_preview(UpgradeKind::Cell, cell.level);
                let color_up = upgrade_preview(UpgradeKind::Color, color_level);
                cl.push(Line::from(vec![
                    Span::styled("   ", Style::default().bg(to_color(color))),
                    Span::raw(format!(" {}  Lv{}", color, cell.level)),
                ]));
                cl.push_clickable(
                    Line::from(Span::styled(
                        format!(
                            "[g] Cell {}/s → {}/s  ({})",
                            format_number(cell_up.current),
                            format_number(cell_up.next),
                            format_number(cell_up.cost),
                        ),
                        cost_style(state.gold >= cell_up.cost),
                    )),
                    UPGRADE_FOCUSED_CELL,
                );
                cl.push_clickable(
                    Line::from(Span::styled(
                        format!(
                            "[o] Color Lv{} ×{} → ×{}  ({})",
                            color_level,
                            format_number(color_up.current),
                            format_number(color_up.next),
                            format_number(color_up.cost),
                        ),
                        cost_style(state.gold >= color_up.cost),
                    )),
                    UPGRADE_FOCUSED_COLOR,
                );
            }
            None => {
                let cost = state.cell_assign_cost();
                cl.push(Line::from(Span::styled(
                    format!("Empty. a: color it ({})", format_number(cost)),
                    cost_style(state.gold >= cost),
                )));
            }
        },
        None => {}
    }

    if let Some(selected) = state.ui.selected_cell {
        cl.push_clickable(
            Line::from(Span::styled(
                format!("[x] Selected {} (Space on a colored cell fuses)", selected),
                Style::default().fg(Color::Magenta),
            )),
            CLEAR_SELECTION,
        );
    }
    cl.push(Line::from(""));

    if !state.discovered_colors.is_empty() {
        let total = state.total_color_upgrade_cost();
        cl.push_clickable(
            Line::from(Span::styled(
                format!("[A] Upgrade all colors ({})", format_number(total)),
                cost_style(state.gold >= total),
            )),
            UPGRADE_ALL_COLORS,
        );
    }
    cl.push_clickable(
        Line::from(Span::styled(
            format!(
                "[m] Collection {}/{}",
                state.discovered_colors.len(),
                COLLECTION_SLOTS
            ),
            Style::default().fg(Color::Cyan),
        )),
        TOGGLE_COLLECTION,
    );
    let reset_text = if reset_armed {
        "[R] Press again to start over"
    } else {
        "[R] Reset"
    };
    let reset_style = if reset_armed {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        dim
    };
    cl.push_clickable(Line::from(Span::styled(reset_text, reset_style)), RESET_GAME);
    cl.push(Line::from(Span::styled(
        "hjkl move · Space select/fuse · c click",
        dim,
    )));

    cl.register_targets(area, &mut click_state.borrow_mut(), 1, 1);
    let widget = Paragraph::new(cl.into_lines()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Upgrades "),
    );
    f.render_widget(widget, area);
}

fn render_log(state: &GameState, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;

    // Newest first
    let lines: Vec<Line> = state
        .log
        .iter()
        .rev()
        .take(visible)
        .enumerate()
        .map(|(i, entry)| {
            let style = match (entry.is_important, i < 3) {
                (true, true) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn render_collection(
    state: &GameState,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let width = area.width.saturating_sub(4).min(56);
    let height = area.height.saturating_sub(2).min(24);
    let overlay = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let discovered = state.discovered_colors.len();
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(
        format!("Discovered colors: {}", discovered),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if state.special_unlocked() {
        cl.push(Line::from(Span::styled(
            "Special colors unlocked!",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    } else {
        cl.push(Line::from(Span::styled(
            format!(
                "{} more to unlock white and black",
                COLORS_NEEDED_FOR_SPECIAL - discovered
            ),
            Style::default().fg(Color::DarkGray),
        )));
    }

    if discovered > 0 {
        let total = state.total_color_upgrade_cost();
        cl.push_clickable(
            Line::from(Span::styled(
                format!("[A] Upgrade all colors ({})", format_number(total)),
                cost_style(state.gold >= total),
            )),
            UPGRADE_ALL_COLORS,
        );
    }
    cl.push_clickable(
        Line::from(Span::styled("[m] Close", Style::default().fg(Color::Cyan))),
        CLOSE_COLLECTION,
    );
    cl.push(Line::from(""));

    for (color, count) in state.cell_counts() {
        cl.push(Line::from(vec![
            Span::styled("   ", Style::default().bg(to_color(color))),
            Span::raw(format!(
                " {}  {} cells  Lv{}",
                color,
                count,
                state.color_level(color)
            )),
        ]));
    }
    let locked = state.locked_slots();
    if locked > 0 {
        cl.push(Line::from(Span::styled(
            format!("{}locked", "? ".repeat(locked)),
            Style::default().fg(Color::DarkGray),
        )));
    }

    cl.register_targets(overlay, &mut click_state.borrow_mut(), 1, 1);
    let widget = Paragraph::new(cl.into_lines())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(" Color Collection "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, overlay);
    f.render_widget(widget, overlay);
}
