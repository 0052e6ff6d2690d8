/// Grid Clicker: click for gold, color the grid, fuse cells into new colors.

pub mod actions;
pub mod color;
pub mod driver;
pub mod economy;
pub mod grid;
pub mod logic;
pub mod render;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

use actions::*;
use driver::PassiveIncomeDriver;
use economy::{format_number, MAX_LEVEL};
use grid::CellId;
use state::GameState;

pub struct GridClicker {
    pub state: Rc<RefCell<GameState>>,
    driver: PassiveIncomeDriver,
    /// First reset request arms, the second one resets.
    reset_armed: bool,
    /// Set when input changed something worth saving.
    dirty: bool,
}

impl GridClicker {
    pub fn new(state: GameState) -> Self {
        let state = Rc::new(RefCell::new(state));
        Self {
            driver: PassiveIncomeDriver::new(Rc::clone(&state)),
            state,
            reset_armed: false,
            dirty: false,
        }
    }

    pub fn driver_mut(&mut self) -> &mut PassiveIncomeDriver {
        &mut self.driver
    }

    /// Returns whether state changed since the last call, and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Handle an input event. Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let is_reset = matches!(event, InputEvent::Key('R') | InputEvent::Click(RESET_GAME));
        if !is_reset {
            self.reset_armed = false;
        }
        let consumed = match event {
            InputEvent::Key(c) => self.handle_key(*c),
            InputEvent::Click(id) => self.handle_click(*id),
        };
        self.dirty |= consumed;
        consumed
    }

    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.state.borrow(), self.reset_armed, f, area, click_state);
    }

    fn handle_key(&mut self, key: char) -> bool {
        if self.state.borrow().ui.collection_open {
            return match key {
                'm' | 'x' => self.close_collection(),
                'A' => self.upgrade_all_colors(),
                _ => false,
            };
        }

        match key {
            'c' => {
                logic::click(&mut self.state.borrow_mut());
                true
            }
            'u' => self.upgrade_click(),
            'h' => self.move_cursor(-1, 0),
            'l' => self.move_cursor(1, 0),
            'k' => self.move_cursor(0, -1),
            'j' => self.move_cursor(0, 1),
            ' ' => {
                let id = self.state.borrow().cursor_id();
                self.activate_cell(id)
            }
            'a' => self.assign_palette_color(),
            '[' => self.cycle_palette(-1),
            ']' => self.cycle_palette(1),
            'g' => self.upgrade_cursor_cell(),
            'o' => self.upgrade_cursor_color(),
            'A' => self.upgrade_all_colors(),
            'm' => {
                logic::open_collection(&mut self.state.borrow_mut());
                true
            }
            'x' => {
                logic::select_cell(&mut self.state.borrow_mut(), None);
                true
            }
            'R' => self.request_reset(),
            _ => false,
        }
    }

    fn handle_click(&mut self, action_id: u16) -> bool {
        if self.state.borrow().ui.collection_open {
            return match action_id {
                TOGGLE_COLLECTION | CLOSE_COLLECTION => self.close_collection(),
                UPGRADE_ALL_COLORS => self.upgrade_all_colors(),
                _ => false,
            };
        }

        match action_id {
            CLICK_BUTTON => {
                logic::click(&mut self.state.borrow_mut());
                true
            }
            UPGRADE_CLICK => self.upgrade_click(),
            UPGRADE_FOCUSED_CELL => self.upgrade_cursor_cell(),
            UPGRADE_FOCUSED_COLOR => self.upgrade_cursor_color(),
            CLEAR_SELECTION => {
                logic::select_cell(&mut self.state.borrow_mut(), None);
                true
            }
            UPGRADE_ALL_COLORS => self.upgrade_all_colors(),
            TOGGLE_COLLECTION => {
                logic::open_collection(&mut self.state.borrow_mut());
                true
            }
            CLOSE_COLLECTION => self.close_collection(),
            RESET_GAME => self.request_reset(),
            id if (PALETTE_BASE..CELL_BASE).contains(&id) => {
                self.pick_palette((id - PALETTE_BASE) as usize)
            }
            id if id >= CELL_BASE => {
                let index = (id - CELL_BASE) as usize;
                let cell_id = self.state.borrow().grid.get_at(index).map(|c| c.id);
                match cell_id {
                    Some(cell_id) => self.activate_cell(cell_id),
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) -> bool {
        self.state.borrow_mut().move_cursor(dx, dy);
        true
    }

    fn close_collection(&mut self) -> bool {
        logic::close_collection(&mut self.state.borrow_mut());
        true
    }

    fn upgrade_click(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        if !logic::upgrade_click(&mut state) {
            if state.click_level >= MAX_LEVEL {
                at_max_level(&mut state, "Click");
            } else {
                let cost = state.click_upgrade_cost();
                not_enough_gold(&mut state, cost);
            }
        }
        true
    }

    /// Mouse click or Space on a grid cell.
    ///
    /// - Under the click button: same as pressing the button.
    /// - A colored cell while another colored cell is selected: fuse the
    ///   selected cell into this one.
    /// - The selected cell again: deselect it.
    /// - Otherwise select it (empty cells wait for a palette color).
    fn activate_cell(&mut self, id: CellId) -> bool {
        let mut state = self.state.borrow_mut();
        if state.grid.is_under_button(id.x, id.y) {
            logic::click(&mut state);
            return true;
        }
        let Some(cell) = state.cell(&id) else {
            return false;
        };
        let target_colored = cell.is_colored();
        state.ui.cursor = (id.x, id.y);

        let selected = state.ui.selected_cell;
        let source_colored = selected
            .and_then(|s| state.cell(&s))
            .is_some_and(|c| c.is_colored());

        match selected {
            Some(sel) if sel == id => logic::select_cell(&mut state, None),
            Some(sel) if source_colored && target_colored => {
                if !logic::fuse_cells(&mut state, &sel, &id) {
                    state.add_log(&format!("Fusion would pass Lv{}", MAX_LEVEL), false);
                }
            }
            _ => logic::select_cell(&mut state, Some(id)),
        }
        true
    }

    /// Color the selected empty cell, or the cursor cell when nothing is selected.
    fn assign_palette_color(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(color) = state.palette_color() else {
            return false;
        };
        let target = state.ui.selected_cell.unwrap_or_else(|| state.cursor_id());
        let is_empty = state.cell(&target).is_some_and(|c| !c.is_colored());
        if !is_empty {
            state.add_log("Pick an empty cell to color", false);
            return true;
        }
        if logic::assign_hex(&mut state, &target, color) {
            logic::select_cell(&mut state, None);
        } else {
            let cost = state.cell_assign_cost();
            not_enough_gold(&mut state, cost);
        }
        true
    }

    fn cycle_palette(&mut self, step: isize) -> bool {
        let mut state = self.state.borrow_mut();
        let len = state.palette().len() as isize;
        if len == 0 {
            return false;
        }
        let current = (state.ui.palette_index as isize).rem_euclid(len);
        state.ui.palette_index = (current + step).rem_euclid(len) as usize;
        true
    }

    /// Choose a palette color. With an empty cell selected, color it right away.
    fn pick_palette(&mut self, index: usize) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if index >= state.palette().len() {
                return false;
            }
            state.ui.palette_index = index;
            let selected_empty = state
                .ui
                .selected_cell
                .and_then(|s| state.cell(&s))
                .is_some_and(|c| !c.is_colored());
            if !selected_empty {
                return true;
            }
        }
        self.assign_palette_color()
    }

    fn upgrade_cursor_cell(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        let id = state.cursor_id();
        let Some(cost) = state.cell_upgrade_cost(&id) else {
            return false;
        };
        if !logic::upgrade_cell(&mut state, &id) {
            if state.cell(&id).is_some_and(|c| c.level >= MAX_LEVEL) {
                at_max_level(&mut state, "Cell");
            } else {
                not_enough_gold(&mut state, cost);
            }
        }
        true
    }

    fn upgrade_cursor_color(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        let id = state.cursor_id();
        let Some(color) = state.cell(&id).and_then(|c| c.color) else {
            return false;
        };
        if logic::upgrade_color(&mut state, color) {
            let level = state.color_level(color);
            state.add_log(&format!("{} upgraded to Lv{}", color, level), false);
        } else if state.color_level(color) >= MAX_LEVEL {
            at_max_level(&mut state, &color.to_string());
        } else {
            let cost = state.color_upgrade_cost(color);
            not_enough_gold(&mut state, cost);
        }
        true
    }

    fn upgrade_all_colors(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.discovered_colors.is_empty() {
            return false;
        }
        if logic::upgrade_all_colors(&mut state) == 0 {
            let cost = state
                .discovered_colors
                .iter()
                .map(|&c| state.color_upgrade_cost(c))
                .fold(f64::INFINITY, f64::min);
            not_enough_gold(&mut state, cost);
        }
        true
    }

    fn request_reset(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        if self.reset_armed {
            self.reset_armed = false;
            logic::reset_game(&mut state);
        } else {
            self.reset_armed = true;
            state.add_log("Press R again to start over", true);
        }
        true
    }
}

fn at_max_level(state: &mut GameState, what: &str) {
    state.add_log(&format!("{} is at max level (Lv{})", what, MAX_LEVEL), false);
}

fn not_enough_gold(state: &mut GameState, cost: f64) {
    state.add_log(
        &format!("Not enough gold (need {})", format_number(cost.ceil())),
        false,
    );
}
