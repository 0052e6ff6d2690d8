mod clicker;
mod input;
mod logging;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use clicker::GridClicker;
use input::{pixel_x_to_col, pixel_y_to_row, ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

/// Query the terminal container's bounding rect and convert a pointer
/// position to a terminal `(col, row)`.
fn dom_pixel_to_cell(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<(u16, u16)> {
    let window = web_sys::window()?;
    let document = window.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    let col = pixel_x_to_col(mouse_x as f64 - rect.left(), rect.width(), cs.terminal_cols)?;
    let row = pixel_y_to_row(mouse_y as f64 - rect.top(), rect.height(), cs.terminal_rows)?;
    log::debug!("click: pixel=({}, {}) cell=({}, {})", mouse_x, mouse_y, col, row);
    Some((col, row))
}

/// Map a key press to the game's key vocabulary.
fn map_key(code: KeyCode) -> Option<char> {
    match code {
        KeyCode::Char(c) => Some(c),
        KeyCode::Left => Some('h'),
        KeyCode::Right => Some('l'),
        KeyCode::Up => Some('k'),
        KeyCode::Down => Some('j'),
        KeyCode::Enter => Some(' '),
        KeyCode::Esc => Some('x'),
        _ => None,
    }
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init();

    #[cfg(target_arch = "wasm32")]
    let state = clicker::save::load_game();
    #[cfg(not(target_arch = "wasm32"))]
    let state = clicker::state::GameState::new();

    let game = Rc::new(RefCell::new(GridClicker::new(state)));
    #[cfg(target_arch = "wasm32")]
    game.borrow_mut().driver_mut().start();

    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }

            let cs = click_state.borrow();
            if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                return;
            }
            let action = dom_pixel_to_cell(mouse_event.x, mouse_event.y, &cs)
                .and_then(|(col, row)| cs.hit_test(col, row));
            drop(cs);

            if let Some(action) = action {
                game.borrow_mut().handle_input(&InputEvent::Click(action));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let Some(key) = map_key(key_event.code) {
                game.borrow_mut().handle_input(&InputEvent::Key(key));
            }
        }
    });

    terminal.draw_web({
        #[cfg(target_arch = "wasm32")]
        let mut last_save_ms = clicker::driver::now_ms();
        move |f| {
            let area = f.area();
            click_state.borrow_mut().reset(area.width, area.height);

            let mut game = game.borrow_mut();
            #[cfg(target_arch = "wasm32")]
            {
                let now = clicker::driver::now_ms();
                if game.take_dirty() || now - last_save_ms >= clicker::save::AUTOSAVE_INTERVAL_MS {
                    clicker::save::save_game(&game.state.borrow());
                    last_save_ms = now;
                }
            }
            game.render(f, area, &click_state);
        }
    });

    Ok(())
}
