//! Passive income driver.
//!
//! A browser interval fires every [`PASSIVE_INCOME_INTERVAL_MS`]. Each tick
//! measures the real time since the previous one and credits
//! `rate * elapsed_seconds`, so late or skipped timer callbacks still pay
//! out the right amount. Cancelling (or dropping the driver) clears the
//! interval; any callback already queued afterwards credits nothing.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::logic;
use super::state::GameState;
use crate::time::IncomeClock;

pub const PASSIVE_INCOME_INTERVAL_MS: i32 = 100;

/// State shared between the driver handle and the timer callback.
struct Shared {
    state: Rc<RefCell<GameState>>,
    clock: RefCell<IncomeClock>,
    running: Cell<bool>,
}

impl Shared {
    fn tick(&self, now_ms: f64) -> f64 {
        if !self.running.get() {
            return 0.0;
        }
        // The state is busy (an input handler is mid-action). Leave the
        // clock alone so the next tick credits this interval too.
        let Ok(mut state) = self.state.try_borrow_mut() else {
            return 0.0;
        };
        let seconds = self.clock.borrow_mut().update(now_ms);
        logic::accrue(&mut state, seconds)
    }
}

pub struct PassiveIncomeDriver {
    shared: Rc<Shared>,
    #[cfg(target_arch = "wasm32")]
    timer: Option<IntervalTimer>,
}

impl PassiveIncomeDriver {
    pub fn new(state: Rc<RefCell<GameState>>) -> Self {
        Self {
            shared: Rc::new(Shared {
                state,
                clock: RefCell::new(IncomeClock::new()),
                running: Cell::new(false),
            }),
            #[cfg(target_arch = "wasm32")]
            timer: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.get()
    }

    /// Start accruing from `now_ms`. Time before this point earns nothing.
    pub fn start_at(&mut self, now_ms: f64) {
        self.shared.clock.borrow_mut().start(now_ms);
        self.shared.running.set(true);
    }

    /// Credit income for the time elapsed up to `now_ms`. Returns the amount.
    pub fn tick(&self, now_ms: f64) -> f64 {
        self.shared.tick(now_ms)
    }

    /// Stop the driver. No income is credited after this returns.
    pub fn cancel(&mut self) {
        if self.shared.running.replace(false) {
            log::info!("passive income driver stopped");
        }
        #[cfg(target_arch = "wasm32")]
        {
            self.timer = None;
        }
    }

    /// Install the browser interval and start ticking.
    #[cfg(target_arch = "wasm32")]
    pub fn start(&mut self) -> bool {
        self.cancel();
        self.start_at(now_ms());

        let shared = Rc::clone(&self.shared);
        match IntervalTimer::new(PASSIVE_INCOME_INTERVAL_MS, move || {
            shared.tick(now_ms());
        }) {
            Some(timer) => {
                self.timer = Some(timer);
                log::info!(
                    "passive income driver started ({}ms interval)",
                    PASSIVE_INCOME_INTERVAL_MS
                );
                true
            }
            None => {
                self.shared.running.set(false);
                log::warn!("could not install passive income interval");
                false
            }
        }
    }
}

impl Drop for PassiveIncomeDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Milliseconds from `performance.now()`, falling back to `Date.now()`.
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// A `setInterval` registration. Dropping it clears the interval and frees
/// the callback.
#[cfg(target_arch = "wasm32")]
struct IntervalTimer {
    id: i32,
    _callback: wasm_bindgen::closure::Closure<dyn FnMut()>,
}

#[cfg(target_arch = "wasm32")]
impl IntervalTimer {
    fn new(interval_ms: i32, f: impl FnMut() + 'static) -> Option<Self> {
        use wasm_bindgen::closure::Closure;
        use wasm_bindgen::JsCast;

        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let id = web_sys::window()?
            .set_interval_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                interval_ms,
            )
            .ok()?;
        Some(Self {
            id,
            _callback: callback,
        })
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for IntervalTimer {
    fn drop(&mut self) {
        if let Some(window) = web_sys::window() {
            window.clear_interval_with_handle(self.id);
        }
    }
}
