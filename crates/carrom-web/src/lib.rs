//! Browser bindings for the carrom engine.
//!
//! The host calls `game_init` once, then `game_tick(dt)` every animation
//! frame, and reads the snapshot buffer at `get_snapshot_ptr()` (layout in
//! `carrom_engine::bridge::protocol`). Pointer coordinates are board units.

pub mod runner;

pub use runner::GameRunner;

use std::cell::RefCell;

use carrom_engine::input::queue::custom;
use carrom_engine::{GameMode, InputEvent};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNER: RefCell<Option<GameRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. Calls made before `game_init` are
/// logged and ignored.
fn with_runner<R: Default>(f: impl FnOnce(&mut GameRunner) -> R) -> R {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => f(runner),
        None => {
            log::warn!("Carrom not initialized. Call game_init() first.");
            R::default()
        }
    })
}

/// Create (or recreate) the match. `config_json` may override any tuning
/// value; `two_player` selects the mode.
#[wasm_bindgen]
pub fn game_init(config_json: Option<String>, two_player: bool) {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::debug_1(&"carrom: logger already installed".into());
    }

    let mode = if two_player { GameMode::TwoPlayer } else { GameMode::VsAi };
    let runner = GameRunner::from_json(config_json.as_deref(), mode);
    RUNNER.with(|cell| {
        *cell.borrow_mut() = Some(runner);
    });
    log::info!("carrom: initialized ({:?})", mode);
}

#[wasm_bindgen]
pub fn game_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

#[wasm_bindgen]
pub fn game_pointer_down(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_up(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn game_pointer_move(x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { x, y }));
}

/// Restart. Pass `-1` to keep the current mode, `0` for vs-AI, `1` for two-player.
#[wasm_bindgen]
pub fn game_reset(mode: f32) {
    let event = InputEvent::Custom {
        kind: custom::RESET,
        a: mode,
        b: 0.0,
        c: 0.0,
    };
    with_runner(|r| r.push_input(event));
}

#[wasm_bindgen]
pub fn game_set_mode(two_player: bool) {
    let a = if two_player { 1.0 } else { 0.0 };
    with_runner(|r| r.push_input(InputEvent::Custom { kind: custom::SET_MODE, a, b: 0.0, c: 0.0 }));
}

#[wasm_bindgen]
pub fn game_custom_event(kind: u32, a: f32, b: f32, c: f32) {
    with_runner(|r| r.push_input(InputEvent::Custom { kind, a, b, c }));
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_snapshot_ptr() -> *const f32 {
    RUNNER.with(|cell| {
        cell.borrow()
            .as_ref()
            .map_or(std::ptr::null(), |r| r.snapshot_ptr())
    })
}

#[wasm_bindgen]
pub fn get_snapshot_len() -> u32 {
    with_runner(|r| r.snapshot_len())
}

#[wasm_bindgen]
pub fn get_max_discs() -> u32 {
    with_runner(|r| r.layout().max_discs as u32)
}

#[wasm_bindgen]
pub fn get_max_events() -> u32 {
    with_runner(|r| r.layout().max_events as u32)
}

#[wasm_bindgen]
pub fn get_status_message() -> String {
    with_runner(|r| r.message().to_string())
}

/// Full match state as JSON, for debugging and UI panels.
#[wasm_bindgen]
pub fn get_state_json() -> Result<String, JsValue> {
    with_runner(|r| Some(r.state_json()))
        .unwrap_or_else(|| Ok("null".to_string()))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Events from the last tick as JSON.
#[wasm_bindgen]
pub fn get_events_json() -> Result<String, JsValue> {
    with_runner(|r| Some(r.events_json()))
        .unwrap_or_else(|| Ok("[]".to_string()))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
