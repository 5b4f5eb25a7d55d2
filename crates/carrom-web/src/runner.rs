use carrom_engine::bridge::protocol::ProtocolLayout;
use carrom_engine::{
    CarromConfig, GameEvent, GameMode, InputEvent, InputQueue, Match, SnapshotBuffer,
};

/// Longest frame delta fed to the pacing timers. A backgrounded tab can
/// report seconds between frames.
const MAX_FRAME_DT: f32 = 0.25;

/// Wires a match to the host loop.
///
/// The exported `#[wasm_bindgen]` functions keep one runner in a
/// `thread_local!` because wasm-bindgen cannot export the match directly.
pub struct GameRunner {
    game: Match,
    input: InputQueue,
    snapshot: SnapshotBuffer,
    /// Events raised during the last tick, kept for the JSON accessor.
    last_events: Vec<GameEvent>,
}

impl GameRunner {
    pub fn new(config: CarromConfig, mode: GameMode) -> Self {
        let mut runner = Self {
            game: Match::new(config, mode),
            input: InputQueue::new(),
            snapshot: SnapshotBuffer::new(ProtocolLayout::default()),
            last_events: Vec::new(),
        };
        runner.write_snapshot();
        runner
    }

    /// Parse an optional JSON config. Bad JSON falls back to defaults.
    pub fn from_json(config_json: Option<&str>, mode: GameMode) -> Self {
        let config = match config_json {
            Some(json) => CarromConfig::from_json(json).unwrap_or_else(|e| {
                log::warn!("Invalid carrom config ({}), using defaults", e);
                CarromConfig::default()
            }),
            None => CarromConfig::default(),
        };
        Self::new(config, mode)
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: apply queued input, advance the match, refresh the
    /// snapshot the host reads.
    pub fn tick(&mut self, dt: f32) {
        for event in self.input.drain() {
            self.game.handle_input(event);
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            self.game.config().fixed_dt
        };
        self.game.frame(dt);

        self.last_events = self.game.drain_events();
        self.write_snapshot();
    }

    fn write_snapshot(&mut self) {
        let max_power = self.game.config().physics.max_power;
        self.snapshot
            .write(self.game.state(), self.game.aim(), &self.last_events, max_power);
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    // ---- Accessors for the host ----

    pub fn snapshot_ptr(&self) -> *const f32 {
        self.snapshot.as_ptr()
    }

    pub fn snapshot_len(&self) -> u32 {
        self.snapshot.len() as u32
    }

    pub fn layout(&self) -> &ProtocolLayout {
        self.snapshot.layout()
    }

    pub fn state_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self.game.state())
    }

    pub fn events_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.last_events)
    }

    pub fn message(&self) -> &str {
        &self.game.state().message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carrom_engine::bridge::protocol::*;
    use carrom_engine::input::queue::custom;
    use carrom_engine::GamePhase;

    #[test]
    fn snapshot_ready_before_first_tick() {
        let runner = GameRunner::new(CarromConfig::default(), GameMode::VsAi);
        assert_eq!(runner.snapshot.header(HEADER_DISC_COUNT), 20.0);
        assert_eq!(runner.snapshot_len() as usize, ProtocolLayout::default().buffer_total_floats);
    }

    #[test]
    fn queued_input_applies_on_tick() {
        let mut runner = GameRunner::new(CarromConfig::default(), GameMode::TwoPlayer);
        runner.push_input(InputEvent::PointerDown { x: 160.0, y: 262.0 });
        runner.push_input(InputEvent::PointerUp { x: 160.0, y: 320.0 });
        assert_eq!(runner.game().state().phase, GamePhase::Placing);

        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().state().phase, GamePhase::Moving);
        assert_eq!(runner.snapshot.header(HEADER_PHASE), GamePhase::Moving.wire_code());
        assert!(runner.snapshot.header(HEADER_EVENT_COUNT) >= 1.0);
        assert!(runner.events_json().unwrap().contains("strike"));
    }

    #[test]
    fn bad_config_falls_back_to_defaults() {
        let runner = GameRunner::from_json(Some("{ not json"), GameMode::VsAi);
        assert_eq!(runner.game().config(), &CarromConfig::default());
    }

    #[test]
    fn reset_event_and_state_json() {
        let json = r#"{ "engage_radius": 30.0 }"#;
        let mut runner = GameRunner::from_json(Some(json), GameMode::VsAi);
        assert_eq!(runner.game().config().engage_radius, 30.0);
        runner.push_input(InputEvent::Custom { kind: custom::SET_MODE, a: 1.0, b: 0.0, c: 0.0 });
        runner.tick(0.016);
        let json = runner.state_json().unwrap();
        assert!(json.contains("\"mode\":\"two-player\""));
        assert_eq!(runner.message(), "Player 1: Position striker and shoot!");
    }
}
