//! A running match: the state machine plus the aim gesture, AI pacing timers
//! and the per-frame event outbox. Hosts drive it with pointer calls and one
//! `frame(dt)` per display frame.

use glam::Vec2;

use crate::api::config::CarromConfig;
use crate::api::game::{AimState, GameState};
use crate::api::types::{GameEvent, GameMode, GamePhase, Player};
use crate::core::physics::shot_vector;
use crate::core::timer::Timers;
use crate::input::queue::{custom, InputEvent};
use crate::systems::ai::ShotPlanner;
use crate::systems::turn::{Table, TurnInput};

/// Deferred AI steps, run off the frame clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PacingAction {
    /// Plan the shot and slide the striker into place.
    Plan,
    /// Fire the planned shot.
    Shoot { velocity: Vec2, power: f32 },
}

pub struct Match {
    config: CarromConfig,
    table: Table,
    planner: ShotPlanner,
    state: GameState,
    aim: Option<AimState>,
    timers: Timers<PacingAction>,
    events: Vec<GameEvent>,
}

impl Match {
    pub fn new(config: CarromConfig, mode: GameMode) -> Self {
        let table = Table::new(&config);
        let planner = ShotPlanner::new(config.ai.clone(), table.board().clone());
        let state = GameState::new(mode, table.board());
        log::info!("Carrom match created ({:?})", mode);
        Self {
            config,
            table,
            planner,
            state,
            aim: None,
            timers: Timers::new(),
            events: Vec::with_capacity(16),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn aim(&self) -> Option<&AimState> {
        self.aim.as_ref()
    }

    pub fn config(&self) -> &CarromConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Events raised since the last drain.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pending pacing timers (AI think/shoot).
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    // -- Frame ------------------------------------------------------------

    /// Advance pacing timers by `dt` seconds, then run one physics tick if
    /// discs are in motion.
    pub fn frame(&mut self, dt: f32) {
        for action in self.timers.advance(dt) {
            self.run_pacing(action);
        }
        if self.state.phase == GamePhase::Moving {
            self.apply(TurnInput::Tick);
        }
    }

    fn run_pacing(&mut self, action: PacingAction) {
        match action {
            PacingAction::Plan => {
                if self.state.phase != GamePhase::AiThinking {
                    return;
                }
                let player = self.state.current_player;
                let shot = self.planner.plan(
                    &self.state.striker,
                    &self.state.coins,
                    self.table.board().pockets(),
                    self.state.color_of(player),
                    player,
                );
                self.apply(TurnInput::AiPlace { x: shot.striker_x });
                let velocity = shot.velocity(self.state.striker.pos);
                self.timers.schedule(
                    PacingAction::Shoot {
                        velocity,
                        power: shot.power,
                    },
                    self.config.ai.shoot_delay,
                );
            }
            PacingAction::Shoot { velocity, power } => {
                self.apply(TurnInput::AiShoot { velocity, power });
            }
        }
    }

    /// Feed one input through the state machine, collect its events and
    /// arm the AI when its turn begins.
    fn apply(&mut self, input: TurnInput) {
        let before = self.state.phase;
        let state = std::mem::take(&mut self.state);
        let transition = self.table.advance(state, input);
        self.state = transition.state;
        self.events.extend(transition.events);

        if self.state.phase == GamePhase::AiThinking && before != GamePhase::AiThinking {
            self.timers.schedule(PacingAction::Plan, self.config.ai.think_delay);
        }
    }

    // -- Gestures ---------------------------------------------------------

    /// Press: near the striker starts aiming, elsewhere repositions it.
    pub fn pointer_down(&mut self, pos: Vec2) {
        if !self.state.is_human_turn() || self.state.phase != GamePhase::Placing {
            return;
        }
        if pos.distance(self.state.striker.pos) < self.config.engage_radius {
            self.begin_aim(pos);
        } else {
            self.move_striker(pos.x);
        }
    }

    pub fn pointer_move(&mut self, pos: Vec2) {
        match self.state.phase {
            GamePhase::Aiming => self.update_aim(pos),
            GamePhase::Placing => self.move_striker(pos.x),
            _ => {}
        }
    }

    pub fn pointer_up(&mut self, pos: Vec2) {
        if self.state.phase == GamePhase::Aiming {
            self.update_aim(pos);
            self.release();
        }
    }

    pub fn move_striker(&mut self, x: f32) {
        self.apply(TurnInput::PlaceStriker { x });
    }

    pub fn begin_aim(&mut self, pos: Vec2) {
        self.apply(TurnInput::BeginAim);
        if self.state.phase == GamePhase::Aiming {
            self.aim = Some(AimState::begin(self.state.striker.pos, pos, &self.config.physics));
        }
    }

    pub fn update_aim(&mut self, pos: Vec2) {
        if self.state.phase != GamePhase::Aiming {
            return;
        }
        if let Some(aim) = self.aim.as_mut() {
            aim.update(pos, &self.config.physics);
        }
    }

    /// Fire the current aim. Too weak a pull cancels back to placing.
    pub fn release(&mut self) {
        let Some(aim) = self.aim.take() else {
            self.apply(TurnInput::CancelAim);
            return;
        };
        let shot = shot_vector(aim.start, aim.end, &self.config.physics);
        self.apply(TurnInput::Release { shot });
        if self.state.phase == GamePhase::Moving {
            log::debug!(
                "Player {} shoots: power {:.1}",
                self.state.current_player.number(),
                shot.power
            );
        }
    }

    // -- Match control ----------------------------------------------------

    /// Start over, optionally switching mode. Pending AI actions are dropped.
    pub fn reset(&mut self, mode: Option<GameMode>) {
        self.timers.cancel_all();
        self.aim = None;
        self.events.clear();
        let mode = mode.unwrap_or(self.state.mode);
        self.apply(TurnInput::Reset { mode });
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.reset(Some(mode));
    }

    pub fn winner(&self) -> Option<Player> {
        self.state.winner
    }

    /// Route one queued host event.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown { x, y } => self.pointer_down(Vec2::new(x, y)),
            InputEvent::PointerMove { x, y } => self.pointer_move(Vec2::new(x, y)),
            InputEvent::PointerUp { x, y } => self.pointer_up(Vec2::new(x, y)),
            InputEvent::Custom { kind: custom::RESET, a, .. } => {
                self.reset((a >= 0.0).then(|| GameMode::from_code(a)));
            }
            InputEvent::Custom { kind: custom::SET_MODE, a, .. } => {
                self.set_mode(GameMode::from_code(a));
            }
            InputEvent::Custom { kind, .. } => {
                log::warn!("Unknown custom event kind {}", kind);
            }
        }
    }
}
