//! The match state machine as a pure transition: `(GameState, TurnInput)`
//! in, `Transition` out. Inputs that do not apply to the current phase (or
//! to whoever is acting) leave the state untouched.

use glam::Vec2;

use crate::api::config::CarromConfig;
use crate::api::game::GameState;
use crate::api::types::{DiscKind, GameEvent, GameMode, GamePhase};
use crate::core::board::Board;
use crate::core::physics::{PhysicsWorld, Shot};
use crate::core::rng::Rng;
use crate::systems::rules::Referee;

/// Everything that can move a match forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnInput {
    /// One physics tick while discs are in motion.
    Tick,
    /// Slide the striker along the current baseline (clamped).
    PlaceStriker { x: f32 },
    BeginAim,
    CancelAim,
    /// Release a human pull-back.
    Release { shot: Shot },
    /// The AI slides its striker into position.
    AiPlace { x: f32 },
    /// The AI fires.
    AiShoot { velocity: Vec2, power: f32 },
    Reset { mode: GameMode },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GameState,
    pub events: Vec<GameEvent>,
}

impl Transition {
    fn unchanged(state: GameState) -> Self {
        Self {
            state,
            events: Vec::new(),
        }
    }
}

/// Owns the collaborators a transition needs: board, physics and referee.
#[derive(Debug, Clone)]
pub struct Table {
    board: Board,
    physics: PhysicsWorld,
    referee: Referee,
}

impl Table {
    pub fn new(config: &CarromConfig) -> Self {
        let board = Board::new();
        // Referee jitter gets its own stream so AI planning does not shift it
        let rng = Rng::new(config.ai.seed.rotate_left(17) ^ 0x9e37_79b9);
        Self {
            physics: PhysicsWorld::new(config.physics.clone(), &board),
            referee: Referee::new(config.rules.clone(), board.clone(), rng),
            board,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn advance(&mut self, state: GameState, input: TurnInput) -> Transition {
        match input {
            TurnInput::Tick => self.tick(state),
            TurnInput::PlaceStriker { x } => {
                if state.phase != GamePhase::Placing || !state.is_human_turn() {
                    return Transition::unchanged(state);
                }
                self.place(state, x)
            }
            TurnInput::BeginAim => {
                if state.phase != GamePhase::Placing || !state.is_human_turn() {
                    return Transition::unchanged(state);
                }
                let mut state = state;
                state.phase = GamePhase::Aiming;
                Transition::unchanged(state)
            }
            TurnInput::CancelAim => {
                if state.phase != GamePhase::Aiming {
                    return Transition::unchanged(state);
                }
                let mut state = state;
                state.phase = GamePhase::Placing;
                Transition::unchanged(state)
            }
            TurnInput::Release { shot } => self.release(state, shot),
            TurnInput::AiPlace { x } => {
                if state.phase != GamePhase::AiThinking {
                    return Transition::unchanged(state);
                }
                self.place(state, x)
            }
            TurnInput::AiShoot { velocity, power } => {
                if state.phase != GamePhase::AiThinking {
                    return Transition::unchanged(state);
                }
                let mut state = state;
                state.striker.vel = velocity;
                state.shot_pocketed.clear();
                state.phase = GamePhase::Moving;
                state.message = "AI shoots!".to_string();
                log::debug!("AI shot: power {:.1}", power);
                let max = self.physics.config().max_power;
                Transition {
                    state,
                    events: vec![GameEvent::Strike { power: (power / max).min(1.0) }],
                }
            }
            TurnInput::Reset { mode } => {
                log::info!("New match ({:?})", mode);
                Transition::unchanged(GameState::new(mode, &self.board))
            }
        }
    }

    fn place(&self, mut state: GameState, x: f32) -> Transition {
        let bounds = self.board.striker_bounds(state.current_player);
        state.striker.pos = Vec2::new(bounds.clamp_x(x), bounds.y);
        Transition::unchanged(state)
    }

    fn release(&self, mut state: GameState, shot: Shot) -> Transition {
        if state.phase != GamePhase::Aiming {
            return Transition::unchanged(state);
        }
        let cfg = self.physics.config();
        if shot.power < cfg.min_release_power {
            state.phase = GamePhase::Placing;
            return Transition::unchanged(state);
        }
        state.striker.vel = shot.velocity;
        state.shot_pocketed.clear();
        state.phase = GamePhase::Moving;
        state.message = "Shooting...".to_string();
        Transition {
            state,
            events: vec![GameEvent::Strike { power: (shot.power / cfg.max_power).min(1.0) }],
        }
    }

    /// One physics step; resolves the turn once everything is at rest.
    fn tick(&mut self, mut state: GameState) -> Transition {
        if state.phase != GamePhase::Moving {
            return Transition::unchanged(state);
        }
        let mut events = Vec::new();

        let report = self
            .physics
            .step(&mut state.coins, &mut state.striker, self.board.pockets());

        let max = self.physics.config().max_power;
        for closing in report.collisions {
            events.push(GameEvent::Collision {
                intensity: (closing / max).min(1.0),
            });
        }
        for id in report.captured {
            if id == state.striker.id {
                log::debug!("Striker pocketed");
                continue;
            }
            if let Some(kind) = state.coin(id).map(|c| c.kind) {
                log::debug!("Pocketed {:?} ({:?})", id, kind);
                events.push(if kind == DiscKind::Queen {
                    GameEvent::QueenPocket
                } else {
                    GameEvent::Pocket
                });
                state.shot_pocketed.push(id);
            }
        }

        if self.physics.is_moving(state.discs()) {
            return Transition { state, events };
        }

        let (state, resolved, _) = self.referee.resolve_turn(state);
        events.extend(resolved);
        Transition { state, events }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::game::opening_message;
    use crate::api::types::{DiscId, Player};
    use crate::core::board::{CENTER, STRIKER_ID};
    use crate::core::disc::Disc;

    fn table() -> Table {
        Table::new(&CarromConfig::default())
    }

    fn placing(mode: GameMode) -> GameState {
        GameState::new(mode, &Board::new())
    }

    fn run_until_rest(table: &mut Table, mut state: GameState) -> (GameState, Vec<GameEvent>) {
        let mut events = Vec::new();
        for _ in 0..5000 {
            if state.phase != GamePhase::Moving {
                return (state, events);
            }
            let t = table.advance(state, TurnInput::Tick);
            state = t.state;
            events.extend(t.events);
        }
        panic!("shot never settled");
    }

    #[test]
    fn placement_is_clamped_to_baseline() {
        let mut t = table();
        let state = t
            .advance(placing(GameMode::TwoPlayer), TurnInput::PlaceStriker { x: 5.0 })
            .state;
        assert_eq!(state.striker.pos, glam::Vec2::new(80.0, 260.0));
        let state = t.advance(state, TurnInput::PlaceStriker { x: 500.0 }).state;
        assert_eq!(state.striker.pos.x, 240.0);
    }

    #[test]
    fn inputs_outside_their_phase_are_ignored() {
        let mut t = table();
        let start = placing(GameMode::TwoPlayer);
        let shot = Shot { velocity: glam::Vec2::new(0.0, -10.0), power: 10.0 };
        assert_eq!(t.advance(start.clone(), TurnInput::Release { shot }).state, start);
        assert_eq!(t.advance(start.clone(), TurnInput::CancelAim).state, start);
        assert_eq!(t.advance(start.clone(), TurnInput::Tick).state, start);
        let shoot = TurnInput::AiShoot {
            velocity: glam::Vec2::ONE,
            power: 5.0,
        };
        assert_eq!(t.advance(start.clone(), shoot).state, start);
    }

    #[test]
    fn ai_turn_ignores_human_gestures() {
        let mut t = table();
        let mut state = placing(GameMode::VsAi);
        state.current_player = Player::Two;
        state.phase = GamePhase::AiThinking;
        let before = state.clone();
        assert_eq!(t.advance(state.clone(), TurnInput::BeginAim).state, before);
        assert_eq!(t.advance(state, TurnInput::PlaceStriker { x: 100.0 }).state, before);
    }

    #[test]
    fn weak_release_cancels_without_foul() {
        let mut t = table();
        let state = t.advance(placing(GameMode::TwoPlayer), TurnInput::BeginAim).state;
        assert_eq!(state.phase, GamePhase::Aiming);
        let weak = Shot { velocity: glam::Vec2::new(0.0, -0.5), power: 0.5 };
        let next = t.advance(state, TurnInput::Release { shot: weak });
        assert_eq!(next.state.phase, GamePhase::Placing);
        assert_eq!(next.state.current_player, Player::One);
        assert!(next.events.is_empty());
    }

    #[test]
    fn missed_shot_passes_turn() {
        let mut t = table();
        let mut state = t
            .advance(placing(GameMode::TwoPlayer), TurnInput::PlaceStriker { x: 80.0 })
            .state;
        state = t.advance(state, TurnInput::BeginAim).state;
        // Straight sideways along the baseline, far from every coin
        let shot = Shot { velocity: glam::Vec2::new(6.0, 0.0), power: 6.0 };
        let released = t.advance(state, TurnInput::Release { shot });
        assert_eq!(released.state.phase, GamePhase::Moving);
        assert!(matches!(released.events[0], GameEvent::Strike { .. }));

        let (state, events) = run_until_rest(&mut t, released.state);
        assert_eq!(state.current_player, Player::Two);
        assert_eq!(state.phase, GamePhase::Placing);
        assert_eq!(state.striker.pos, glam::Vec2::new(160.0, 60.0));
        assert!(events.contains(&GameEvent::TurnChange));
        assert_eq!(state.coins, Board::new().initial_coins());
    }

    #[test]
    fn pocketing_striker_is_a_foul() {
        let mut t = table();
        let mut state = placing(GameMode::TwoPlayer);
        state.scores = [1, 0];
        state.phase = GamePhase::Moving;
        let corner = glam::Vec2::new(45.0, 275.0);
        state.striker = Disc::new(STRIKER_ID, DiscKind::Striker, corner, 14.0);
        state.striker.vel = glam::Vec2::new(-4.0, 4.0);

        let (state, events) = run_until_rest(&mut t, state);
        assert_eq!(state.score(Player::One), 0);
        assert_eq!(state.due_of(Player::One), 1);
        assert_eq!(state.current_player, Player::Two);
        assert!(events.contains(&GameEvent::Foul));
        assert!(!state.striker.pocketed);
    }

    #[test]
    fn queen_alone_goes_back_to_center() {
        let mut t = table();
        let mut state = placing(GameMode::TwoPlayer);
        state.phase = GamePhase::Moving;
        if let Some(q) = state.coin_mut(DiscId(1)) {
            q.pos = glam::Vec2::new(40.0, 40.0);
            q.vel = glam::Vec2::new(-5.0, -5.0);
        }
        let (state, events) = run_until_rest(&mut t, state);
        assert!(events.contains(&GameEvent::QueenPocket));
        let queen = state.queen().unwrap();
        assert!(!queen.pocketed);
        assert_eq!(queen.pos, CENTER);
        assert_eq!(state.current_player, Player::Two);
        assert!(state.shot_pocketed.is_empty());
    }

    #[test]
    fn ai_shoot_starts_motion() {
        let mut t = table();
        let mut state = placing(GameMode::VsAi);
        state.current_player = Player::Two;
        state.phase = GamePhase::AiThinking;
        let placed = t.advance(state, TurnInput::AiPlace { x: 120.0 }).state;
        assert_eq!(placed.striker.pos.x, 120.0);
        let shoot = TurnInput::AiShoot {
            velocity: glam::Vec2::new(0.0, 8.0),
            power: 8.0,
        };
        let fired = t.advance(placed, shoot);
        assert_eq!(fired.state.phase, GamePhase::Moving);
        assert_eq!(fired.state.message, "AI shoots!");
        assert_eq!(fired.state.striker.vel, glam::Vec2::new(0.0, 8.0));
    }

    #[test]
    fn reset_restores_opening() {
        let mut t = table();
        let mut state = placing(GameMode::VsAi);
        state.scores = [4, 2];
        state.phase = GamePhase::Ended;
        let fresh = t.advance(state, TurnInput::Reset { mode: GameMode::TwoPlayer }).state;
        assert_eq!(fresh, GameState::new(GameMode::TwoPlayer, &Board::new()));
        assert_eq!(fresh.message, opening_message(GameMode::TwoPlayer));
    }
}
