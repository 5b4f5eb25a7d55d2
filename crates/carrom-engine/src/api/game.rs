use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::config::PhysicsConfig;
use crate::api::types::{CoinColor, DiscId, DiscKind, GameMode, GamePhase, Player};
use crate::core::board::{Board, STRIKER_ID, STRIKER_RADIUS};
use crate::core::disc::Disc;
use crate::core::physics::shot_vector;

/// The authoritative match snapshot. Everything the renderer shows and
/// everything the rules read lives here; the aim drag does not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Queen and regular coins, in stable id order.
    pub coins: Vec<Disc>,
    pub striker: Disc,
    pub current_player: Player,
    /// Indexed by `Player::index()`. Never negative.
    pub scores: [u32; 2],
    /// Unset until the first regular coin is pocketed, then fixed.
    pub colors: [Option<CoinColor>; 2],
    pub mode: GameMode,
    pub phase: GamePhase,
    pub winner: Option<Player>,
    pub message: String,
    pub queen_covered: bool,
    pub pending_queen_cover: Option<Player>,
    /// Coins each player owes back to the board after a striker foul.
    pub due: [u32; 2],
    pub last_pocketed_by: Option<Player>,
    /// Coins captured since the current shot was released, in capture order.
    #[serde(default)]
    pub shot_pocketed: Vec<DiscId>,
}

impl GameState {
    /// A fresh match: opening layout, player one to place.
    pub fn new(mode: GameMode, board: &Board) -> Self {
        Self {
            coins: board.initial_coins(),
            striker: board.striker_for(Player::One),
            current_player: Player::One,
            scores: [0, 0],
            colors: [None, None],
            mode,
            phase: GamePhase::Placing,
            winner: None,
            message: opening_message(mode).to_string(),
            queen_covered: false,
            pending_queen_cover: None,
            due: [0, 0],
            last_pocketed_by: None,
            shot_pocketed: Vec::new(),
        }
    }

    pub fn score(&self, player: Player) -> u32 {
        self.scores[player.index()]
    }

    pub fn color_of(&self, player: Player) -> Option<CoinColor> {
        self.colors[player.index()]
    }

    pub fn due_of(&self, player: Player) -> u32 {
        self.due[player.index()]
    }

    pub fn coin(&self, id: DiscId) -> Option<&Disc> {
        self.coins.iter().find(|c| c.id == id)
    }

    pub fn coin_mut(&mut self, id: DiscId) -> Option<&mut Disc> {
        self.coins.iter_mut().find(|c| c.id == id)
    }

    pub fn queen(&self) -> Option<&Disc> {
        self.coins.iter().find(|c| c.kind == DiscKind::Queen)
    }

    /// Coins of `color` still on the board.
    pub fn count_on_board(&self, color: CoinColor) -> usize {
        self.coins
            .iter()
            .filter(|c| c.is_active() && c.kind == DiscKind::Coin(color))
            .count()
    }

    /// Every disc including the striker.
    pub fn discs(&self) -> impl Iterator<Item = &Disc> {
        self.coins.iter().chain(std::iter::once(&self.striker))
    }

    /// Whether a person (not the AI) is the acting player.
    pub fn is_human_turn(&self) -> bool {
        self.mode == GameMode::TwoPlayer || self.current_player == Player::One
    }
}

/// An empty board. Only used as a placeholder while a state is moved
/// through a transition.
impl Default for GameState {
    fn default() -> Self {
        Self {
            coins: Vec::new(),
            striker: Disc::new(STRIKER_ID, DiscKind::Striker, Vec2::ZERO, STRIKER_RADIUS),
            current_player: Player::One,
            scores: [0, 0],
            colors: [None, None],
            mode: GameMode::default(),
            phase: GamePhase::Placing,
            winner: None,
            message: String::new(),
            queen_covered: false,
            pending_queen_cover: None,
            due: [0, 0],
            last_pocketed_by: None,
            shot_pocketed: Vec::new(),
        }
    }
}

pub fn opening_message(mode: GameMode) -> &'static str {
    match mode {
        GameMode::VsAi => "Your turn! Position striker and shoot!",
        GameMode::TwoPlayer => "Player 1: Position striker and shoot!",
    }
}

/// Live pull-back gesture. Exists only while aiming.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimState {
    /// Striker position when the drag began.
    pub start: Vec2,
    /// Current pointer position.
    pub end: Vec2,
    pub power: f32,
    /// Direction of travel in radians.
    pub angle: f32,
}

impl AimState {
    pub fn begin(striker_pos: Vec2, pointer: Vec2, config: &PhysicsConfig) -> Self {
        let mut aim = Self {
            start: striker_pos,
            end: pointer,
            power: 0.0,
            angle: 0.0,
        };
        aim.update(pointer, config);
        aim
    }

    /// Recompute power and angle from the pointer's pull-back.
    pub fn update(&mut self, pointer: Vec2, config: &PhysicsConfig) {
        self.end = pointer;
        let shot = shot_vector(self.start, self.end, config);
        self.power = shot.power;
        if shot.power > 0.0 {
            self.angle = shot.velocity.y.atan2(shot.velocity.x);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_matches_layout() {
        let board = Board::new();
        let state = GameState::new(GameMode::VsAi, &board);
        assert_eq!(state.coins, board.initial_coins());
        assert_eq!(state.phase, GamePhase::Placing);
        assert_eq!(state.current_player, Player::One);
        assert_eq!(state.count_on_board(CoinColor::White), 9);
        assert!(state.queen().is_some());
        assert_eq!(state.discs().count(), 20);
    }

    #[test]
    fn human_turn_depends_on_mode() {
        let board = Board::new();
        let mut state = GameState::new(GameMode::VsAi, &board);
        state.current_player = Player::Two;
        assert!(!state.is_human_turn());
        state.mode = GameMode::TwoPlayer;
        assert!(state.is_human_turn());
    }

    #[test]
    fn state_round_trips_through_json() {
        let state = GameState::new(GameMode::TwoPlayer, &Board::new());
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"mode\":\"two-player\""));
        let back: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn aim_tracks_pull_back() {
        let config = PhysicsConfig::default();
        let mut aim = AimState::begin(Vec2::new(160.0, 260.0), Vec2::new(160.0, 260.0), &config);
        assert_eq!(aim.power, 0.0);
        aim.update(Vec2::new(160.0, 300.0), &config);
        assert_eq!(aim.power, 8.0);
        // Pulled down, so the shot travels up (negative y)
        assert!((aim.angle + std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }
}
