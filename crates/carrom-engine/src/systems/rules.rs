//! Turn resolution: scoring, fouls, queen cover, due-coin returns, win check.
//!
//! Runs once per shot, after every disc has come to rest.

use std::f32::consts::TAU;

use glam::Vec2;

use crate::api::config::RuleConfig;
use crate::api::game::GameState;
use crate::api::types::{CoinColor, DiscId, DiscKind, GameEvent, GameMode, GamePhase, Player};
use crate::core::board::{Board, CENTER, COIN_RADIUS};
use crate::core::rng::Rng;

// Spiral search for a free spot when returning a coin
const RETURN_RINGS: u32 = 6;
const RETURN_SLOTS: u32 = 12;

/// What a resolved turn did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnSummary {
    pub valid_pockets: u32,
    pub queen_pocketed: bool,
    pub queen_covered: bool,
    pub queen_returned: bool,
    pub striker_foul: bool,
    pub opponent_foul: bool,
    pub coins_returned: u32,
    pub next_player: Option<Player>,
    pub winner: Option<Player>,
}

impl TurnSummary {
    pub fn is_foul(&self) -> bool {
        self.striker_foul || self.opponent_foul
    }
}

/// Applies the carrom rules to a settled board.
#[derive(Debug, Clone)]
pub struct Referee {
    rules: RuleConfig,
    board: Board,
    rng: Rng,
}

impl Referee {
    pub fn new(rules: RuleConfig, board: Board, rng: Rng) -> Self {
        Self { rules, board, rng }
    }

    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    /// Resolve the shot that just finished. Consumes `state.shot_pocketed`,
    /// resets the striker for whoever plays next and picks the next phase.
    pub fn resolve_turn(
        &mut self,
        mut state: GameState,
    ) -> (GameState, Vec<GameEvent>, TurnSummary) {
        let actor = state.current_player;
        let opponent = actor.opponent();
        let mut summary = TurnSummary::default();
        let mut events = Vec::new();

        let pocketed: Vec<(DiscId, DiscKind)> = state
            .shot_pocketed
            .iter()
            .filter_map(|id| state.coin(*id).map(|c| (c.id, c.kind)))
            .collect();
        summary.striker_foul = state.striker.pocketed;

        // First regular coin of the match decides colors
        if state.color_of(actor).is_none() {
            if let Some(color) = pocketed.iter().find_map(|(_, kind)| kind.color()) {
                state.colors[actor.index()] = Some(color);
                state.colors[opponent.index()] = Some(color.complement());
                log::info!("Player {} plays {:?}", actor.number(), color);
            }
        }
        let own = state.color_of(actor);

        for (_, kind) in &pocketed {
            match kind {
                DiscKind::Queen => {
                    summary.queen_pocketed = true;
                    if !state.queen_covered {
                        state.pending_queen_cover = Some(actor);
                    }
                }
                DiscKind::Coin(color) if Some(*color) == own => {
                    state.scores[actor.index()] += self.rules.coin_value;
                    summary.valid_pockets += 1;
                }
                DiscKind::Coin(_) => {
                    state.scores[opponent.index()] += self.rules.coin_value;
                    summary.opponent_foul = true;
                }
                DiscKind::Striker => {}
            }
        }

        if state.pending_queen_cover == Some(actor) {
            let nothing_left = own.is_some_and(|color| state.count_on_board(color) == 0);
            if summary.valid_pockets > 0 || nothing_left {
                state.queen_covered = true;
                state.pending_queen_cover = None;
                state.scores[actor.index()] += self.rules.queen_value;
                summary.queen_covered = true;
                log::info!("Player {} covered the queen", actor.number());
            }
        }
        if state.pending_queen_cover.take().is_some() {
            if let Some(queen) = state.coins.iter_mut().find(|c| c.kind == DiscKind::Queen) {
                queen.restore(CENTER);
            }
            summary.queen_returned = true;
            log::info!("Queen not covered, returned to center");
        }

        if summary.striker_foul {
            let score = &mut state.scores[actor.index()];
            *score = score.saturating_sub(self.rules.striker_penalty);
            state.due[actor.index()] += 1;
            log::info!(
                "Player {} pocketed the striker, due {}",
                actor.number(),
                state.due_of(actor)
            );
        }

        if let Some(color) = own {
            if state.due_of(actor) > 0 && summary.valid_pockets > 0 {
                summary.coins_returned = self.settle_due(&mut state, actor, color);
            }
        }

        if !pocketed.is_empty() {
            state.last_pocketed_by = Some(actor);
        }

        let next = if summary.is_foul() {
            opponent
        } else if summary.valid_pockets > 0 || summary.queen_covered {
            actor
        } else {
            opponent
        };
        summary.next_player = Some(next);
        summary.winner = find_winner(&state, actor);

        if summary.is_foul() {
            events.push(GameEvent::Foul);
        }

        state.shot_pocketed.clear();
        state.current_player = next;
        state.striker = self.board.striker_for(next);

        match summary.winner {
            Some(winner) => {
                state.winner = Some(winner);
                state.phase = GamePhase::Ended;
                state.message = winner_message(state.mode, winner);
                let lost = state.mode == GameMode::VsAi && winner == Player::Two;
                events.push(if lost { GameEvent::Lose } else { GameEvent::Win });
                log::info!(
                    "Player {} wins {}-{}",
                    winner.number(),
                    state.scores[0],
                    state.scores[1]
                );
            }
            None => {
                if next != actor {
                    events.push(GameEvent::TurnChange);
                }
                let ai_next = state.mode == GameMode::VsAi && next == Player::Two;
                state.phase = if ai_next { GamePhase::AiThinking } else { GamePhase::Placing };
                state.message = turn_message(state.mode, actor, next, &summary, &self.rules);
            }
        }

        (state, events, summary)
    }

    /// Put owed coins back near the center. Returns how many came back.
    fn settle_due(&mut self, state: &mut GameState, actor: Player, color: CoinColor) -> u32 {
        let owed = state.due_of(actor);
        let returnable: Vec<DiscId> = state
            .coins
            .iter()
            .filter(|c| c.pocketed && c.kind == DiscKind::Coin(color))
            .map(|c| c.id)
            .take(owed as usize)
            .collect();

        for id in &returnable {
            let spot = self.free_spot(state);
            if let Some(coin) = state.coin_mut(*id) {
                coin.restore(spot);
            }
            let score = &mut state.scores[actor.index()];
            *score = score.saturating_sub(self.rules.coin_value);
        }

        let returned = returnable.len() as u32;
        state.due[actor.index()] = owed - returned;
        log::info!("Player {} returned {} due coin(s)", actor.number(), returned);
        returned
    }

    /// A jittered spot near the center that no active coin overlaps, searching
    /// outward when the center is crowded.
    fn free_spot(&mut self, state: &GameState) -> Vec2 {
        let jitter = self.rules.due_jitter * 2.0;
        let first = CENTER + Vec2::new(self.rng.jitter(jitter), self.rng.jitter(jitter));
        let is_free = |pos: Vec2| {
            state
                .coins
                .iter()
                .filter(|c| c.is_active())
                .all(|c| c.pos.distance(pos) >= c.radius + COIN_RADIUS)
        };
        if is_free(first) {
            return first;
        }

        for ring in 1..=RETURN_RINGS {
            let radius = ring as f32 * COIN_RADIUS * 2.0;
            for slot in 0..RETURN_SLOTS {
                let angle = slot as f32 * TAU / RETURN_SLOTS as f32;
                let pos = first + Vec2::from_angle(angle) * radius;
                let (lo, hi) = self.board.playable_range(COIN_RADIUS);
                if pos.x >= lo && pos.x <= hi && pos.y >= lo && pos.y <= hi && is_free(pos) {
                    return pos;
                }
            }
        }
        first
    }
}

/// A player wins once their colour is cleared and the queen is covered or
/// gone. Before colours exist, the higher score wins only when no regular
/// coin is left, ties going to whoever pocketed last.
pub fn find_winner(state: &GameState, actor: Player) -> Option<Player> {
    if state.color_of(Player::One).is_some() && state.color_of(Player::Two).is_some() {
        let queen_done = state.queen_covered || state.queen().map_or(true, |q| q.pocketed);
        if !queen_done {
            return None;
        }
        return [actor, actor.opponent()].into_iter().find(|p| {
            state
                .color_of(*p)
                .is_some_and(|color| state.count_on_board(color) == 0)
        });
    }

    let coins_left = state
        .coins
        .iter()
        .any(|c| c.is_active() && matches!(c.kind, DiscKind::Coin(_)));
    if coins_left {
        return None;
    }
    let (one, two) = (state.score(Player::One), state.score(Player::Two));
    Some(if one > two {
        Player::One
    } else if two > one {
        Player::Two
    } else {
        state.last_pocketed_by.unwrap_or(actor)
    })
}

fn winner_message(mode: GameMode, winner: Player) -> String {
    match (mode, winner) {
        (GameMode::VsAi, Player::One) => "You Win!".to_string(),
        (GameMode::VsAi, Player::Two) => "AI Wins!".to_string(),
        (GameMode::TwoPlayer, p) => format!("Player {} Wins!", p.number()),
    }
}

fn turn_message(
    mode: GameMode,
    actor: Player,
    next: Player,
    summary: &TurnSummary,
    rules: &RuleConfig,
) -> String {
    let vs_ai = mode == GameMode::VsAi;
    if summary.striker_foul {
        return if vs_ai && actor == Player::Two {
            format!("AI fouled! -{} point.", rules.striker_penalty)
        } else {
            format!("Foul! Striker pocketed. -{} point.", rules.striker_penalty)
        };
    }
    if summary.opponent_foul {
        return "Foul! Opponent's coin pocketed.".to_string();
    }
    if summary.queen_covered {
        return format!("Queen covered! +{}", rules.queen_value);
    }
    if summary.queen_returned {
        return "Queen not covered - returned to center.".to_string();
    }
    match (vs_ai, next == actor, next) {
        (true, true, Player::One) => "Great shot! Your turn again!".to_string(),
        (true, true, Player::Two) => "AI pocketed a coin!".to_string(),
        (true, false, Player::One) => "Your turn!".to_string(),
        (true, false, Player::Two) => "AI is thinking...".to_string(),
        (false, true, p) => format!("Great shot! Player {} continues", p.number()),
        (false, false, p) => format!("Player {}'s turn", p.number()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::board::QUEEN_ID;

    fn referee() -> Referee {
        Referee::new(RuleConfig::default(), Board::new(), Rng::new(11))
    }

    fn two_player() -> GameState {
        GameState::new(GameMode::TwoPlayer, &Board::new())
    }

    /// Pocket `id` as if the current shot captured it.
    fn capture(state: &mut GameState, id: DiscId) {
        if let Some(c) = state.coin_mut(id) {
            c.pocket();
        }
        state.shot_pocketed.push(id);
    }

    fn first_of(state: &GameState, color: CoinColor) -> DiscId {
        state
            .coins
            .iter()
            .find(|c| c.is_active() && c.kind == DiscKind::Coin(color))
            .map(|c| c.id)
            .unwrap()
    }

    #[test]
    fn empty_shot_passes_turn() {
        let (state, events, summary) = referee().resolve_turn(two_player());
        assert_eq!(state.current_player, Player::Two);
        assert_eq!(state.phase, GamePhase::Placing);
        assert_eq!(state.striker.pos, Vec2::new(160.0, 60.0));
        assert_eq!(events, vec![GameEvent::TurnChange]);
        assert!(!summary.is_foul());
    }

    #[test]
    fn empty_shot_hands_to_ai() {
        let state = GameState::new(GameMode::VsAi, &Board::new());
        let (state, _, _) = referee().resolve_turn(state);
        assert_eq!(state.phase, GamePhase::AiThinking);
        assert_eq!(state.message, "AI is thinking...");
    }

    #[test]
    fn first_coin_assigns_colors_to_actor() {
        let mut state = two_player();
        state.current_player = Player::Two;
        let black = first_of(&state, CoinColor::Black);
        capture(&mut state, black);

        let (state, _, summary) = referee().resolve_turn(state);
        assert_eq!(state.color_of(Player::Two), Some(CoinColor::Black));
        assert_eq!(state.color_of(Player::One), Some(CoinColor::White));
        assert_eq!(state.score(Player::Two), 1);
        assert_eq!(summary.valid_pockets, 1);
        assert_eq!(state.current_player, Player::Two);
        assert_eq!(state.last_pocketed_by, Some(Player::Two));
    }

    #[test]
    fn colors_never_change_once_set() {
        let mut state = two_player();
        state.colors = [Some(CoinColor::White), Some(CoinColor::Black)];
        let black = first_of(&state, CoinColor::Black);
        capture(&mut state, black);
        let (state, events, summary) = referee().resolve_turn(state);
        assert_eq!(state.colors, [Some(CoinColor::White), Some(CoinColor::Black)]);
        assert!(summary.opponent_foul);
        assert_eq!(state.score(Player::Two), 1);
        assert_eq!(state.score(Player::One), 0);
        assert_eq!(state.current_player, Player::Two);
        assert_eq!(events, vec![GameEvent::Foul, GameEvent::TurnChange]);
    }

    #[test]
    fn lone_queen_returns_to_exact_center() {
        let mut state = two_player();
        if let Some(q) = state.coin_mut(QUEEN_ID) {
            q.pos = Vec2::new(30.0, 30.0);
        }
        capture(&mut state, QUEEN_ID);

        let (state, _, summary) = referee().resolve_turn(state);
        let queen = state.queen().unwrap();
        assert!(!queen.pocketed);
        assert_eq!(queen.pos, CENTER);
        assert_eq!(state.pending_queen_cover, None);
        assert!(!state.queen_covered);
        assert!(summary.queen_returned);
        assert_eq!(state.score(Player::One), 0);
        assert_eq!(state.current_player, Player::Two);
    }

    #[test]
    fn queen_with_own_coin_is_covered() {
        let mut state = two_player();
        state.colors = [Some(CoinColor::White), Some(CoinColor::Black)];
        let white = first_of(&state, CoinColor::White);
        capture(&mut state, QUEEN_ID);
        capture(&mut state, white);

        let (state, _, summary) = referee().resolve_turn(state);
        assert!(state.queen_covered);
        assert!(state.queen().unwrap().pocketed);
        assert_eq!(state.score(Player::One), 4);
        assert!(summary.queen_covered);
        assert_eq!(state.current_player, Player::One);
        assert_eq!(state.message, "Queen covered! +3");
    }

    #[test]
    fn queen_alone_covers_when_no_own_coins_left() {
        let mut state = two_player();
        state.colors = [Some(CoinColor::White), Some(CoinColor::Black)];
        for c in state.coins.iter_mut() {
            if c.kind == DiscKind::Coin(CoinColor::White) {
                c.pocket();
            }
        }
        capture(&mut state, QUEEN_ID);

        let (state, events, summary) = referee().resolve_turn(state);
        assert!(summary.queen_covered);
        assert!(!summary.queen_returned);
        assert!(state.queen_covered);
        assert!(state.queen().unwrap().pocketed);
        assert_eq!(state.score(Player::One), 3);
        assert_eq!(summary.winner, Some(Player::One));
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(events, vec![GameEvent::Win]);
    }

    #[test]
    fn queen_with_opponent_coin_is_foul_and_returns() {
        let mut state = two_player();
        state.colors = [Some(CoinColor::White), Some(CoinColor::Black)];
        let black = first_of(&state, CoinColor::Black);
        capture(&mut state, QUEEN_ID);
        capture(&mut state, black);

        let (state, events, summary) = referee().resolve_turn(state);
        assert!(summary.opponent_foul);
        assert!(summary.queen_returned);
        assert!(!summary.queen_covered);
        assert_eq!(summary.valid_pockets, 0);
        let queen = state.queen().unwrap();
        assert!(!queen.pocketed);
        assert_eq!(queen.pos, CENTER);
        assert!(!state.queen_covered);
        assert_eq!(state.pending_queen_cover, None);
        assert_eq!(state.scores, [0, 1]);
        assert_eq!(state.current_player, Player::Two);
        assert_eq!(events, vec![GameEvent::Foul, GameEvent::TurnChange]);
        assert_eq!(state.message, "Foul! Opponent's coin pocketed.");
    }

    #[test]
    fn striker_foul_costs_point_and_adds_due() {
        let mut state = two_player();
        state.scores = [2, 0];
        state.striker.pocket();

        let (state, events, summary) = referee().resolve_turn(state);
        assert!(summary.striker_foul);
        assert_eq!(state.score(Player::One), 1);
        assert_eq!(state.due_of(Player::One), 1);
        assert_eq!(state.current_player, Player::Two);
        assert!(!state.striker.pocketed);
        assert!(events.contains(&GameEvent::Foul));
    }

    #[test]
    fn striker_penalty_floors_at_zero() {
        let mut state = two_player();
        state.striker.pocket();
        let (state, _, _) = referee().resolve_turn(state);
        assert_eq!(state.score(Player::One), 0);
        assert_eq!(state.due_of(Player::One), 1);
    }

    #[test]
    fn due_coin_returns_on_next_valid_pocket() {
        let mut state = two_player();
        state.colors = [Some(CoinColor::White), Some(CoinColor::Black)];
        state.scores = [3, 0];
        state.due = [1, 0];
        let white = first_of(&state, CoinColor::White);
        capture(&mut state, white);

        let (state, _, summary) = referee().resolve_turn(state);
        assert_eq!(summary.coins_returned, 1);
        assert_eq!(state.due_of(Player::One), 0);
        // +1 for the pocket, -1 for the coin that went back
        assert_eq!(state.score(Player::One), 3);
        assert_eq!(state.count_on_board(CoinColor::White), 9);
        assert_eq!(state.current_player, Player::One);

        let restored = state.coin(white).unwrap();
        assert!(restored.pos.distance(CENTER) > 0.0);
        for other in state.coins.iter().filter(|c| c.is_active() && c.id != white) {
            assert!(other.pos.distance(restored.pos) >= other.radius + restored.radius - 1e-3);
        }
    }

    #[test]
    fn last_own_coin_with_queen_covered_wins() {
        let mut state = two_player();
        state.colors = [Some(CoinColor::White), Some(CoinColor::Black)];
        state.queen_covered = true;
        if let Some(q) = state.coin_mut(QUEEN_ID) {
            q.pocket();
        }
        let whites: Vec<DiscId> = state
            .coins
            .iter()
            .filter(|c| c.kind == DiscKind::Coin(CoinColor::White))
            .map(|c| c.id)
            .collect();
        for id in &whites[1..] {
            if let Some(c) = state.coin_mut(*id) {
                c.pocket();
            }
        }
        capture(&mut state, whites[0]);

        let (state, events, summary) = referee().resolve_turn(state);
        assert_eq!(summary.winner, Some(Player::One));
        assert_eq!(state.winner, Some(Player::One));
        assert_eq!(state.phase, GamePhase::Ended);
        assert_eq!(events, vec![GameEvent::Win]);
    }

    #[test]
    fn cleared_color_with_queen_on_board_is_not_a_win() {
        let mut state = two_player();
        state.colors = [Some(CoinColor::White), Some(CoinColor::Black)];
        for c in state.coins.iter_mut() {
            if c.kind == DiscKind::Coin(CoinColor::White) {
                c.pocket();
            }
        }
        assert_eq!(find_winner(&state, Player::One), None);
    }

    #[test]
    fn ai_win_reports_loss() {
        let mut state = GameState::new(GameMode::VsAi, &Board::new());
        state.current_player = Player::Two;
        state.colors = [Some(CoinColor::White), Some(CoinColor::Black)];
        state.queen_covered = true;
        for c in state.coins.iter_mut() {
            if c.kind == DiscKind::Coin(CoinColor::Black) || c.kind == DiscKind::Queen {
                c.pocket();
            }
        }
        let (state, events, _) = referee().resolve_turn(state);
        assert_eq!(state.winner, Some(Player::Two));
        assert_eq!(state.message, "AI Wins!");
        assert_eq!(events, vec![GameEvent::Lose]);
    }

    #[test]
    fn score_decides_before_colors_exist() {
        let mut state = two_player();
        for c in state.coins.iter_mut() {
            if matches!(c.kind, DiscKind::Coin(_)) {
                c.pocket();
            }
        }
        state.scores = [2, 2];
        state.last_pocketed_by = Some(Player::Two);
        assert_eq!(find_winner(&state, Player::One), Some(Player::Two));
        state.scores = [3, 2];
        assert_eq!(find_winner(&state, Player::Two), Some(Player::One));
    }
}
