use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Stable identifier for a disc. Unique for the lifetime of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscId(pub u32);

/// One of the two seats at the board. Serialized as `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index into per-player arrays (scores, colors, due counters).
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> u8 {
        player.number()
    }
}

impl TryFrom<u8> for Player {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(format!("invalid player number {}", other)),
        }
    }
}

/// The two regular coin colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinColor {
    White,
    Black,
}

impl CoinColor {
    pub fn complement(self) -> CoinColor {
        match self {
            CoinColor::White => CoinColor::Black,
            CoinColor::Black => CoinColor::White,
        }
    }
}

/// What a disc is. Coins are regular scoring pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscKind {
    Coin(CoinColor),
    Queen,
    Striker,
}

impl DiscKind {
    /// Color of a regular coin; `None` for the queen and the striker.
    pub fn color(self) -> Option<CoinColor> {
        match self {
            DiscKind::Coin(color) => Some(color),
            DiscKind::Queen | DiscKind::Striker => None,
        }
    }

    /// Numeric code used in the flat snapshot buffer.
    pub fn wire_code(self) -> f32 {
        match self {
            DiscKind::Coin(CoinColor::White) => 0.0,
            DiscKind::Coin(CoinColor::Black) => 1.0,
            DiscKind::Queen => 2.0,
            DiscKind::Striker => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameMode {
    #[default]
    VsAi,
    TwoPlayer,
}

impl GameMode {
    /// Custom-event payload code: 0 = vs-AI, 1 = two-player.
    pub fn from_code(code: f32) -> Self {
        if code >= 0.5 {
            GameMode::TwoPlayer
        } else {
            GameMode::VsAi
        }
    }

    pub fn wire_code(self) -> f32 {
        match self {
            GameMode::VsAi => 0.0,
            GameMode::TwoPlayer => 1.0,
        }
    }
}

/// Game phase state machine.
///
/// `Placing -> Aiming -> Moving -> (Placing | AiThinking | Ended)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    Placing,
    Aiming,
    Moving,
    AiThinking,
    Ended,
}

impl GamePhase {
    pub fn wire_code(self) -> f32 {
        match self {
            GamePhase::Placing => 0.0,
            GamePhase::Aiming => 1.0,
            GamePhase::Moving => 2.0,
            GamePhase::AiThinking => 3.0,
            GamePhase::Ended => 4.0,
        }
    }
}

/// Fire-and-forget notifications for the audio/visual collaborators.
/// Not required for correctness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum GameEvent {
    /// Two discs touched; `intensity` is the normal closing speed scaled to 0..1.
    Collision { intensity: f32 },
    /// A shot was released; `power` in 0..1 of the maximum.
    Strike { power: f32 },
    Pocket,
    QueenPocket,
    Foul,
    TurnChange,
    Win,
    Lose,
}

impl GameEvent {
    pub fn to_wire(self) -> WireEvent {
        let (kind, a) = match self {
            GameEvent::Collision { intensity } => (1.0, intensity),
            GameEvent::Strike { power } => (2.0, power),
            GameEvent::Pocket => (3.0, 0.0),
            GameEvent::QueenPocket => (4.0, 0.0),
            GameEvent::Foul => (5.0, 0.0),
            GameEvent::TurnChange => (6.0, 0.0),
            GameEvent::Win => (7.0, 0.0),
            GameEvent::Lose => (8.0, 0.0),
        };
        WireEvent { kind, a, b: 0.0, c: 0.0 }
    }
}

/// A game event as written into the shared snapshot buffer.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct WireEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl WireEvent {
    pub const FLOATS: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Player::Two).unwrap(), "2");
        let p: Player = serde_json::from_str("1").unwrap();
        assert_eq!(p, Player::One);
        assert!(serde_json::from_str::<Player>("3").is_err());
    }

    #[test]
    fn opponent_round_trips() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::One.opponent().opponent(), Player::One);
    }

    #[test]
    fn only_coins_have_color() {
        assert_eq!(DiscKind::Coin(CoinColor::Black).color(), Some(CoinColor::Black));
        assert_eq!(DiscKind::Queen.color(), None);
        assert_eq!(DiscKind::Striker.color(), None);
        assert_eq!(CoinColor::White.complement(), CoinColor::Black);
    }

    #[test]
    fn mode_and_phase_use_kebab_case() {
        assert_eq!(serde_json::to_string(&GameMode::VsAi).unwrap(), "\"vs-ai\"");
        assert_eq!(serde_json::to_string(&GamePhase::AiThinking).unwrap(), "\"ai-thinking\"");
    }

    #[test]
    fn wire_event_is_4_floats() {
        assert_eq!(std::mem::size_of::<WireEvent>(), 16);
        let wire = GameEvent::Strike { power: 0.5 }.to_wire();
        assert_eq!(wire.kind, 2.0);
        assert_eq!(wire.a, 0.5);
    }
}
