pub mod api;
pub mod core;
pub mod systems;
pub mod bridge;
pub mod input;
pub mod session;

// Re-export key types at crate root for convenience
pub use api::config::{AiConfig, CarromConfig, PhysicsConfig, RuleConfig};
pub use api::game::{AimState, GameState};
pub use api::types::{
    CoinColor, DiscId, DiscKind, GameEvent, GameMode, GamePhase, Player, WireEvent,
};
pub use core::board::{Board, StrikerBounds};
pub use core::disc::{Disc, Pocket};
pub use core::physics::{PhysicsWorld, Shot, StepReport};
pub use core::rng::Rng;
pub use core::timer::Timers;
pub use systems::ai::{AiShot, ShotPlanner};
pub use systems::rules::{Referee, TurnSummary};
pub use systems::turn::{Table, Transition, TurnInput};
pub use input::queue::{InputEvent, InputQueue};
pub use bridge::protocol::ProtocolLayout;
pub use bridge::snapshot::{DiscInstance, SnapshotBuffer};
pub use session::{Match, PacingAction};
