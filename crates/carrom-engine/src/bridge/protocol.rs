/// Shared snapshot buffer layout.
/// Must stay in sync with the host's `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 24 floats]
/// [Discs: max_discs × 8 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header every frame so the host can
/// compute offsets without hardcoding them.

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 24;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_BOARD_SIZE: usize = 2;
pub const HEADER_MAX_DISCS: usize = 3;
pub const HEADER_DISC_COUNT: usize = 4;
pub const HEADER_MAX_EVENTS: usize = 5;
pub const HEADER_EVENT_COUNT: usize = 6;
pub const HEADER_PHASE: usize = 7;
pub const HEADER_MODE: usize = 8;
pub const HEADER_CURRENT_PLAYER: usize = 9;
pub const HEADER_SCORE_ONE: usize = 10;
pub const HEADER_SCORE_TWO: usize = 11;
/// 0 while the match is running, else the winning player's number.
pub const HEADER_WINNER: usize = 12;
/// -1 until colors are assigned, then the `DiscKind` wire code.
pub const HEADER_COLOR_ONE: usize = 13;
pub const HEADER_COLOR_TWO: usize = 14;
pub const HEADER_QUEEN_COVERED: usize = 15;
pub const HEADER_DUE_ONE: usize = 16;
pub const HEADER_DUE_TWO: usize = 17;
/// 1 while a pull-back is in progress.
pub const HEADER_AIM_ACTIVE: usize = 18;
pub const HEADER_AIM_POWER: usize = 19;
pub const HEADER_AIM_ANGLE: usize = 20;
pub const HEADER_AIM_END_X: usize = 21;
pub const HEADER_AIM_END_Y: usize = 22;
pub const HEADER_MAX_POWER: usize = 23;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per disc (wire format, never changes).
pub const DISC_FLOATS: usize = 8;

/// Floats per game event: kind, a, b, c (wire format, never changes).
pub const EVENT_FLOATS: usize = 4;

pub const DEFAULT_MAX_DISCS: usize = 32;
pub const DEFAULT_MAX_EVENTS: usize = 64;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_discs: usize,
    /// Maximum game events per frame.
    pub max_events: usize,

    /// Size of disc section in floats.
    pub disc_data_floats: usize,
    /// Size of event section in floats.
    pub event_data_floats: usize,

    /// Offset (in floats) where disc data begins.
    pub disc_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    pub fn new(max_discs: usize, max_events: usize) -> Self {
        let disc_data_floats = max_discs * DISC_FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let disc_data_offset = HEADER_FLOATS;
        let event_data_offset = disc_data_offset + disc_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_discs,
            max_events,
            disc_data_floats,
            event_data_floats,
            disc_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }
}

impl Default for ProtocolLayout {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DISCS, DEFAULT_MAX_EVENTS)
    }
}
