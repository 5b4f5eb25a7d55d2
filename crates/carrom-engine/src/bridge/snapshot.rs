use bytemuck::{Pod, Zeroable};

use crate::api::game::{AimState, GameState};
use crate::api::types::{DiscKind, GameEvent, WireEvent};
use crate::bridge::protocol::*;
use crate::core::board::BOARD_SIZE;
use crate::core::disc::Disc;

/// Per-disc data for the host renderer: 8 floats = 32 bytes stride.
/// Pocketed discs are not written.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct DiscInstance {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// `DiscKind::wire_code`.
    pub kind: f32,
    pub id: f32,
    pub vx: f32,
    pub vy: f32,
    pub _pad: f32,
}

impl DiscInstance {
    pub const FLOATS: usize = 8;

    pub fn from_disc(disc: &Disc) -> Self {
        Self {
            x: disc.pos.x,
            y: disc.pos.y,
            radius: disc.radius,
            kind: disc.kind.wire_code(),
            id: disc.id.0 as f32,
            vx: disc.vel.x,
            vy: disc.vel.y,
            _pad: 0.0,
        }
    }
}

/// Flat f32 buffer the host reads after every frame.
pub struct SnapshotBuffer {
    layout: ProtocolLayout,
    data: Vec<f32>,
    frame: u64,
}

impl SnapshotBuffer {
    pub fn new(layout: ProtocolLayout) -> Self {
        let data = vec![0.0; layout.buffer_total_floats];
        Self { layout, data, frame: 0 }
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    /// Raw pointer for direct host reads.
    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Rewrite the whole buffer from the current match.
    pub fn write(
        &mut self,
        state: &GameState,
        aim: Option<&AimState>,
        events: &[GameEvent],
        max_power: f32,
    ) {
        self.frame += 1;
        let layout = &self.layout;

        let mut disc_count = 0;
        let discs = self.data[layout.disc_data_offset..layout.event_data_offset]
            .chunks_exact_mut(DISC_FLOATS);
        for (slot, disc) in discs.zip(state.discs().filter(|d| d.is_active())) {
            slot.copy_from_slice(bytemuck::cast_slice(&[DiscInstance::from_disc(disc)]));
            disc_count += 1;
        }

        if events.len() > layout.max_events {
            log::warn!("{} events this frame, only {} fit", events.len(), layout.max_events);
        }
        let mut event_count = 0;
        let slots = self.data[layout.event_data_offset..].chunks_exact_mut(EVENT_FLOATS);
        for (slot, event) in slots.zip(events) {
            let wire: WireEvent = event.to_wire();
            slot.copy_from_slice(bytemuck::cast_slice(&[wire]));
            event_count += 1;
        }

        let color_code = |i: usize| state.colors[i].map_or(-1.0, |c| DiscKind::Coin(c).wire_code());
        let h = &mut self.data[..HEADER_FLOATS];
        h[HEADER_FRAME_COUNTER] = self.frame as f32;
        h[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        h[HEADER_BOARD_SIZE] = BOARD_SIZE;
        h[HEADER_MAX_DISCS] = layout.max_discs as f32;
        h[HEADER_DISC_COUNT] = disc_count as f32;
        h[HEADER_MAX_EVENTS] = layout.max_events as f32;
        h[HEADER_EVENT_COUNT] = event_count as f32;
        h[HEADER_PHASE] = state.phase.wire_code();
        h[HEADER_MODE] = state.mode.wire_code();
        h[HEADER_CURRENT_PLAYER] = state.current_player.number() as f32;
        h[HEADER_SCORE_ONE] = state.scores[0] as f32;
        h[HEADER_SCORE_TWO] = state.scores[1] as f32;
        h[HEADER_WINNER] = state.winner.map_or(0.0, |p| p.number() as f32);
        h[HEADER_COLOR_ONE] = color_code(0);
        h[HEADER_COLOR_TWO] = color_code(1);
        h[HEADER_QUEEN_COVERED] = if state.queen_covered { 1.0 } else { 0.0 };
        h[HEADER_DUE_ONE] = state.due[0] as f32;
        h[HEADER_DUE_TWO] = state.due[1] as f32;
        match aim {
            Some(aim) => {
                h[HEADER_AIM_ACTIVE] = 1.0;
                h[HEADER_AIM_POWER] = aim.power;
                h[HEADER_AIM_ANGLE] = aim.angle;
                h[HEADER_AIM_END_X] = aim.end.x;
                h[HEADER_AIM_END_Y] = aim.end.y;
            }
            None => {
                h[HEADER_AIM_ACTIVE..=HEADER_AIM_END_Y].fill(0.0);
            }
        }
        h[HEADER_MAX_POWER] = max_power;
    }

    pub fn header(&self, index: usize) -> f32 {
        self.data[index]
    }

    pub fn disc(&self, index: usize) -> DiscInstance {
        let start = self.layout.disc_data_offset + index * DISC_FLOATS;
        *bytemuck::from_bytes(bytemuck::cast_slice(&self.data[start..start + DISC_FLOATS]))
    }

    pub fn event(&self, index: usize) -> WireEvent {
        let start = self.layout.event_data_offset + index * EVENT_FLOATS;
        *bytemuck::from_bytes(bytemuck::cast_slice(&self.data[start..start + EVENT_FLOATS]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{GameMode, GamePhase};
    use crate::core::board::Board;

    #[test]
    fn disc_instance_is_8_floats() {
        assert_eq!(std::mem::size_of::<DiscInstance>(), 32);
        assert_eq!(DiscInstance::FLOATS, DISC_FLOATS);
    }

    #[test]
    fn writes_active_discs_and_header() {
        let mut state = GameState::new(GameMode::TwoPlayer, &Board::new());
        state.coins[3].pocket();
        state.scores = [2, 5];
        let mut buf = SnapshotBuffer::new(ProtocolLayout::default());
        buf.write(&state, None, &[GameEvent::Pocket, GameEvent::Foul], 25.0);

        assert_eq!(buf.header(HEADER_FRAME_COUNTER), 1.0);
        assert_eq!(buf.header(HEADER_DISC_COUNT), 19.0);
        assert_eq!(buf.header(HEADER_EVENT_COUNT), 2.0);
        assert_eq!(buf.header(HEADER_PHASE), GamePhase::Placing.wire_code());
        assert_eq!(buf.header(HEADER_MODE), 1.0);
        assert_eq!(buf.header(HEADER_SCORE_TWO), 5.0);
        assert_eq!(buf.header(HEADER_COLOR_ONE), -1.0);
        assert_eq!(buf.header(HEADER_AIM_ACTIVE), 0.0);

        let queen = buf.disc(0);
        assert_eq!((queen.x, queen.y), (160.0, 160.0));
        assert_eq!(queen.kind, 2.0);
        // Striker goes last
        assert_eq!(buf.disc(18).kind, 3.0);
        assert_eq!(buf.event(1).kind, GameEvent::Foul.to_wire().kind);
    }

    #[test]
    fn events_beyond_capacity_are_dropped() {
        let state = GameState::new(GameMode::VsAi, &Board::new());
        let mut buf = SnapshotBuffer::new(ProtocolLayout::new(32, 2));
        let events = vec![GameEvent::Pocket; 5];
        buf.write(&state, None, &events, 25.0);
        assert_eq!(buf.header(HEADER_EVENT_COUNT), 2.0);
    }
}
