use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{DiscId, DiscKind};

/// A coin, the queen, or the striker. Discs do not rotate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub id: DiscId,
    pub kind: DiscKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Pocketed discs stay in the collection for scoring lookups and returns,
    /// but take no part in physics or rendering.
    pub pocketed: bool,
}

impl Disc {
    pub fn new(id: DiscId, kind: DiscKind, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            vel: Vec2::ZERO,
            radius,
            pocketed: false,
        }
    }

    /// On the board and taking part in physics.
    pub fn is_active(&self) -> bool {
        !self.pocketed
    }

    /// Capture into a pocket: stop and flag.
    pub fn pocket(&mut self) {
        self.pocketed = true;
        self.vel = Vec2::ZERO;
    }

    /// Put a pocketed disc back on the board at rest.
    pub fn restore(&mut self, pos: Vec2) {
        self.pocketed = false;
        self.pos = pos;
        self.vel = Vec2::ZERO;
    }
}

/// A corner pocket. Fixed after board setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pocket {
    pub pos: Vec2,
    pub radius: f32,
}
