//! Board geometry and the deterministic opening layout.

use std::f32::consts::PI;

use glam::Vec2;

use crate::api::types::{CoinColor, DiscId, DiscKind, Player};
use crate::core::disc::{Disc, Pocket};

// Board geometry (board units, origin top-left, y down)
pub const BOARD_SIZE: f32 = 320.0;
pub const BORDER_WIDTH: f32 = 20.0;
pub const CENTER: Vec2 = Vec2::new(BOARD_SIZE / 2.0, BOARD_SIZE / 2.0);

pub const POCKET_RADIUS: f32 = 18.0;
/// Pocket centers sit this far inside the border on both axes.
const POCKET_OFFSET: f32 = 5.0;

pub const COIN_RADIUS: f32 = 12.0;
pub const STRIKER_RADIUS: f32 = 14.0;

const INNER_RING_RADIUS: f32 = 25.0;
const INNER_RING_COUNT: u32 = 6;
const OUTER_RING_RADIUS: f32 = 45.0;
const OUTER_RING_COUNT: u32 = 12;

/// Distance from the border to each player's baseline.
const BASELINE_INSET: f32 = 40.0;
/// Striker placement keeps this far from the side borders.
const STRIKER_PADDING: f32 = 60.0;

pub const STRIKER_ID: DiscId = DiscId(0);
pub const QUEEN_ID: DiscId = DiscId(1);

/// Legal striker placement along a player's baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikerBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub y: f32,
}

impl StrikerBounds {
    pub fn clamp_x(&self, x: f32) -> f32 {
        x.clamp(self.min_x, self.max_x)
    }

    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.min_x && x <= self.max_x
    }
}

/// The fixed board: four corner pockets plus layout helpers.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pockets: [Pocket; 4],
}

impl Board {
    pub fn new() -> Self {
        let near = BORDER_WIDTH + POCKET_OFFSET;
        let far = BOARD_SIZE - near;
        let pocket = |x: f32, y: f32| Pocket {
            pos: Vec2::new(x, y),
            radius: POCKET_RADIUS,
        };
        Self {
            pockets: [pocket(near, near), pocket(far, near), pocket(near, far), pocket(far, far)],
        }
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }

    pub fn center(&self) -> Vec2 {
        CENTER
    }

    /// Queen at the center, six coins on the inner ring and twelve on the outer
    /// ring (rotated half a slot), colors alternating by index.
    pub fn initial_coins(&self) -> Vec<Disc> {
        let mut coins = Vec::with_capacity((1 + INNER_RING_COUNT + OUTER_RING_COUNT) as usize);
        coins.push(Disc::new(QUEEN_ID, DiscKind::Queen, CENTER, COIN_RADIUS));

        let mut next_id = QUEEN_ID.0 + 1;
        let rings = [
            (INNER_RING_RADIUS, INNER_RING_COUNT, 0.0),
            (OUTER_RING_RADIUS, OUTER_RING_COUNT, PI / OUTER_RING_COUNT as f32),
        ];
        for (radius, count, phase) in rings {
            for i in 0..count {
                let angle = i as f32 * 2.0 * PI / count as f32 + phase;
                let color = if i % 2 == 0 { CoinColor::White } else { CoinColor::Black };
                let pos = CENTER + Vec2::from_angle(angle) * radius;
                coins.push(Disc::new(DiscId(next_id), DiscKind::Coin(color), pos, COIN_RADIUS));
                next_id += 1;
            }
        }
        coins
    }

    /// A fresh striker at rest on the center of `player`'s baseline.
    pub fn striker_for(&self, player: Player) -> Disc {
        let bounds = self.striker_bounds(player);
        Disc::new(
            STRIKER_ID,
            DiscKind::Striker,
            Vec2::new(CENTER.x, bounds.y),
            STRIKER_RADIUS,
        )
    }

    /// Player one shoots from the bottom baseline, player two from the top.
    pub fn striker_bounds(&self, player: Player) -> StrikerBounds {
        let y = match player {
            Player::One => BOARD_SIZE - BORDER_WIDTH - BASELINE_INSET,
            Player::Two => BORDER_WIDTH + BASELINE_INSET,
        };
        StrikerBounds {
            min_x: BORDER_WIDTH + STRIKER_PADDING,
            max_x: BOARD_SIZE - BORDER_WIDTH - STRIKER_PADDING,
            y,
        }
    }

    /// Lowest and highest center coordinate a disc of `radius` may occupy.
    pub fn playable_range(&self, radius: f32) -> (f32, f32) {
        (BORDER_WIDTH + radius, BOARD_SIZE - BORDER_WIDTH - radius)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
