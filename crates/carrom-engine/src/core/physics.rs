use glam::Vec2;

use crate::api::config::PhysicsConfig;
use crate::api::types::{DiscId, DiscKind};
use crate::core::board::Board;
use crate::core::disc::{Disc, Pocket};

// ---------------------------------------------------------------------------
// Per-disc motion
// ---------------------------------------------------------------------------

/// Isotropic friction. Each axis snaps to exactly zero below the stop epsilon
/// so every shot terminates.
pub fn apply_friction(disc: &mut Disc, config: &PhysicsConfig) {
    disc.vel *= config.friction;
    if disc.vel.x.abs() < config.stop_epsilon {
        disc.vel.x = 0.0;
    }
    if disc.vel.y.abs() < config.stop_epsilon {
        disc.vel.y = 0.0;
    }
}

/// Explicit Euler, one tick per frame.
pub fn integrate(disc: &mut Disc) {
    disc.pos += disc.vel;
}

/// Clamp a disc back into the playable square, reflecting the perpendicular
/// velocity component with energy loss. Returns whether a wall was hit.
pub fn resolve_wall(disc: &mut Disc, min: f32, max: f32, config: &PhysicsConfig) -> bool {
    let lo = min + disc.radius;
    let hi = max - disc.radius;
    let mut hit = false;

    if disc.pos.x < lo {
        disc.pos.x = lo;
        disc.vel.x = -disc.vel.x * config.wall_restitution;
        hit = true;
    } else if disc.pos.x > hi {
        disc.pos.x = hi;
        disc.vel.x = -disc.vel.x * config.wall_restitution;
        hit = true;
    }

    if disc.pos.y < lo {
        disc.pos.y = lo;
        disc.vel.y = -disc.vel.y * config.wall_restitution;
        hit = true;
    } else if disc.pos.y > hi {
        disc.pos.y = hi;
        disc.vel.y = -disc.vel.y * config.wall_restitution;
        hit = true;
    }
    hit
}

// ---------------------------------------------------------------------------
// Disc-disc collisions
// ---------------------------------------------------------------------------

pub fn mass_of(disc: &Disc, config: &PhysicsConfig) -> f32 {
    match disc.kind {
        DiscKind::Striker => config.striker_mass,
        _ => config.coin_mass,
    }
}

pub fn discs_overlap(a: &Disc, b: &Disc) -> bool {
    a.pos.distance_squared(b.pos) < (a.radius + b.radius).powi(2)
}

/// Resolve a touching pair. Pairs that are already separating (or at rest
/// relative to each other) are left alone so a contact is never impulsed twice.
///
/// Returns the closing speed along the normal when an impulse was applied.
pub fn resolve_pair(a: &mut Disc, b: &mut Disc, config: &PhysicsConfig) -> Option<f32> {
    let delta = b.pos - a.pos;
    let dist = delta.length();
    if dist <= f32::EPSILON || dist >= a.radius + b.radius {
        return None;
    }

    let normal = delta / dist;
    let closing = (a.vel - b.vel).dot(normal);
    if closing <= 0.0 {
        return None;
    }

    let inv_a = 1.0 / mass_of(a, config);
    let inv_b = 1.0 / mass_of(b, config);
    let impulse = (1.0 + config.restitution) * closing / (inv_a + inv_b);
    a.vel -= normal * (impulse * inv_a);
    b.vel += normal * (impulse * inv_b);

    // Split the overlap equally along the normal
    let overlap = a.radius + b.radius - dist;
    let separation = normal * (overlap * 0.5);
    a.pos -= separation;
    b.pos += separation;

    Some(closing)
}

// ---------------------------------------------------------------------------
// Pockets, rest detection, shots
// ---------------------------------------------------------------------------

/// Captured once the center is inside the pocket by more than a fraction of
/// the disc's own radius (partial overlap is enough).
pub fn is_captured(disc: &Disc, pocket: &Pocket, config: &PhysicsConfig) -> bool {
    disc.pos.distance(pocket.pos) < pocket.radius - disc.radius * config.capture_fraction
}

/// True while any disc on the board exceeds the stop epsilon on either axis.
pub fn is_moving<'a>(discs: impl IntoIterator<Item = &'a Disc>, stop_epsilon: f32) -> bool {
    discs.into_iter().any(|d| {
        d.is_active() && (d.vel.x.abs() > stop_epsilon || d.vel.y.abs() > stop_epsilon)
    })
}

/// Launch velocity for a pull-back gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub velocity: Vec2,
    pub power: f32,
}

impl Shot {
    pub const NONE: Shot = Shot {
        velocity: Vec2::ZERO,
        power: 0.0,
    };
}

/// Pulling back from `start` to `release` fires from the release point toward
/// the start. Power grows with pull distance up to the cap.
pub fn shot_vector(start: Vec2, release: Vec2, config: &PhysicsConfig) -> Shot {
    shot_with_cap(start, release, config.shot_scale, config.max_power)
}

pub(crate) fn shot_with_cap(start: Vec2, release: Vec2, scale: f32, cap: f32) -> Shot {
    let pull = start - release;
    let dist = pull.length();
    if dist <= f32::EPSILON {
        return Shot::NONE;
    }
    let power = (dist / scale).min(cap);
    Shot {
        velocity: pull / dist * power,
        power,
    }
}

// ---------------------------------------------------------------------------
// World step
// ---------------------------------------------------------------------------

/// What happened during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    /// Closing speeds of pairs that received an impulse.
    pub collisions: Vec<f32>,
    /// Discs captured this tick, in capture order.
    pub captured: Vec<DiscId>,
}

/// Drives the kernel over every disc on the board.
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    min: f32,
    max: f32,
}

impl PhysicsWorld {
    pub fn new(config: PhysicsConfig, board: &Board) -> Self {
        // playable_range(0) is the inner edge of the border
        let (min, max) = board.playable_range(0.0);
        Self { config, min, max }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance one tick: friction, integration, walls, pairwise collisions,
    /// then pocket capture. Pocketed discs are skipped throughout.
    pub fn step(&self, coins: &mut [Disc], striker: &mut Disc, pockets: &[Pocket]) -> StepReport {
        let mut report = StepReport::default();
        let mut active: Vec<&mut Disc> = coins
            .iter_mut()
            .chain(std::iter::once(striker))
            .filter(|d| d.is_active())
            .collect();

        for disc in active.iter_mut() {
            apply_friction(disc, &self.config);
            integrate(disc);
            resolve_wall(disc, self.min, self.max, &self.config);
        }

        for i in 0..active.len() {
            let (head, tail) = active.split_at_mut(i + 1);
            let a = &mut *head[i];
            for b in tail.iter_mut() {
                if discs_overlap(a, b) {
                    if let Some(closing) = resolve_pair(a, &mut **b, &self.config) {
                        report.collisions.push(closing);
                    }
                }
            }
        }

        for disc in active.iter_mut() {
            // Separation can push a disc past the border
            resolve_wall(disc, self.min, self.max, &self.config);
            if pockets.iter().any(|p| is_captured(disc, p, &self.config)) {
                disc.pocket();
                report.captured.push(disc.id);
            }
        }

        report
    }

    pub fn is_moving<'a>(&self, discs: impl IntoIterator<Item = &'a Disc>) -> bool {
        is_moving(discs, self.config.stop_epsilon)
    }
}
