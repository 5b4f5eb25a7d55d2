//! Shot planner for the computer opponent.
//!
//! Geometric search over (target disc, pocket) pairs: find the contact point
//! that drives the target along the disc->pocket line, drop the striker onto
//! the baseline square with it, check both path segments for blockers, score
//! what survives and keep the best. Jitter is applied afterwards so play is
//! not perfect.

use glam::Vec2;

use crate::api::config::AiConfig;
use crate::api::types::{CoinColor, DiscId, DiscKind, Player};
use crate::core::board::{Board, StrikerBounds, CENTER};
use crate::core::disc::{Disc, Pocket};
use crate::core::rng::Rng;

/// Contact points less than this far in front of the baseline leave no room
/// to wind up.
const MIN_BASELINE_GAP: f32 = 10.0;

// Heuristic weights
const BASE_SCORE: f32 = 50.0;
const ALIGNMENT_WEIGHT: f32 = 30.0;
const DISTANCE_DIVISOR: f32 = 20.0;
const OWN_COLOR_BONUS: f32 = 25.0;
const QUEEN_BONUS: f32 = 15.0;
const OPPONENT_PENALTY: f32 = 40.0;
const POCKET_DISTANCE_WEIGHT: f32 = 0.6;
const POWER_DIVISOR: f32 = 12.0;
/// Fraction of the aim jitter applied to the striker's x.
const STRIKER_JITTER_SCALE: f32 = 0.3;

// Fallback shots
const NEAREST_POWER: (f32, f32) = (12.0, 17.0);
const CENTER_POWER: (f32, f32) = (10.0, 16.0);
const CENTER_SPREAD: f32 = 80.0;

/// A planned shot. `aim` is the point the striker is sent toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiShot {
    pub striker_x: f32,
    pub aim: Vec2,
    pub power: f32,
}

impl AiShot {
    /// Launch velocity from the striker's placed position toward the aim.
    pub fn velocity(&self, striker_pos: Vec2) -> Vec2 {
        let dir = (self.aim - striker_pos).normalize_or_zero();
        let dir = if dir == Vec2::ZERO {
            (CENTER - striker_pos).normalize_or_zero()
        } else {
            dir
        };
        dir * self.power
    }
}

/// A feasible, scored shot before jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub target: DiscId,
    pub pocket: usize,
    pub striker_x: f32,
    pub aim: Vec2,
    pub power: f32,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct ShotPlanner {
    config: AiConfig,
    board: Board,
    rng: Rng,
}

impl ShotPlanner {
    pub fn new(config: AiConfig, board: Board) -> Self {
        let rng = Rng::new(config.seed);
        Self { config, board, rng }
    }

    pub fn with_rng(config: AiConfig, board: Board, rng: Rng) -> Self {
        Self { config, board, rng }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Plan a shot for `player`. Always returns something legal: the best
    /// scored candidate if any, else the nearest targetable disc, else a
    /// jittered center shot.
    pub fn plan(
        &mut self,
        striker: &Disc,
        discs: &[Disc],
        pockets: &[Pocket],
        color: Option<CoinColor>,
        player: Player,
    ) -> AiShot {
        let bounds = self.board.striker_bounds(player);
        let best = self
            .candidates(striker, discs, pockets, color, player)
            .into_iter()
            .max_by(|a, b| a.score.total_cmp(&b.score));

        if let Some(best) = best {
            log::debug!(
                "AI: target {:?} into pocket {} (score {:.1}, power {:.1})",
                best.target, best.pocket, best.score, best.power
            );
            return self.jittered(best, bounds);
        }

        let from = Vec2::new(CENTER.x, bounds.y);
        let nearest = discs
            .iter()
            .filter(|d| d.is_active() && is_targetable(d.kind, color))
            .min_by(|a, b| {
                a.pos
                    .distance_squared(from)
                    .total_cmp(&b.pos.distance_squared(from))
            });

        let shot = match nearest {
            Some(disc) => {
                log::debug!("AI: no clear shot, hitting nearest {:?}", disc.id);
                AiShot {
                    striker_x: bounds.clamp_x(disc.pos.x),
                    aim: disc.pos,
                    power: self.rng.range(NEAREST_POWER.0, NEAREST_POWER.1),
                }
            }
            None => {
                log::debug!("AI: nothing targetable, shooting at center");
                AiShot {
                    striker_x: CENTER.x,
                    aim: CENTER + Vec2::new(self.rng.jitter(CENTER_SPREAD), 0.0),
                    power: self.rng.range(CENTER_POWER.0, CENTER_POWER.1),
                }
            }
        };
        AiShot {
            power: shot.power.clamp(self.config.min_power, self.config.max_power),
            ..shot
        }
    }

    /// Every feasible shot scoring above the threshold. Deterministic.
    pub fn candidates(
        &self,
        striker: &Disc,
        discs: &[Disc],
        pockets: &[Pocket],
        color: Option<CoinColor>,
        player: Player,
    ) -> Vec<Candidate> {
        let bounds = self.board.striker_bounds(player);
        let active: Vec<&Disc> = discs.iter().filter(|d| d.is_active()).collect();
        let mut found = Vec::new();

        for target in active.iter().filter(|d| is_targetable(d.kind, color)) {
            for (pocket_index, pocket) in pockets.iter().enumerate() {
                let candidate = self.evaluate(
                    target,
                    pocket_index,
                    pocket,
                    striker.radius,
                    &bounds,
                    &active,
                    color,
                );
                found.extend(candidate);
            }
        }
        found
    }

    #[allow(clippy::too_many_arguments)]
    fn evaluate(
        &self,
        target: &Disc,
        pocket_index: usize,
        pocket: &Pocket,
        striker_radius: f32,
        bounds: &StrikerBounds,
        active: &[&Disc],
        color: Option<CoinColor>,
    ) -> Option<Candidate> {
        let (start, contact) = striker_position(target, pocket, striker_radius, bounds)?;

        let cfg = &self.config;
        let aligned = alignment(start, target.pos, pocket.pos);
        if aligned < cfg.min_alignment {
            return None;
        }

        let (step, id) = (cfg.sample_step, target.id);
        if !path_clear(start, contact, active, id, cfg.striker_clearance, step) {
            return None;
        }
        if !path_clear(target.pos, pocket.pos, active, id, cfg.pocket_clearance, step) {
            return None;
        }

        let s2c = start.distance(target.pos);
        let c2p = target.pos.distance(pocket.pos);
        let mut score = BASE_SCORE + aligned * ALIGNMENT_WEIGHT - (s2c + c2p) / DISTANCE_DIVISOR;
        match (target.kind, color) {
            (DiscKind::Queen, _) => score += QUEEN_BONUS,
            (DiscKind::Coin(c), Some(own)) if c != own => score -= OPPONENT_PENALTY,
            _ => score += OWN_COLOR_BONUS,
        }
        if score <= cfg.min_score {
            return None;
        }

        let power = ((s2c + c2p * POCKET_DISTANCE_WEIGHT) / POWER_DIVISOR)
            .clamp(cfg.min_power, cfg.max_power);
        Some(Candidate {
            target: target.id,
            pocket: pocket_index,
            striker_x: start.x,
            aim: contact,
            power,
            score,
        })
    }

    fn jittered(&mut self, best: Candidate, bounds: StrikerBounds) -> AiShot {
        let cfg = &self.config;
        let (aim_jitter, power_jitter) = (cfg.aim_jitter, cfg.power_jitter);
        let (min_power, max_power) = (cfg.min_power, cfg.max_power);

        let x_jitter = self.rng.jitter(aim_jitter * STRIKER_JITTER_SCALE);
        let striker_x = bounds.clamp_x(best.striker_x + x_jitter);
        let aim = best.aim + Vec2::new(self.rng.jitter(aim_jitter), self.rng.jitter(aim_jitter));
        let scale = 1.0 + self.rng.jitter(power_jitter * 2.0);
        let power = (best.power * scale).clamp(min_power, max_power);
        AiShot { striker_x, aim, power }
    }
}

/// The queen is always fair game; coins only when they are ours (or before
/// colors are decided).
fn is_targetable(kind: DiscKind, color: Option<CoinColor>) -> bool {
    match kind {
        DiscKind::Queen => true,
        DiscKind::Coin(c) => color.map_or(true, |own| own == c),
        DiscKind::Striker => false,
    }
}

/// Contact point that drives the target toward the pocket, and the striker
/// start on the baseline square with it. `None` when that start is outside
/// the bounds or the contact point is not far enough in front of the
/// baseline.
pub fn striker_position(
    target: &Disc,
    pocket: &Pocket,
    striker_radius: f32,
    bounds: &StrikerBounds,
) -> Option<(Vec2, Vec2)> {
    let dir = (pocket.pos - target.pos).try_normalize()?;
    let contact = target.pos - dir * (target.radius + striker_radius);

    // Measured toward the board center
    let ahead = (contact.y - bounds.y) * (CENTER.y - bounds.y).signum();
    if ahead < MIN_BASELINE_GAP || !bounds.contains_x(contact.x) {
        return None;
    }
    Some((Vec2::new(contact.x, bounds.y), contact))
}

/// Cosine between striker->disc and disc->pocket. 1.0 drives the disc
/// straight at the pocket; at or below zero it is pushed away.
pub fn alignment(start: Vec2, target: Vec2, pocket: Vec2) -> f32 {
    let to_target = (target - start).normalize_or_zero();
    let to_pocket = (pocket - target).normalize_or_zero();
    to_target.dot(to_pocket)
}

/// Samples the segment at `step` intervals; blocked if any sample is within
/// `clearance` of an active disc other than `ignore`.
pub fn path_clear(
    from: Vec2,
    to: Vec2,
    active: &[&Disc],
    ignore: DiscId,
    clearance: f32,
    step: f32,
) -> bool {
    let dist = from.distance(to);
    if dist < 1.0 {
        return false;
    }
    let samples = (dist / step).ceil() as u32;
    (1..=samples).all(|i| {
        let point = from.lerp(to, i as f32 / samples as f32);
        active
            .iter()
            .filter(|d| d.id != ignore && d.kind != DiscKind::Striker)
            .all(|d| d.pos.distance(point) >= d.radius + clearance)
    })
}
