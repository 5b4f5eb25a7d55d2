use serde::{Deserialize, Serialize};

/// Tuning for the match, provided by the host page or left at defaults.
/// Board geometry is fixed (see `core::board`); everything here is behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarromConfig {
    pub physics: PhysicsConfig,
    pub rules: RuleConfig,
    pub ai: AiConfig,
    /// Seconds per frame used by hosts that do not pass their own delta.
    pub fixed_dt: f32,
    /// A press within this distance of the striker begins aiming;
    /// farther presses reposition it instead.
    pub engage_radius: f32,
}

impl Default for CarromConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            rules: RuleConfig::default(),
            ai: AiConfig::default(),
            fixed_dt: 1.0 / 60.0,
            engage_radius: 40.0,
        }
    }
}

/// Per-tick physics constants. Velocities are in board units per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Velocity retention per tick (must be < 1).
    pub friction: f32,
    /// Per-axis speed below which a disc snaps to rest.
    pub stop_epsilon: f32,
    /// Disc-disc restitution.
    pub restitution: f32,
    /// Disc-wall restitution.
    pub wall_restitution: f32,
    pub coin_mass: f32,
    pub striker_mass: f32,
    /// Fraction of the disc radius that may hang outside the pocket at capture.
    pub capture_fraction: f32,
    /// Pull-back distance per unit of power.
    pub shot_scale: f32,
    pub max_power: f32,
    /// Releases below this power cancel the aim instead of shooting.
    pub min_release_power: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            friction: 0.985,
            stop_epsilon: 0.1,
            restitution: 0.85,
            wall_restitution: 0.7,
            coin_mass: 1.0,
            striker_mass: 1.5,
            capture_fraction: 0.3,
            shot_scale: 5.0,
            max_power: 25.0,
            min_release_power: 1.0,
        }
    }
}

/// Scoring values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub coin_value: u32,
    pub queen_value: u32,
    /// Points deducted when the striker is pocketed (floored at zero).
    pub striker_penalty: u32,
    /// Half-width of the square around the center used when returning due coins.
    pub due_jitter: f32,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            coin_value: 1,
            queen_value: 3,
            striker_penalty: 1,
            due_jitter: 6.0,
        }
    }
}

/// Shot planner heuristics and presentation pacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Seconds of "thinking" before the striker is repositioned.
    pub think_delay: f32,
    /// Seconds between repositioning and the shot.
    pub shoot_delay: f32,
    pub min_power: f32,
    pub max_power: f32,
    /// Minimum dot product of the striker->disc and disc->pocket directions.
    pub min_alignment: f32,
    /// Shots scoring at or below this are discarded.
    pub min_score: f32,
    /// Extra clearance around blockers on the striker path.
    pub striker_clearance: f32,
    /// Extra clearance around blockers on the disc->pocket path.
    pub pocket_clearance: f32,
    /// Distance between path samples.
    pub sample_step: f32,
    /// Aim point jitter, +/- half of this on each axis.
    pub aim_jitter: f32,
    /// Power is multiplied by a factor in `1 +/- power_jitter`.
    pub power_jitter: f32,
    /// Seed for the planner's random source.
    pub seed: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            think_delay: 1.0,
            shoot_delay: 0.8,
            min_power: 6.0,
            max_power: 18.0,
            min_alignment: 0.3,
            min_score: 20.0,
            striker_clearance: 12.0,
            pocket_clearance: 8.0,
            sample_step: 8.0,
            aim_jitter: 10.0,
            power_jitter: 0.1,
            seed: 0x5eed_c0de,
        }
    }
}

impl CarromConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: CarromConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Pull out-of-range values back to something the simulation can run with.
    pub fn sanitized(mut self) -> Self {
        let p = &mut self.physics;
        if !(p.friction > 0.0 && p.friction < 1.0) {
            log::warn!("friction {} out of (0, 1), using default", p.friction);
            p.friction = PhysicsConfig::default().friction;
        }
        if p.stop_epsilon <= 0.0 {
            log::warn!("stop_epsilon {} must be positive, using default", p.stop_epsilon);
            p.stop_epsilon = PhysicsConfig::default().stop_epsilon;
        }
        p.restitution = p.restitution.clamp(0.0, 1.0);
        p.wall_restitution = p.wall_restitution.clamp(0.0, 1.0);
        p.capture_fraction = p.capture_fraction.clamp(0.0, 1.0);
        if p.coin_mass <= 0.0 || p.striker_mass <= 0.0 {
            log::warn!("disc masses must be positive, using defaults");
            p.coin_mass = PhysicsConfig::default().coin_mass;
            p.striker_mass = PhysicsConfig::default().striker_mass;
        }
        if p.shot_scale <= 0.0 {
            p.shot_scale = PhysicsConfig::default().shot_scale;
        }

        let ai = &mut self.ai;
        if ai.min_power > ai.max_power {
            log::warn!("ai power range [{}, {}] is inverted, swapping", ai.min_power, ai.max_power);
            std::mem::swap(&mut ai.min_power, &mut ai.max_power);
        }
        ai.think_delay = ai.think_delay.max(0.0);
        ai.shoot_delay = ai.shoot_delay.max(0.0);
        if ai.sample_step <= 0.0 {
            ai.sample_step = AiConfig::default().sample_step;
        }
        ai.power_jitter = ai.power_jitter.clamp(0.0, 0.5);

        if self.fixed_dt <= 0.0 {
            self.fixed_dt = 1.0 / 60.0;
        }
        if self.engage_radius <= 0.0 {
            self.engage_radius = 40.0;
        }
        self
    }
}
