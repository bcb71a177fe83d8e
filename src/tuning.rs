//! Data-driven game balance
//!
//! Every gameplay constant lives here so a JSON file can retune the game
//! without a rebuild. Missing fields fall back to the defaults in `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Errors produced while loading or validating tuning data
#[derive(Debug, thiserror::Error)]
pub enum TuningError {
    /// The JSON could not be parsed
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value parsed but is out of range
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Actor ===
    pub gravity: f32,
    pub mass: f32,
    /// Horizontal speed in units per tick
    pub speed: f32,
    pub thrust_impulse: f32,
    pub death_kick: f32,
    pub tilt_rate: f32,
    pub death_spin_rate: f32,
    /// Side of the actor's square sprite
    pub actor_size: f32,

    // === World ===
    pub tile_width: f32,
    pub playfield_height: f32,
    /// How far from a watch position still counts as reaching it
    pub trigger_tolerance: f32,
    pub gates_per_batch: u32,
    pub gate_width: f32,
    pub gap_height: f32,

    // === Pickups ===
    pub pickup_size: f32,
    /// Horizontal distance between a gate edge and a mirrored pickup
    pub pickup_spacing: f32,
    /// Values are drawn from 1..=pickup_max_value
    pub pickup_max_value: u32,
    /// Chance that a gate gets any pickup at all
    pub pickup_chance: f64,
    /// Chance that a gate's pickups come as a mirrored pair
    pub mirror_chance: f64,
    pub pickup_bob_amplitude: f32,
    pub pickup_spin_rate: f32,

    // === Scoring & lifecycle ===
    pub pass_award: u32,
    pub countdown_from: u8,
    /// Seconds between countdown digits
    pub countdown_interval: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            mass: ACTOR_MASS,
            speed: ACTOR_SPEED,
            thrust_impulse: THRUST_IMPULSE,
            death_kick: DEATH_KICK,
            tilt_rate: TILT_RATE,
            death_spin_rate: DEATH_SPIN_RATE,
            actor_size: TILE_WIDTH / 50.0,

            tile_width: TILE_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            trigger_tolerance: 1.0,
            gates_per_batch: 2,
            gate_width: 80.0,
            gap_height: 220.0,

            pickup_size: 30.0,
            pickup_spacing: 120.0,
            pickup_max_value: 3,
            pickup_chance: 0.6,
            mirror_chance: 0.5,
            pickup_bob_amplitude: 100.0,
            pickup_spin_rate: 0.03,

            pass_award: PASS_AWARD,
            countdown_from: COUNTDOWN_FROM,
            countdown_interval: 1.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Distance from the playfield edge to the death boundary
    #[inline]
    pub fn boundary_margin(&self) -> f32 {
        self.playfield_height / 10.0
    }

    /// Highest (and, negated, lowest) y the actor may reach while alive
    #[inline]
    pub fn boundary(&self) -> f32 {
        self.playfield_height / 2.0 - self.boundary_margin()
    }

    /// Check that the values describe a playable world
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.tile_width <= 0.0 {
            return Err(invalid("tile_width", "must be positive"));
        }
        if self.playfield_height <= 0.0 {
            return Err(invalid("playfield_height", "must be positive"));
        }
        if self.speed <= 0.0 {
            return Err(invalid("speed", "must be positive"));
        }
        if self.mass <= 0.0 {
            return Err(invalid("mass", "must be positive"));
        }
        if self.gravity <= 0.0 {
            return Err(invalid("gravity", "must pull downward"));
        }
        if self.thrust_impulse <= 0.0 {
            return Err(invalid("thrust_impulse", "must push upward"));
        }
        if self.gate_width <= 0.0 {
            return Err(invalid("gate_width", "must be positive"));
        }
        if self.pickup_size <= 0.0 {
            return Err(invalid("pickup_size", "must be positive"));
        }
        if self.trigger_tolerance < 0.0 {
            return Err(invalid("trigger_tolerance", "must not be negative"));
        }
        if self.gates_per_batch == 0 {
            return Err(invalid("gates_per_batch", "need at least one gate"));
        }
        let slot_width = self.tile_width / self.gates_per_batch as f32;
        if self.gate_width + 2.0 * (self.pickup_spacing + self.pickup_size) > slot_width {
            return Err(invalid(
                "gate_width",
                format!("gate and pickups do not fit in {slot_width} units"),
            ));
        }
        let reachable = 2.0 * self.boundary();
        if self.gap_height <= self.actor_size || self.gap_height >= reachable {
            return Err(invalid(
                "gap_height",
                format!("must be between {} and {reachable}", self.actor_size),
            ));
        }
        if self.pickup_max_value == 0 {
            return Err(invalid("pickup_max_value", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.pickup_chance) {
            return Err(invalid("pickup_chance", "must be a probability"));
        }
        if !(0.0..=1.0).contains(&self.mirror_chance) {
            return Err(invalid("mirror_chance", "must be a probability"));
        }
        if self.countdown_interval < 0.0 {
            return Err(invalid("countdown_interval", "must not be negative"));
        }
        Ok(())
    }
}
