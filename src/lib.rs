//! Pixie Flight - An endless side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (actor physics, tile recycling, collisions, lifecycle)
//! - `game`: Fixed-timestep driver that forwards simulation events to collaborators
//! - `platform`: Scene/audio/HUD collaborator traits and their implementations
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `audio`: Sound cues and the Web Audio synthesizer

pub mod audio;
pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::Cue;
pub use game::Game;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one tick per 60 Hz frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;
    /// Largest frame delta fed into the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Gravitational acceleration
    pub const GRAVITY: f32 = 9.81;
    /// Actor mass (kg)
    pub const ACTOR_MASS: f32 = 3.0;
    /// Horizontal speed (units per tick)
    pub const ACTOR_SPEED: f32 = 3.0;
    /// Vertical velocity set by a thrust
    pub const THRUST_IMPULSE: f32 = 10.0;
    /// Vertical velocity set on death so the body flips up before falling
    pub const DEATH_KICK: f32 = 10.0;

    /// Tilt change per tick while alive
    pub const TILT_RATE: f32 = 0.01;
    /// Spin per tick while dead
    pub const DEATH_SPIN_RATE: f32 = 0.1;

    /// World tile width
    pub const TILE_WIDTH: f32 = 1200.0;
    /// Playfield height
    pub const PLAYFIELD_HEIGHT: f32 = 800.0;

    /// Score for clearing an obstacle
    pub const PASS_AWARD: u32 = 5;
    /// Countdown starts from this digit after a restart request
    pub const COUNTDOWN_FROM: u8 = 3;
}
