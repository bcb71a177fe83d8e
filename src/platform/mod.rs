//! Platform abstraction layer
//!
//! The simulation never touches the scene graph, audio or DOM directly.
//! The game driver calls into these collaborators instead:
//! - `Scene`: attaching, moving and detaching rendered objects
//! - `Audio`: one-shot sound cues
//! - `Hud`: score, countdown and game-over indicators
//!
//! All calls are best effort. Implementations must never panic and must
//! tolerate being asked to detach something they no longer hold.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::audio::Cue;
use crate::sim::{Actor, Member, MemberId};

/// Handle for a renderer-owned node (lava tiles and other animated decor)
pub type NodeId = u32;

/// Renderer / scene graph collaborator
pub trait Scene {
    /// Add a member's visual to the scene, grouped under its slot
    fn attach(&mut self, member: &Member);

    /// Remove a member's visual. Unknown ids are a no-op.
    fn detach(&mut self, id: MemberId);

    /// Member moved or rotated (pickup animation)
    fn update_member(&mut self, member: &Member);

    /// Actor transform changed; the camera follows the actor's x
    fn update_actor(&mut self, actor: &Actor);

    /// Nodes whose texture should be animated, discovered once at startup
    fn traverse_animated(&self) -> Vec<NodeId>;

    /// Swap an animated node to texture frame `frame` (1-8)
    fn set_texture_frame(&mut self, node: NodeId, frame: u8);

    /// Viewport changed. Never affects the simulation.
    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Sound playback collaborator
pub trait Audio {
    /// Fire-and-forget cue playback
    fn play(&mut self, cue: Cue);

    /// Cue length in seconds, used to sequence dependent cues
    fn duration(&self, cue: Cue) -> f32 {
        cue.default_duration()
    }
}

/// Text indicators around the playfield
pub trait Hud {
    fn set_score(&mut self, score: u32);
    fn set_high_score(&mut self, score: u32);
    fn show_game_over(&mut self);
    fn hide_game_over(&mut self);
    fn show_countdown(&mut self, digit: u8);
    fn hide_countdown(&mut self);
    fn show_restart_control(&mut self);
    fn hide_restart_control(&mut self);
}

/// Text shown in the score indicator
pub fn score_text(score: u32) -> String {
    format!("Score: {score}")
}

/// Text shown in the high score indicator
pub fn high_score_text(score: u32) -> String {
    format!("Best: {score}")
}

/// Text shown when the run ends
pub const GAME_OVER_TEXT: &str = "Game over";
