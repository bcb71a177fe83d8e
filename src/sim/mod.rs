//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by member ID)
//! - No scene, audio or DOM dependencies; collaborators are told about
//!   changes through `GameEvent`s

pub mod actor;
pub mod animation;
pub mod bounds;
pub mod collision;
pub mod lifecycle;
pub mod state;
pub mod tick;
pub mod world;

pub use animation::{bob_offset, lava_frame};
pub use bounds::Aabb;
pub use collision::{Contact, classify, nearest_candidates, out_of_bounds};
pub use lifecycle::{Deferred, Timeline};
pub use state::{
    Actor, ActorPhase, GameEvent, GameState, Gap, Member, MemberId, MemberKind, Slot,
};
pub use tick::{TickInput, tick};
pub use world::WorldTiles;
