//! Game state and core simulation types
//!
//! Everything the per-tick step reads or writes lives in `GameState`.
//! Collaborators only ever see it through the queued `GameEvent`s.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use super::lifecycle::Timeline;
use super::world::WorldTiles;
use crate::audio::Cue;
use crate::tuning::Tuning;

/// Unique id of an active set member (monotonically increasing)
pub type MemberId = u32;

/// Lifecycle phase of the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorPhase {
    /// Before the first run; the restart control is up
    PreGame,
    /// Flying; the only phase that collides and scores
    Alive,
    /// Struck something; falling and spinning
    Dead,
    /// 3-2-1 before the next run
    Countdown,
}

/// One of the two logical obstacle positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    Zero,
    One,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Zero, Slot::One];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Slot::Zero => 0,
            Slot::One => 1,
        }
    }

    /// Actor x at which this slot is regenerated
    #[inline]
    pub fn watch_position(self, tile_width: f32) -> f32 {
        (self.index() as f32 - 1.0) * tile_width
    }

    /// Horizontal span of the tile this slot's batch is placed in
    pub fn tile_span(self, tile_width: f32) -> (f32, f32) {
        let start = self.watch_position(tile_width);
        (start, start + tile_width)
    }
}

/// The flying actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    /// Per-tick displacement
    pub vel: Vec2,
    /// Nose-down angle in radians; the renderer applies it as a clockwise roll
    pub tilt: f32,
    pub mass: f32,
    /// Horizontal speed restored on reset
    pub speed: f32,
    /// Side of the actor's square sprite
    pub size: f32,
    pub phase: ActorPhase,
    pub score: u32,
    pub high_score: u32,
    /// Collision box, refreshed after every step
    pub bounds: Aabb,
}

impl Actor {
    pub fn new(tuning: &Tuning) -> Self {
        let mut actor = Self {
            pos: Vec2::new(0.0, -tuning.playfield_height * 2.0),
            vel: Vec2::ZERO,
            tilt: 0.0,
            mass: tuning.mass,
            speed: tuning.speed,
            size: tuning.actor_size,
            phase: ActorPhase::PreGame,
            score: 0,
            high_score: 0,
            bounds: Aabb::from_center(Vec2::ZERO, Vec2::ZERO),
        };
        actor.refresh_bounds();
        actor
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.phase == ActorPhase::Alive
    }
}

/// Vertical opening of a gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    pub center_y: f32,
    pub height: f32,
}

impl Gap {
    #[inline]
    pub fn top(&self) -> f32 {
        self.center_y + self.height / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center_y - self.height / 2.0
    }
}

/// What an active set member is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MemberKind {
    /// Upper and lower column halves around a gap
    Obstacle { passed: bool, gap: Gap },
    /// Collectible; `mirror` points at its twin, if any
    Pickup {
        value: u32,
        mirror: Option<MemberId>,
        anchor_y: f32,
        spin: f32,
    },
}

/// A collidable object in the active set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub slot: Slot,
    pub kind: MemberKind,
    /// Union box; for obstacles this spans the whole playfield height
    pub bounds: Aabb,
}

impl Member {
    pub fn is_obstacle(&self) -> bool {
        matches!(self.kind, MemberKind::Obstacle { .. })
    }

    pub fn is_pickup(&self) -> bool {
        matches!(self.kind, MemberKind::Pickup { .. })
    }

    /// Twin pickup, if this is a mirrored pickup
    pub fn mirror(&self) -> Option<MemberId> {
        match self.kind {
            MemberKind::Pickup { mirror, .. } => mirror,
            MemberKind::Obstacle { .. } => None,
        }
    }

    /// Upper and lower halves of an obstacle
    pub fn halves(&self) -> Option<(Aabb, Aabb)> {
        let MemberKind::Obstacle { gap, .. } = self.kind else {
            return None;
        };
        let upper = Aabb::new(
            Vec2::new(self.bounds.min.x, gap.top()),
            Vec2::new(self.bounds.max.x, self.bounds.max.y),
        );
        let lower = Aabb::new(
            Vec2::new(self.bounds.min.x, self.bounds.min.y),
            Vec2::new(self.bounds.max.x, gap.bottom()),
        );
        Some((upper, lower))
    }

    /// Vertical overlap with the member's solid parts
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        match self.halves() {
            Some((upper, lower)) => upper.overlaps_y(other) || lower.overlaps_y(other),
            None => self.bounds.overlaps_y(other),
        }
    }
}

/// Things collaborators need to hear about, drained once per tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Cue(Cue),
    ScoreChanged(u32),
    HighScoreChanged(u32),
    GameOverShown,
    GameOverHidden,
    RestartControlShown,
    RestartControlHidden,
    CountdownShown(u8),
    CountdownHidden,
    MemberAttached(Member),
    MemberDetached(MemberId),
    MemberMoved(MemberId),
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub actor: Actor,
    /// Active object set (sorted by id)
    pub members: Vec<Member>,
    pub world: WorldTiles,
    pub timeline: Timeline,
    /// Restart control is on screen and accepts activation
    pub restart_visible: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds since startup
    pub elapsed: f64,
    /// Batch generation RNG
    pub rng: Pcg32,
    /// Seconds the `hit` and `die` cues last, used to sequence them
    pub hit_duration: f32,
    pub die_duration: f32,
    events: Vec<GameEvent>,
    next_id: MemberId,
}

impl GameState {
    /// Create a new pre-game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let actor = Actor::new(&tuning);
        let mut state = Self {
            seed,
            actor,
            members: Vec::new(),
            world: WorldTiles::default(),
            timeline: Timeline::default(),
            restart_visible: true,
            time_ticks: 0,
            elapsed: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            hit_duration: Cue::Hit.default_duration(),
            die_duration: Cue::Die.default_duration(),
            events: Vec::new(),
            next_id: 1,
            tuning,
        };

        // Initial HUD contents
        state.emit(GameEvent::ScoreChanged(0));
        state.emit(GameEvent::HighScoreChanged(0));
        state.emit(GameEvent::RestartControlShown);

        state
    }

    /// Allocate a new member ID
    pub fn next_member_id(&mut self) -> MemberId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Queue an event for the collaborators
    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued but not yet drained
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Members currently owned by `slot`
    pub fn slot_members(&self, slot: Slot) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(move |m| m.slot == slot)
    }

    /// Remove members by id, announcing each removal once.
    /// Ids that are already gone are ignored.
    pub fn remove_members(&mut self, ids: &[MemberId]) {
        let mut removed = Vec::with_capacity(ids.len());
        self.members.retain(|m| {
            let gone = ids.contains(&m.id);
            if gone {
                removed.push(m.id);
            }
            !gone
        });
        for id in removed {
            self.emit(GameEvent::MemberDetached(id));
        }
    }

    /// Drop the whole active set
    pub fn clear_members(&mut self) {
        let ids: Vec<_> = self.members.iter().map(|m| m.id).collect();
        self.remove_members(&ids);
    }

    /// Add score and announce it
    pub fn award(&mut self, points: u32) {
        self.actor.score += points;
        self.emit(GameEvent::ScoreChanged(self.actor.score));
    }

    /// Ensure members are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.members.sort_by_key(|m| m.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_pre_game() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.actor.phase, ActorPhase::PreGame);
        assert!(!state.actor.is_alive());
        assert!(state.restart_visible);
        assert!(state.members.is_empty());
        assert!(state.actor.pos.y < -state.tuning.playfield_height);
        assert!(
            state
                .pending_events()
                .contains(&GameEvent::RestartControlShown)
        );
    }

    #[test]
    fn test_watch_positions() {
        assert_eq!(Slot::Zero.watch_position(100.0), -100.0);
        assert_eq!(Slot::One.watch_position(100.0), 0.0);
        assert_eq!(Slot::One.tile_span(100.0), (0.0, 100.0));
    }

    #[test]
    fn test_obstacle_halves_leave_gap_open() {
        let member = Member {
            id: 1,
            slot: Slot::One,
            kind: MemberKind::Obstacle {
                passed: false,
                gap: Gap {
                    center_y: 0.0,
                    height: 100.0,
                },
            },
            bounds: Aabb::new(Vec2::new(0.0, -400.0), Vec2::new(50.0, 400.0)),
        };
        let in_gap = Aabb::from_center(Vec2::new(25.0, 0.0), Vec2::splat(20.0));
        let in_column = Aabb::from_center(Vec2::new(25.0, 200.0), Vec2::splat(20.0));
        assert!(!member.overlaps_y(&in_gap));
        assert!(member.overlaps_y(&in_column));
    }

    #[test]
    fn test_remove_members_is_idempotent() {
        let mut state = GameState::new(1, Tuning::default());
        state.drain_events();
        let id = state.next_member_id();
        state.members.push(Member {
            id,
            slot: Slot::Zero,
            kind: MemberKind::Pickup {
                value: 1,
                mirror: None,
                anchor_y: 0.0,
                spin: 0.0,
            },
            bounds: Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0)),
        });

        state.remove_members(&[id]);
        state.remove_members(&[id]);
        assert!(state.members.is_empty());
        assert_eq!(state.drain_events(), vec![GameEvent::MemberDetached(id)]);
    }
}
