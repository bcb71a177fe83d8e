//! Collision detection and scoring
//!
//! Only the member(s) whose left edge is nearest the actor are examined each
//! tick. Horizontal overlap alone is enough to pass an obstacle; a hit needs
//! overlap on both axes. Without horizontal overlap the only thing that can
//! kill the actor is leaving the survivable band.

use super::bounds::Aabb;
use super::state::{GameEvent, GameState, Member, MemberId, MemberKind};
use crate::audio::Cue;

/// Outcome of testing the actor against one candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// No overlap and inside the band
    Clear,
    /// Entered an obstacle's span for the first time
    Passed(MemberId),
    /// Overlapped an obstacle's solid half
    Struck(MemberId),
    /// Overlapped a pickup
    Collected(MemberId),
    /// Left the survivable band
    OutOfBounds,
}

/// Members whose box `min.x` is nearest to `x`, ties included
pub fn nearest_candidates(members: &[Member], x: f32) -> Vec<MemberId> {
    let best = members
        .iter()
        .map(|m| (m.bounds.min.x - x).abs())
        .fold(f32::INFINITY, f32::min);

    members
        .iter()
        .filter(|m| (m.bounds.min.x - x).abs() == best)
        .map(|m| m.id)
        .collect()
}

/// Outside the band `[-boundary, boundary]`
#[inline]
pub fn out_of_bounds(y: f32, boundary: f32) -> bool {
    y > boundary || y < -boundary
}

/// Classify the actor against one candidate without changing anything
pub fn classify(actor_box: &Aabb, actor_y: f32, member: &Member, boundary: f32) -> Contact {
    if !actor_box.overlaps_x(&member.bounds) {
        return if out_of_bounds(actor_y, boundary) {
            Contact::OutOfBounds
        } else {
            Contact::Clear
        };
    }

    match member.kind {
        // Passing wins over a hit in the same tick
        MemberKind::Obstacle { passed: false, .. } => Contact::Passed(member.id),
        _ if !member.overlaps_y(actor_box) => Contact::Clear,
        MemberKind::Obstacle { .. } => Contact::Struck(member.id),
        MemberKind::Pickup { .. } => Contact::Collected(member.id),
    }
}

impl GameState {
    /// Test the actor against the nearest members and apply the results
    pub fn check_collision(&mut self) -> Vec<Contact> {
        if !self.actor.is_alive() {
            return Vec::new();
        }

        let boundary = self.tuning.boundary();
        let candidates = nearest_candidates(&self.members, self.actor.pos.x);

        // Nothing spawned yet; the band still applies
        if candidates.is_empty() {
            if out_of_bounds(self.actor.pos.y, boundary) {
                self.kill_actor();
                return vec![Contact::OutOfBounds];
            }
            return Vec::new();
        }

        let mut contacts = Vec::with_capacity(candidates.len());
        for id in candidates {
            if !self.actor.is_alive() {
                break;
            }
            // Twin of a pickup collected earlier in this loop
            let Some(member) = self.member(id) else {
                continue;
            };

            let contact = classify(&self.actor.bounds, self.actor.pos.y, member, boundary);
            match contact {
                Contact::Clear => {}
                Contact::Passed(id) => self.mark_passed(id),
                Contact::Struck(_) | Contact::OutOfBounds => self.kill_actor(),
                Contact::Collected(id) => self.collect(id),
            }
            contacts.push(contact);
        }
        contacts
    }

    /// Flag an obstacle as passed and score it, once
    fn mark_passed(&mut self, id: MemberId) {
        let Some(member) = self.members.iter_mut().find(|m| m.id == id) else {
            return;
        };
        let MemberKind::Obstacle { passed, .. } = &mut member.kind else {
            return;
        };
        if *passed {
            return;
        }
        *passed = true;

        self.emit(GameEvent::Cue(Cue::Swooshing));
        self.award(self.tuning.pass_award);
    }

    /// Pay out a pickup and remove it together with its twin
    fn collect(&mut self, id: MemberId) {
        let Some(member) = self.members.iter_mut().find(|m| m.id == id) else {
            return;
        };
        let MemberKind::Pickup { value, mirror, .. } = &mut member.kind else {
            return;
        };
        let points = std::mem::take(value);
        let twin = *mirror;

        self.emit(GameEvent::Cue(Cue::Point));
        if points > 0 {
            self.award(points);
        }

        let mut gone = vec![id];
        gone.extend(twin);
        self.remove_members(&gone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{ActorPhase, Gap, Slot};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn alive_state() -> GameState {
        let mut state = GameState::new(1, Tuning::default());
        state.reset_run();
        state.drain_events();
        state
    }

    fn place_actor(state: &mut GameState, x: f32, y: f32) {
        state.actor.pos = Vec2::new(x, y);
        state.actor.tilt = 0.0;
        state.actor.refresh_bounds();
    }

    fn add_obstacle(state: &mut GameState, min_x: f32, gap_center: f32, gap_height: f32) -> MemberId {
        let id = state.next_member_id();
        let half = state.tuning.playfield_height / 2.0;
        state.members.push(Member {
            id,
            slot: Slot::One,
            kind: MemberKind::Obstacle {
                passed: false,
                gap: Gap {
                    center_y: gap_center,
                    height: gap_height,
                },
            },
            bounds: Aabb::new(Vec2::new(min_x, -half), Vec2::new(min_x + 80.0, half)),
        });
        id
    }

    fn add_pickup(state: &mut GameState, center: Vec2, value: u32, mirror: Option<MemberId>) -> MemberId {
        let id = state.next_member_id();
        state.members.push(Member {
            id,
            slot: Slot::One,
            kind: MemberKind::Pickup {
                value,
                mirror,
                anchor_y: center.y,
                spin: 0.0,
            },
            bounds: Aabb::from_center(center, Vec2::splat(30.0)),
        });
        id
    }

    fn set_mirror(state: &mut GameState, id: MemberId, twin: MemberId) {
        if let Some(m) = state.members.iter_mut().find(|m| m.id == id) {
            if let MemberKind::Pickup { mirror, .. } = &mut m.kind {
                *mirror = Some(twin);
            }
        }
    }

    fn is_passed(state: &GameState, id: MemberId) -> bool {
        matches!(
            state.member(id).map(|m| &m.kind),
            Some(MemberKind::Obstacle { passed: true, .. })
        )
    }

    #[test]
    fn test_nearest_includes_ties() {
        let mut state = alive_state();
        let a = add_obstacle(&mut state, 100.0, 0.0, 200.0);
        let b = add_pickup(&mut state, Vec2::new(-85.0, 0.0), 1, None); // min.x = -100
        add_obstacle(&mut state, 300.0, 0.0, 200.0);
        let mut nearest = nearest_candidates(&state.members, 0.0);
        nearest.sort();
        assert_eq!(nearest, vec![a, b]);
    }

    #[test]
    fn test_pass_through_gap_scores_once() {
        let mut state = alive_state();
        let id = add_obstacle(&mut state, 0.0, 0.0, 200.0);
        place_actor(&mut state, 5.0, 0.0);

        assert_eq!(state.check_collision(), vec![Contact::Passed(id)]);
        assert!(is_passed(&state, id));
        assert_eq!(state.actor.score, 5);
        assert!(state.actor.is_alive());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Cue(Cue::Swooshing)));
        assert!(events.contains(&GameEvent::ScoreChanged(5)));

        // Still inside the span, still in the gap
        assert_eq!(state.check_collision(), vec![Contact::Clear]);
        assert_eq!(state.actor.score, 5);
    }

    #[test]
    fn test_pass_takes_priority_over_hit() {
        let mut state = alive_state();
        let id = add_obstacle(&mut state, 0.0, 0.0, 100.0);
        // Inside the upper half
        place_actor(&mut state, 5.0, 200.0);

        assert_eq!(state.check_collision(), vec![Contact::Passed(id)]);
        assert!(state.actor.is_alive());

        // Next tick the hit registers
        assert_eq!(state.check_collision(), vec![Contact::Struck(id)]);
        assert_eq!(state.actor.phase, ActorPhase::Dead);
        assert_eq!(state.actor.vel, Vec2::new(0.0, 10.0));
    }

    #[test]
    fn test_strike_passed_obstacle() {
        let mut state = alive_state();
        let id = add_obstacle(&mut state, 0.0, 0.0, 100.0);
        if let Some(MemberKind::Obstacle { passed, .. }) =
            state.members.iter_mut().find(|m| m.id == id).map(|m| &mut m.kind)
        {
            *passed = true;
        }
        place_actor(&mut state, 5.0, -150.0);

        state.check_collision();
        assert!(!state.actor.is_alive());
        assert_eq!(state.actor.vel, Vec2::new(0.0, 10.0));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Cue(Cue::Hit)));
        assert!(events.contains(&GameEvent::GameOverShown));
    }

    #[test]
    fn test_out_of_band_without_overlap() {
        let mut state = alive_state();
        add_obstacle(&mut state, 500.0, 0.0, 200.0);
        let boundary = state.tuning.boundary();
        place_actor(&mut state, 0.0, boundary + 1.0);

        assert_eq!(state.check_collision(), vec![Contact::OutOfBounds]);
        assert_eq!(state.actor.phase, ActorPhase::Dead);
    }

    #[test]
    fn test_out_of_band_with_empty_world() {
        let mut state = alive_state();
        let boundary = state.tuning.boundary();
        place_actor(&mut state, 0.0, -boundary - 1.0);
        assert_eq!(state.check_collision(), vec![Contact::OutOfBounds]);
        assert!(!state.actor.is_alive());
    }

    #[test]
    fn test_collect_pickup_once() {
        let mut state = alive_state();
        let id = add_pickup(&mut state, Vec2::new(10.0, 0.0), 3, None);
        place_actor(&mut state, 0.0, 0.0);

        assert_eq!(state.check_collision(), vec![Contact::Collected(id)]);
        assert_eq!(state.actor.score, 3);
        assert!(state.members.is_empty());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Cue(Cue::Point)));
        assert!(events.contains(&GameEvent::MemberDetached(id)));

        assert!(state.check_collision().is_empty());
        assert_eq!(state.actor.score, 3);
    }

    #[test]
    fn test_collect_removes_mirrored_twin() {
        let mut state = alive_state();
        let near = add_pickup(&mut state, Vec2::new(10.0, 0.0), 2, None);
        let far = add_pickup(&mut state, Vec2::new(400.0, 0.0), 2, Some(near));
        set_mirror(&mut state, near, far);
        let other = add_obstacle(&mut state, 900.0, 0.0, 200.0);
        place_actor(&mut state, 0.0, 0.0);

        state.check_collision();
        assert_eq!(state.actor.score, 2);
        let ids: Vec<_> = state.members.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![other]);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::MemberDetached(near)));
        assert!(events.contains(&GameEvent::MemberDetached(far)));
    }

    #[test]
    fn test_dead_actor_skips_collision() {
        let mut state = GameState::new(1, Tuning::default());
        add_pickup(&mut state, Vec2::new(0.0, 0.0), 1, None);
        place_actor(&mut state, 0.0, 0.0);
        assert!(state.check_collision().is_empty());
        assert_eq!(state.members.len(), 1);
    }
}
