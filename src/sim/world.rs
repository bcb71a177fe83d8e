//! Tile recycling for the endless world
//!
//! The actor only ever travels between `-W` and `W`: it runs from 0 to `W`,
//! wraps to `-W` and runs back to 0. Two slots own the obstacles of the two
//! tiles it crosses:
//!
//! ```text
//!   slot 0 tile        slot 1 tile
//! |------------------|------------------|
//! -W                 0                  W
//! ^ regen slot 0     ^ regen slot 1     ^ wrap to -W
//! ```
//!
//! Reaching a slot's watch position throws away that slot's batch and
//! builds a fresh one, so at most two batches are ever alive.

use glam::Vec2;
use rand::Rng;

use super::bounds::Aabb;
use super::state::{Gap, GameEvent, GameState, Member, MemberId, MemberKind, Slot};

/// Trigger tracking for the two watch positions
#[derive(Debug, Clone, Default)]
pub struct WorldTiles {
    /// Actor x seen on the previous update
    last_x: Option<f32>,
    /// Whether each slot's trigger condition held on the previous update
    latched: [bool; 2],
}

impl WorldTiles {
    /// Forget the previous position (actor teleported)
    pub fn reset_tracking(&mut self, x: f32) {
        self.last_x = Some(x);
        self.latched = [false; 2];
    }

    /// Slots whose trigger condition started holding on this update.
    ///
    /// A slot's condition holds when the actor is within `tolerance` of the
    /// watch position or moved forward across it since the last update.
    /// Only the rising edge fires, so a stationary actor does not keep
    /// regenerating the slot it is parked on.
    pub fn triggered(&mut self, x: f32, tile_width: f32, tolerance: f32) -> Vec<Slot> {
        let prev = self.last_x.replace(x);
        let mut fired = Vec::new();

        for slot in Slot::ALL {
            let tile = slot.watch_position(tile_width);
            let near = (x - tile).abs() <= tolerance;
            let crossed = prev.is_some_and(|p| p < x && p <= tile && tile <= x);
            let holds = near || crossed;

            if holds && !self.latched[slot.index()] {
                fired.push(slot);
            }
            self.latched[slot.index()] = holds;
        }

        fired
    }
}

impl GameState {
    /// Regenerate any slot whose watch position the actor just reached
    pub fn update_map(&mut self) {
        let fired = self.world.triggered(
            self.actor.pos.x,
            self.tuning.tile_width,
            self.tuning.trigger_tolerance,
        );
        for slot in fired {
            self.regenerate_slot(slot);
        }
    }

    /// Replace `slot`'s batch with a fresh one.
    ///
    /// The old batch is fully detached before any new member is attached,
    /// and both happen inside this call.
    pub fn regenerate_slot(&mut self, slot: Slot) {
        let batch = self.generate_batch(slot);

        let stale: Vec<MemberId> = self.slot_members(slot).map(|m| m.id).collect();
        self.remove_members(&stale);

        log::debug!(
            "Slot {:?} regenerated: {} retired, {} spawned",
            slot,
            stale.len(),
            batch.len()
        );

        for member in batch {
            self.emit(GameEvent::MemberAttached(member.clone()));
            self.members.push(member);
        }
        self.normalize_order();
    }

    /// Build gates and pickups for one slot
    pub fn generate_batch(&mut self, slot: Slot) -> Vec<Member> {
        let tuning = self.tuning.clone();
        let (tile_start, _) = slot.tile_span(tuning.tile_width);
        let lane_width = tuning.tile_width / tuning.gates_per_batch.max(1) as f32;
        let half_height = tuning.playfield_height / 2.0;

        // Keep the whole gap inside the survivable band
        let lowest = -tuning.boundary() + tuning.gap_height / 2.0;
        let highest = tuning.boundary() - tuning.gap_height / 2.0;

        let mut batch = Vec::new();

        for lane in 0..tuning.gates_per_batch {
            let center_x = tile_start + lane_width * (lane as f32 + 0.5);
            let center_y = if lowest < highest {
                self.rng.random_range(lowest..=highest)
            } else {
                0.0
            };

            batch.push(Member {
                id: self.next_member_id(),
                slot,
                kind: MemberKind::Obstacle {
                    passed: false,
                    gap: Gap {
                        center_y,
                        height: tuning.gap_height,
                    },
                },
                bounds: Aabb::new(
                    Vec2::new(center_x - tuning.gate_width / 2.0, -half_height),
                    Vec2::new(center_x + tuning.gate_width / 2.0, half_height),
                ),
            });

            if !self.rng.random_bool(tuning.pickup_chance.clamp(0.0, 1.0)) {
                continue;
            }

            // Pickups sit just outside the gate at gap height
            let offset = tuning.gate_width / 2.0 + tuning.pickup_spacing + tuning.pickup_size / 2.0;
            let value = self.rng.random_range(1..=tuning.pickup_max_value.max(1));
            let mirrored = self.rng.random_bool(tuning.mirror_chance.clamp(0.0, 1.0));

            let pickup = |id: MemberId, x: f32, mirror: Option<MemberId>| Member {
                id,
                slot,
                kind: MemberKind::Pickup {
                    value,
                    mirror,
                    anchor_y: center_y,
                    spin: 0.0,
                },
                bounds: Aabb::from_center(Vec2::new(x, center_y), Vec2::splat(tuning.pickup_size)),
            };

            if mirrored {
                let before = self.next_member_id();
                let after = self.next_member_id();
                batch.push(pickup(before, center_x - offset, Some(after)));
                batch.push(pickup(after, center_x + offset, Some(before)));
            } else {
                let id = self.next_member_id();
                batch.push(pickup(id, center_x + offset, None));
            }
        }

        batch
    }
}
