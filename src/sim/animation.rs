//! Decorative motion
//!
//! Pickups bob and spin; lava tiles flip through a ping-pong texture loop.
//! Bobbing moves the pickup's collision box along with it.

use glam::Vec2;

use super::state::{GameEvent, GameState, MemberKind};

/// Frames in the lava texture loop
pub const LAVA_FRAMES: u8 = 8;

/// Lava texture frame for the elapsed time: 1..8 then back down to 1.
///
/// Sixteen steps per second; the folded cycle would produce a 0 on its last
/// step, which has no texture, so it holds frame 1 instead.
pub fn lava_frame(elapsed: f64) -> u8 {
    let step = ((elapsed * 16.0).floor() as i64).rem_euclid(16) as u8 + 1;
    let folded = if step > LAVA_FRAMES { 16 - step } else { step };
    folded.max(1)
}

/// Vertical offset of the pickup at `index` in the active set
pub fn bob_offset(index: usize, elapsed: f64, amplitude: f32) -> f32 {
    let wave = if index % 2 == 0 {
        elapsed.sin()
    } else {
        elapsed.cos()
    };
    wave as f32 * amplitude
}

impl GameState {
    /// Move every pickup to its bob height and advance its spin
    pub fn animate_pickups(&mut self) {
        let elapsed = self.elapsed;
        let amplitude = self.tuning.pickup_bob_amplitude;
        let spin_rate = self.tuning.pickup_spin_rate;

        let mut moved = Vec::new();
        for (index, member) in self.members.iter_mut().enumerate() {
            let MemberKind::Pickup { anchor_y, spin, .. } = &mut member.kind else {
                continue;
            };
            let target = *anchor_y + bob_offset(index, elapsed, amplitude);
            let dy = target - member.bounds.center().y;
            member.bounds = member.bounds.translated(Vec2::new(0.0, dy));
            *spin -= spin_rate;
            moved.push(member.id);
        }

        for id in moved {
            self.emit(GameEvent::MemberMoved(id));
        }
    }
}
