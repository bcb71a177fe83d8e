//! Headless collaborators
//!
//! Record what they are told instead of drawing or playing anything. Used by
//! the native demo and by tests.

use std::collections::HashMap;

use glam::Vec2;

use super::{Audio, Hud, NodeId, Scene, high_score_text, score_text};
use crate::audio::Cue;
use crate::sim::{Actor, Member, MemberId};

/// Scene that keeps a copy of every attached member
#[derive(Debug, Default)]
pub struct RecordingScene {
    pub members: HashMap<MemberId, Member>,
    /// Last actor position and tilt
    pub actor: Option<(Vec2, f32)>,
    /// Camera follows the actor horizontally
    pub camera_x: f32,
    /// Current texture frame per animated node
    pub frames: HashMap<NodeId, u8>,
    pub viewport: (u32, u32),
    /// Detach requests for members that were not attached
    pub stray_detaches: u32,
    animated: Vec<NodeId>,
}

impl RecordingScene {
    pub fn with_animated(animated: Vec<NodeId>) -> Self {
        Self {
            animated,
            ..Default::default()
        }
    }
}

impl Scene for RecordingScene {
    fn attach(&mut self, member: &Member) {
        self.members.insert(member.id, member.clone());
    }

    fn detach(&mut self, id: MemberId) {
        if self.members.remove(&id).is_none() {
            self.stray_detaches += 1;
        }
    }

    fn update_member(&mut self, member: &Member) {
        if let Some(held) = self.members.get_mut(&member.id) {
            *held = member.clone();
        }
    }

    fn update_actor(&mut self, actor: &Actor) {
        self.actor = Some((actor.pos, actor.tilt));
        self.camera_x = actor.pos.x;
    }

    fn traverse_animated(&self) -> Vec<NodeId> {
        self.animated.clone()
    }

    fn set_texture_frame(&mut self, node: NodeId, frame: u8) {
        self.frames.insert(node, frame);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }
}

/// Audio that logs cues instead of playing them
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: Vec<Cue>,
}

impl Audio for LogAudio {
    fn play(&mut self, cue: Cue) {
        log::debug!("cue: {}", cue.as_str());
        self.played.push(cue);
    }
}

/// HUD state as the player would see it
#[derive(Debug, Default)]
pub struct RecordingHud {
    pub score_text: String,
    pub high_score_text: String,
    pub game_over: bool,
    pub countdown: Option<u8>,
    pub restart_control: bool,
}

impl Hud for RecordingHud {
    fn set_score(&mut self, score: u32) {
        self.score_text = score_text(score);
    }

    fn set_high_score(&mut self, score: u32) {
        self.high_score_text = high_score_text(score);
    }

    fn show_game_over(&mut self) {
        self.game_over = true;
    }

    fn hide_game_over(&mut self) {
        self.game_over = false;
    }

    fn show_countdown(&mut self, digit: u8) {
        self.countdown = Some(digit);
    }

    fn hide_countdown(&mut self) {
        self.countdown = None;
    }

    fn show_restart_control(&mut self) {
        self.restart_control = true;
    }

    fn hide_restart_control(&mut self) {
        self.restart_control = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Aabb, Gap, MemberKind, Slot};

    fn obstacle(id: MemberId) -> Member {
        Member {
            id,
            slot: Slot::Zero,
            kind: MemberKind::Obstacle {
                passed: false,
                gap: Gap {
                    center_y: 0.0,
                    height: 200.0,
                },
            },
            bounds: Aabb::new(Vec2::new(0.0, -400.0), Vec2::new(80.0, 400.0)),
        }
    }

    #[test]
    fn test_detach_unknown_is_tolerated() {
        let mut scene = RecordingScene::default();
        scene.attach(&obstacle(1));
        scene.detach(1);
        scene.detach(1);
        assert!(scene.members.is_empty());
        assert_eq!(scene.stray_detaches, 1);
    }

    #[test]
    fn test_hud_texts() {
        let mut hud = RecordingHud::default();
        hud.set_score(15);
        hud.set_high_score(40);
        assert_eq!(hud.score_text, "Score: 15");
        assert_eq!(hud.high_score_text, "Best: 40");
    }
}
