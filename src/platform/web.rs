//! Browser collaborators
//!
//! `DomHud` manages the text indicators directly in the document.
//! `JsScene` forwards scene calls to a host object at `window.pixieScene`
//! (the page's renderer); every call is skipped when the host is missing.

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use super::{GAME_OVER_TEXT, Hud, NodeId, Scene, high_score_text, score_text};
use crate::sim::{Actor, Member, MemberId};

#[wasm_bindgen(inline_js = "
    function host() {
        return window.pixieScene || null;
    }
    export function scene_attach(json) {
        const s = host();
        if (s && s.attach) s.attach(JSON.parse(json));
    }
    export function scene_detach(id) {
        const s = host();
        if (s && s.detach) s.detach(id);
    }
    export function scene_update_member(json) {
        const s = host();
        if (s && s.updateMember) s.updateMember(JSON.parse(json));
    }
    export function scene_update_actor(x, y, tilt) {
        const s = host();
        if (s && s.updateActor) s.updateActor(x, y, tilt);
    }
    export function scene_animated_count() {
        const s = host();
        return s && s.animatedCount ? (s.animatedCount() >>> 0) : 0;
    }
    export function scene_texture_frame(node, frame) {
        const s = host();
        if (s && s.setTextureFrame) s.setTextureFrame(node, frame);
    }
    export function scene_resize(w, h) {
        const s = host();
        if (s && s.resize) s.resize(w, h);
    }
")]
extern "C" {
    fn scene_attach(json: &str);
    fn scene_detach(id: u32);
    fn scene_update_member(json: &str);
    fn scene_update_actor(x: f32, y: f32, tilt: f32);
    fn scene_animated_count() -> u32;
    fn scene_texture_frame(node: u32, frame: u8);
    fn scene_resize(w: u32, h: u32);
}

/// Scene graph living on the JavaScript side
#[derive(Debug, Default)]
pub struct JsScene;

impl Scene for JsScene {
    fn attach(&mut self, member: &Member) {
        match serde_json::to_string(member) {
            Ok(json) => scene_attach(&json),
            Err(e) => log::warn!("Failed to encode member {}: {e}", member.id),
        }
    }

    fn detach(&mut self, id: MemberId) {
        scene_detach(id);
    }

    fn update_member(&mut self, member: &Member) {
        if let Ok(json) = serde_json::to_string(member) {
            scene_update_member(&json);
        }
    }

    fn update_actor(&mut self, actor: &Actor) {
        scene_update_actor(actor.pos.x, actor.pos.y, actor.tilt);
    }

    fn traverse_animated(&self) -> Vec<NodeId> {
        (0..scene_animated_count()).collect()
    }

    fn set_texture_frame(&mut self, node: NodeId, frame: u8) {
        scene_texture_frame(node, frame);
    }

    fn resize(&mut self, width: u32, height: u32) {
        scene_resize(width, height);
    }
}

/// Score, countdown and game-over indicators in the page
pub struct DomHud {
    document: Option<Document>,
}

impl Default for DomHud {
    fn default() -> Self {
        Self::new()
    }
}

impl DomHud {
    pub fn new() -> Self {
        let document = web_sys::window().and_then(|w| w.document());
        if document.is_none() {
            log::warn!("No document - HUD disabled");
        }
        Self { document }
    }

    fn find(&self, selector: &str) -> Option<Element> {
        self.document
            .as_ref()?
            .query_selector(selector)
            .ok()
            .flatten()
    }

    fn set_text(&self, selector: &str, text: &str) {
        if let Some(el) = self.find(selector) {
            el.set_text_content(Some(text));
        }
    }

    /// Append a new element to the body
    fn append(&self, tag: &str, class: &str) -> Option<Element> {
        let document = self.document.as_ref()?;
        let el = document.create_element(tag).ok()?;
        el.set_class_name(class);
        document.body()?.append_child(&el).ok()?;
        Some(el)
    }

    fn remove(&self, selector: &str) {
        if let Some(el) = self.find(selector) {
            el.remove();
        }
    }
}

impl Hud for DomHud {
    fn set_score(&mut self, score: u32) {
        self.set_text(".score", &score_text(score));
    }

    fn set_high_score(&mut self, score: u32) {
        self.set_text(".highest", &high_score_text(score));
    }

    fn show_game_over(&mut self) {
        if self.find(".game-over").is_some() {
            return;
        }
        if let Some(el) = self.append("div", "game-over") {
            el.set_text_content(Some(GAME_OVER_TEXT));
        }
    }

    fn hide_game_over(&mut self) {
        self.remove(".game-over");
    }

    fn show_countdown(&mut self, digit: u8) {
        let el = self
            .find(".countdown")
            .or_else(|| self.append("div", "countdown"));
        if let Some(el) = el {
            el.set_text_content(Some(&digit.to_string()));
        }
    }

    fn hide_countdown(&mut self) {
        self.remove(".countdown");
    }

    fn show_restart_control(&mut self) {
        if self.find(".restart").is_some() {
            return;
        }
        if let Some(el) = self.append("img", "restart") {
            let _ = el.set_attribute("src", "./assets/playButton.png");
            let _ = el.set_attribute("alt", "Play");
        }
    }

    fn hide_restart_control(&mut self) {
        self.remove(".restart");
    }
}
