//! Fixed-timestep game driver
//!
//! Owns the simulation and the three collaborators. Each frame delta is fed
//! into an accumulator that runs whole `SIM_DT` ticks; after every tick the
//! events the simulation queued are forwarded to the scene, audio and HUD.

use crate::audio::Cue;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::platform::{Audio, Hud, NodeId, Scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, lava_frame, tick};
use crate::tuning::Tuning;

/// Game instance holding the simulation and its collaborators
pub struct Game<S: Scene, A: Audio, H: Hud> {
    pub state: GameState,
    scene: S,
    audio: A,
    hud: H,
    settings: Settings,
    accumulator: f32,
    input: TickInput,
    /// Animated scene nodes, discovered once
    animated: Vec<NodeId>,
    last_frame: Option<u8>,
}

impl<S: Scene, A: Audio, H: Hud> Game<S, A, H> {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings, scene: S, audio: A, hud: H) -> Self {
        let mut state = GameState::new(seed, tuning);
        state.hit_duration = audio.duration(Cue::Hit);
        state.die_duration = audio.duration(Cue::Die);

        let animated = scene.traverse_animated();
        log::info!(
            "Game created (seed {seed}, {} animated nodes)",
            animated.len()
        );

        let mut game = Self {
            state,
            scene,
            audio,
            hud,
            settings,
            accumulator: 0.0,
            input: TickInput::default(),
            animated,
            last_frame: None,
        };
        game.dispatch_events();
        game.scene.update_actor(&game.state.actor);
        game
    }

    /// Tap/click/space. Consumed by the next tick.
    pub fn activate(&mut self) {
        self.input.activate = true;
    }

    pub fn set_autopilot(&mut self, on: bool) {
        if self.input.autopilot != on {
            log::info!("Autopilot {}", if on { "on" } else { "off" });
        }
        self.input.autopilot = on;
    }

    pub fn autopilot(&self) -> bool {
        self.input.autopilot
    }

    /// Feed one frame delta; returns how many ticks ran
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        let dt = frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        // Drop the backlog once capped so slow frames are not replayed later
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Run exactly one tick and forward its events
    pub fn step(&mut self) {
        let input = self.input.clone();
        tick(&mut self.state, &input, SIM_DT);

        // Clear one-shot inputs after processing
        self.input.activate = false;

        self.dispatch_events();
        self.scene.update_actor(&self.state.actor);
        self.animate_textures();
    }

    /// Viewport changed
    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.resize(width, height);
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.last_frame = None;
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Cue(cue) => self.audio.play(cue),
                GameEvent::ScoreChanged(score) => self.hud.set_score(score),
                GameEvent::HighScoreChanged(score) => self.hud.set_high_score(score),
                GameEvent::GameOverShown => self.hud.show_game_over(),
                GameEvent::GameOverHidden => self.hud.hide_game_over(),
                GameEvent::RestartControlShown => self.hud.show_restart_control(),
                GameEvent::RestartControlHidden => self.hud.hide_restart_control(),
                GameEvent::CountdownShown(digit) => self.hud.show_countdown(digit),
                GameEvent::CountdownHidden => self.hud.hide_countdown(),
                GameEvent::MemberAttached(member) => self.scene.attach(&member),
                GameEvent::MemberDetached(id) => self.scene.detach(id),
                GameEvent::MemberMoved(id) => {
                    if let Some(member) = self.state.member(id) {
                        self.scene.update_member(member);
                    }
                }
            }
        }
    }

    fn animate_textures(&mut self) {
        if !self.settings.effective_texture_animation() || self.animated.is_empty() {
            return;
        }
        let frame = lava_frame(self.state.elapsed);
        if self.last_frame == Some(frame) {
            return;
        }
        self.last_frame = Some(frame);
        for &node in &self.animated {
            self.scene.set_texture_frame(node, frame);
        }
    }
}
