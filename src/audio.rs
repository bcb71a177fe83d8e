//! Sound cues and the Web Audio synthesizer
//!
//! The simulation only names cues; how they sound is up to the platform.
//! On the web every cue is procedurally generated - no sound files needed.

use serde::{Deserialize, Serialize};

/// Sound cues the game asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Thrust
    Wing,
    /// Obstacle passed
    Swooshing,
    /// Pickup collected
    Point,
    /// Obstacle or boundary struck
    Hit,
    /// Follows `Hit` once it has finished
    Die,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Wing => "wing",
            Cue::Swooshing => "swooshing",
            Cue::Point => "point",
            Cue::Hit => "hit",
            Cue::Die => "die",
        }
    }

    /// Length of the synthesized cue in seconds
    pub fn default_duration(&self) -> f32 {
        match self {
            Cue::Wing => 0.12,
            Cue::Swooshing => 0.25,
            Cue::Point => 0.3,
            Cue::Hit => 0.35,
            Cue::Die => 0.6,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web_audio::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web_audio {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::Cue;
    use crate::platform::Audio;
    use crate::settings::Settings;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        /// Master times sfx volume, from `Settings`
        volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: Settings::default().effective_volume(),
                muted: false,
            }
        }

        /// Pick up volume and mute preferences
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.volume = settings.effective_volume();
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.volume
            }
        }

        /// Create an oscillator with a decaying gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            osc_type: OscillatorType,
            freq: f32,
            vol: f32,
            start: f64,
            duration: f64,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            gain.gain().set_value_at_time(vol, start).ok()?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, start + duration)
                .ok()?;
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            osc.start_with_when(start).ok()?;
            osc.stop_with_when(start + duration).ok()?;
            Some((osc, gain))
        }

        /// Quick upward chirp
        fn play_wing(&self, ctx: &AudioContext, vol: f32) {
            let now = ctx.current_time();
            let dur = Cue::Wing.default_duration() as f64;
            if let Some((osc, _)) = self.create_osc(ctx, OscillatorType::Sine, 400.0, vol * 0.25, now, dur) {
                let _ = osc.frequency().exponential_ramp_to_value_at_time(800.0, now + dur * 0.7);
            }
        }

        /// Soft descending sweep
        fn play_swooshing(&self, ctx: &AudioContext, vol: f32) {
            let now = ctx.current_time();
            let dur = Cue::Swooshing.default_duration() as f64;
            if let Some((osc, _)) = self.create_osc(ctx, OscillatorType::Triangle, 900.0, vol * 0.15, now, dur) {
                let _ = osc.frequency().exponential_ramp_to_value_at_time(300.0, now + dur);
            }
        }

        /// Two-note chime
        fn play_point(&self, ctx: &AudioContext, vol: f32) {
            let now = ctx.current_time();
            let note = Cue::Point.default_duration() as f64 / 2.0;
            for (i, freq) in [520.0, 680.0].into_iter().enumerate() {
                let _ = self.create_osc(
                    ctx,
                    OscillatorType::Sine,
                    freq,
                    vol * 0.2,
                    now + i as f64 * note,
                    note,
                );
            }
        }

        /// Short square thud
        fn play_hit(&self, ctx: &AudioContext, vol: f32) {
            let now = ctx.current_time();
            let dur = Cue::Hit.default_duration() as f64;
            if let Some((osc, _)) = self.create_osc(ctx, OscillatorType::Square, 180.0, vol * 0.2, now, dur) {
                let _ = osc.frequency().exponential_ramp_to_value_at_time(60.0, now + dur);
            }
        }

        /// Long falling sawtooth
        fn play_die(&self, ctx: &AudioContext, vol: f32) {
            let now = ctx.current_time();
            let dur = Cue::Die.default_duration() as f64;
            if let Some((osc, _)) = self.create_osc(ctx, OscillatorType::Sawtooth, 400.0, vol * 0.15, now, dur) {
                let _ = osc.frequency().exponential_ramp_to_value_at_time(80.0, now + dur * 0.8);
            }
        }
    }

    impl Audio for AudioManager {
        fn play(&mut self, cue: Cue) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match cue {
                Cue::Wing => self.play_wing(ctx, vol),
                Cue::Swooshing => self.play_swooshing(ctx, vol),
                Cue::Point => self.play_point(ctx, vol),
                Cue::Hit => self.play_hit(ctx, vol),
                Cue::Die => self.play_die(ctx, vol),
            }
        }

        fn duration(&self, cue: Cue) -> f32 {
            cue.default_duration()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_names_match_serialized_form() {
        for cue in [Cue::Wing, Cue::Swooshing, Cue::Point, Cue::Hit, Cue::Die] {
            let json = serde_json::to_string(&cue).unwrap();
            assert_eq!(json, format!("\"{}\"", cue.as_str()));
        }
    }

    #[test]
    fn test_die_follows_hit_after_a_pause() {
        assert!(Cue::Hit.default_duration() > 0.0);
        assert!(Cue::Die.default_duration() > Cue::Hit.default_duration());
    }
}
