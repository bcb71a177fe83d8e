//! Actor lifecycle: death, restart countdown and reset
//!
//! Timed transitions (die cue, restart control, countdown digits, reset) are
//! queued on a `Timeline` that lives inside the simulation state and advances
//! with the tick clock. Restarting or resetting cancels whatever is still
//! pending, and every handler re-checks the phase it expects before acting.

use super::state::{ActorPhase, GameEvent, GameState};
use crate::audio::Cue;

/// A transition waiting for its time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Play the `die` cue once `hit` has finished
    DieCue,
    /// Offer a restart once both cues have finished
    ShowRestartControl,
    /// Show a countdown digit
    CountdownDigit(u8),
    /// Start the next run
    Reset,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    fire_at: f64,
    /// Insertion order, keeps equal fire times stable
    seq: u64,
    action: Deferred,
}

/// Pending timed transitions
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    now: f64,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Timeline {
    /// Queue `action` to fire `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, action: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            fire_at: self.now + delay.max(0.0) as f64,
            seq,
            action,
        });
    }

    /// Move the clock forward and take every action that came due, in order
    pub fn advance(&mut self, dt: f32) -> Vec<Deferred> {
        self.now += dt as f64;
        let now = self.now;

        let mut due: Vec<Pending> = Vec::new();
        self.pending.retain(|p| {
            if p.fire_at <= now {
                due.push(*p);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.fire_at.total_cmp(&b.fire_at).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|p| p.action).collect()
    }

    /// Drop everything pending; returns how many were dropped
    pub fn cancel(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}

impl GameState {
    /// Thrust the actor if it is alive
    pub fn thrust(&mut self) -> bool {
        if self.actor.thrust(&self.tuning) {
            self.emit(GameEvent::Cue(Cue::Wing));
            true
        } else {
            false
        }
    }

    /// Obstacle or boundary struck. Only an alive actor can die.
    pub fn kill_actor(&mut self) {
        if !self.actor.is_alive() {
            return;
        }
        self.actor.kill(&self.tuning);
        log::info!(
            "Actor down at x={:.0} y={:.0} with score {}",
            self.actor.pos.x,
            self.actor.pos.y,
            self.actor.score
        );

        self.emit(GameEvent::Cue(Cue::Hit));
        self.emit(GameEvent::GameOverShown);

        if self.actor.score > self.actor.high_score {
            self.actor.high_score = self.actor.score;
            self.emit(GameEvent::HighScoreChanged(self.actor.high_score));
            log::info!("New high score: {}", self.actor.high_score);
        }

        let hit = self.hit_duration;
        let die = self.die_duration;
        self.timeline.schedule(hit, Deferred::DieCue);
        self.timeline.schedule(hit + die, Deferred::ShowRestartControl);
    }

    /// Player asked for a new run. Only honoured while the restart control
    /// is visible; returns whether the countdown started.
    pub fn request_restart(&mut self) -> bool {
        if !self.restart_visible
            || !matches!(self.actor.phase, ActorPhase::PreGame | ActorPhase::Dead)
        {
            return false;
        }

        self.restart_visible = false;
        self.emit(GameEvent::RestartControlHidden);

        let stale = self.timeline.cancel();
        if stale > 0 {
            log::debug!("Restart cancelled {stale} pending transitions");
        }

        self.clear_members();
        self.actor.phase = ActorPhase::Countdown;

        let from = self.tuning.countdown_from;
        let interval = self.tuning.countdown_interval;
        for step in 0..from {
            self.timeline
                .schedule(step as f32 * interval, Deferred::CountdownDigit(from - step));
        }
        self.timeline.schedule(from as f32 * interval, Deferred::Reset);

        log::info!("Restart requested, counting down from {from}");
        true
    }

    /// Start a fresh run. The only way into `Alive`.
    pub fn reset_run(&mut self) {
        self.timeline.cancel();
        self.actor.reset();
        self.emit(GameEvent::ScoreChanged(0));
        self.clear_members();
        self.emit(GameEvent::CountdownHidden);
        self.emit(GameEvent::GameOverHidden);
        self.world.reset_tracking(self.actor.pos.x);
        log::info!("Run started (best {})", self.actor.high_score);
    }

    /// Run a due transition, ignoring it if the state moved on
    pub fn apply_deferred(&mut self, action: Deferred) {
        let phase = self.actor.phase;
        match (action, phase) {
            (Deferred::DieCue, ActorPhase::Dead) => {
                self.emit(GameEvent::Cue(Cue::Die));
            }
            (Deferred::ShowRestartControl, ActorPhase::Dead) => {
                self.restart_visible = true;
                self.emit(GameEvent::RestartControlShown);
                self.emit(GameEvent::GameOverHidden);
            }
            (Deferred::CountdownDigit(digit), ActorPhase::Countdown) => {
                self.emit(GameEvent::CountdownShown(digit));
            }
            (Deferred::Reset, ActorPhase::Countdown) => {
                self.reset_run();
            }
            (action, phase) => {
                log::debug!("Dropping stale {action:?} in phase {phase:?}");
            }
        }
    }

    /// Advance the timeline and apply everything that came due
    pub fn advance_timeline(&mut self, dt: f32) {
        for action in self.timeline.advance(dt) {
            self.apply_deferred(action);
        }
    }
}
