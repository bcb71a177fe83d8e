//! Simulation tick
//!
//! One call per frame tick: input, deferred transitions, actor physics,
//! collisions, tile recycling, decorative animation - in that order.

use super::state::{GameState, MemberKind};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap/click/space: thrust while alive, restart while the control is up
    pub activate: bool,
    /// Demo mode - the game plays itself
    pub autopilot: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    state.elapsed += dt as f64;

    let activate = input.activate || (input.autopilot && autopilot_activates(state));
    if activate {
        if state.actor.is_alive() {
            state.thrust();
        } else if state.restart_visible {
            state.request_restart();
        }
    }

    state.advance_timeline(dt);

    state.actor.step(dt, &state.tuning);
    state.check_collision();
    state.update_map();
    state.animate_pickups();

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Demo pilot: restart whenever possible, otherwise hop toward the gap of
/// the next unpassed obstacle while falling below it
fn autopilot_activates(state: &GameState) -> bool {
    if state.restart_visible {
        return true;
    }
    if !state.actor.is_alive() {
        return false;
    }

    let x = state.actor.pos.x;
    let target_y = state
        .members
        .iter()
        .filter(|m| m.bounds.max.x >= x)
        .filter_map(|m| match m.kind {
            MemberKind::Obstacle { passed: false, gap } => Some((m.bounds.min.x, gap.center_y)),
            _ => None,
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, y)| y)
        .unwrap_or(0.0);

    // Roughly the rise of one thrust below the target
    let hop = state.tuning.thrust_impulse * 6.0;
    state.actor.vel.y < 0.0 && state.actor.pos.y < target_y - hop
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::{ActorPhase, GameEvent};
    use crate::tuning::Tuning;

    fn run(state: &mut GameState, input: &TickInput, ticks: u32) {
        for _ in 0..ticks {
            tick(state, input, SIM_DT);
        }
    }

    /// Ticks from a restart request to the reset
    fn countdown_ticks(state: &GameState) -> u32 {
        (state.tuning.countdown_from as f32 * state.tuning.countdown_interval / SIM_DT).ceil() as u32 + 1
    }

    #[test]
    fn test_pre_game_to_alive() {
        let mut state = GameState::new(12345, Tuning::default());
        assert_eq!(state.actor.phase, ActorPhase::PreGame);

        // Tick without activation - stays in pre-game
        run(&mut state, &TickInput::default(), 1);
        assert_eq!(state.actor.phase, ActorPhase::PreGame);

        let activate = TickInput {
            activate: true,
            ..Default::default()
        };
        tick(&mut state, &activate, SIM_DT);
        assert_eq!(state.actor.phase, ActorPhase::Countdown);

        let ticks = countdown_ticks(&state);
        run(&mut state, &TickInput::default(), ticks);
        assert!(state.actor.is_alive());
        // The first tick of the run spawned slot 1 around the origin
        assert!(state.members.iter().any(|m| m.slot == crate::sim::Slot::One));
    }

    #[test]
    fn test_activate_thrusts_while_alive() {
        let mut state = GameState::new(1, Tuning::default());
        state.reset_run();
        state.drain_events();

        let activate = TickInput {
            activate: true,
            ..Default::default()
        };
        tick(&mut state, &activate, SIM_DT);
        let expected = state.tuning.thrust_impulse - 9.81 * state.tuning.mass * SIM_DT;
        assert!((state.actor.vel.y - expected).abs() < 1e-4);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Cue(crate::audio::Cue::Wing))
        );
    }

    #[test]
    fn test_activate_ignored_while_dead_without_control() {
        let mut state = GameState::new(1, Tuning::default());
        state.reset_run();
        state.kill_actor();

        let activate = TickInput {
            activate: true,
            ..Default::default()
        };
        tick(&mut state, &activate, SIM_DT);
        assert_eq!(state.actor.phase, ActorPhase::Dead);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };

        run(&mut state1, &input, 600);
        run(&mut state2, &input, 600);

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.members, state2.members);
        assert_eq!(state1.actor.pos, state2.actor.pos);
        assert_eq!(state1.actor.score, state2.actor.score);
    }

    #[test]
    fn test_autopilot_scores() {
        let mut state = GameState::new(2024, Tuning::default());
        let input = TickInput {
            autopilot: true,
            ..Default::default()
        };
        let mut best = 0;
        for _ in 0..1200 {
            tick(&mut state, &input, SIM_DT);
            best = best.max(state.actor.score);
        }
        assert!(best >= state.tuning.pass_award);
    }
}
