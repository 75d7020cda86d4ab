//! Rig state machine
//!
//! Advances one rig by `dt`: swing oscillation, rope growth and shrink, and
//! the Swing -> Extend -> Retract -> Swing cycle.

use super::motion::swing_angle;
use super::state::{HeldObject, Rig, RigState};
use crate::settings::RigConfig;

/// What happened during one step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutcome {
    /// State change `(from, to)`, if any
    pub transition: Option<(RigState, RigState)>,
    /// Object that reached the top this step
    pub settled: Option<HeldObject>,
}

/// Begin extending if the rig is swinging
///
/// Returns false (and changes nothing) in any other state.
pub fn start_extend(rig: &mut Rig) -> bool {
    if rig.state != RigState::Swing {
        return false;
    }
    rig.state = RigState::Extend;
    true
}

/// Advance the rig by `dt` seconds
///
/// Negative or non-finite `dt` counts as zero, and a zero step changes nothing.
pub fn step(rig: &mut Rig, config: &RigConfig, dt: f32) -> StepOutcome {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    let mut outcome = StepOutcome::default();
    if dt == 0.0 {
        return outcome;
    }
    let from = rig.state;

    match rig.state {
        RigState::Swing => {
            rig.swing_clock += dt;
            rig.swing_angle = swing_angle(rig.swing_clock, config.swing_speed, config.swing_range);
        }

        RigState::Extend => {
            rig.current_length = (rig.current_length + config.extend_speed * dt)
                .clamp(rig.min_length, rig.max_length);

            let deepened = rig.hit_latched
                && rig
                    .pending_deepen_length
                    .is_some_and(|target| rig.current_length >= target);

            if deepened || rig.current_length >= rig.max_length {
                rig.state = RigState::Retract;
            }
        }

        RigState::Retract => {
            // Heavier catches come up slower; empty claw has weight 1
            let speed = config.retract_speed / rig.held_weight();
            rig.current_length = (rig.current_length - speed * dt).min(rig.max_length);

            if rig.current_length <= rig.min_length {
                rig.current_length = rig.min_length;
                rig.state = RigState::Swing;
                outcome.settled = rig.reset_cycle();
            }
        }
    }

    if rig.state != from {
        log::debug!(
            "Rig {:?} -> {:?} at length {:.1}",
            from,
            rig.state,
            rig.current_length
        );
        outcome.transition = Some((from, rig.state));
    }
    outcome
}
