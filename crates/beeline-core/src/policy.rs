//! Turn-or-advance heuristic.
//!
//! Three regimes, checked in order:
//! 1. Goal behind the agent (|angle| above the bypass threshold): fixed big
//!    turn, no proportional scaling.
//! 2. Roughly aligned (|angle| under the dynamic threshold): move forward,
//!    capped by the remaining distance.
//! 3. Otherwise: proportional turn, gentler near the goal.

use crate::command::Command;
use crate::config::PolicyConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    config: PolicyConfig,
}

impl DecisionPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    pub fn needs_big_turn(&self, angle_to_turn: f64) -> bool {
        angle_to_turn.abs() > self.config.big_turn_threshold
    }

    /// Alignment tolerance, widened linearly inside `close_distance`.
    pub fn angle_threshold(&self, distance: f64) -> f64 {
        let c = &self.config;
        if distance < c.close_distance {
            let t = 1.0 - distance / c.close_distance;
            c.base_angle_threshold + (c.close_angle_threshold - c.base_angle_threshold) * t
        } else {
            c.base_angle_threshold
        }
    }

    pub fn decide(&self, distance: f64, angle_to_turn: f64) -> Command {
        let c = &self.config;

        if self.needs_big_turn(angle_to_turn) {
            return Command::turn_toward(angle_to_turn, c.big_turn_angle);
        }

        let fine = distance < c.fine_distance;

        if angle_to_turn.abs() < self.angle_threshold(distance) {
            let cap = if fine { c.fine_forward_cap } else { c.forward_cap };
            return Command::Forward(distance.min(cap));
        }

        let gains = if fine { c.fine_turn } else { c.turn };
        Command::turn_toward(angle_to_turn, gains.turn_for(angle_to_turn))
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self::new(PolicyConfig::default())
    }
}
