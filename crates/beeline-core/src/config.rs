// ---------------------------------------------------------------------------
// Controller configuration
// ---------------------------------------------------------------------------
//
// Every section derives serde with `#[serde(default)]`, so a JSON file only
// needs the fields it wants to override.

use crate::error::ConfigError;
use crate::Position;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Position samples kept for heading estimation (N).
    pub positions: usize,
    /// Distance samples kept for stall and overshoot detection (M).
    pub distances: usize,
    /// Displacement across the position history below which heading is unknown.
    pub min_movement: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            positions: 5,
            distances: 5,
            min_movement: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrivalConfig {
    pub arrival_distance: f64,
    /// Overshoot is only declared inside this radius.
    pub near_goal_distance: f64,
    /// Consecutive increasing distance pairs that count as overshoot (K).
    pub trend_length: usize,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            arrival_distance: 0.1,
            near_goal_distance: 1.0,
            trend_length: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StallConfig {
    /// Distance change per tick below which the agent counts as not moving.
    pub movement_floor: f64,
    /// Consecutive still ticks before declaring a stall.
    pub count: u32,
}

impl Default for StallConfig {
    fn default() -> Self {
        Self {
            movement_floor: 0.03,
            count: 5,
        }
    }
}

/// Proportional turn gain with its clamp range (degrees).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnGains {
    pub gain: f64,
    pub min: f64,
    pub max: f64,
}

impl TurnGains {
    pub fn turn_for(&self, angle_to_turn: f64) -> f64 {
        (angle_to_turn.abs() * self.gain).clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Above this |angle| the goal is behind: fixed big turn.
    pub big_turn_threshold: f64,
    pub big_turn_angle: f64,
    /// Alignment tolerance far from the goal.
    pub base_angle_threshold: f64,
    /// Alignment tolerance approached as distance goes to zero.
    pub close_angle_threshold: f64,
    /// Distance below which the alignment tolerance starts widening.
    pub close_distance: f64,
    /// Distance below which forward steps and turns get finer.
    pub fine_distance: f64,
    pub forward_cap: f64,
    pub fine_forward_cap: f64,
    pub turn: TurnGains,
    pub fine_turn: TurnGains,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            big_turn_threshold: 90.0,
            big_turn_angle: 30.0,
            base_angle_threshold: 5.0,
            close_angle_threshold: 10.0,
            close_distance: 1.5,
            fine_distance: 0.5,
            forward_cap: 0.5,
            fine_forward_cap: 0.1,
            turn: TurnGains {
                gain: 0.4,
                min: 3.0,
                max: 15.0,
            },
            fine_turn: TurnGains {
                gain: 0.3,
                min: 2.0,
                max: 10.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Consecutive heading-less ticks tolerated before a larger nudge.
    pub no_heading_count: u32,
    pub no_heading_nudge: f64,
    pub no_heading_large_nudge: f64,
    /// Forward distance used to break out of a stall.
    pub stuck_nudge: f64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            no_heading_count: 3,
            no_heading_nudge: 0.1,
            no_heading_large_nudge: 0.2,
            stuck_nudge: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub goal: Position,
    pub history: HistoryConfig,
    pub arrival: ArrivalConfig,
    pub stall: StallConfig,
    pub policy: PolicyConfig,
    pub recovery: RecoveryConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            goal: Position::new(6.8, 1.18, -0.00293147),
            history: HistoryConfig::default(),
            arrival: ArrivalConfig::default(),
            stall: StallConfig::default(),
            policy: PolicyConfig::default(),
            recovery: RecoveryConfig::default(),
        }
    }
}

impl ControllerConfig {
    pub fn with_goal(goal: Position) -> Self {
        Self {
            goal,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.goal.iter().all(|c| c.is_finite()) {
            return Err(ConfigError::NonFiniteGoal);
        }

        if self.history.positions < 2 {
            return Err(ConfigError::CapacityTooSmall {
                field: "history.positions",
                min: 2,
                value: self.history.positions,
            });
        }
        if self.history.distances < 2 {
            return Err(ConfigError::CapacityTooSmall {
                field: "history.distances",
                min: 2,
                value: self.history.distances,
            });
        }
        if self.arrival.trend_length == 0 {
            return Err(ConfigError::CapacityTooSmall {
                field: "arrival.trend_length",
                min: 1,
                value: 0,
            });
        }
        let needed = self.arrival.trend_length + 1;
        if needed > self.history.distances {
            return Err(ConfigError::TrendExceedsHistory {
                trend_length: self.arrival.trend_length,
                needed,
                capacity: self.history.distances,
            });
        }

        let p = &self.policy;
        let r = &self.recovery;
        let positive = [
            ("history.min_movement", self.history.min_movement),
            ("arrival.arrival_distance", self.arrival.arrival_distance),
            ("arrival.near_goal_distance", self.arrival.near_goal_distance),
            ("stall.movement_floor", self.stall.movement_floor),
            ("policy.big_turn_threshold", p.big_turn_threshold),
            ("policy.big_turn_angle", p.big_turn_angle),
            ("policy.base_angle_threshold", p.base_angle_threshold),
            ("policy.close_angle_threshold", p.close_angle_threshold),
            ("policy.close_distance", p.close_distance),
            ("policy.fine_distance", p.fine_distance),
            ("policy.forward_cap", p.forward_cap),
            ("policy.fine_forward_cap", p.fine_forward_cap),
            ("policy.turn.gain", p.turn.gain),
            ("policy.turn.min", p.turn.min),
            ("policy.fine_turn.gain", p.fine_turn.gain),
            ("policy.fine_turn.min", p.fine_turn.min),
            ("recovery.no_heading_nudge", r.no_heading_nudge),
            ("recovery.no_heading_large_nudge", r.no_heading_large_nudge),
            ("recovery.stuck_nudge", r.stuck_nudge),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, gains) in [("policy.turn", p.turn), ("policy.fine_turn", p.fine_turn)] {
            if gains.min > gains.max {
                return Err(ConfigError::InvertedRange {
                    field,
                    min: gains.min,
                    max: gains.max,
                });
            }
        }

        if self.stall.count == 0 {
            return Err(ConfigError::CapacityTooSmall {
                field: "stall.count",
                min: 1,
                value: 0,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(ControllerConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_turn_gains_clamp() {
        let g = TurnGains {
            gain: 0.4,
            min: 3.0,
            max: 15.0,
        };
        assert_eq!(g.turn_for(2.0), 3.0);
        assert!((g.turn_for(-20.0) - 8.0).abs() < 1e-12);
        assert_eq!(g.turn_for(80.0), 15.0);
    }

    #[test]
    fn test_trend_must_fit_history() {
        let mut cfg = ControllerConfig::default();
        cfg.arrival.trend_length = 5;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::TrendExceedsHistory {
                trend_length: 5,
                needed: 6,
                capacity: 5,
            })
        );
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut cfg = ControllerConfig::default();
        cfg.policy.forward_cap = 0.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive {
                field: "policy.forward_cap",
                ..
            })
        ));

        let mut cfg = ControllerConfig::default();
        cfg.policy.fine_turn.min = 20.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvertedRange { .. })));

        let mut cfg = ControllerConfig::default();
        cfg.goal.x = f64::NAN;
        assert_eq!(cfg.validate(), Err(ConfigError::NonFiniteGoal));
    }

    #[test]
    fn test_partial_json_override() {
        let cfg: ControllerConfig =
            serde_json::from_str(r#"{"goal":[1.0,0.0,2.0],"stall":{"count":7}}"#).unwrap();
        assert_eq!(cfg.goal, Position::new(1.0, 0.0, 2.0));
        assert_eq!(cfg.stall.count, 7);
        assert_eq!(cfg.stall.movement_floor, 0.03);
        assert_eq!(cfg.policy, PolicyConfig::default());
    }
}
