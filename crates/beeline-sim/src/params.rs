//! Tunable parameter definitions with slider/sweep bounds.

use crate::error::SimError;
use crate::mission::MissionConfig;

/// Tunable bounds and slider step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Human-readable label.
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    /// Step size for sliders.
    pub step: f64,
}

impl ParamSpec {
    pub const fn new(label: &'static str, min: f64, max: f64, step: f64) -> Self {
        Self {
            label,
            min,
            max,
            step,
        }
    }

    /// Pulls `value` into `[min, max]`; `None` for NaN or infinities.
    pub fn bound(&self, value: f64) -> Option<f64> {
        value.is_finite().then(|| value.clamp(self.min, self.max))
    }

    /// `steps` evenly spaced values from `min` to `max` inclusive.
    pub fn sweep(&self, steps: usize) -> Vec<f64> {
        match steps {
            0 => Vec::new(),
            1 => vec![self.min],
            n => (0..n)
                .map(|i| self.min + (self.max - self.min) * i as f64 / (n - 1) as f64)
                .collect(),
        }
    }
}

/// Controller tuning.
pub mod controller {
    use super::ParamSpec;

    pub const MIN_MOVEMENT: ParamSpec = ParamSpec::new("Min Movement", 0.005, 0.5, 0.005);
    pub const ARRIVAL_DISTANCE: ParamSpec = ParamSpec::new("Arrival Distance", 0.02, 1.0, 0.01);
    pub const NEAR_GOAL_DISTANCE: ParamSpec = ParamSpec::new("Near-Goal Radius", 0.1, 5.0, 0.1);
    pub const STALL_FLOOR: ParamSpec = ParamSpec::new("Stall Floor", 0.001, 0.2, 0.001);
    pub const BASE_ANGLE_THRESHOLD: ParamSpec =
        ParamSpec::new("Angle Threshold (°)", 1.0, 30.0, 0.5);
    pub const CLOSE_ANGLE_THRESHOLD: ParamSpec =
        ParamSpec::new("Close Angle Threshold (°)", 1.0, 45.0, 0.5);
    pub const BIG_TURN_ANGLE: ParamSpec = ParamSpec::new("Big Turn (°)", 5.0, 90.0, 1.0);
    pub const FORWARD_CAP: ParamSpec = ParamSpec::new("Forward Cap", 0.05, 2.0, 0.05);
    pub const TURN_GAIN: ParamSpec = ParamSpec::new("Turn Gain", 0.05, 1.0, 0.05);
}

/// Simulated agent.
pub mod agent {
    use super::ParamSpec;

    pub const START_X: ParamSpec = ParamSpec::new("Start X", -20.0, 20.0, 0.1);
    pub const START_Z: ParamSpec = ParamSpec::new("Start Z", -20.0, 20.0, 0.1);
    pub const START_HEADING: ParamSpec = ParamSpec::new("Start Heading (°)", -180.0, 180.0, 5.0);
    pub const MAX_FORWARD: ParamSpec = ParamSpec::new("Max Forward", 0.05, 2.0, 0.05);
    pub const MAX_TURN: ParamSpec = ParamSpec::new("Max Turn (°)", 5.0, 180.0, 5.0);
    pub const SLIP_STD: ParamSpec = ParamSpec::new("Slip σ", 0.0, 0.5, 0.01);
    pub const TURN_NOISE_STD: ParamSpec = ParamSpec::new("Turn Noise σ (°)", 0.0, 10.0, 0.1);
}

/// Simulated position sensor.
pub mod sensor {
    use super::ParamSpec;

    pub const POSITION_NOISE_STD: ParamSpec = ParamSpec::new("Position Noise σ", 0.0, 0.2, 0.005);
    pub const DROPOUT_PROB: ParamSpec = ParamSpec::new("Dropout Probability", 0.0, 0.9, 0.05);
}

/// Mission length.
pub mod run {
    use super::ParamSpec;

    pub const MAX_TICKS: ParamSpec = ParamSpec::new("Max Ticks", 10.0, 20000.0, 10.0);
}

/// Goal placement.
pub mod goal {
    use super::ParamSpec;

    pub const GOAL_X: ParamSpec = ParamSpec::new("Goal X", -20.0, 20.0, 0.1);
    pub const GOAL_Z: ParamSpec = ParamSpec::new("Goal Z", -20.0, 20.0, 0.1);
}

/// Every named tunable, in display order.
pub const PARAMS: [(&str, ParamSpec); 21] = [
    ("goal_x", goal::GOAL_X),
    ("goal_z", goal::GOAL_Z),
    ("min_movement", controller::MIN_MOVEMENT),
    ("arrival_distance", controller::ARRIVAL_DISTANCE),
    ("near_goal_distance", controller::NEAR_GOAL_DISTANCE),
    ("stall_floor", controller::STALL_FLOOR),
    ("base_angle_threshold", controller::BASE_ANGLE_THRESHOLD),
    ("close_angle_threshold", controller::CLOSE_ANGLE_THRESHOLD),
    ("big_turn_angle", controller::BIG_TURN_ANGLE),
    ("forward_cap", controller::FORWARD_CAP),
    ("turn_gain", controller::TURN_GAIN),
    ("start_x", agent::START_X),
    ("start_z", agent::START_Z),
    ("start_heading", agent::START_HEADING),
    ("max_forward", agent::MAX_FORWARD),
    ("max_turn", agent::MAX_TURN),
    ("slip_std", agent::SLIP_STD),
    ("turn_noise_std", agent::TURN_NOISE_STD),
    ("position_noise_std", sensor::POSITION_NOISE_STD),
    ("dropout_prob", sensor::DROPOUT_PROB),
    ("max_ticks", run::MAX_TICKS),
];

pub fn param_spec(name: &str) -> Option<ParamSpec> {
    PARAMS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, spec)| *spec)
}

/// Writes `value` into the field `name` refers to.
pub fn set_param(cfg: &mut MissionConfig, name: &str, value: f64) -> Result<(), SimError> {
    let c = &mut cfg.controller;
    match name {
        "goal_x" => c.goal.x = value,
        "goal_z" => c.goal.z = value,
        "min_movement" => c.history.min_movement = value,
        "arrival_distance" => c.arrival.arrival_distance = value,
        "near_goal_distance" => c.arrival.near_goal_distance = value,
        "stall_floor" => c.stall.movement_floor = value,
        "base_angle_threshold" => c.policy.base_angle_threshold = value,
        "close_angle_threshold" => c.policy.close_angle_threshold = value,
        "big_turn_angle" => c.policy.big_turn_angle = value,
        "forward_cap" => c.policy.forward_cap = value,
        "turn_gain" => c.policy.turn.gain = value,
        "start_x" => cfg.agent.start.x = value,
        "start_z" => cfg.agent.start.z = value,
        "start_heading" => cfg.agent.start_heading = value,
        "max_forward" => cfg.agent.max_forward = value,
        "max_turn" => cfg.agent.max_turn = value,
        "slip_std" => cfg.agent.slip_std = value,
        "turn_noise_std" => cfg.agent.turn_noise_std = value,
        "position_noise_std" => cfg.sensor.position_noise_std = value,
        "dropout_prob" => cfg.sensor.dropout_prob = value,
        "max_ticks" => cfg.max_ticks = value.max(0.0).round() as u64,
        _ => return Err(SimError::UnknownParam(name.to_string())),
    }
    Ok(())
}

pub fn get_param(cfg: &MissionConfig, name: &str) -> Option<f64> {
    let c = &cfg.controller;
    let v = match name {
        "goal_x" => c.goal.x,
        "goal_z" => c.goal.z,
        "min_movement" => c.history.min_movement,
        "arrival_distance" => c.arrival.arrival_distance,
        "near_goal_distance" => c.arrival.near_goal_distance,
        "stall_floor" => c.stall.movement_floor,
        "base_angle_threshold" => c.policy.base_angle_threshold,
        "close_angle_threshold" => c.policy.close_angle_threshold,
        "big_turn_angle" => c.policy.big_turn_angle,
        "forward_cap" => c.policy.forward_cap,
        "turn_gain" => c.policy.turn.gain,
        "start_x" => cfg.agent.start.x,
        "start_z" => cfg.agent.start.z,
        "start_heading" => cfg.agent.start_heading,
        "max_forward" => cfg.agent.max_forward,
        "max_turn" => cfg.agent.max_turn,
        "slip_std" => cfg.agent.slip_std,
        "turn_noise_std" => cfg.agent.turn_noise_std,
        "position_noise_std" => cfg.sensor.position_noise_std,
        "dropout_prob" => cfg.sensor.dropout_prob,
        "max_ticks" => cfg.max_ticks as f64,
        _ => return None,
    };
    Some(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_spec_lookup() {
        let spec = param_spec("arrival_distance").unwrap();
        assert_eq!(spec, controller::ARRIVAL_DISTANCE);
        assert!(param_spec("thrust").is_none());
    }

    #[test]
    fn test_every_param_round_trips() {
        let mut cfg = MissionConfig::default();
        for (name, spec) in PARAMS {
            assert!(spec.min < spec.max, "{name}");
            let v = (spec.min + spec.max) / 2.0;
            set_param(&mut cfg, name, v).unwrap();
            assert_eq!(get_param(&cfg, name), Some(v), "{name}");
        }
    }

    #[test]
    fn test_defaults_inside_bounds() {
        let cfg = MissionConfig::default();
        for (name, spec) in PARAMS {
            let v = get_param(&cfg, name).unwrap();
            assert!(v >= spec.min && v <= spec.max, "{name} = {v}");
        }
    }

    #[test]
    fn test_unknown_param() {
        let mut cfg = MissionConfig::default();
        assert!(matches!(
            set_param(&mut cfg, "nope", 1.0),
            Err(SimError::UnknownParam(_))
        ));
    }

    #[test]
    fn test_bound() {
        let spec = agent::MAX_TURN;
        assert_eq!(spec.bound(-5.0), Some(5.0));
        assert_eq!(spec.bound(400.0), Some(180.0));
        assert_eq!(spec.bound(30.0), Some(30.0));
        assert_eq!(spec.bound(f64::NAN), None);
        assert_eq!(run::MAX_TICKS.bound(1e12), Some(20000.0));
    }

    #[test]
    fn test_sweep_values() {
        let spec = ParamSpec::new("Test", 0.0, 1.0, 0.1);
        assert_eq!(spec.sweep(3), vec![0.0, 0.5, 1.0]);
        assert_eq!(spec.sweep(1), vec![0.0]);
        assert!(spec.sweep(0).is_empty());
    }
}
