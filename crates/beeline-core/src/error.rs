//! Error types for the controller crate.

use thiserror::Error;

/// Errors returned by a control loop tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ControlError {
    /// A coordinate was NaN or infinite; the sample was discarded.
    #[error("non-finite position sample: ({x}, {y}, {z})")]
    NonFiniteSample { x: f64, y: f64, z: f64 },

    /// The goal was already reached; the loop issues no further commands.
    #[error("controller already arrived at tick {tick}")]
    Terminated { tick: u64 },
}

/// Invalid controller configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} capacity must be at least {min}, got {value}")]
    CapacityTooSmall {
        field: &'static str,
        min: usize,
        value: usize,
    },

    #[error("{field}: min {min} exceeds max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("trend length {trend_length} needs {needed} distance samples, history holds {capacity}")]
    TrendExceedsHistory {
        trend_length: usize,
        needed: usize,
        capacity: usize,
    },

    #[error("goal has non-finite coordinates")]
    NonFiniteGoal,
}
