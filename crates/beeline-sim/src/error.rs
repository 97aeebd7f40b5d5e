//! Error types for the simulation crate.

use beeline_core::{ConfigError, ControlError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid controller configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("controller error: {0}")]
    Control(#[from] ControlError),

    #[error("invalid noise model: {0}")]
    Noise(#[from] rand_distr::NormalError),

    #[error("{field} must be a probability in [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f64 },

    #[error("{field} must be finite and positive, got {value}")]
    InvalidLimit { field: &'static str, value: f64 },

    #[error("invalid mission config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown parameter: {0}")]
    UnknownParam(String),
}
