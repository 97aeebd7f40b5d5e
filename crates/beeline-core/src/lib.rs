//! # Beeline Core
//!
//! Goal-seeking motion controller for an agent that only knows where it is,
//! not which way it is facing. Every tick the controller takes one position
//! sample, infers heading from recent displacement, and emits one discrete
//! motion command until the goal is reached.
//!
//! This crate contains only the controller:
//! - Fixed-capacity position/distance histories
//! - Heading estimation and goal geometry
//! - Stall and arrival detection
//! - Turn/advance decision policy
//! - The control loop state machine
//!
//! Sensors, actuators and the tick source live outside; see the
//! [`io`] traits for the seams.

pub mod arrival;
pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod heading;
pub mod history;
pub mod io;
pub mod policy;
pub mod stall;
pub mod status;

// Re-export core types
pub use arrival::{ArrivalReason, GoalDetector};
pub use command::Command;
pub use config::{
    ArrivalConfig, ControllerConfig, HistoryConfig, PolicyConfig, RecoveryConfig, StallConfig,
    TurnGains,
};
pub use controller::{ControlLoop, ControllerState};
pub use error::{ConfigError, ControlError};
pub use geometry::{normalize_angle, planar_distance, GoalGeometry};
pub use heading::HeadingEstimator;
pub use history::{DistanceHistory, History, PositionHistory};
pub use io::{MotionSink, PositionSource};
pub use policy::DecisionPolicy;
pub use stall::StallDetector;
pub use status::StatusRecord;

/// Sampled position (x, y, z). `y` is vertical and ignored for planar math.
pub type Position = nalgebra::Vector3<f64>;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
