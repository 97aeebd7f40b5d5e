//! Beeline Simulation Library
//!
//! Stands in for the controller's external collaborators: a kinematic agent
//! that executes motion commands, a noisy position sensor, and a tick driver
//! that runs whole missions.

pub mod agent;
pub mod error;
pub mod mission;
pub mod params;
pub mod sensor;

// Re-export main types
pub use agent::{AgentParams, AgentState, SimulatedAgent};
pub use error::SimError;
pub use mission::{run_mission, MissionConfig, MissionOutcome, MissionResult, TrajectoryPoint};
pub use params::{get_param, param_spec, set_param, ParamSpec, PARAMS};
pub use sensor::{GpsReading, SensorConfig, SimulatedGps};
