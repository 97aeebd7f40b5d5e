use crate::agent::{AgentParams, SimulatedAgent};
use crate::error::SimError;
use crate::sensor::{SensorConfig, SimulatedGps};
use beeline_core::{
    planar_distance, ArrivalReason, ControlError, ControlLoop, ControllerConfig, StatusRecord,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub controller: ControllerConfig,
    pub agent: AgentParams,
    pub sensor: SensorConfig,
    pub max_ticks: u64,
    pub tick_period_ms: u64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            agent: AgentParams::default(),
            sensor: SensorConfig::default(),
            max_ticks: 2000,
            tick_period_ms: 32,
        }
    }
}

impl MissionConfig {
    /// Parses a (possibly partial) JSON config; missing fields keep defaults.
    pub fn from_json(text: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MissionOutcome {
    Arrived { reason: ArrivalReason, tick: u64 },
    TimedOut { ticks: u64 },
}

impl MissionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Arrived { reason, .. } => reason.label(),
            Self::TimedOut { .. } => "timed_out",
        }
    }

    pub fn arrived(&self) -> bool {
        matches!(self, Self::Arrived { .. })
    }
}

/// True agent pose after each tick (tick 0 is the start pose).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TrajectoryPoint {
    pub tick: u64,
    pub time_s: f64,
    pub x: f64,
    pub z: f64,
    pub heading: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MissionResult {
    pub records: Vec<StatusRecord>,
    pub trajectory: Vec<TrajectoryPoint>,
    pub outcome: MissionOutcome,
    pub rejected_samples: u64,
    /// Planar distance from the true final position to the goal.
    pub final_error: f64,
    /// Distance the agent actually travelled.
    pub path_length: f64,
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Runs the controller against a simulated agent and sensor until it
/// declares arrival or `max_ticks` elapse.
///
/// A rejected sample skips the tick: no command reaches the agent.
pub fn run_mission(cfg: &MissionConfig) -> Result<MissionResult, SimError> {
    let mut ctl = ControlLoop::new(cfg.controller)?;
    let mut agent = SimulatedAgent::new(cfg.agent.clone())?;
    let mut gps = SimulatedGps::new(&cfg.sensor)?;
    let dt = cfg.tick_period_ms as f64 / 1000.0;

    let mut records = Vec::new();
    let mut trajectory = Vec::with_capacity(cfg.max_ticks.min(4096) as usize + 1);
    let point = |agent: &SimulatedAgent, tick: u64| {
        let s = agent.state();
        TrajectoryPoint {
            tick,
            time_s: tick as f64 * dt,
            x: s.position.x,
            z: s.position.z,
            heading: s.heading,
        }
    };
    trajectory.push(point(&agent, 0));

    let mut outcome = MissionOutcome::TimedOut {
        ticks: cfg.max_ticks,
    };

    for tick in 0..cfg.max_ticks {
        let truth = agent.position();
        match ctl.tick(&mut gps.reading(truth), &mut agent) {
            Ok(record) => {
                records.push(record);
                if let Some(reason) = record.arrival {
                    outcome = MissionOutcome::Arrived { reason, tick };
                    break;
                }
            }
            Err(ControlError::NonFiniteSample { .. }) => {
                debug!(tick, "sensor dropout, tick skipped");
            }
            Err(e) => return Err(e.into()),
        }
        agent.advance_clock();
        trajectory.push(point(&agent, tick + 1));
    }

    let final_error = planar_distance(&agent.position(), &cfg.controller.goal);
    info!(
        outcome = outcome.label(),
        ticks = ctl.ticks(),
        rejected = ctl.rejected_samples(),
        final_error,
        "mission complete"
    );

    Ok(MissionResult {
        records,
        trajectory,
        outcome,
        rejected_samples: ctl.rejected_samples(),
        final_error,
        path_length: agent.odometer(),
    })
}
