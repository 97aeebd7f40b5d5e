//! Beeline GUI - web viewer for simulated missions
//!
//! Features:
//! - Parameter sliders built from the sim crate's `ParamSpec` table
//! - Mission runs via API, returned as plot-ready series
//! - Controller state changes and per-tick commands

use axum::{extract::Query, http::StatusCode, routing::get, Json, Router};
use beeline_core::StatusRecord;
use beeline_sim::{get_param, param_spec, run_mission, set_param, MissionConfig, MissionResult, PARAMS};
use serde::Serialize;
use std::collections::HashMap;
use tower_http::services::ServeDir;
use tracing::warn;

/// Creates the Axum router with all routes
pub fn create_router() -> Router {
    Router::new()
        .route("/api/simulate", get(handle_simulate))
        .route("/api/summary", get(handle_summary))
        .route("/api/params", get(handle_params))
        .fallback_service(ServeDir::new("crates/beeline-gui/templates"))
}

type ApiError = (StatusCode, String);

/// Mission config from query params. Tunables are clamped to their
/// `ParamSpec` range; unknown keys and unparsable or non-finite values are
/// ignored and the defaults stand in for them.
fn parse_config(params: &HashMap<String, String>) -> MissionConfig {
    let mut config = MissionConfig::default();

    for (name, raw) in params {
        let Some(spec) = param_spec(name) else {
            continue;
        };
        match raw.parse::<f64>().ok().and_then(|v| spec.bound(v)) {
            Some(v) => {
                // Names come from the table, so this cannot miss.
                let _ = set_param(&mut config, name, v);
            }
            None => warn!(name = name.as_str(), raw = raw.as_str(), "ignoring bad query value"),
        }
    }

    macro_rules! parse_param {
        ($($field:ident).+, $name:expr, $type:ty) => {
            if let Some(val) = params.get($name).and_then(|v| v.parse::<$type>().ok()) {
                config.$($field).+ = val;
            }
        };
    }

    parse_param!(tick_period_ms, "tick_period_ms", u64);
    parse_param!(agent.seed, "seed", u64);
    parse_param!(sensor.seed, "sensor_seed", u64);

    if let (Some(start), Some(end)) = (
        params.get("blocked_start").and_then(|v| v.parse::<u64>().ok()),
        params.get("blocked_end").and_then(|v| v.parse::<u64>().ok()),
    ) {
        config.agent.blocked_ticks = Some((start, end));
    }

    config
}

/// Handle simulation request
async fn handle_simulate(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SimulationResponse>, ApiError> {
    let config = parse_config(&params);
    run_full_simulation(&config)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, e))
}

async fn handle_summary(
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let config = parse_config(&params);
    run_mission(&config)
        .map(|r| Json(SummaryResponse::from(&r)))
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))
}

async fn handle_params() -> Json<Vec<ParamInfo>> {
    Json(param_table())
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SimulationResponse {
    summary: SummaryResponse,
    goal: [f64; 2],
    truth: TrajectorySeries,
    measured: MeasuredSeries,
    state_changes: Vec<StateChange>,
    success: bool,
}

#[derive(Serialize)]
struct SummaryResponse {
    outcome: &'static str,
    arrived: bool,
    ticks: usize,
    rejected_samples: u64,
    final_error: f64,
    path_length: f64,
}

impl From<&MissionResult> for SummaryResponse {
    fn from(r: &MissionResult) -> Self {
        Self {
            outcome: r.outcome.label(),
            arrived: r.outcome.arrived(),
            ticks: r.records.len(),
            rejected_samples: r.rejected_samples,
            final_error: r.final_error,
            path_length: r.path_length,
        }
    }
}

#[derive(Serialize)]
struct TrajectorySeries {
    time: Vec<f64>,
    x: Vec<f64>,
    z: Vec<f64>,
    heading: Vec<f64>,
}

/// What the controller saw and decided, one entry per accepted tick.
#[derive(Serialize)]
struct MeasuredSeries {
    tick: Vec<u64>,
    x: Vec<f64>,
    z: Vec<f64>,
    distance: Vec<f64>,
    heading: Vec<Option<f64>>,
    angle_to_turn: Vec<Option<f64>>,
    command: Vec<&'static str>,
    value: Vec<Option<f64>>,
}

#[derive(Serialize)]
struct StateChange {
    tick: u64,
    time: f64,
    state: &'static str,
}

#[derive(Serialize)]
struct ParamInfo {
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    step: f64,
    default: f64,
}

fn param_table() -> Vec<ParamInfo> {
    let defaults = MissionConfig::default();
    PARAMS
        .iter()
        .map(|&(name, spec)| ParamInfo {
            name,
            label: spec.label,
            min: spec.min,
            max: spec.max,
            step: spec.step,
            default: get_param(&defaults, name).unwrap_or(spec.min),
        })
        .collect()
}

/// Run a mission and reshape it into plot series
fn run_full_simulation(config: &MissionConfig) -> Result<SimulationResponse, String> {
    let result = run_mission(config).map_err(|e| e.to_string())?;
    let dt = config.tick_period_ms as f64 / 1000.0;

    let truth = TrajectorySeries {
        time: result.trajectory.iter().map(|p| p.time_s).collect(),
        x: result.trajectory.iter().map(|p| p.x).collect(),
        z: result.trajectory.iter().map(|p| p.z).collect(),
        heading: result.trajectory.iter().map(|p| p.heading).collect(),
    };

    let records = &result.records;
    let measured = MeasuredSeries {
        tick: records.iter().map(|r| r.tick).collect(),
        x: records.iter().map(|r| r.position.x).collect(),
        z: records.iter().map(|r| r.position.z).collect(),
        distance: records.iter().map(|r| r.distance).collect(),
        heading: records.iter().map(|r| r.heading).collect(),
        angle_to_turn: records.iter().map(|r| r.angle_to_turn).collect(),
        command: records.iter().map(|r| r.command.label()).collect(),
        value: records.iter().map(|r| r.command.magnitude()).collect(),
    };

    let goal = config.controller.goal;
    Ok(SimulationResponse {
        summary: SummaryResponse::from(&result),
        goal: [goal.x, goal.z],
        truth,
        measured,
        state_changes: generate_state_changes(records, dt),
        success: result.outcome.arrived(),
    })
}

fn generate_state_changes(records: &[StatusRecord], dt: f64) -> Vec<StateChange> {
    let mut changes: Vec<StateChange> = Vec::new();
    for r in records {
        if changes.last().map_or(true, |c| c.state != r.state.label()) {
            changes.push(StateChange {
                tick: r.tick,
                time: r.tick as f64 * dt,
                state: r.state.label(),
            });
        }
    }
    changes
}
