use crate::error::SimError;
use beeline_core::{normalize_angle, Command, MotionSink, Position};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentParams {
    pub start: Position,
    pub start_heading: f64, // deg, atan2(z, x) convention

    // Actuator limits (commands above these are clamped)
    pub max_forward: f64, // distance per tick
    pub max_turn: f64,    // deg per tick

    // Execution noise
    pub slip_std: f64,       // proportional error on forward moves
    pub turn_noise_std: f64, // deg

    /// Ticks `[start, end)` during which forward moves do nothing.
    pub blocked_ticks: Option<(u64, u64)>,

    pub seed: u64,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            start: Position::zeros(),
            start_heading: 0.0,
            max_forward: 0.5,
            max_turn: 45.0,
            slip_std: 0.0,
            turn_noise_std: 0.0,
            blocked_ticks: None,
            seed: 7,
        }
    }
}

/// Ground truth pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentState {
    pub position: Position,
    pub heading: f64,
}

// ---------------------------------------------------------------------------
// Kinematic agent
// ---------------------------------------------------------------------------

/// Turn-in-place agent on the x–z plane. Left turns increase the heading.
pub struct SimulatedAgent {
    params: AgentParams,
    state: AgentState,
    clock: u64,
    odometer: f64,
    rng: StdRng,
    slip: Normal<f64>,
    turn_noise: Normal<f64>,
}

impl SimulatedAgent {
    pub fn new(params: AgentParams) -> Result<Self, SimError> {
        for (field, value) in [
            ("max_forward", params.max_forward),
            ("max_turn", params.max_turn),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SimError::InvalidLimit { field, value });
            }
        }
        let slip = Normal::new(0.0, params.slip_std)?;
        let turn_noise = Normal::new(0.0, params.turn_noise_std)?;
        Ok(Self {
            state: AgentState {
                position: params.start,
                heading: normalize_angle(params.start_heading),
            },
            clock: 0,
            odometer: 0.0,
            rng: StdRng::seed_from_u64(params.seed),
            slip,
            turn_noise,
            params,
        })
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    /// Total distance actually travelled.
    pub fn odometer(&self) -> f64 {
        self.odometer
    }

    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Moves the agent clock to the next tick.
    pub fn advance_clock(&mut self) {
        self.clock += 1;
    }

    fn is_blocked(&self) -> bool {
        self.params
            .blocked_ticks
            .is_some_and(|(start, end)| (start..end).contains(&self.clock))
    }

    fn forward(&mut self, distance: f64) {
        if self.is_blocked() {
            return;
        }
        let commanded = distance.min(self.params.max_forward);
        let actual = (commanded * (1.0 + self.slip.sample(&mut self.rng))).max(0.0);
        let h = self.state.heading.to_radians();
        self.state.position += Vector3::new(actual * h.cos(), 0.0, actual * h.sin());
        self.odometer += actual;
    }

    fn turn(&mut self, degrees: f64) {
        let commanded = degrees.clamp(-self.params.max_turn, self.params.max_turn);
        let actual = commanded + self.turn_noise.sample(&mut self.rng);
        self.state.heading = normalize_angle(self.state.heading + actual);
    }
}

impl MotionSink for SimulatedAgent {
    fn apply(&mut self, command: Command) {
        match command {
            Command::Forward(d) => self.forward(d),
            Command::TurnLeft(deg) => self.turn(deg),
            Command::TurnRight(deg) => self.turn(-deg),
            Command::Stop => {}
        }
    }
}
