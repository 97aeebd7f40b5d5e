use crate::error::SimError;
use beeline_core::{Position, PositionSource};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    pub noise_scale: f64,
    pub position_noise_std: f64, // per axis, distance units
    /// Chance per read that the fix is lost and a NaN sample comes back.
    pub dropout_prob: f64,
    pub seed: u64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            noise_scale: 1.0,
            position_noise_std: 0.0,
            dropout_prob: 0.0,
            seed: 42,
        }
    }
}

/// Position sensor: truth plus Gaussian noise, with optional dropouts.
pub struct SimulatedGps {
    dropout_prob: f64,
    noise: Normal<f64>,
    rng: StdRng,
    reads: u64,
    dropouts: u64,
}

impl SimulatedGps {
    pub fn new(cfg: &SensorConfig) -> Result<Self, SimError> {
        if !(0.0..=1.0).contains(&cfg.dropout_prob) {
            return Err(SimError::InvalidProbability {
                field: "dropout_prob",
                value: cfg.dropout_prob,
            });
        }
        Ok(Self {
            dropout_prob: cfg.dropout_prob,
            noise: Normal::new(0.0, cfg.noise_scale * cfg.position_noise_std)?,
            rng: StdRng::seed_from_u64(cfg.seed),
            reads: 0,
            dropouts: 0,
        })
    }

    pub fn sample(&mut self, truth: &Position) -> Position {
        self.reads += 1;
        if self.dropout_prob > 0.0 && self.rng.gen_bool(self.dropout_prob) {
            self.dropouts += 1;
            return Position::new(f64::NAN, f64::NAN, f64::NAN);
        }
        Position::new(
            truth.x + self.noise.sample(&mut self.rng),
            truth.y + self.noise.sample(&mut self.rng),
            truth.z + self.noise.sample(&mut self.rng),
        )
    }

    /// Binds the sensor to the current true position for one read.
    pub fn reading(&mut self, truth: Position) -> GpsReading<'_> {
        GpsReading { gps: self, truth }
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }

    pub fn dropouts(&self) -> u64 {
        self.dropouts
    }
}

/// One tick's view of the sensor, usable as a [`PositionSource`].
pub struct GpsReading<'a> {
    gps: &'a mut SimulatedGps,
    truth: Position,
}

impl PositionSource for GpsReading<'_> {
    fn read(&mut self) -> Position {
        self.gps.sample(&self.truth)
    }
}
