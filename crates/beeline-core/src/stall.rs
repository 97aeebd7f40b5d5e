use crate::config::StallConfig;
use crate::history::DistanceHistory;

/// Counts consecutive ticks in which distance-to-goal barely changed.
#[derive(Debug, Clone)]
pub struct StallDetector {
    config: StallConfig,
    counter: u32,
}

impl StallDetector {
    pub fn new(config: StallConfig) -> Self {
        Self { config, counter: 0 }
    }

    /// Updates the counter from the two newest distances and returns `true`
    /// once the configured count of still ticks has been reached.
    ///
    /// With fewer than two samples the counter is left alone.
    pub fn update(&mut self, distances: &DistanceHistory) -> bool {
        let (Some(newest), Some(previous)) = (distances.get_back(0), distances.get_back(1)) else {
            return false;
        };

        if (newest - previous).abs() < self.config.movement_floor {
            self.counter += 1;
        } else {
            self.counter = 0;
        }

        self.is_stuck()
    }

    pub fn is_stuck(&self) -> bool {
        self.counter >= self.config.count
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
