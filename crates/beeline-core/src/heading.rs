use crate::geometry::normalize_angle;
use crate::history::PositionHistory;

/// Infers direction of travel from the position history, measured from the
/// oldest to the newest sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingEstimator {
    min_movement: f64,
}

impl HeadingEstimator {
    pub fn new(min_movement: f64) -> Self {
        Self { min_movement }
    }

    /// Heading in degrees, or `None` when the history holds fewer than two
    /// samples or the agent has not moved at least `min_movement`.
    pub fn estimate(&self, history: &PositionHistory) -> Option<f64> {
        if history.len() < 2 {
            return None;
        }
        let start = history.first()?;
        let end = history.last()?;

        let dx = end.x - start.x;
        let dz = end.z - start.z;
        if (dx * dx + dz * dz).sqrt() < self.min_movement {
            return None;
        }

        Some(normalize_angle(dz.atan2(dx).to_degrees()))
    }
}
