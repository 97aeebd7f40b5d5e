use crate::config::ArrivalConfig;
use crate::history::DistanceHistory;
use serde::{Deserialize, Serialize};

/// Why the controller decided it has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalReason {
    /// Distance dropped below the arrival threshold.
    Proximity,
    /// Distance kept growing while near the goal: it was passed.
    Overshoot,
}

impl ArrivalReason {
    pub fn label(self) -> &'static str {
        match self {
            Self::Proximity => "proximity",
            Self::Overshoot => "overshoot",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalDetector {
    config: ArrivalConfig,
}

impl GoalDetector {
    pub fn new(config: ArrivalConfig) -> Self {
        Self { config }
    }

    /// Proximity is checked first; either trigger alone is enough.
    pub fn check(&self, distance: f64, distances: &DistanceHistory) -> Option<ArrivalReason> {
        if self.is_close(distance) {
            Some(ArrivalReason::Proximity)
        } else if self.is_overshoot(distance, distances) {
            Some(ArrivalReason::Overshoot)
        } else {
            None
        }
    }

    pub fn is_close(&self, distance: f64) -> bool {
        distance < self.config.arrival_distance
    }

    /// Last K pairwise differences all strictly increasing, inside the
    /// near-goal radius.
    pub fn is_overshoot(&self, distance: f64, distances: &DistanceHistory) -> bool {
        if distance >= self.config.near_goal_distance {
            return false;
        }
        let k = self.config.trend_length;
        if distances.len() < k + 1 {
            return false;
        }
        (0..k).all(|back| match (distances.get_back(back), distances.get_back(back + 1)) {
            (Some(newer), Some(older)) => newer > older,
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(values: &[f64]) -> DistanceHistory {
        let mut h = DistanceHistory::new(5);
        for &v in values {
            h.push(v);
        }
        h
    }

    fn detector() -> GoalDetector {
        GoalDetector::new(ArrivalConfig::default())
    }

    #[test]
    fn test_proximity_ignores_history() {
        let det = detector();
        assert_eq!(det.check(0.05, &history(&[])), Some(ArrivalReason::Proximity));
        assert_eq!(det.check(0.1, &history(&[])), None);
    }

    #[test]
    fn test_overshoot_trend() {
        let det = detector();
        let h = history(&[2.0, 2.1, 2.3, 2.6, 3.0]);
        assert_eq!(det.check(0.9, &h), Some(ArrivalReason::Overshoot));
    }

    #[test]
    fn test_overshoot_needs_near_goal() {
        let det = detector();
        let h = history(&[2.0, 2.1, 2.3, 2.6, 3.0]);
        assert_eq!(det.check(1.0, &h), None);
        assert_eq!(det.check(3.0, &h), None);
    }

    #[test]
    fn test_overshoot_needs_full_window() {
        let det = detector();
        let h = history(&[0.5, 0.6, 0.7, 0.8]);
        assert_eq!(det.check(0.8, &h), None);
    }

    #[test]
    fn test_any_flat_pair_breaks_trend() {
        let det = detector();
        for values in [
            [0.5, 0.5, 0.6, 0.7, 0.8],
            [0.5, 0.6, 0.6, 0.7, 0.8],
            [0.5, 0.6, 0.7, 0.65, 0.8],
            [0.5, 0.6, 0.7, 0.8, 0.8],
        ] {
            assert_eq!(det.check(0.8, &history(&values)), None, "{values:?}");
        }
        let h = history(&[0.5, 0.6, 0.7, 0.8, 0.9]);
        assert_eq!(det.check(0.9, &h), Some(ArrivalReason::Overshoot));
    }

    #[test]
    fn test_shorter_trend_window() {
        let det = GoalDetector::new(ArrivalConfig {
            trend_length: 2,
            ..ArrivalConfig::default()
        });
        // Only the newest two pairs matter.
        let h = history(&[0.9, 0.4, 0.3, 0.5, 0.6]);
        assert_eq!(det.check(0.6, &h), Some(ArrivalReason::Overshoot));
    }
}
