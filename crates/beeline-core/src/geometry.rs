//! Planar distance, bearing and turn angle relative to the fixed goal.
//!
//! All angles are degrees, measured as `atan2(z, x)` on the x–z plane.

use crate::Position;

/// Wraps an angle into (−180, 180].
///
/// `((a + 180) mod 360) − 180` with a non-negative modulus gives [−180, 180);
/// the lower edge is then reported as +180 so the result is idempotent.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Euclidean distance ignoring the vertical (y) axis.
#[inline]
pub fn planar_distance(from: &Position, to: &Position) -> f64 {
    let dx = to.x - from.x;
    let dz = to.z - from.z;
    (dx * dx + dz * dz).sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalGeometry {
    goal: Position,
}

impl GoalGeometry {
    pub fn new(goal: Position) -> Self {
        Self { goal }
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn distance(&self, pos: &Position) -> f64 {
        planar_distance(pos, &self.goal)
    }

    /// Direction from `pos` straight to the goal.
    pub fn bearing(&self, pos: &Position) -> f64 {
        (self.goal.z - pos.z).atan2(self.goal.x - pos.x).to_degrees()
    }

    /// Signed turn needed to face the goal; positive means turn left.
    pub fn angle_to_turn(bearing: f64, heading: f64) -> f64 {
        normalize_angle(bearing - heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_range() {
        let mut a = -1080.0;
        while a <= 1080.0 {
            let n = normalize_angle(a);
            assert!(n > -180.0 && n <= 180.0, "normalize({a}) = {n}");
            a += 7.5;
        }
    }

    #[test]
    fn test_normalize_idempotent() {
        for a in [-540.0, -180.0, -179.9, -45.0, 0.0, 90.0, 180.0, 359.0, 725.5] {
            let once = normalize_angle(a);
            assert_eq!(normalize_angle(once), once);
        }
    }

    #[test]
    fn test_normalize_values() {
        assert_eq!(normalize_angle(190.0), -170.0);
        assert_eq!(normalize_angle(-190.0), 170.0);
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert_eq!(normalize_angle(360.0), 0.0);
    }

    #[test]
    fn test_distance_ignores_vertical() {
        let geo = GoalGeometry::new(Position::new(3.0, 100.0, 4.0));
        assert!((geo.distance(&Position::zeros()) - 5.0).abs() < 1e-12);
        assert_eq!(geo.distance(&Position::new(3.0, -2.0, 4.0)), 0.0);
    }

    #[test]
    fn test_bearing() {
        let geo = GoalGeometry::new(Position::new(10.0, 0.0, 0.0));
        assert!(geo.bearing(&Position::zeros()).abs() < 1e-12);

        let geo = GoalGeometry::new(Position::new(0.0, 0.0, 5.0));
        assert!((geo.bearing(&Position::zeros()) - 90.0).abs() < 1e-12);

        let geo = GoalGeometry::new(Position::new(-1.0, 0.0, 0.0));
        assert!((geo.bearing(&Position::zeros()) - 180.0).abs() < 1e-12);
    }

    #[test]
    fn test_angle_to_turn_wraps() {
        assert!((GoalGeometry::angle_to_turn(170.0, -170.0) - (-20.0)).abs() < 1e-9);
        assert!((GoalGeometry::angle_to_turn(-170.0, 170.0) - 20.0).abs() < 1e-9);
        assert!((GoalGeometry::angle_to_turn(45.0, 0.0) - 45.0).abs() < 1e-12);
    }
}
