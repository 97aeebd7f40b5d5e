use serde::{Deserialize, Serialize};

/// Discrete motion request sent to the actuator, one per tick.
///
/// Magnitudes are advisory: the actuator may clamp them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Command {
    /// Advance along the current heading (distance units).
    Forward(f64),
    /// Rotate counter-clockwise in the x–z plane (degrees).
    TurnLeft(f64),
    /// Rotate clockwise in the x–z plane (degrees).
    TurnRight(f64),
    Stop,
}

impl Command {
    pub fn label(self) -> &'static str {
        match self {
            Self::Forward(_) => "forward",
            Self::TurnLeft(_) => "turn_left",
            Self::TurnRight(_) => "turn_right",
            Self::Stop => "stop",
        }
    }

    /// Distance or angle carried by the command; `Stop` has none.
    pub fn magnitude(self) -> Option<f64> {
        match self {
            Self::Forward(v) | Self::TurnLeft(v) | Self::TurnRight(v) => Some(v),
            Self::Stop => None,
        }
    }

    /// Turn toward the side given by the sign of `angle_to_turn` (positive = left).
    pub fn turn_toward(angle_to_turn: f64, degrees: f64) -> Self {
        if angle_to_turn > 0.0 {
            Self::TurnLeft(degrees)
        } else {
            Self::TurnRight(degrees)
        }
    }

    /// Every magnitude must be finite and strictly positive.
    pub fn is_well_formed(self) -> bool {
        self.magnitude().map_or(true, |v| v.is_finite() && v > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_toward_sign() {
        assert_eq!(Command::turn_toward(150.0, 30.0), Command::TurnLeft(30.0));
        assert_eq!(Command::turn_toward(-10.0, 4.0), Command::TurnRight(4.0));
    }

    #[test]
    fn test_well_formed() {
        assert!(Command::Forward(0.1).is_well_formed());
        assert!(Command::Stop.is_well_formed());
        assert!(!Command::TurnLeft(0.0).is_well_formed());
        assert!(!Command::Forward(f64::NAN).is_well_formed());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_string(&Command::TurnRight(12.5)).unwrap();
        assert_eq!(json, r#"{"kind":"turn_right","value":12.5}"#);
        let stop: Command = serde_json::from_str(r#"{"kind":"stop"}"#).unwrap();
        assert_eq!(stop, Command::Stop);
    }
}
