use crate::arrival::ArrivalReason;
use crate::command::Command;
use crate::controller::ControllerState;
use crate::Position;
use serde::Serialize;

/// What the controller saw and did on one tick.
///
/// Fields that the active branch never computed are `None` (for example the
/// bearing on a stall-escape tick).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusRecord {
    pub tick: u64,
    pub state: ControllerState,
    pub position: Position,
    pub distance: f64,
    pub heading: Option<f64>,
    pub bearing: Option<f64>,
    pub angle_to_turn: Option<f64>,
    pub angle_threshold: Option<f64>,
    pub command: Command,
    pub arrival: Option<ArrivalReason>,
}

impl StatusRecord {
    /// True on the tick that reached the goal; nothing follows it.
    pub fn is_terminal(&self) -> bool {
        self.state == ControllerState::Arrived
    }
}
