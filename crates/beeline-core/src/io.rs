//! Seams to the outside world: where samples come from and where commands go.

use crate::command::Command;
use crate::Position;

/// Supplies one fresh position sample per tick. No noise bound is assumed.
pub trait PositionSource {
    fn read(&mut self) -> Position;
}

/// Receives at most one command per tick.
pub trait MotionSink {
    fn apply(&mut self, command: Command);
}

/// Collects every command in order; handy for tests and offline replays.
impl MotionSink for Vec<Command> {
    fn apply(&mut self, command: Command) {
        self.push(command);
    }
}
