use crate::arrival::{ArrivalReason, GoalDetector};
use crate::command::Command;
use crate::config::ControllerConfig;
use crate::error::{ConfigError, ControlError};
use crate::geometry::GoalGeometry;
use crate::heading::HeadingEstimator;
use crate::history::{DistanceHistory, PositionHistory};
use crate::io::{MotionSink, PositionSource};
use crate::policy::DecisionPolicy;
use crate::stall::StallDetector;
use crate::status::StatusRecord;
use crate::Position;
use serde::Serialize;
use tracing::{debug, info, warn};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ControllerState {
    Seeking = 0,
    NoHeadingRecovery = 1, // Nudging forward to build displacement
    StuckRecovery = 2,     // Single-tick escape, back to Seeking next tick
    Arrived = 3,           // Terminal
}

impl ControllerState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Seeking => "Seeking",
            Self::NoHeadingRecovery => "NoHeadingRecovery",
            Self::StuckRecovery => "StuckRecovery",
            Self::Arrived => "Arrived",
        }
    }
}

// ---------------------------------------------------------------------------
// Control Loop
// ---------------------------------------------------------------------------

/// Per-tick goal seeking state machine.
///
/// Call [`ControlLoop::step`] with each new position sample (or
/// [`ControlLoop::tick`] to read and emit through the I/O traits). Each call
/// returns the command for that tick inside a [`StatusRecord`].
pub struct ControlLoop {
    config: ControllerConfig,
    geometry: GoalGeometry,
    heading: HeadingEstimator,
    stall: StallDetector,
    arrival: GoalDetector,
    policy: DecisionPolicy,

    positions: PositionHistory,
    distances: DistanceHistory,

    state: ControllerState,
    no_heading_counter: u32,

    /// Ticks seen so far, rejected samples included.
    ticks: u64,
    rejected_samples: u64,
    arrived_at: Option<u64>,
}

impl Default for ControlLoop {
    fn default() -> Self {
        Self::build(ControllerConfig::default())
    }
}

impl ControlLoop {
    pub fn new(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ControllerConfig) -> Self {
        Self {
            geometry: GoalGeometry::new(config.goal),
            heading: HeadingEstimator::new(config.history.min_movement),
            stall: StallDetector::new(config.stall),
            arrival: GoalDetector::new(config.arrival),
            policy: DecisionPolicy::new(config.policy),
            positions: PositionHistory::new(config.history.positions),
            distances: DistanceHistory::new(config.history.distances),
            state: ControllerState::Seeking,
            no_heading_counter: 0,
            ticks: 0,
            rejected_samples: 0,
            arrived_at: None,
            config,
        }
    }

    /// Reads one sample, decides, and hands the command to `sink`.
    ///
    /// On error nothing is sent to the sink.
    pub fn tick<S, M>(&mut self, source: &mut S, sink: &mut M) -> Result<StatusRecord, ControlError>
    where
        S: PositionSource + ?Sized,
        M: MotionSink + ?Sized,
    {
        let sample = source.read();
        let record = self.step(sample)?;
        sink.apply(record.command);
        Ok(record)
    }

    pub fn step(&mut self, position: Position) -> Result<StatusRecord, ControlError> {
        if let Some(tick) = self.arrived_at {
            return Err(ControlError::Terminated { tick });
        }

        let tick = self.ticks;
        self.ticks += 1;

        if !position.iter().all(|c| c.is_finite()) {
            self.rejected_samples += 1;
            warn!(tick, "rejecting non-finite position sample");
            return Err(ControlError::NonFiniteSample {
                x: position.x,
                y: position.y,
                z: position.z,
            });
        }

        self.positions.push(position);
        let distance = self.geometry.distance(&position);
        self.distances.push(distance);

        let mut record = StatusRecord {
            tick,
            state: ControllerState::Seeking,
            position,
            distance,
            heading: None,
            bearing: None,
            angle_to_turn: None,
            angle_threshold: None,
            command: Command::Stop,
            arrival: None,
        };

        // Arrival: proximity or overshoot
        if let Some(reason) = self.arrival.check(distance, &self.distances) {
            self.arrived_at = Some(tick);
            record.arrival = Some(reason);
            match reason {
                ArrivalReason::Proximity => info!(tick, distance, "goal reached"),
                ArrivalReason::Overshoot => {
                    info!(tick, distance, "goal passed, distance increasing")
                }
            }
            return Ok(self.finish(record, ControllerState::Arrived, Command::Stop));
        }

        // Stall: single-tick escape
        if self.stall.update(&self.distances) {
            self.stall.reset();
            warn!(tick, distance, "no progress, forcing a larger move");
            let nudge = Command::Forward(self.config.recovery.stuck_nudge);
            return Ok(self.finish(record, ControllerState::StuckRecovery, nudge));
        }

        let Some(heading) = self.heading.estimate(&self.positions) else {
            let recovery = &self.config.recovery;
            self.no_heading_counter += 1;
            let nudge = if self.no_heading_counter > recovery.no_heading_count {
                warn!(tick, "repeated heading failures, larger move");
                self.no_heading_counter = 0;
                recovery.no_heading_large_nudge
            } else {
                debug!(tick, "no heading yet, nudging forward");
                recovery.no_heading_nudge
            };
            return Ok(self.finish(
                record,
                ControllerState::NoHeadingRecovery,
                Command::Forward(nudge),
            ));
        };
        self.no_heading_counter = 0;

        let bearing = self.geometry.bearing(&position);
        let angle_to_turn = GoalGeometry::angle_to_turn(bearing, heading);
        record.heading = Some(heading);
        record.bearing = Some(bearing);
        record.angle_to_turn = Some(angle_to_turn);
        record.angle_threshold = Some(self.policy.angle_threshold(distance));

        let command = self.policy.decide(distance, angle_to_turn);
        Ok(self.finish(record, ControllerState::Seeking, command))
    }

    fn finish(
        &mut self,
        mut record: StatusRecord,
        state: ControllerState,
        command: Command,
    ) -> StatusRecord {
        self.state = state;
        record.state = state;
        record.command = command;
        debug!(
            tick = record.tick,
            state = state.label(),
            distance = record.distance,
            heading = ?record.heading,
            angle_to_turn = ?record.angle_to_turn,
            command = ?command,
            "control tick"
        );
        record
    }

    /// State active on the most recent accepted tick.
    pub fn current_state(&self) -> ControllerState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.arrived_at.is_some()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn positions(&self) -> &PositionHistory {
        &self.positions
    }

    pub fn distances(&self) -> &DistanceHistory {
        &self.distances
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn rejected_samples(&self) -> u64 {
        self.rejected_samples
    }

    pub fn stall_counter(&self) -> u32 {
        self.stall.counter()
    }

    pub fn no_heading_counter(&self) -> u32 {
        self.no_heading_counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, z: f64) -> Position {
        Position::new(x, 0.0, z)
    }

    fn controller(goal: Position) -> ControlLoop {
        ControlLoop::new(ControllerConfig::with_goal(goal)).unwrap()
    }

    #[test]
    fn test_straight_line_forward() {
        let mut ctl = controller(p(10.0, 0.0));

        let first = ctl.step(p(0.0, 0.0)).unwrap();
        assert_eq!(first.state, ControllerState::NoHeadingRecovery);
        assert_eq!(first.command, Command::Forward(0.1));

        ctl.step(p(1.0, 0.0)).unwrap();
        let rec = ctl.step(p(2.0, 0.0)).unwrap();
        assert_eq!(rec.state, ControllerState::Seeking);
        assert!(rec.heading.unwrap().abs() < 1e-12);
        assert!(rec.bearing.unwrap().abs() < 1e-12);
        assert!(rec.angle_to_turn.unwrap().abs() < 1e-12);
        assert_eq!(rec.command, Command::Forward(0.5));
        assert_eq!(rec.distance, 8.0);
    }

    #[test]
    fn test_goal_behind_big_turn() {
        let bearing = 150.0_f64.to_radians();
        let goal = p(1.0 + 10.0 * bearing.cos(), 10.0 * bearing.sin());
        let mut ctl = controller(goal);

        ctl.step(p(0.0, 0.0)).unwrap();
        let rec = ctl.step(p(1.0, 0.0)).unwrap();
        assert!((rec.angle_to_turn.unwrap() - 150.0).abs() < 1e-9);
        assert_eq!(rec.command, Command::TurnLeft(30.0));
    }

    #[test]
    fn test_stationary_agent_recovery_sequence() {
        let mut ctl = controller(p(5.0, 0.0));
        let commands: Vec<(ControllerState, Command)> = (0..7)
            .map(|_| {
                let r = ctl.step(p(0.0, 0.0)).unwrap();
                assert_eq!(ctl.current_state(), r.state);
                (r.state, r.command)
            })
            .collect();

        use ControllerState::*;
        assert_eq!(
            commands,
            vec![
                (NoHeadingRecovery, Command::Forward(0.1)),
                (NoHeadingRecovery, Command::Forward(0.1)),
                (NoHeadingRecovery, Command::Forward(0.1)),
                (NoHeadingRecovery, Command::Forward(0.2)),
                (NoHeadingRecovery, Command::Forward(0.1)),
                (StuckRecovery, Command::Forward(0.2)),
                (NoHeadingRecovery, Command::Forward(0.1)),
            ]
        );
        assert_eq!(ctl.stall_counter(), 1);
    }

    #[test]
    fn test_circling_triggers_stall_escape() {
        // Orbiting the goal: heading is known but distance never changes.
        let mut ctl = controller(p(0.0, 0.0));
        let mut states = Vec::new();
        for i in 0..7 {
            let a = i as f64 * 0.2;
            let rec = ctl.step(p(3.0 * a.cos(), 3.0 * a.sin())).unwrap();
            states.push(rec.state);
            if i == 5 {
                assert_eq!(rec.command, Command::Forward(0.2));
                assert_eq!(rec.heading, None);
            }
        }
        assert_eq!(states[0], ControllerState::NoHeadingRecovery);
        assert!(states[1..5].iter().all(|s| *s == ControllerState::Seeking));
        assert_eq!(states[5], ControllerState::StuckRecovery);
        assert_eq!(states[6], ControllerState::Seeking);
    }

    #[test]
    fn test_overshoot_terminates() {
        let mut ctl = controller(p(0.0, 0.0));
        let xs = [0.3, 0.45, 0.6, 0.75, 0.9];
        for &x in &xs[..4] {
            let rec = ctl.step(p(x, 0.2)).unwrap();
            assert!(!rec.is_terminal());
        }
        let rec = ctl.step(p(0.9, 0.2)).unwrap();
        assert!(rec.is_terminal());
        assert_eq!(rec.arrival, Some(ArrivalReason::Overshoot));
        assert_eq!(rec.command, Command::Stop);
        assert!(rec.distance > 0.1);

        assert_eq!(
            ctl.step(p(1.0, 0.2)),
            Err(ControlError::Terminated { tick: 4 })
        );
    }

    #[test]
    fn test_proximity_on_first_sample() {
        let mut ctl = controller(p(1.0, 1.0));
        let rec = ctl.step(Position::new(1.05, 7.0, 1.0)).unwrap();
        assert_eq!(rec.state, ControllerState::Arrived);
        assert_eq!(rec.arrival, Some(ArrivalReason::Proximity));
        assert!(ctl.is_finished());
        assert_eq!(ctl.current_state(), ControllerState::Arrived);
        assert!(matches!(
            ctl.step(p(1.0, 1.0)),
            Err(ControlError::Terminated { tick: 0 })
        ));
    }

    #[test]
    fn test_non_finite_sample_is_held() {
        let mut ctl = controller(p(10.0, 0.0));
        ctl.step(p(0.0, 0.0)).unwrap();
        let counter = ctl.no_heading_counter();

        let err = ctl.step(Position::new(f64::NAN, 0.0, 0.0)).unwrap_err();
        assert!(matches!(err, ControlError::NonFiniteSample { .. }));
        assert_eq!(ctl.positions().len(), 1);
        assert_eq!(ctl.distances().len(), 1);
        assert_eq!(ctl.no_heading_counter(), counter);
        assert_eq!(ctl.rejected_samples(), 1);

        let rec = ctl.step(p(1.0, 0.0)).unwrap();
        assert_eq!(rec.tick, 2);
        assert_eq!(rec.state, ControllerState::Seeking);
        assert!(ctl.step(Position::new(0.0, f64::INFINITY, 0.0)).is_err());
    }

    struct Replay {
        samples: Vec<Position>,
        next: usize,
    }

    impl PositionSource for Replay {
        fn read(&mut self) -> Position {
            let s = self.samples[self.next.min(self.samples.len() - 1)];
            self.next += 1;
            s
        }
    }

    #[test]
    fn test_tick_routes_commands_to_sink() {
        let mut ctl = controller(p(10.0, 0.0));
        let mut source = Replay {
            samples: vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(9.95, 0.0)],
            next: 0,
        };
        let mut sink: Vec<Command> = Vec::new();
        for _ in 0..4 {
            ctl.tick(&mut source, &mut sink).unwrap();
        }
        assert_eq!(
            sink,
            vec![
                Command::Forward(0.1),
                Command::Forward(0.5),
                Command::Forward(0.5),
                Command::Stop,
            ]
        );
        assert!(ctl.tick(&mut source, &mut sink).is_err());
        assert_eq!(sink.len(), 4);
    }

    #[test]
    fn test_histories_stay_bounded() {
        let mut ctl = controller(p(100.0, 0.0));
        for i in 0..50 {
            ctl.step(p(i as f64 * 0.4, 0.0)).unwrap();
            assert!(ctl.positions().len() <= 5);
            assert!(ctl.distances().len() <= 5);
        }
        assert_eq!(ctl.ticks(), 50);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut cfg = ControllerConfig::default();
        cfg.history.positions = 1;
        assert!(ControlLoop::new(cfg).is_err());
    }
}
