pub mod error;
pub mod fusion;
pub mod iio;
pub mod types;

pub use error::{Axis, SensorError};
pub use fusion::{align_keyboard_frame, FusionEngine, DEFAULT_FAULT_THRESHOLD};
pub use iio::IioReader;
pub use types::{Location, PolarVector, PostureSnapshot, RawTick, SensorPairSample, Vector3};

/// Source of one synchronized set of accelerometer readings per tick.
///
/// Reads never fail: a source that cannot be read contributes a zero
/// vector, which the fusion fault check may then reject.
pub trait SensorReader {
    fn read(&mut self) -> RawTick;
}

/// Replays a fixed sequence of ticks. Once exhausted it repeats the last one.
///
/// Handy for driving the pipeline without hardware.
#[derive(Debug, Clone)]
pub struct ScriptedReader {
    ticks: Vec<RawTick>,
    position: usize,
}

impl ScriptedReader {
    pub fn new(ticks: Vec<RawTick>) -> Self {
        Self { ticks, position: 0 }
    }
}

impl SensorReader for ScriptedReader {
    fn read(&mut self) -> RawTick {
        let zero = SensorPairSample::new(Vector3::ZERO, Vector3::ZERO);
        let tick = self
            .ticks
            .get(self.position)
            .or_else(|| self.ticks.last())
            .copied()
            .unwrap_or(RawTick {
                screen: zero,
                keyboard: zero,
            });
        self.position += 1;
        tick
    }
}
