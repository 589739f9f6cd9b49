use crate::error::{fault, Axis, SensorError};
use crate::types::{Location, PostureSnapshot, RawTick, SensorPairSample, Vector3};

/// Maximum per-axis disagreement between the two sensors of a pair, in raw units.
pub const DEFAULT_FAULT_THRESHOLD: f64 = 100_000.0;

/// Fuses the redundant accelerometer pairs into one posture per tick.
///
/// A tick is accepted only if both pairs agree on every axis. Accepted
/// pairs are averaged, the keyboard vector is rotated into the screen
/// sensor's frame and both are converted to polar form.
#[derive(Debug, Clone)]
pub struct FusionEngine {
    fault_threshold: f64,
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FAULT_THRESHOLD)
    }
}

impl FusionEngine {
    pub fn new(fault_threshold: f64) -> Self {
        Self { fault_threshold }
    }

    /// Fuse one tick worth of raw readings.
    ///
    /// Returns [`SensorError::Fault`] for the first disagreeing axis; the
    /// caller must drop the tick.
    pub fn fuse(&self, tick: &RawTick) -> Result<PostureSnapshot, SensorError> {
        self.check_pair(Location::Screen, &tick.screen)?;
        self.check_pair(Location::Keyboard, &tick.keyboard)?;

        let screen = tick.screen.average();
        let keyboard = align_keyboard_frame(tick.keyboard.average());

        Ok(PostureSnapshot::new(screen, keyboard))
    }

    fn check_pair(&self, location: Location, pair: &SensorPairSample) -> Result<(), SensorError> {
        for axis in Axis::ALL {
            let primary = axis.component(pair.primary);
            let secondary = axis.component(pair.secondary);
            let difference = (primary - secondary).abs();
            if difference.is_nan() || difference > self.fault_threshold {
                tracing::debug!(%location, %axis, primary, secondary, "Sensor pair disagrees");
                return Err(fault(location, axis, primary, secondary));
            }
        }
        Ok(())
    }
}

/// Rotate the keyboard reading 90 degrees about z: `(x, y) -> (y, -x)`.
///
/// The keyboard sensor is mounted at a right angle to the screen sensor
/// on the reference hardware.
pub fn align_keyboard_frame(v: Vector3) -> Vector3 {
    Vector3::new(v.y, -v.x, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(p: (f64, f64, f64), s: (f64, f64, f64)) -> SensorPairSample {
        SensorPairSample::new(Vector3::new(p.0, p.1, p.2), Vector3::new(s.0, s.1, s.2))
    }

    fn agreeing(v: (f64, f64, f64)) -> SensorPairSample {
        pair(v, v)
    }

    #[test]
    fn screen_z_disagreement_drops_tick() {
        let engine = FusionEngine::default();
        let tick = RawTick {
            screen: pair((100.0, 100.0, 100.0), (100.0, 100.0, 250_000.0)),
            keyboard: agreeing((0.0, 0.0, 1000.0)),
        };

        match engine.fuse(&tick) {
            Err(SensorError::Fault { location, axis, .. }) => {
                assert_eq!(location, Location::Screen);
                assert_eq!(axis, Axis::Z);
            }
            other => panic!("expected fault, got {other:?}"),
        }
    }

    #[test]
    fn keyboard_disagreement_drops_tick() {
        let engine = FusionEngine::default();
        let tick = RawTick {
            screen: agreeing((1.0, 0.0, 0.0)),
            keyboard: pair((-60_000.0, 0.0, 0.0), (60_000.0, 0.0, 0.0)),
        };
        let err = engine.fuse(&tick).unwrap_err();
        assert!(matches!(
            err,
            SensorError::Fault {
                location: Location::Keyboard,
                axis: Axis::X,
                ..
            }
        ));
    }

    #[test]
    fn difference_equal_to_threshold_is_accepted() {
        let engine = FusionEngine::new(10.0);
        let tick = RawTick {
            screen: pair((0.0, 0.0, 0.0), (10.0, -10.0, 10.0)),
            keyboard: agreeing((0.0, 0.0, 1.0)),
        };
        assert!(engine.fuse(&tick).is_ok());
    }

    #[test]
    fn nan_reading_is_a_fault() {
        let engine = FusionEngine::default();
        let tick = RawTick {
            screen: pair((f64::NAN, 0.0, 0.0), (0.0, 0.0, 0.0)),
            keyboard: agreeing((0.0, 0.0, 1.0)),
        };
        assert!(engine.fuse(&tick).is_err());
    }

    #[test]
    fn good_tick_is_averaged_and_keyboard_rotated() {
        let engine = FusionEngine::default();
        let tick = RawTick {
            screen: pair((100.0, 0.0, 0.0), (300.0, 0.0, 0.0)),
            keyboard: pair((10.0, 20.0, 30.0), (30.0, 40.0, 50.0)),
        };
        let snapshot = engine.fuse(&tick).unwrap();

        assert_eq!(snapshot.screen, Vector3::new(200.0, 0.0, 0.0));
        // Average is (20, 30, 40); rotated to (30, -20, 40).
        assert_eq!(snapshot.keyboard, Vector3::new(30.0, -20.0, 40.0));
        assert!((snapshot.screen_polar.magnitude - 200.0).abs() < 1e-9);
        assert!(snapshot.screen_polar.longitude.abs() < 1e-9);
    }

    #[test]
    fn frame_alignment_leaves_z_untouched() {
        let v = align_keyboard_frame(Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(v.z, -1.0);
        assert_eq!(v.x, 0.0);
        assert_eq!(v.y, 0.0);
    }
}
