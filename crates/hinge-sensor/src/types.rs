use glam::DVec3;
use std::fmt;

/// Raw or averaged acceleration in arbitrary sensor units.
pub type Vector3 = DVec3;

/// Physical mounting location of a redundant accelerometer pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Screen,
    Keyboard,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Screen => f.write_str("screen"),
            Location::Keyboard => f.write_str("keyboard"),
        }
    }
}

/// Two readings of the same location taken in the same tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorPairSample {
    pub primary: Vector3,
    pub secondary: Vector3,
}

impl SensorPairSample {
    pub fn new(primary: Vector3, secondary: Vector3) -> Self {
        Self { primary, secondary }
    }

    /// Per-axis arithmetic mean of both sensors.
    pub fn average(&self) -> Vector3 {
        (self.primary + self.secondary) / 2.0
    }
}

/// Everything read from the accelerometers in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawTick {
    pub screen: SensorPairSample,
    pub keyboard: SensorPairSample,
}

/// Acceleration vector in spherical form. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarVector {
    pub magnitude: f64,
    /// Elevation above the sensor's xy plane, in `[-90, 90]`.
    pub latitude: f64,
    /// Heading within the xy plane, in `(-180, 180]`.
    pub longitude: f64,
}

impl PolarVector {
    pub fn from_cartesian(v: Vector3) -> Self {
        let planar = v.x.hypot(v.y);
        let mut longitude = v.y.atan2(v.x).to_degrees();
        // atan2 of a negative-zero y lands on -180.
        if longitude <= -180.0 {
            longitude += 360.0;
        }
        Self {
            magnitude: v.length(),
            latitude: v.z.atan2(planar).to_degrees(),
            longitude,
        }
    }
}

/// Fused posture of screen and keyboard for a single tick.
///
/// The keyboard vector is already rotated into the screen sensor's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostureSnapshot {
    pub screen: Vector3,
    pub keyboard: Vector3,
    pub screen_polar: PolarVector,
    pub keyboard_polar: PolarVector,
}

impl PostureSnapshot {
    pub fn new(screen: Vector3, keyboard: Vector3) -> Self {
        Self {
            screen,
            keyboard,
            screen_polar: PolarVector::from_cartesian(screen),
            keyboard_polar: PolarVector::from_cartesian(keyboard),
        }
    }
}
