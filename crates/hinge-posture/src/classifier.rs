use crate::types::{Formfactor, Orientation};
use hinge_sensor::PostureSnapshot;
use serde::{Deserialize, Serialize};

/// Angular decision boundaries, in degrees.
///
/// The defaults are empirical calibration values of the reference
/// convertible. The laptop/tablet band edges moved between hardware
/// revisions (-150 on some units), so they are tunable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Above this absolute screen latitude the screen counts as lying flat.
    pub flat_latitude: f64,
    /// Absolute screen longitude above which the content points upward.
    pub upward_longitude: f64,
    /// Absolute screen longitude below which the content points downward.
    pub downward_longitude: f64,
    /// Open interval of absolute screen longitude in which the hinge angle
    /// is unreliable.
    pub edge_on_min: f64,
    pub edge_on_max: f64,
    /// Relative tilt strictly inside `(laptop_min_tilt, laptop_max_tilt)` is
    /// laptop. At or below `laptop_min_tilt` the device is folded over.
    pub laptop_min_tilt: f64,
    pub laptop_max_tilt: f64,
    /// Relative tilt above this is tablet.
    pub tablet_min_tilt: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            flat_latitude: 70.0,
            upward_longitude: 135.0,
            downward_longitude: 45.0,
            edge_on_min: 80.0,
            edge_on_max: 100.0,
            laptop_min_tilt: -170.0,
            laptop_max_tilt: -10.0,
            tablet_min_tilt: 10.0,
        }
    }
}

/// Result of classifying one posture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub orientation: Orientation,
    pub formfactor: Formfactor,
    /// Screen tilt relative to the keyboard around the hinge, in `(-180, 180]`.
    pub relative_tilt: f64,
}

/// Stateless mapping from a fused posture to orientation and form factor.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    thresholds: Thresholds,
}

impl Classifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn classify(&self, snapshot: &PostureSnapshot) -> Classification {
        let relative_tilt = relative_tilt(snapshot);
        Classification {
            orientation: self.orientation(snapshot),
            formfactor: self.formfactor(snapshot, relative_tilt),
            relative_tilt,
        }
    }

    /// Orientation depends on the screen sensor only.
    pub fn orientation(&self, snapshot: &PostureSnapshot) -> Orientation {
        let t = &self.thresholds;
        let screen = &snapshot.screen_polar;
        if screen.latitude.abs() > t.flat_latitude {
            return Orientation::Horizontal;
        }

        let alon = screen.longitude.abs();
        if alon > t.upward_longitude {
            Orientation::Upward
        } else if alon < t.downward_longitude {
            Orientation::Downward
        } else if screen.longitude < 0.0 {
            Orientation::Rightward
        } else {
            Orientation::Leftward
        }
    }

    pub fn formfactor(&self, snapshot: &PostureSnapshot, relative_tilt: f64) -> Formfactor {
        let t = &self.thresholds;
        let alon = snapshot.screen_polar.longitude.abs();
        if alon > t.edge_on_min && alon < t.edge_on_max {
            Formfactor::Undefined
        } else if relative_tilt > t.laptop_min_tilt && relative_tilt < t.laptop_max_tilt {
            Formfactor::Laptop
        } else if relative_tilt > t.tablet_min_tilt || relative_tilt <= t.laptop_min_tilt {
            Formfactor::Tablet
        } else {
            Formfactor::Borderline
        }
    }
}

/// Angle between screen and keyboard in the xz plane, in degrees.
pub fn relative_tilt(snapshot: &PostureSnapshot) -> f64 {
    let screen = snapshot.screen.z.atan2(snapshot.screen.x);
    let keyboard = snapshot.keyboard.z.atan2(snapshot.keyboard.x);
    normalize180((screen - keyboard).to_degrees())
}

/// Wrap an angle in degrees into `(-180, 180]`.
///
/// Values already in range are returned unchanged.
pub fn normalize180(degrees: f64) -> f64 {
    if degrees > -180.0 && degrees <= 180.0 {
        return degrees;
    }
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
