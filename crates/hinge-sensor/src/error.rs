use crate::types::{Location, Vector3};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorError {
    /// Redundant sensors disagree; the whole tick must be dropped.
    #[error("{location} sensors disagree on {axis} axis: {primary} vs {secondary}")]
    Fault {
        location: Location,
        axis: Axis,
        primary: f64,
        secondary: f64,
    },

    #[error("cannot scan IIO devices under {path}: {source}")]
    Discovery {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("found {found} accelerometers under {path}, need {required}")]
    MissingDevices {
        path: PathBuf,
        found: usize,
        required: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn component(self, v: Vector3) -> f64 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    /// Name used by the IIO `in_accel_<axis>_raw` attribute files.
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn fault(location: Location, axis: Axis, primary: f64, secondary: f64) -> SensorError {
    SensorError::Fault {
        location,
        axis,
        primary,
        secondary,
    }
}
