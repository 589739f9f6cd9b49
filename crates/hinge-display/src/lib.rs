pub mod command;
pub mod led;
pub mod xrandr;

use hinge_posture::Orientation;
use std::fmt;
use thiserror::Error;

pub use command::{CommandRunner, SystemRunner};
pub use led::PwmLed;
pub use xrandr::{PointerDevices, XrandrController};

#[derive(Debug, Error)]
pub enum ActuationError {
    #[error("`{program}` exited with {status}: {stderr}")]
    CommandFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("output {0} is not connected")]
    OutputNotFound(String),

    #[error("I/O error on {what}: {source}")]
    Io {
        what: String,
        #[source]
        source: std::io::Error,
    },
}

/// Display-side hardware the daemon drives.
pub trait ScreenController {
    /// Rotate the display content and remap touch and pen input to match.
    ///
    /// Returns `true` when the display rotation actually changed.
    fn rotate(&mut self, orientation: Orientation) -> Result<bool, ActuationError>;

    /// Set the coordinate transformation matrix of one input device.
    fn set_pointer_transform(
        &mut self,
        device: &str,
        matrix: &TransformMatrix,
    ) -> Result<(), ActuationError>;

    /// Enable or disable the keyboard input devices. Must be a no-op when
    /// they are already in the requested state.
    fn set_keyboard_active(&mut self, active: bool) -> Result<(), ActuationError>;
}

/// Display rotation as understood by the display server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Normal,
    Left,
    Inverted,
    Right,
}

impl Rotation {
    /// The panel of the reference device is mounted rotated, so "rightward"
    /// content corresponds to the native panel orientation.
    pub fn for_orientation(orientation: Orientation) -> Option<Self> {
        match orientation {
            Orientation::Horizontal => None,
            Orientation::Upward => Some(Rotation::Right),
            Orientation::Downward => Some(Rotation::Left),
            Orientation::Leftward => Some(Rotation::Inverted),
            Orientation::Rightward => Some(Rotation::Normal),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rotation::Normal => "normal",
            Rotation::Left => "left",
            Rotation::Inverted => "inverted",
            Rotation::Right => "right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "normal" => Some(Rotation::Normal),
            "left" => Some(Rotation::Left),
            "inverted" => Some(Rotation::Inverted),
            "right" => Some(Rotation::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-major 3x3 affine transform applied to absolute pointer coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformMatrix(pub [f32; 9]);

impl TransformMatrix {
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    pub const UPWARD: Self = Self([0.0, 1.0, 0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    pub const DOWNWARD: Self = Self([0.0, -1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    pub const LEFTWARD: Self = Self([-1.0, 0.0, 1.0, 0.0, -1.0, 1.0, 0.0, 0.0, 1.0]);
    pub const RIGHTWARD: Self = Self::IDENTITY;

    pub fn for_orientation(orientation: Orientation) -> Option<Self> {
        match orientation {
            Orientation::Horizontal => None,
            Orientation::Upward => Some(Self::UPWARD),
            Orientation::Downward => Some(Self::DOWNWARD),
            Orientation::Leftward => Some(Self::LEFTWARD),
            Orientation::Rightward => Some(Self::RIGHTWARD),
        }
    }

    /// Map a normalized `(x, y)` point through the matrix.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.0;
        let w = m[6] * x + m[7] * y + m[8];
        ((m[0] * x + m[1] * y + m[2]) / w, (m[3] * x + m[4] * y + m[5]) / w)
    }

    /// Values in the order `xinput set-prop` expects.
    pub fn to_args(&self) -> Vec<String> {
        self.0.iter().map(|v| v.to_string()).collect()
    }
}
