//! Accelerometer access through the Linux IIO sysfs interface.
//!
//! Each accelerometer shows up as `<root>/iio:deviceN` with one
//! `in_accel_<axis>_raw` file per axis holding a single number.

use crate::error::{Axis, SensorError};
use crate::types::{RawTick, SensorPairSample, Vector3};
use crate::SensorReader;
use std::path::{Path, PathBuf};

/// Default sysfs location of IIO devices.
pub const DEFAULT_IIO_ROOT: &str = "/sys/bus/iio/devices";

/// Number of accelerometers the daemon tracks: two per location.
pub const REQUIRED_DEVICES: usize = 4;

const DEVICE_PREFIX: &str = "iio:device";

/// Raw value files of one accelerometer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accelerometer {
    pub number: u32,
    pub dir: PathBuf,
}

impl Accelerometer {
    pub fn axis_path(&self, axis: Axis) -> PathBuf {
        self.dir.join(format!("in_accel_{}_raw", axis.as_str()))
    }

    /// Read all three axes. Unreadable axes count as zero.
    pub fn read(&self) -> Vector3 {
        Vector3::new(
            read_scalar(&self.axis_path(Axis::X)),
            read_scalar(&self.axis_path(Axis::Y)),
            read_scalar(&self.axis_path(Axis::Z)),
        )
    }
}

/// Find the IIO devices that expose accelerometer readings, sorted by device number.
pub fn discover(root: &Path) -> Result<Vec<Accelerometer>, SensorError> {
    let entries = std::fs::read_dir(root).map_err(|source| SensorError::Discovery {
        path: root.to_path_buf(),
        source,
    })?;

    let mut found: Vec<Accelerometer> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let number = parse_device_number(name.to_str()?)?;
            let dir = entry.path();
            dir.join("in_accel_x_raw")
                .exists()
                .then_some(Accelerometer { number, dir })
        })
        .collect();
    found.sort_by_key(|dev| dev.number);

    tracing::debug!(
        count = found.len(),
        devices = ?found.iter().map(|d| d.number).collect::<Vec<_>>(),
        "Scanned IIO devices"
    );
    Ok(found)
}

/// `iio:device12` -> `12`. Anything with trailing characters is rejected.
fn parse_device_number(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(DEVICE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Read one floating point value from a sysfs attribute.
///
/// Missing files and unparsable contents yield `0.0`.
pub fn read_scalar(path: &Path) -> f64 {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents.trim().parse().unwrap_or_else(|_| {
            tracing::trace!(?path, "Unparsable sensor value, using 0");
            0.0
        }),
        Err(e) => {
            tracing::trace!(?path, ?e, "Unreadable sensor value, using 0");
            0.0
        }
    }
}

/// Reads the four accelerometers of a convertible from sysfs.
///
/// Devices are assigned by ascending device number: screen primary,
/// keyboard primary, screen secondary, keyboard secondary.
#[derive(Debug, Clone)]
pub struct IioReader {
    screen_primary: Accelerometer,
    keyboard_primary: Accelerometer,
    screen_secondary: Accelerometer,
    keyboard_secondary: Accelerometer,
}

impl IioReader {
    /// Locate the accelerometers under `root`.
    ///
    /// Fails if fewer than [`REQUIRED_DEVICES`] are present. Extra devices
    /// beyond the first four are ignored.
    pub fn open(root: &Path) -> Result<Self, SensorError> {
        let found = discover(root)?;
        let count = found.len();
        let first: Vec<Accelerometer> = found.into_iter().take(REQUIRED_DEVICES).collect();
        let Ok([screen_primary, keyboard_primary, screen_secondary, keyboard_secondary]) =
            <[Accelerometer; REQUIRED_DEVICES]>::try_from(first)
        else {
            return Err(SensorError::MissingDevices {
                path: root.to_path_buf(),
                found: count,
                required: REQUIRED_DEVICES,
            });
        };

        let reader = Self {
            screen_primary,
            keyboard_primary,
            screen_secondary,
            keyboard_secondary,
        };

        tracing::info!(
            screen_primary = ?reader.screen_primary.dir,
            keyboard_primary = ?reader.keyboard_primary.dir,
            screen_secondary = ?reader.screen_secondary.dir,
            keyboard_secondary = ?reader.keyboard_secondary.dir,
            "Accelerometers assigned"
        );
        Ok(reader)
    }
}

impl SensorReader for IioReader {
    fn read(&mut self) -> RawTick {
        RawTick {
            screen: SensorPairSample::new(self.screen_primary.read(), self.screen_secondary.read()),
            keyboard: SensorPairSample::new(
                self.keyboard_primary.read(),
                self.keyboard_secondary.read(),
            ),
        }
    }
}
