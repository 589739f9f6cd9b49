pub mod binder;
pub mod switch;

use std::path::PathBuf;
use thiserror::Error;

pub use binder::{DeviceBinder, SysfsBinder};
pub use switch::{Panel, PanelSwitch};

#[derive(Debug, Error)]
pub enum BindError {
    #[error("cannot write {device} to {path}: {source}")]
    Write {
        device: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A device and the kernel driver that can own it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverBinding {
    /// Driver directory, e.g. `/sys/bus/i2c/drivers/Goodix-TS`.
    pub driver_path: PathBuf,
    /// Device id as the driver knows it, e.g. `i2c-GDIX1001:00`.
    pub device: String,
}

impl DriverBinding {
    pub fn new(driver_path: impl Into<PathBuf>, device: impl Into<String>) -> Self {
        Self {
            driver_path: driver_path.into(),
            device: device.into(),
        }
    }
}
