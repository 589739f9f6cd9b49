use crate::{BindError, DriverBinding};
use std::fs::OpenOptions;
use std::io::Write;

/// Attaches devices to and detaches them from their kernel drivers.
pub trait DeviceBinder {
    fn is_bound(&self, binding: &DriverBinding) -> bool;
    fn bind(&mut self, binding: &DriverBinding) -> Result<(), BindError>;
    fn unbind(&mut self, binding: &DriverBinding) -> Result<(), BindError>;
}

/// Uses the driver's `bind`/`unbind` sysfs attributes. A bound device
/// appears as an entry named after it inside the driver directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysfsBinder;

impl SysfsBinder {
    fn write(binding: &DriverBinding, attribute: &str) -> Result<(), BindError> {
        let path = binding.driver_path.join(attribute);
        let result = OpenOptions::new()
            .write(true)
            .open(&path)
            .and_then(|mut f| f.write_all(binding.device.as_bytes()));

        match result {
            Ok(()) => {
                tracing::info!(device = %binding.device, path = ?path, "Driver attribute written");
                Ok(())
            }
            Err(source) => Err(BindError::Write {
                device: binding.device.clone(),
                path,
                source,
            }),
        }
    }
}

impl DeviceBinder for SysfsBinder {
    fn is_bound(&self, binding: &DriverBinding) -> bool {
        binding.driver_path.join(&binding.device).is_dir()
    }

    fn bind(&mut self, binding: &DriverBinding) -> Result<(), BindError> {
        Self::write(binding, "bind")
    }

    fn unbind(&mut self, binding: &DriverBinding) -> Result<(), BindError> {
        Self::write(binding, "unbind")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn bound_means_device_dir_exists() {
        let driver = tempfile::tempdir().unwrap();
        let binding = DriverBinding::new(driver.path(), "i2c-GDIX1001:00");
        assert!(!SysfsBinder.is_bound(&binding));

        fs::create_dir(driver.path().join("i2c-GDIX1001:00")).unwrap();
        assert!(SysfsBinder.is_bound(&binding));
    }

    #[test]
    fn bind_and_unbind_write_the_device_id() {
        let driver = tempfile::tempdir().unwrap();
        fs::write(driver.path().join("bind"), "").unwrap();
        fs::write(driver.path().join("unbind"), "").unwrap();
        let binding = DriverBinding::new(driver.path(), "i2c-WCOM0019:00");

        SysfsBinder.bind(&binding).unwrap();
        SysfsBinder.unbind(&binding).unwrap();
        assert_eq!(fs::read_to_string(driver.path().join("bind")).unwrap(), "i2c-WCOM0019:00");
        assert_eq!(fs::read_to_string(driver.path().join("unbind")).unwrap(), "i2c-WCOM0019:00");
    }

    #[test]
    fn missing_driver_attribute_is_not_created() {
        let driver = tempfile::tempdir().unwrap();
        let binding = DriverBinding::new(driver.path(), "i2c-GDIX1001:00");
        assert!(SysfsBinder.bind(&binding).is_err());
        assert!(!driver.path().join("bind").exists());
    }
}
