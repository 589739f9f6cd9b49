use crate::ActuationError;
use std::path::PathBuf;

/// Keyboard indicator LED driven through a sysfs PWM channel.
///
/// On means a 50% duty cycle of the configured period.
#[derive(Debug, Clone)]
pub struct PwmLed {
    period_path: PathBuf,
    duty_cycle_path: PathBuf,
}

impl PwmLed {
    pub fn new(period_path: impl Into<PathBuf>, duty_cycle_path: impl Into<PathBuf>) -> Self {
        Self {
            period_path: period_path.into(),
            duty_cycle_path: duty_cycle_path.into(),
        }
    }

    /// Duty cycle for the lit state. An unreadable period gives 0.
    pub fn on_duty_cycle(&self) -> i64 {
        let period = std::fs::read_to_string(&self.period_path)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(0.0);
        (period / 2.0).round() as i64
    }

    pub fn set(&self, on: bool) -> Result<(), ActuationError> {
        let duty = if on { self.on_duty_cycle() } else { 0 };
        std::fs::write(&self.duty_cycle_path, duty.to_string()).map_err(|source| {
            ActuationError::Io {
                what: self.duty_cycle_path.display().to_string(),
                source,
            }
        })?;
        tracing::debug!(on, duty, "Indicator LED updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn on_is_half_the_period() {
        let dir = tempfile::tempdir().unwrap();
        let period = dir.path().join("period");
        let duty = dir.path().join("duty_cycle");
        std::fs::write(&period, "1000000\n").unwrap();
        std::fs::write(&duty, "0").unwrap();

        let led = PwmLed::new(&period, &duty);
        led.set(true).unwrap();
        assert_eq!(std::fs::read_to_string(&duty).unwrap(), "500000");

        led.set(false).unwrap();
        assert_eq!(std::fs::read_to_string(&duty).unwrap(), "0");
    }

    #[test]
    fn missing_pwm_channel_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let led = PwmLed::new(dir.path().join("period"), dir.path().join("no/such/duty"));
        assert_eq!(led.on_duty_cycle(), 0);
        assert!(led.set(true).is_err());
    }
}
