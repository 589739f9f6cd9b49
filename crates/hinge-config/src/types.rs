use hinge_posture::Thresholds;
use hinge_sensor::iio::DEFAULT_IIO_ROOT;
use hinge_sensor::DEFAULT_FAULT_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Daemon configuration. The defaults describe the reference convertible,
/// so running without any config file is the normal case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Time between two sensor polls.
    pub poll_interval_ms: u64,
    pub sensors: SensorConfig,
    /// Classification angles in degrees.
    pub classifier: Thresholds,
    pub rotation: RotationConfig,
    /// What to do when the device switches between laptop and tablet.
    pub formfactor_action: FormfactorAction,
    pub virtual_keyboard: VirtualKeyboardConfig,
    pub panels: PanelsConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            sensors: SensorConfig::default(),
            classifier: Thresholds::default(),
            rotation: RotationConfig::default(),
            formfactor_action: FormfactorAction::DriverBind,
            virtual_keyboard: VirtualKeyboardConfig::default(),
            panels: PanelsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Directory holding the `iio:deviceN` entries.
    pub iio_root: PathBuf,
    /// Largest tolerated per-axis difference between paired sensors, raw units.
    pub fault_threshold: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            iio_root: PathBuf::from(DEFAULT_IIO_ROOT),
            fault_threshold: DEFAULT_FAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Dispatch screen rotations at all.
    pub enabled: bool,
    /// Display output to rotate.
    pub output: String,
    /// Input devices whose coordinate transform follows the rotation,
    /// matched by exact name.
    pub pointer_devices: Vec<String>,
    /// Same, matched by name prefix.
    pub pointer_device_prefixes: Vec<String>,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output: "DSI-1".into(),
            pointer_devices: vec!["HDP0001:00 2ABB:8102".into()],
            pointer_device_prefixes: vec!["Wacom HID 169 Pen ".into()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormfactorAction {
    /// Bind or unbind the keyboard-base touch panel and pen digitizer drivers.
    DriverBind,
    /// Toggle the virtual keyboard input devices and their indicator LED.
    VirtualKeyboard,
    /// Classify only.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualKeyboardConfig {
    /// Input devices enabled in laptop mode and disabled in tablet mode.
    pub devices: Vec<String>,
    /// PWM period attribute of the indicator LED.
    pub led_period_path: PathBuf,
    /// PWM duty cycle attribute of the indicator LED.
    pub led_duty_cycle_path: PathBuf,
}

impl Default for VirtualKeyboardConfig {
    fn default() -> Self {
        Self {
            devices: vec!["virtual-keyboard".into(), "virtual-touchpad".into()],
            led_period_path: PathBuf::from("/sys/class/pwm/pwmchip1/pwm0/period"),
            led_duty_cycle_path: PathBuf::from("/sys/class/pwm/pwmchip1/pwm0/duty_cycle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelsConfig {
    /// Touch panel of the keyboard base.
    pub touch: DriverBindingConfig,
    /// Pen digitizer of the keyboard base.
    pub pen: DriverBindingConfig,
}

impl Default for PanelsConfig {
    fn default() -> Self {
        Self {
            touch: DriverBindingConfig {
                driver_path: PathBuf::from("/sys/bus/i2c/drivers/Goodix-TS"),
                device: "i2c-GDIX1001:00".into(),
            },
            pen: DriverBindingConfig {
                driver_path: PathBuf::from("/sys/bus/i2c/drivers/i2c_hid"),
                device: "i2c-WCOM0019:00".into(),
            },
        }
    }
}

/// A device and the kernel driver directory it binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverBindingConfig {
    pub driver_path: PathBuf,
    pub device: String,
}
