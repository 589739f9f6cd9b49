//! X11 backend: `xrandr` for the display, `xinput` for input devices.

use crate::command::{CommandRunner, SystemRunner};
use crate::led::PwmLed;
use crate::{ActuationError, Rotation, ScreenController, TransformMatrix};
use hinge_posture::Orientation;
use tracing::{debug, info, warn};

const TRANSFORM_PROPERTY: &str = "Coordinate Transformation Matrix";
const ENABLED_PROPERTY: &str = "Device Enabled";

/// Which input devices follow the display rotation.
#[derive(Debug, Clone, Default)]
pub struct PointerDevices {
    pub names: Vec<String>,
    pub prefixes: Vec<String>,
}

impl PointerDevices {
    fn matches(&self, device: &str) -> bool {
        self.names.iter().any(|n| n == device)
            || self.prefixes.iter().any(|p| device.starts_with(p.as_str()))
    }
}

pub struct XrandrController<R = SystemRunner> {
    runner: R,
    output: String,
    pointers: PointerDevices,
    keyboards: Vec<String>,
    led: Option<PwmLed>,
}

impl XrandrController<SystemRunner> {
    pub fn new(output: impl Into<String>, pointers: PointerDevices) -> Self {
        Self::with_runner(SystemRunner, output, pointers)
    }
}

impl<R: CommandRunner> XrandrController<R> {
    pub fn with_runner(runner: R, output: impl Into<String>, pointers: PointerDevices) -> Self {
        Self {
            runner,
            output: output.into(),
            pointers,
            keyboards: Vec::new(),
            led: None,
        }
    }

    /// Input devices toggled by [`ScreenController::set_keyboard_active`],
    /// with an optional indicator LED.
    pub fn with_keyboards(mut self, devices: Vec<String>, led: Option<PwmLed>) -> Self {
        self.keyboards = devices;
        self.led = led;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Current rotation of the configured output.
    pub fn current_rotation(&mut self) -> Result<Rotation, ActuationError> {
        let query = self.runner.run("xrandr", &["--query"])?;
        parse_rotation(&query, &self.output)
            .ok_or_else(|| ActuationError::OutputNotFound(self.output.clone()))
    }

    fn input_devices(&mut self) -> Result<Vec<String>, ActuationError> {
        let list = self.runner.run("xinput", &["list", "--name-only"])?;
        Ok(list
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    fn device_enabled(&mut self, device: &str) -> Result<Option<bool>, ActuationError> {
        let props = self.runner.run("xinput", &["list-props", device])?;
        Ok(parse_enabled(&props))
    }
}

impl<R: CommandRunner> ScreenController for XrandrController<R> {
    fn rotate(&mut self, orientation: Orientation) -> Result<bool, ActuationError> {
        let (Some(target), Some(matrix)) = (
            Rotation::for_orientation(orientation),
            TransformMatrix::for_orientation(orientation),
        ) else {
            return Ok(false);
        };

        let current = self.current_rotation()?;
        if current == target {
            debug!(%target, "Display already rotated");
            return Ok(false);
        }

        let output = self.output.clone();
        self.runner.run(
            "xrandr",
            &["--output", output.as_str(), "--rotate", target.as_str()],
        )?;
        info!(%output, from = %current, to = %target, "Display rotated");

        // One failing device should not leave the others unmapped.
        let devices: Vec<String> = self
            .input_devices()?
            .into_iter()
            .filter(|d| self.pointers.matches(d))
            .collect();
        for device in &devices {
            if let Err(e) = self.set_pointer_transform(device, &matrix) {
                warn!(%device, %e, "Failed to remap input device");
            }
        }
        Ok(true)
    }

    fn set_pointer_transform(
        &mut self,
        device: &str,
        matrix: &TransformMatrix,
    ) -> Result<(), ActuationError> {
        let values = matrix.to_args();
        let mut args = vec!["set-prop", device, TRANSFORM_PROPERTY];
        args.extend(values.iter().map(String::as_str));
        self.runner.run("xinput", &args)?;
        debug!(%device, ?matrix, "Pointer transform applied");
        Ok(())
    }

    fn set_keyboard_active(&mut self, active: bool) -> Result<(), ActuationError> {
        let present = self.input_devices()?;
        let keyboards = self.keyboards.clone();
        let mut changed = false;

        for device in keyboards.iter().filter(|k| present.contains(*k)) {
            match self.device_enabled(device)? {
                Some(enabled) if enabled == active => continue,
                Some(_) => {}
                None => {
                    warn!(%device, "Device has no enabled property");
                    continue;
                }
            }
            let value = if active { "1" } else { "0" };
            self.runner
                .run("xinput", &["set-prop", device.as_str(), ENABLED_PROPERTY, value])?;
            info!(%device, active, "Keyboard device toggled");
            changed = true;
        }

        if changed {
            if let Some(led) = &self.led {
                led.set(active)?;
            }
        }
        Ok(())
    }
}

/// Find the rotation of `output` in `xrandr --query` output.
///
/// The rotation, when not normal, is printed between the geometry and
/// the parenthesized list of supported rotations:
/// `DSI-1 connected primary 1920x1200+0+0 right (normal left inverted right ...)`.
pub fn parse_rotation(query: &str, output: &str) -> Option<Rotation> {
    query.lines().find_map(|line| {
        let mut words = line.split_whitespace();
        if words.next()? != output || words.next()? != "connected" {
            return None;
        }
        let rotation = words
            .take_while(|w| !w.starts_with('('))
            .find_map(Rotation::from_name)
            .unwrap_or(Rotation::Normal);
        Some(rotation)
    })
}

/// Read the `Device Enabled` value out of `xinput list-props`.
pub fn parse_enabled(props: &str) -> Option<bool> {
    props.lines().find_map(|line| {
        let line = line.trim();
        if !line.starts_with(ENABLED_PROPERTY) {
            return None;
        }
        let (_, value) = line.rsplit_once(':')?;
        match value.trim() {
            "0" => Some(false),
            "1" => Some(true),
            _ => None,
        }
    })
}
