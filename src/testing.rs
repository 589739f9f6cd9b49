//! Recording stand-ins for the hardware collaborators.

use hinge_display::{ActuationError, ScreenController, TransformMatrix};
use hinge_input::{BindError, DeviceBinder, DriverBinding};
use hinge_posture::Orientation;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct FakeScreen {
    pub rotations: Vec<Orientation>,
    pub keyboard: Vec<bool>,
    pub fail: bool,
}

impl FakeScreen {
    fn check(&self) -> Result<(), ActuationError> {
        if self.fail {
            return Err(ActuationError::OutputNotFound("DSI-1".into()));
        }
        Ok(())
    }
}

impl ScreenController for FakeScreen {
    fn rotate(&mut self, orientation: Orientation) -> Result<bool, ActuationError> {
        self.rotations.push(orientation);
        self.check()?;
        Ok(true)
    }

    fn set_pointer_transform(
        &mut self,
        _device: &str,
        _matrix: &TransformMatrix,
    ) -> Result<(), ActuationError> {
        self.check()
    }

    fn set_keyboard_active(&mut self, active: bool) -> Result<(), ActuationError> {
        self.keyboard.push(active);
        self.check()
    }
}

#[derive(Debug, Default)]
pub struct MemoryBinder {
    pub bound: HashSet<String>,
    pub writes: Vec<String>,
}

impl DeviceBinder for MemoryBinder {
    fn is_bound(&self, binding: &DriverBinding) -> bool {
        self.bound.contains(&binding.device)
    }

    fn bind(&mut self, binding: &DriverBinding) -> Result<(), BindError> {
        self.writes.push(format!("bind {}", binding.device));
        self.bound.insert(binding.device.clone());
        Ok(())
    }

    fn unbind(&mut self, binding: &DriverBinding) -> Result<(), BindError> {
        self.writes.push(format!("unbind {}", binding.device));
        self.bound.remove(&binding.device);
        Ok(())
    }
}
