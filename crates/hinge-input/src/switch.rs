//! Keyboard-base panel selection across laptop/tablet switches.
//!
//! The keyboard base carries two input panels: a touch panel and a pen
//! digitizer. At most one of them is bound at a time. Folding into tablet
//! mode unbinds both and remembers which one was in use so that opening
//! back into laptop mode restores it.

use crate::binder::DeviceBinder;
use crate::{BindError, DriverBinding};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Touch,
    Pen,
}

#[derive(Debug, Clone)]
pub struct PanelSwitch {
    touch: DriverBinding,
    pen: DriverBinding,
    /// Panel to bind when entering laptop mode.
    preferred: Panel,
}

impl PanelSwitch {
    pub fn new(touch: DriverBinding, pen: DriverBinding) -> Self {
        Self {
            touch,
            pen,
            preferred: Panel::Touch,
        }
    }

    pub fn preferred(&self) -> Panel {
        self.preferred
    }

    fn binding(&self, panel: Panel) -> &DriverBinding {
        match panel {
            Panel::Touch => &self.touch,
            Panel::Pen => &self.pen,
        }
    }

    /// Bind the preferred panel unless one of the two is already bound.
    pub fn enter_laptop(&self, binder: &mut impl DeviceBinder) -> Result<(), BindError> {
        if binder.is_bound(&self.touch) || binder.is_bound(&self.pen) {
            return Ok(());
        }
        let (active, inactive) = match self.preferred {
            Panel::Touch => (Panel::Touch, Panel::Pen),
            Panel::Pen => (Panel::Pen, Panel::Touch),
        };
        ensure_unbound(binder, self.binding(inactive))?;
        ensure_bound(binder, self.binding(active))?;
        info!(panel = ?active, "Keyboard panel activated");
        Ok(())
    }

    /// Remember the panel in use, then unbind both.
    pub fn enter_tablet(&mut self, binder: &mut impl DeviceBinder) -> Result<(), BindError> {
        self.preferred = if binder.is_bound(&self.pen) {
            Panel::Pen
        } else {
            Panel::Touch
        };
        ensure_unbound(binder, &self.touch)?;
        ensure_unbound(binder, &self.pen)?;
        info!(remembered = ?self.preferred, "Keyboard panels deactivated");
        Ok(())
    }
}

fn ensure_bound(binder: &mut impl DeviceBinder, binding: &DriverBinding) -> Result<(), BindError> {
    if binder.is_bound(binding) {
        return Ok(());
    }
    binder.bind(binding)
}

fn ensure_unbound(
    binder: &mut impl DeviceBinder,
    binding: &DriverBinding,
) -> Result<(), BindError> {
    if !binder.is_bound(binding) {
        return Ok(());
    }
    binder.unbind(binding)
}
