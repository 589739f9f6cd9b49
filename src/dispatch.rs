use hinge_config::FormfactorAction;
use hinge_display::{ActuationError, ScreenController};
use hinge_input::{BindError, DeviceBinder, PanelSwitch};
use hinge_posture::{Formfactor, Orientation, Transition};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("rotating to {orientation} failed: {source}")]
    Rotation {
        orientation: Orientation,
        #[source]
        source: ActuationError,
    },

    #[error("switching keyboard to {formfactor} failed: {source}")]
    Keyboard {
        formfactor: Formfactor,
        #[source]
        source: ActuationError,
    },

    #[error("switching panels to {formfactor} failed: {source}")]
    Panels {
        formfactor: Formfactor,
        #[source]
        source: BindError,
    },
}

/// Turns gate transitions into calls on the display and driver collaborators.
pub struct ActuationDispatcher<S, B> {
    screen: S,
    binder: B,
    panels: PanelSwitch,
    rotation_enabled: bool,
    formfactor_action: FormfactorAction,
}

impl<S: ScreenController, B: DeviceBinder> ActuationDispatcher<S, B> {
    pub fn new(
        screen: S,
        binder: B,
        panels: PanelSwitch,
        rotation_enabled: bool,
        formfactor_action: FormfactorAction,
    ) -> Self {
        Self {
            screen,
            binder,
            panels,
            rotation_enabled,
            formfactor_action,
        }
    }

    #[cfg(test)]
    pub fn parts(&self) -> (&S, &B, &PanelSwitch) {
        (&self.screen, &self.binder, &self.panels)
    }

    #[cfg(test)]
    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    /// Apply both halves of a transition. A failure on one half does not
    /// prevent the other; all failures are returned.
    pub fn dispatch(&mut self, transition: &Transition) -> Vec<DispatchError> {
        let mut failures = Vec::new();
        if let Some(orientation) = transition.orientation {
            if let Err(e) = self.rotate(orientation) {
                failures.push(e);
            }
        }
        if let Some(formfactor) = transition.formfactor {
            if let Err(e) = self.switch_formfactor(formfactor) {
                failures.push(e);
            }
        }
        failures
    }

    fn rotate(&mut self, orientation: Orientation) -> Result<(), DispatchError> {
        if !self.rotation_enabled || !orientation.is_actionable() {
            return Ok(());
        }
        self.screen
            .rotate(orientation)
            .map(|_| ())
            .map_err(|source| DispatchError::Rotation { orientation, source })
    }

    fn switch_formfactor(&mut self, formfactor: Formfactor) -> Result<(), DispatchError> {
        let laptop = match formfactor {
            Formfactor::Laptop => true,
            Formfactor::Tablet => false,
            Formfactor::Undefined | Formfactor::Borderline => {
                debug!(%formfactor, "Ignoring unstable form factor");
                return Ok(());
            }
        };

        match self.formfactor_action {
            FormfactorAction::DriverBind => {
                let result = if laptop {
                    self.panels.enter_laptop(&mut self.binder)
                } else {
                    self.panels.enter_tablet(&mut self.binder)
                };
                result.map_err(|source| DispatchError::Panels { formfactor, source })
            }
            FormfactorAction::VirtualKeyboard => self
                .screen
                .set_keyboard_active(laptop)
                .map_err(|source| DispatchError::Keyboard { formfactor, source }),
            FormfactorAction::None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeScreen, MemoryBinder};
    use hinge_input::{DriverBinding, Panel};

    fn dispatcher(action: FormfactorAction) -> ActuationDispatcher<FakeScreen, MemoryBinder> {
        ActuationDispatcher::new(
            FakeScreen::default(),
            MemoryBinder::default(),
            PanelSwitch::new(
                DriverBinding::new("/drv/goodix", "touch"),
                DriverBinding::new("/drv/hid", "pen"),
            ),
            true,
            action,
        )
    }

    #[test]
    fn orientation_goes_to_the_screen() {
        let mut d = dispatcher(FormfactorAction::DriverBind);
        let failures = d.dispatch(&Transition {
            orientation: Some(Orientation::Leftward),
            formfactor: None,
        });
        assert!(failures.is_empty());
        assert_eq!(d.parts().0.rotations, [Orientation::Leftward]);
        assert!(d.parts().1.writes.is_empty());
    }

    #[test]
    fn driver_bind_mode_switches_panels() {
        let mut d = dispatcher(FormfactorAction::DriverBind);
        d.dispatch(&Transition {
            orientation: None,
            formfactor: Some(Formfactor::Laptop),
        });
        assert_eq!(d.parts().1.writes, ["bind touch"]);
        assert!(d.parts().0.keyboard.is_empty());

        d.dispatch(&Transition {
            orientation: None,
            formfactor: Some(Formfactor::Tablet),
        });
        assert_eq!(d.parts().1.writes, ["bind touch", "unbind touch"]);
        assert_eq!(d.parts().2.preferred(), Panel::Touch);
    }

    #[test]
    fn virtual_keyboard_mode_toggles_the_keyboard() {
        let mut d = dispatcher(FormfactorAction::VirtualKeyboard);
        d.dispatch(&Transition {
            orientation: None,
            formfactor: Some(Formfactor::Tablet),
        });
        assert_eq!(d.parts().0.keyboard, [false]);
        assert!(d.parts().1.writes.is_empty());
    }

    #[test]
    fn disabled_rotation_and_no_action_do_nothing() {
        let mut d = ActuationDispatcher::new(
            FakeScreen::default(),
            MemoryBinder::default(),
            PanelSwitch::new(DriverBinding::new("/a", "touch"), DriverBinding::new("/b", "pen")),
            false,
            FormfactorAction::None,
        );
        let failures = d.dispatch(&Transition {
            orientation: Some(Orientation::Upward),
            formfactor: Some(Formfactor::Laptop),
        });
        assert!(failures.is_empty());
        assert!(d.parts().0.rotations.is_empty());
        assert!(d.parts().1.writes.is_empty());
    }

    #[test]
    fn one_failure_does_not_block_the_other_action() {
        let mut d = dispatcher(FormfactorAction::DriverBind);
        d.screen_mut().fail = true;
        let failures = d.dispatch(&Transition {
            orientation: Some(Orientation::Upward),
            formfactor: Some(Formfactor::Laptop),
        });
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], DispatchError::Rotation { .. }));
        assert_eq!(d.parts().1.writes, ["bind touch"]);
    }
}
