//! Hysteresis against flapping hardware reconfiguration.
//!
//! The gate remembers the last orientation and form factor that were acted
//! upon. A new classification only produces an action when it is confident
//! and differs from that memory. Ambiguous readings neither act nor
//! overwrite the memory.

use crate::classifier::Classification;
use crate::types::{Formfactor, Orientation};

/// Last acted-upon state. Lives for the whole process, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaemonState {
    pub orientation: Orientation,
    pub formfactor: Formfactor,
}

impl Default for DaemonState {
    fn default() -> Self {
        Self {
            orientation: Orientation::Horizontal,
            formfactor: Formfactor::Undefined,
        }
    }
}

/// Actions to dispatch for one tick. `None` means leave that axis alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Transition {
    pub orientation: Option<Orientation>,
    pub formfactor: Option<Formfactor>,
}

impl Transition {
    pub fn is_empty(&self) -> bool {
        self.orientation.is_none() && self.formfactor.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StabilityGate {
    state: DaemonState,
}

impl StabilityGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DaemonState {
        self.state
    }

    /// Feed one classification and get back what must be actuated.
    ///
    /// The remembered state is updated as soon as a transition is emitted,
    /// whether or not the actuation later succeeds.
    pub fn observe(&mut self, classification: &Classification) -> Transition {
        let mut transition = Transition::default();

        let orientation = classification.orientation;
        if orientation.is_actionable() && orientation != self.state.orientation {
            tracing::debug!(
                from = %self.state.orientation,
                to = %orientation,
                "Orientation changed"
            );
            self.state.orientation = orientation;
            transition.orientation = Some(orientation);
        }

        let formfactor = classification.formfactor;
        if formfactor.is_stable() && formfactor != self.state.formfactor {
            tracing::debug!(from = %self.state.formfactor, to = %formfactor, "Form factor changed");
            self.state.formfactor = formfactor;
            transition.formfactor = Some(formfactor);
        }

        transition
    }
}
