use std::fmt;

/// Rotation to apply to the screen's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Screen lies near-flat; no usable rotation signal.
    Horizontal,
    Upward,
    Downward,
    Leftward,
    Rightward,
}

impl Orientation {
    /// Whether a rotation can be dispatched for this value.
    pub fn is_actionable(self) -> bool {
        self != Orientation::Horizontal
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Upward => "upward",
            Orientation::Downward => "downward",
            Orientation::Leftward => "leftward",
            Orientation::Rightward => "rightward",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physical hinge configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formfactor {
    Laptop,
    Tablet,
    /// Screen is edge-on to gravity; the hinge angle cannot be measured.
    Undefined,
    /// Hinge angle between the laptop and tablet bands.
    Borderline,
}

impl Formfactor {
    /// Only laptop and tablet are confident enough to act on.
    pub fn is_stable(self) -> bool {
        matches!(self, Formfactor::Laptop | Formfactor::Tablet)
    }

    pub fn label(self) -> &'static str {
        match self {
            Formfactor::Laptop => "laptop",
            Formfactor::Tablet => "tablet",
            Formfactor::Undefined => "undefined",
            Formfactor::Borderline => "borderline",
        }
    }
}

impl fmt::Display for Formfactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
