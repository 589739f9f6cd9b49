pub mod classifier;
pub mod gate;
pub mod types;

pub use classifier::{normalize180, Classification, Classifier, Thresholds};
pub use gate::{DaemonState, StabilityGate, Transition};
pub use types::{Formfactor, Orientation};
