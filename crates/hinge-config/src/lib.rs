mod types;

pub use types::*;

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Longest accepted poll interval, one hour.
pub const MAX_POLL_INTERVAL_MS: u64 = 3_600_000;

/// Returns the default config file path: `$XDG_CONFIG_HOME/hinge/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hinge").join("config.toml"))
}

/// Load the configuration.
///
/// An explicitly given path must exist. Without one, the default location
/// is tried and built-in defaults are used when it is absent.
pub fn load_config(explicit: Option<&Path>) -> Result<DaemonConfig> {
    let config = match explicit {
        Some(path) => load_from(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_from(&path)?,
            _ => {
                info!("No config found, using defaults");
                DaemonConfig::default()
            }
        },
    };
    validate(&config)?;
    Ok(config)
}

/// Parse a config file; missing keys keep their defaults.
pub fn load_from(path: &Path) -> Result<DaemonConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse(&contents).with_context(|| format!("parsing config {}", path.display()))?;
    info!(?path, "Loaded config");
    Ok(config)
}

pub fn parse(contents: &str) -> Result<DaemonConfig> {
    Ok(toml::from_str(contents)?)
}

/// Reject settings the daemon cannot run with.
pub fn validate(config: &DaemonConfig) -> Result<()> {
    if config.poll_interval_ms == 0 {
        bail!("poll_interval_ms must be positive");
    }
    if config.poll_interval_ms > MAX_POLL_INTERVAL_MS {
        bail!("poll_interval_ms must not exceed {MAX_POLL_INTERVAL_MS}");
    }
    let threshold = config.sensors.fault_threshold;
    if threshold.is_nan() || threshold <= 0.0 {
        bail!("sensors.fault_threshold must be positive");
    }
    let t = &config.classifier;
    let angles = [
        ("flat_latitude", t.flat_latitude),
        ("upward_longitude", t.upward_longitude),
        ("downward_longitude", t.downward_longitude),
        ("edge_on_min", t.edge_on_min),
        ("edge_on_max", t.edge_on_max),
        ("laptop_min_tilt", t.laptop_min_tilt),
        ("laptop_max_tilt", t.laptop_max_tilt),
        ("tablet_min_tilt", t.tablet_min_tilt),
    ];
    for (name, value) in angles {
        if !value.is_finite() {
            bail!("classifier.{name} must be a finite angle");
        }
    }
    if t.edge_on_min >= t.edge_on_max {
        bail!("classifier.edge_on_min must be below edge_on_max");
    }
    if t.downward_longitude >= t.upward_longitude {
        bail!("classifier.downward_longitude must be below upward_longitude");
    }
    if t.laptop_min_tilt >= t.laptop_max_tilt || t.laptop_max_tilt > t.tablet_min_tilt {
        bail!("classifier laptop band must lie below tablet_min_tilt");
    }
    Ok(())
}
