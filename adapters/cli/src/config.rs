//! TOML configuration files.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use bridge_crew_core::SimulationConfig;

/// Loads the configuration at `path`, or the defaults when no file was named.
pub(crate) fn load(path: Option<&Path>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration file {}", path.display()))?;
    parse(&text).with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Parses configuration text; keys that are absent keep their defaults.
pub(crate) fn parse(text: &str) -> Result<SimulationConfig> {
    toml::from_str(text).context("failed to parse TOML")
}
