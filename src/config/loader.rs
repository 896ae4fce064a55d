use std::path::Path;

use anyhow::{Context, Result};

use super::types::Config;

/// File name looked up next to the input document.
pub const CONFIG_FILE_NAME: &str = ".liftr.yml";

/// Load config from a `.liftr.yml` file in the given directory.
///
/// Falls back to [`Config::default`] when the file does not exist.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_file(&path)
}

/// Load config from an explicit YAML file. Missing fields take their defaults.
pub fn load_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    // An empty file deserializes to unit, not a mapping.
    if contents.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(config)
}
