//! JSON configuration files for parameter sets and engine tuning.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use humanizer_dsp::{DspParams, EngineTuning};
use serde::de::DeserializeOwned;

fn load_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file: {}", what, path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {} file: {}", what, path.display()))
}

/// Loads and validates a [`DspParams`] file.
pub fn load_params(path: &Path) -> Result<DspParams> {
    let params: DspParams = load_json(path, "parameter")?;
    params
        .validate()
        .with_context(|| format!("Invalid parameters in {}", path.display()))?;
    Ok(params)
}

/// Loads and validates an [`EngineTuning`] file. Missing fields keep
/// their defaults.
pub fn load_tuning(path: &Path) -> Result<EngineTuning> {
    let tuning: EngineTuning = load_json(path, "tuning")?;
    tuning
        .validate()
        .with_context(|| format!("Invalid tuning in {}", path.display()))?;
    Ok(tuning)
}
