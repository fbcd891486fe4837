//! Run configuration loaded from a YAML or JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use kfuzzy::Options;
use serde::{Deserialize, Serialize};

use crate::reader::InputFormat;

/// Configuration file format. Every key is optional; command-line flags
/// take precedence over anything set here.
///
/// ```yaml
/// blending: 1.8
/// max_iterations: 500
/// clusters: 4
/// format: tab
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blending: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,

    /// Cluster count used when neither the flag nor the input sets one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clusters: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<InputFormat>,
}

impl RunConfig {
    /// Builds engine options, preferring explicit overrides.
    pub fn options(&self, blending: Option<f64>, max_iterations: Option<usize>) -> Options {
        let defaults = Options::default();
        Options::new(
            blending.or(self.blending).unwrap_or(defaults.blending),
            max_iterations
                .or(self.max_iterations)
                .unwrap_or(defaults.max_iterations),
        )
    }
}

/// Loads a config file, picking the parser by extension.
pub fn load(path: &Path) -> Result<RunConfig> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    let data = std::fs::read(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;

    let cfg: RunConfig = match ext {
        "json" => serde_json::from_slice(&data)
            .with_context(|| format!("invalid JSON config {}", path.display()))?,
        "yaml" | "yml" => serde_yaml::from_slice(&data)
            .with_context(|| format!("invalid YAML config {}", path.display()))?,
        _ => anyhow::bail!("unsupported config extension: {}", path.display()),
    };

    tracing::debug!(path = %path.display(), ?cfg, "loaded config");
    Ok(cfg)
}
