//! CLI configuration utilities

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Base origin of the fleet API
    pub base_url: String,
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            base_url: muster_http::client::DEFAULT_BASE_URL.to_string(),
            user_agent: None,
        }
    }
}

/// Load configuration from JSON file, falling back to defaults when the
/// file does not exist
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CliConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: CliConfig = serde_json::from_str(&content)?;
    Ok(config)
}

/// Save configuration to JSON file
pub fn save_config<P: AsRef<Path>>(config: &CliConfig, path: P) -> Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Generate a default configuration file
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let config = CliConfig::default();
    save_config(&config, path)
}
