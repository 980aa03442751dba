use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// Optional settings read from `{config_dir}/waed/config.json`.
///
/// The API key from `GEMINI_API_KEY` takes precedence over the file; nothing
/// is written back, the file is user-managed.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("waed").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_and_partial_files() {
        let full: Config =
            serde_json::from_str(r#"{"api_key": "k-123", "model": "gemini-2.5-pro"}"#).unwrap();
        assert_eq!(full.api_key.as_deref(), Some("k-123"));
        assert_eq!(full.model.as_deref(), Some("gemini-2.5-pro"));

        let partial: Config = serde_json::from_str(r#"{"model": "gemini-2.5-flash"}"#).unwrap();
        assert!(partial.api_key.is_none());
        assert_eq!(partial.model.as_deref(), Some("gemini-2.5-flash"));
    }
}
