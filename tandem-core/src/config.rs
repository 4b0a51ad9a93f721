//! Global tandem configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{TandemError, TandemResult};

static DEFAULT_DATA_PATH: &str = "~/tandem";

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_PATH)
}

fn is_default_data_path(p: &PathBuf) -> bool {
    *p == default_data_path()
}

/// Global configuration at ~/.config/tandem/config.toml
///
/// Everything else (events, chores) lives as files under `data_dir`.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TandemConfig {
    #[serde(default = "default_data_path", skip_serializing_if = "is_default_data_path")]
    pub data_dir: PathBuf,

    /// The two partner names sharing this household.
    #[serde(default)]
    pub partners: Vec<String>,
}

impl Default for TandemConfig {
    fn default() -> Self {
        TandemConfig {
            data_dir: default_data_path(),
            partners: Vec::new(),
        }
    }
}

impl TandemConfig {
    pub fn config_path() -> TandemResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TandemError::Config("Could not determine config directory".into()))?
            .join("tandem");

        Ok(config_dir.join("config.toml"))
    }

    /// Save the current config to ~/.config/tandem/config.toml
    pub fn save(&self) -> TandemResult<()> {
        let config_path = Self::config_path()?;

        let content =
            toml::to_string_pretty(self).map_err(|e| TandemError::Config(e.to_string()))?;

        std::fs::write(&config_path, content)
            .map_err(|e| TandemError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &std::path::Path) -> TandemResult<()> {
        let contents = format!(
            "\
# tandem configuration

# Where your household data lives:
# data_dir = \"{}\"

# The two of you:
# partners = [\"sam\", \"alex\"]
",
            DEFAULT_DATA_PATH
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TandemError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TandemError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
