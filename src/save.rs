use std::fs;
use std::path::Path;

use meadow_world::ConfigError;
use serde::{Deserialize, Serialize};

/// End-of-session summary written by the CLI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub seed: i32,
    pub area_mowed: f32,
    pub coverage_percent: f32,
    #[serde(default)]
    pub discovered: Vec<String>,
}

impl SessionRecord {
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let s = self.to_toml()?;
        fs::write(path, s).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
