//! Configuration for offsetdump

use eyre::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::spec::LineSep;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default block size for block mode, scan buffer size for line mode
    #[serde(default = "default_blocksize")]
    pub blocksize: u64,

    /// Default line separator for line mode
    #[serde(default = "default_linesep")]
    pub linesep: LineSep,
}

fn default_blocksize() -> u64 {
    crate::DEFAULT_BLOCKSIZE
}

fn default_linesep() -> LineSep {
    LineSep::Unix
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blocksize: default_blocksize(),
            linesep: default_linesep(),
        }
    }
}

impl Config {
    /// Load config from file, or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            return Ok(config);
        }

        // Try default locations
        let default_paths = [
            dirs::config_dir().map(|p| p.join("offsetdump").join("config.yml")),
            Some(PathBuf::from("offsetdump.yml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Config::default())
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
