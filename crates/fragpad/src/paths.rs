use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "FRAGPAD_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "FRAGPAD_DATA_DIR";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "Fragpad";
const APPLICATION: &str = "fragpad";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION);
        let config_dir = match env_override(ENV_CONFIG_DIR) {
            Some(dir) => dir,
            None => project_dirs
                .as_ref()
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| anyhow!("failed to determine user config directory"))?,
        };
        let data_dir = match env_override(ENV_DATA_DIR) {
            Some(dir) => dir,
            None => project_dirs
                .as_ref()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| anyhow!("failed to determine user data directory"))?,
        };

        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Shader opened when no path is given on the command line.
    pub fn scratch_shader(&self) -> PathBuf {
        self.data_dir.join("scratch.frag")
    }
}

#[cfg(test)]
impl AppPaths {
    pub fn from_raw(config_dir: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_dir,
            data_dir,
        }
    }
}

fn env_override(name: &str) -> Option<PathBuf> {
    match env::var_os(name) {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}
