//! XDG Base Directory Support
//!
//! cvrag keeps no local data (the vector store is hosted), so the
//! only XDG location it needs is the config directory.

use std::env;
use std::path::PathBuf;

/// XDG directory structure for cvrag
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
}

impl XdgDirs {
    /// Resolve directories from the environment.
    ///
    /// Priority order (highest to lowest):
    /// 1. CVRAG_CONFIG_DIR
    /// 2. XDG_CONFIG_HOME
    /// 3. ~/.config
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve_config_dir(),
        }
    }

    fn resolve_config_dir() -> PathBuf {
        if let Ok(dir) = env::var("CVRAG_CONFIG_DIR") {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("cvrag");
        }

        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("cvrag")
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Log the resolved paths
    pub fn log_paths(&self) {
        tracing::debug!("Config file: {:?}", self.config_file());
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
