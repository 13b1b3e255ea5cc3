use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::task::Quadrant;
use crate::{qlog_debug, Error, Result};

const DEFAULT_STORAGE_KEY: &str = "tasks";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Key the task collection is stored under in the session store.
    pub storage_key: Option<String>,
    /// Overrides the session directory (defaults to `$XDG_RUNTIME_DIR/quadrant`).
    pub session_dir: Option<String>,
    /// Quadrant focused at startup, and the default target for `add`.
    pub default_quadrant: Option<Quadrant>,
}

impl Config {
    pub fn quadrant_dir() -> Result<PathBuf> {
        Ok(dirs::home_dir().ok_or(Error::NoHomeDir)?.join(".quadrant"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::quadrant_dir()?.join("quadrant.toml"))
    }

    /// Directory backing the session store, if this environment has one.
    ///
    /// The runtime directory is cleared when the login session ends, which
    /// gives the stored board its session lifetime. No runtime directory and
    /// no override means there is no session context.
    pub fn session_dir(&self) -> Option<PathBuf> {
        match &self.session_dir {
            Some(dir) => Some(expand_tilde(dir)),
            None => dirs::runtime_dir().map(|d| d.join("quadrant")),
        }
    }

    pub fn effective_storage_key(&self) -> &str {
        self.storage_key.as_deref().unwrap_or(DEFAULT_STORAGE_KEY)
    }

    pub fn effective_default_quadrant(&self) -> Quadrant {
        self.default_quadrant.unwrap_or_default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read settings from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        qlog_debug!("Config::load path={}", path.display());
        if !path.exists() {
            qlog_debug!("Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config: Self = toml::from_str(&fs::read_to_string(path)?)?;
        qlog_debug!(
            "Config loaded: storage_key={:?}, session_dir={:?}, default_quadrant={:?}",
            config.storage_key,
            config.session_dir,
            config.default_quadrant
        );
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.exists()) {
            qlog_debug!("Creating config directory: {}", dir.display());
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        qlog_debug!("Config saved to {}", path.display());
        Ok(())
    }

    /// Copy with every default spelled out, as written by `quadrant init`.
    pub fn resolved(&self) -> Self {
        Self {
            storage_key: Some(self.effective_storage_key().to_string()),
            session_dir: self.session_dir.clone(),
            default_quadrant: Some(self.effective_default_quadrant()),
        }
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}
