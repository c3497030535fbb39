//! Cached orchestrator host/port, stored in `~/.config/learngen/prefs.toml`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Overrides the preference directory (used by tests and sandboxes).
pub const CONFIG_DIR_ENV: &str = "LEARNGEN_CONFIG_DIR";

/// Preference storage errors
#[derive(Error, Debug)]
pub enum PrefsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unknown preference '{0}' (expected host or port)")]
    UnknownKey(String),
}

/// The two remembered settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKey {
    Host,
    Port,
}

impl PrefKey {
    pub const ALL: [PrefKey; 2] = [PrefKey::Host, PrefKey::Port];

    pub fn as_str(self) -> &'static str {
        match self {
            PrefKey::Host => "host",
            PrefKey::Port => "port",
        }
    }
}

impl fmt::Display for PrefKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrefKey {
    type Err = PrefsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "host" => Ok(PrefKey::Host),
            "port" => Ok(PrefKey::Port),
            other => Err(PrefsError::UnknownKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct PrefsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    port: Option<String>,
}

impl PrefsFile {
    fn slot(&mut self, key: PrefKey) -> &mut Option<String> {
        match key {
            PrefKey::Host => &mut self.host,
            PrefKey::Port => &mut self.port,
        }
    }
}

/// Key/value store persisted on every write. Last write wins.
#[derive(Debug, Clone)]
pub struct PrefStore {
    path: PathBuf,
    values: PrefsFile,
}

impl PrefStore {
    /// Load preferences from `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PrefsError> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "No preference file yet");
            return Ok(Self {
                path,
                values: PrefsFile::default(),
            });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| PrefsError::Read {
            path: path.clone(),
            source,
        })?;
        let values = toml::from_str(&content).map_err(|source| PrefsError::Parse {
            path: path.clone(),
            source,
        })?;

        Ok(Self { path, values })
    }

    /// Load from [`PrefStore::default_path`].
    pub fn open_default() -> Result<Self, PrefsError> {
        Self::open(Self::default_path())
    }

    /// `$LEARNGEN_CONFIG_DIR/prefs.toml`, else `<config dir>/learngen/prefs.toml`.
    pub fn default_path() -> PathBuf {
        match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir).join("prefs.toml"),
            _ => dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("learngen")
                .join("prefs.toml"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: PrefKey) -> Option<&str> {
        match key {
            PrefKey::Host => self.values.host.as_deref(),
            PrefKey::Port => self.values.port.as_deref(),
        }
    }

    /// Store `value` under `key` and persist immediately.
    pub fn set(&mut self, key: PrefKey, value: impl Into<String>) -> Result<(), PrefsError> {
        *self.values.slot(key) = Some(value.into());
        self.save()
    }

    /// Forget `key` and persist immediately.
    pub fn clear(&mut self, key: PrefKey) -> Result<(), PrefsError> {
        *self.values.slot(key) = None;
        self.save()
    }

    fn save(&self) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| PrefsError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let content = toml::to_string(&self.values)?;
        std::fs::write(&self.path, content).map_err(|source| PrefsError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "Saved preferences");
        Ok(())
    }
}
