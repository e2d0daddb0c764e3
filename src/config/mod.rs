//! Runner configuration - backend selection and runtime options
//!
//! Loaded from TOML:
//!
//! ```toml
//! backend = "tokio-multi-thread"
//! worker_threads = 2
//! thread_name = "my-tests"
//! shutdown_timeout_ms = 500
//! ```

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::backend::Backend;

/// Path of the config file to load, overriding the default location
pub const CONFIG_ENV: &str = "SYNC_BRIDGE_CONFIG";

/// Backend name overriding whatever the config file selects
pub const BACKEND_ENV: &str = "SYNC_BRIDGE_BACKEND";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Scheduler the runner binds to
    pub backend: Backend,

    /// Worker threads for `tokio-multi-thread`; unset or 0 means one per core
    pub worker_threads: Option<usize>,

    /// Prefix for scheduler thread names, completed with the runner id
    pub thread_name: String,

    /// Bound on how long `close` waits for scheduler threads.
    /// Unset means wait for all of them.
    pub shutdown_timeout_ms: Option<u64>,

    pub enable_io: bool,
    pub enable_time: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            worker_threads: None,
            thread_name: "sync-bridge".to_string(),
            shutdown_timeout_ms: None,
            enable_io: true,
            enable_time: true,
        }
    }
}

impl RunnerConfig {
    pub fn shutdown_timeout(&self) -> Option<Duration> {
        self.shutdown_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Load the configuration, falling back to defaults.
///
/// A missing file yields the defaults silently; an unreadable or malformed
/// one is logged and also yields the defaults. `SYNC_BRIDGE_BACKEND` is
/// applied last.
pub fn load() -> RunnerConfig {
    let mut config = match config_path() {
        Some(path) if path.exists() => load_from(&path).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Using default runner config");
            RunnerConfig::default()
        }),
        _ => RunnerConfig::default(),
    };
    apply_backend_override(&mut config, std::env::var_os(BACKEND_ENV));
    config
}

/// Load the configuration at `path`, failing on any read or parse error
pub fn load_from(path: &Path) -> Result<RunnerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str::<RunnerConfig>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("sync-bridge").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "sync-bridge", "sync-bridge")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn apply_backend_override(config: &mut RunnerConfig, value: Option<OsString>) {
    let Some(value) = value else {
        return;
    };
    let Some(name) = value.to_str() else {
        tracing::warn!(env = BACKEND_ENV, "Ignoring non UTF-8 backend override");
        return;
    };
    match name.parse::<Backend>() {
        Ok(backend) => config.backend = backend,
        Err(err) => tracing::warn!(env = BACKEND_ENV, error = %err, "Ignoring backend override"),
    }
}
