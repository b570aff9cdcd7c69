use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory vector stores persist into when the caller gives no path.
pub const DEFAULT_PERSIST_DIR: &str = "./storage";

/// File name used inside the persist directory.
pub const DEFAULT_PERSIST_FNAME: &str = "vector_store.json";

/// Environment variable overriding the persist directory.
pub const PERSIST_DIR_ENV: &str = "LODESTAR_PERSIST_DIR";

/// Where a vector store writes its state on `persist`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistConfig {
    pub persist_dir: PathBuf,
    pub persist_fname: String,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            persist_dir: PathBuf::from(DEFAULT_PERSIST_DIR),
            persist_fname: DEFAULT_PERSIST_FNAME.to_string(),
        }
    }
}

impl PersistConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, with the directory taken from `LODESTAR_PERSIST_DIR` if set.
    pub fn from_env() -> Self {
        match std::env::var(PERSIST_DIR_ENV) {
            Ok(dir) if !dir.trim().is_empty() => {
                tracing::debug!(dir = %dir, "persist dir from environment");
                Self::default().with_persist_dir(dir)
            }
            _ => Self::default(),
        }
    }

    pub fn with_persist_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.persist_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn with_persist_fname(mut self, fname: impl Into<String>) -> Self {
        self.persist_fname = fname.into();
        self
    }

    /// Full path of the persisted file.
    pub fn persist_path(&self) -> PathBuf {
        self.persist_dir.join(&self.persist_fname)
    }
}
