//! File-backed key-value storage for persisted state blobs

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

/// Well-known storage key for the timer registry
pub const TIMERS_KEY: &str = "recipeTimers";
/// Well-known storage key for cooking-step progress
pub const PROGRESS_KEY: &str = "cookingProgress";
/// Well-known storage key for saved serving counts
pub const SERVINGS_KEY: &str = "servingCounts";

/// Synchronous string-blob store, one JSON file per key under a data
/// directory. Small blobs, synchronous access, and failures quiet enough
/// that a session can keep going in memory when the disk misbehaves.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read a blob; missing keys are `None`, unreadable files are logged
    /// and treated as missing
    pub fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Some(blob),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read storage key '{}': {}", key, e);
                None
            }
        }
    }

    /// Write a blob for a key
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::write(self.path_for(key), value)
            .with_context(|| format!("Failed to write storage key '{}'", key))
    }

    /// Erase a key; removing a key that was never written is fine
    pub fn remove(&self, key: &str) {
        if let Err(e) = fs::remove_file(self.path_for(key)) {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove storage key '{}': {}", key, e);
            }
        }
    }
}
