//! Session marker persistence.
//!
//! The authenticated flag outlives a crash but not a clean exit: a marker
//! file with a fixed name is written on login, removed on logout, and removed
//! again when the process shuts down normally. This mirrors per-session
//! storage rather than a durable account store.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

const SESSION_FILE: &str = "waed_session";

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store rooted in the platform state directory.
    pub fn new() -> Result<Self> {
        let base = dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .ok_or_else(|| anyhow!("Could not determine state directory"))?;
        Ok(Self::at(&base.join("waed")))
    }

    /// Store rooted in an explicit directory (used by tests).
    pub fn at(dir: &Path) -> Self {
        Self {
            path: dir.join(SESSION_FILE),
        }
    }

    pub fn is_active(&self) -> bool {
        self.path.exists()
    }

    pub fn activate(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, b"1")?;
        Ok(())
    }

    /// Remove the marker. Missing files are fine; a session that was never
    /// activated clears to the same place.
    pub fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to clear session marker: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_is_inactive() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path());
        assert!(!store.is_active());
    }

    #[test]
    fn activate_then_clear_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path());

        store.activate().unwrap();
        assert!(store.is_active());

        store.clear();
        assert!(!store.is_active());
    }

    #[test]
    fn clearing_an_inactive_store_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path());
        store.clear();
        assert!(!store.is_active());
    }

    #[test]
    fn activate_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(&dir.path().join("nested/state"));
        store.activate().unwrap();
        assert!(store.is_active());
    }
}
