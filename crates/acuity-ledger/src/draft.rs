//! Draft stores: where an in-progress session waits to be resumed.
//!
//! Both stores hold at most one session. `JsonFileDraftStore` survives a
//! restart; `InMemoryDraftStore` is for tests and single-run tools.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    session::AssessmentSession,
};
use acuity_core::traits::DraftStore;

/// Keeps the draft in process memory. Clones share the slot.
#[derive(Clone, Default)]
pub struct InMemoryDraftStore {
    slot: Arc<Mutex<Option<AssessmentSession>>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> AcuityResult<std::sync::MutexGuard<'_, Option<AssessmentSession>>> {
        self.slot.lock().map_err(|e| AcuityError::StorageError {
            reason: format!("draft lock poisoned: {}", e),
        })
    }
}

impl DraftStore for InMemoryDraftStore {
    fn save(&self, session: &AssessmentSession) -> AcuityResult<()> {
        *self.lock()? = Some(session.clone());
        Ok(())
    }

    fn load(&self) -> AcuityResult<Option<AssessmentSession>> {
        Ok(self.lock()?.clone())
    }

    fn clear(&self) -> AcuityResult<()> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Keeps the draft as pretty-printed JSON in a single file.
///
/// Writes go to `<path>.tmp` first and are renamed into place, so a
/// crash mid-write leaves the previous draft readable.
#[derive(Debug, Clone)]
pub struct JsonFileDraftStore {
    path: PathBuf,
}

impl JsonFileDraftStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<path>.tmp`, always distinct from `path` itself.
    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    fn storage_error(&self, action: &str, e: impl std::fmt::Display) -> AcuityError {
        AcuityError::StorageError {
            reason: format!("failed to {action} draft '{}': {e}", self.path.display()),
        }
    }
}

impl DraftStore for JsonFileDraftStore {
    fn save(&self, session: &AssessmentSession) -> AcuityResult<()> {
        let json = serde_json::to_vec_pretty(session).map_err(|e| self.storage_error("encode", e))?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, json).map_err(|e| self.storage_error("write", e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.storage_error("replace", e))?;
        debug!(path = %self.path.display(), session_id = %session.id, "draft saved");
        Ok(())
    }

    fn load(&self) -> AcuityResult<Option<AssessmentSession>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.storage_error("read", e)),
        };
        let session = serde_json::from_slice(&bytes).map_err(|e| self.storage_error("decode", e))?;
        Ok(Some(session))
    }

    fn clear(&self) -> AcuityResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.storage_error("remove", e)),
        }
    }
}
