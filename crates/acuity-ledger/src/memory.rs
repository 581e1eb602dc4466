//! In-memory implementation of `SubmissionSink`.
//!
//! `InMemoryLedger` keeps every submission in a hash-chained `Vec` behind a
//! `Mutex`, so it can be shared across threads while an `Assessor` writes to
//! it and an overview screen reads from it.
//!
//! Use `history()` and `get()` to read submissions back, `unit_metrics()`
//! for the admin overview, and `verify_integrity()` to confirm no stored
//! assessment has been altered.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    session::SessionId,
    submission::AssessmentSubmission,
};
use acuity_core::traits::SubmissionSink;

use crate::{
    chain::{hash_entry, verify_chain},
    entry::LedgerEntry,
    filter::HistoryFilter,
    metrics::{unit_shift_metrics, UnitShiftMetrics},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct LedgerState {
    /// All entries, in append order.
    pub(crate) entries: Vec<LedgerEntry>,

    /// `this_hash` of the last entry, or `GENESIS_HASH` when empty.
    pub(crate) last_hash: String,
}

// ── Public ledger ─────────────────────────────────────────────────────────────

/// An append-only submission store backed by a SHA-256 hash chain.
///
/// Cloning shares the underlying state.
#[derive(Clone)]
pub struct InMemoryLedger {
    pub(crate) state: Arc<Mutex<LedgerState>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        let state = LedgerState {
            entries: Vec::new(),
            last_hash: LedgerEntry::GENESIS_HASH.to_string(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Number of stored submissions.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The stored submission with `id`.
    pub fn get(&self, id: &SessionId) -> AcuityResult<AssessmentSubmission> {
        self.lock()
            .entries
            .iter()
            .find(|e| &e.submission.id == id)
            .map(|e| e.submission.clone())
            .ok_or_else(|| AcuityError::NotFound { id: id.to_string() })
    }

    /// Submissions matching `filter`, newest assessment first.
    pub fn history(&self, filter: &HistoryFilter) -> Vec<AssessmentSubmission> {
        let state = self.lock();
        let mut matches: Vec<AssessmentSubmission> = state
            .entries
            .iter()
            .map(|e| &e.submission)
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.assessed_at.cmp(&a.assessed_at));
        debug!(matched = matches.len(), total = state.entries.len(), "history queried");
        matches
    }

    /// Per-unit morning/evening score averages over every stored submission.
    pub fn unit_metrics(&self) -> Vec<UnitShiftMetrics> {
        let state = self.lock();
        unit_shift_metrics(state.entries.iter().map(|e| &e.submission))
    }

    /// Copy of every entry in chain order.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.lock().entries.clone()
    }

    /// `this_hash` of the last entry; empty when the ledger is empty.
    pub fn terminal_hash(&self) -> String {
        self.lock()
            .entries
            .last()
            .map(|e| e.this_hash.clone())
            .unwrap_or_default()
    }

    /// Verify that no stored entry has been altered.
    pub fn verify_integrity(&self) -> bool {
        let ok = verify_chain(&self.lock().entries);
        if !ok {
            warn!("submission ledger failed integrity verification");
        }
        ok
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LedgerState> {
        self.state.lock().expect("ledger state lock poisoned")
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

// ── SubmissionSink impl ───────────────────────────────────────────────────────

impl SubmissionSink for InMemoryLedger {
    /// Append one submission to the hash chain.
    ///
    /// Returns `StorageError` if a submission with the same id is already
    /// stored or the lock is poisoned.
    fn submit(&self, submission: &AssessmentSubmission) -> AcuityResult<()> {
        let mut state = self.state.lock().map_err(|e| AcuityError::StorageError {
            reason: format!("ledger state lock poisoned: {}", e),
        })?;

        if state.entries.iter().any(|e| e.submission.id == submission.id) {
            return Err(AcuityError::StorageError {
                reason: format!("submission '{}' is already stored", submission.id),
            });
        }

        let sequence = state.entries.len() as u64;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_entry(sequence, submission, &prev_hash)?;

        state.entries.push(LedgerEntry {
            sequence,
            submission: submission.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.last_hash = this_hash;

        info!(
            submission_id = %submission.id,
            sequence,
            total_score = submission.total_score,
            "submission appended to ledger"
        );
        Ok(())
    }
}
