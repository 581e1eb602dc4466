//! Ledger entry type.
//!
//! `LedgerEntry` wraps one persisted `AssessmentSubmission` with its
//! position in the ledger and the SHA-256 hashes that make later edits to a
//! stored assessment detectable.

use serde::{Deserialize, Serialize};

use acuity_contracts::submission::AssessmentSubmission;

/// A single entry in the submission hash chain.
///
/// Each entry commits to the previous one via `prev_hash`. Changing any
/// field of the embedded submission invalidates `this_hash` and, through
/// it, every later `prev_hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Position in the ledger, starting at 0.
    pub sequence: u64,

    /// The submission as it was received.
    pub submission: AssessmentSubmission,

    /// Hash (hex) of the previous entry, or `GENESIS_HASH` for the first.
    pub prev_hash: String,

    /// Hash (hex) over (sequence, prev_hash, canonical JSON of submission).
    pub this_hash: String,
}

impl LedgerEntry {
    /// The `prev_hash` of the first entry: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}
