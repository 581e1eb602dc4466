//! Hash-chain primitives: hashing and chain verification.
//!
//! Hash input layout (bytes, in order):
//!   1. sequence as 8-byte little-endian
//!   2. prev_hash as UTF-8 bytes (64 ASCII hex chars)
//!   3. compact JSON of the submission

use sha2::{Digest, Sha256};

use acuity_contracts::{
    error::{AcuityError, AcuityResult},
    submission::AssessmentSubmission,
};

use crate::entry::LedgerEntry;

/// Compute the SHA-256 hash for one ledger entry as a lowercase hex string.
pub fn hash_entry(
    sequence: u64,
    submission: &AssessmentSubmission,
    prev_hash: &str,
) -> AcuityResult<String> {
    let submission_json =
        serde_json::to_vec(submission).map_err(|e| AcuityError::StorageError {
            reason: format!("failed to serialize submission {}: {}", submission.id, e),
        })?;

    let mut hasher = Sha256::new();
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&submission_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of a ledger.
///
/// Valid when every entry's `sequence` equals its position, its `prev_hash`
/// equals the previous entry's `this_hash` (or `GENESIS_HASH` first), and
/// its `this_hash` matches the recomputed value. An empty ledger is valid.
pub fn verify_chain(entries: &[LedgerEntry]) -> bool {
    let mut expected_prev = LedgerEntry::GENESIS_HASH.to_string();

    for (position, entry) in entries.iter().enumerate() {
        if entry.sequence != position as u64 || entry.prev_hash != expected_prev {
            return false;
        }

        match hash_entry(entry.sequence, &entry.submission, &entry.prev_hash) {
            Ok(recomputed) if recomputed == entry.this_hash => {}
            _ => return false,
        }

        expected_prev = entry.this_hash.clone();
    }

    true
}
