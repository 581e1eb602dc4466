//! # acuity-ledger
//!
//! Storage for acuity assessments: an append-only, SHA-256 hash-chained
//! submission ledger and the draft stores that hold in-progress sessions.
//!
//! ## Overview
//!
//! Every submission the ledger accepts is wrapped in a `LedgerEntry` linked
//! to the previous entry by hash. Editing a stored assessment after the fact,
//! even a single score, breaks the chain and is detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use acuity_ledger::{HistoryFilter, InMemoryLedger};
//! use acuity_core::traits::SubmissionSink;
//!
//! let ledger = InMemoryLedger::new();
//! ledger.submit(&submission)?;
//!
//! assert!(ledger.verify_integrity());
//! let recent = ledger.history(&HistoryFilter::default());
//! ```

pub mod chain;
pub mod draft;
pub mod entry;
pub mod filter;
pub mod memory;
pub mod metrics;

pub use chain::{hash_entry, verify_chain};
pub use draft::{InMemoryDraftStore, JsonFileDraftStore};
pub use entry::LedgerEntry;
pub use filter::HistoryFilter;
pub use memory::InMemoryLedger;
pub use metrics::{unit_shift_metrics, UnitShiftMetrics};

// ── Tests ─────────────────────────────────────────────────────────────────────
