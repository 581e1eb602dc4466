//! # acuity-bands
//!
//! The acuity interpretation table, loaded from TOML.
//!
//! ## Overview
//!
//! This crate provides [`BandTable`], which implements the
//! [`Interpreter`](acuity_core::traits::Interpreter) trait. Bands are
//! declared in a TOML file in ascending order, each with an inclusive
//! `max_score`; the last band is open-ended. A score belongs to the first
//! band whose `max_score` it does not exceed.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use acuity_bands::BandTable;
//!
//! let table = BandTable::standard()?;
//! // Pass `table` to `acuity_core::Assessor::new(...)`.
//! ```

pub mod config;
pub mod table;

pub use config::BandConfig;
pub use table::{BandTable, STANDARD_BANDS};

// ── Tests ─────────────────────────────────────────────────────────────────────
