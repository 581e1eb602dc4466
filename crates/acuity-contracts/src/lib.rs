//! # acuity-contracts
//!
//! Shared types, payloads, and errors for the patient acuity assessment
//! workspace.
//!
//! All crates in the workspace import from here. No scoring logic lives in
//! this crate, only data definitions, small accessors, and error types.

pub mod error;
pub mod patient;
pub mod question;
pub mod score;
pub mod session;
pub mod submission;
