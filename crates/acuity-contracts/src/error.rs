//! Error types for the acuity assessment workspace.
//!
//! All fallible operations return `AcuityResult<T>`. Every variant is a
//! caller-correctable rejection: the session a failed call was given is
//! never modified.

use thiserror::Error;

/// The unified error type for scoring, banding, reference data and storage.
#[derive(Debug, Error)]
pub enum AcuityError {
    /// The selected value matches none of the question's options.
    #[error("invalid selection '{value}' for question '{question_id}'")]
    InvalidSelection { question_id: String, value: String },

    /// The question is not part of the applicable set for this patient.
    #[error("unknown question '{question_id}' for the current patient context")]
    UnknownQuestion { question_id: String },

    /// Patient demographics failed validation (e.g. age out of range).
    #[error("invalid patient data: {reason}")]
    InvalidPatient { reason: String },

    /// A submission was requested before every question and field was filled in.
    #[error("assessment is incomplete: missing {}", missing.join(", "))]
    IncompleteAssessment { missing: Vec<String> },

    /// The session was already persisted and can no longer be changed.
    #[error("session '{session_id}' has already been submitted")]
    SessionClosed { session_id: String },

    /// The band table or another configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// Question reference data could not be loaded or failed validation.
    #[error("reference data error: {reason}")]
    ReferenceData { reason: String },

    /// A submission sink or draft store could not complete the operation.
    #[error("storage error: {reason}")]
    StorageError { reason: String },

    /// No stored submission has the requested id.
    #[error("submission '{id}' not found")]
    NotFound { id: String },
}

/// Convenience alias used throughout the acuity crates.
pub type AcuityResult<T> = Result<T, AcuityError>;
