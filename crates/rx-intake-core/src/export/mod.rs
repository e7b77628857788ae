//! Prescription and e-mail exports for a submitted intake.

mod email;
mod prescription;

pub use email::*;
pub use prescription::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Everything produced by one form submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntakeSubmission {
    /// Stored intake id
    pub intake_id: String,
    pub prescription: Prescription,
    pub email: PrescriptionEmail,
}

impl IntakeSubmission {
    /// Export as pretty JSON.
    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
