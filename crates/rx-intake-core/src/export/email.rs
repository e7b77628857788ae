//! Outgoing prescription e-mail. Composition only; delivery is up to the host.

use serde::{Deserialize, Serialize};

use crate::config::EmailConfig;
use crate::models::PatientIntake;

use super::attachment_filename;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Envelope and body for the prescription mail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrescriptionEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
    pub attachment_filename: String,
    pub content_type: String,
}

impl PrescriptionEmail {
    pub fn compose(intake: &PatientIntake, sender: &EmailConfig) -> Self {
        let name = intake.name.as_str();
        Self {
            to: intake.email.trim().to_string(),
            from: format!("\"{}\" <{}>", sender.sender_name, sender.sender_address),
            subject: format!("Prescription for {name}"),
            body: format!(
                "Dear {name},\n\nPlease find the attached {} e-prescription.\n\nRegards,\n{}",
                sender.sender_name, sender.signature
            ),
            attachment_filename: attachment_filename(name),
            content_type: PDF_CONTENT_TYPE.to_string(),
        }
    }
}
