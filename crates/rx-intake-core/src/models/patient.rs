//! Patient intake models.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// One submitted intake form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientIntake {
    /// Record UUID, generated locally
    pub id: String,
    /// Full name
    pub name: String,
    /// Contact e-mail (prescription recipient)
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Gender as entered ("Male", "Female", "Other")
    pub gender: String,
    /// Date of birth
    pub date_of_birth: NaiveDate,
    /// Weight as entered, in kg
    pub weight: Option<String>,
    /// Height as entered, in cm
    pub height: Option<String>,
    /// National ID number (12 digits when present)
    pub aadhaar_number: Option<String>,
    /// Postal address
    pub address: Option<String>,
    /// Primary condition
    pub medical_condition: String,
    /// Comma-delimited symptom list
    pub symptoms: Option<String>,
    /// Free-text history
    pub medical_history: Option<String>,
    /// Chosen products, by id or display name
    pub selected_products: Vec<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl PatientIntake {
    /// Create a new intake with required fields.
    pub fn new(
        name: String,
        email: String,
        phone: String,
        gender: String,
        date_of_birth: NaiveDate,
        medical_condition: String,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            phone,
            gender,
            date_of_birth,
            weight: None,
            height: None,
            aadhaar_number: None,
            address: None,
            medical_condition,
            symptoms: None,
            medical_history: None,
            selected_products: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Age in whole years on the given day.
    pub fn age_on(&self, today: NaiveDate) -> i64 {
        age_on(self.date_of_birth, today)
    }

    /// Last four characters of the national ID, or "N/A".
    pub fn id_suffix(&self) -> String {
        match self.aadhaar_number.as_deref().map(str::trim) {
            Some(number) if !number.is_empty() => {
                let chars: Vec<char> = number.chars().collect();
                chars[chars.len().saturating_sub(4)..].iter().collect()
            }
            _ => "N/A".to_string(),
        }
    }
}

/// Whole years between `date_of_birth` and `today`.
///
/// Calendar-year difference, less one if the birthday has not come round yet.
/// Negative when `date_of_birth` is in the future.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i64 {
    let mut years = i64::from(today.year()) - i64::from(date_of_birth.year());
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years
}
