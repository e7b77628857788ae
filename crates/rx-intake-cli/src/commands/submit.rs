use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rx_intake_core::{IntakeService, PatientIntake};
use serde::Deserialize;
use serde_json::Value;

/// Intake form as posted by the web client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub aadhaar_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    pub medical_condition: String,
    #[serde(default)]
    pub symptoms: Option<String>,
    #[serde(default)]
    pub medical_history: Option<String>,
    #[serde(default)]
    pub selected_products: Vec<String>,
}

impl From<IntakeForm> for PatientIntake {
    fn from(form: IntakeForm) -> Self {
        let mut intake = PatientIntake::new(
            form.name,
            form.email,
            form.phone,
            form.gender,
            form.date_of_birth,
            form.medical_condition,
        );
        intake.weight = form.weight;
        intake.height = form.height;
        intake.aadhaar_number = form.aadhaar_number;
        intake.address = form.address;
        intake.symptoms = form.symptoms;
        intake.medical_history = form.medical_history;
        intake.selected_products = form.selected_products;
        intake
    }
}

/// Store the form in `path` and return the prescription and e-mail.
pub fn run(service: &IntakeService, path: &Path, today: NaiveDate) -> Result<Value> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading intake form {}", path.display()))?;
    let form: IntakeForm = serde_json::from_str(&contents)
        .with_context(|| format!("parsing intake form {}", path.display()))?;

    let intake = PatientIntake::from(form);
    let submission = service
        .submit(&intake, today)
        .with_context(|| format!("submitting intake for {}", intake.name))?;

    let mut value = serde_json::to_value(&submission)?;
    value["prescription_text"] = Value::String(submission.prescription.render_text());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_intake_core::{Database, IntakeConfig, ProductCatalog};

    const FORM: &str = r#"{
        "name": "Leela Iyer",
        "email": "leela@example.com",
        "phone": "9811122233",
        "gender": "Female",
        "dateOfBirth": "2012-08-30",
        "aadhaarNumber": "555566667777",
        "medicalCondition": "Epilepsy",
        "symptoms": "Epilepsy, ADHD",
        "selectedProducts": ["Placidol (Pure CBD)", "Vijaya Amrit (High CBD)"]
    }"#;

    fn service() -> IntakeService {
        IntakeService::new(
            Database::open_in_memory().unwrap(),
            ProductCatalog::builtin().unwrap(),
            IntakeConfig::default(),
        )
    }

    #[test]
    fn test_submit_minor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.json");
        std::fs::write(&path, FORM).unwrap();

        let service = service();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let value = run(&service, &path, today).unwrap();

        let lines = value["prescription"]["lines"].as_array().unwrap();
        assert_eq!(lines[0]["dose"], "2-4 drops twice daily");
        assert_eq!(lines[0]["source"], "child_band");
        // No pediatric band and no generic dose
        assert_eq!(lines[1]["dose"], "Consult Physician");

        assert_eq!(value["email"]["attachment_filename"], "Prescription-Leela_Iyer.pdf");
        assert!(value["prescription_text"].as_str().unwrap().contains("ID: 7777"));

        let id = value["intake_id"].as_str().unwrap();
        assert!(service.get(id).unwrap().is_some());
    }

    #[test]
    fn test_missing_form_file() {
        let service = service();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let err = run(&service, Path::new("/nonexistent/form.json"), today).unwrap_err();
        assert!(format!("{err:#}").contains("reading intake form"));
    }
}
