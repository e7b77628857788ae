//! Prescription document assembled from an intake.

use std::fmt::Write as _;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{ClinicConfig, PrescriptionConfig};
use crate::models::PatientIntake;
use crate::resolver::{DoseSource, Resolver};

use super::ExportResult;

/// A prescription ready for rendering or attachment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prescription {
    pub clinic: ClinicConfig,
    pub patient: PrescriptionPatient,
    /// Issue date, DD/MM/YYYY
    pub issued_on: String,
    pub medical_condition: String,
    pub symptoms: Option<String>,
    pub medical_history: Option<String>,
    pub lines: Vec<PrescriptionLine>,
    pub advice: Vec<String>,
    pub notes: Vec<String>,
    pub guidance_url: Option<String>,
    pub validity_note: String,
}

/// Patient block on the prescription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionPatient {
    pub name: String,
    pub phone: String,
    pub age: i64,
    pub gender: String,
    /// Last four characters of the national ID, or "N/A"
    pub id_suffix: String,
}

/// One prescribed product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescriptionLine {
    pub product_name: String,
    pub days: u32,
    pub dose: String,
    pub remark: String,
    pub source: DoseSource,
}

impl Prescription {
    /// Build the prescription for an intake as of `today`.
    pub fn build(
        intake: &PatientIntake,
        resolver: &Resolver<'_>,
        clinic: &ClinicConfig,
        settings: &PrescriptionConfig,
        today: NaiveDate,
    ) -> Self {
        let age = intake.age_on(today);

        let lines = intake
            .selected_products
            .iter()
            .map(|key| {
                let resolution = resolver.resolve_dose(key, age, &intake.gender);
                let product_name = resolver
                    .product(key)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| key.trim().to_string());
                PrescriptionLine {
                    product_name,
                    days: settings.days,
                    dose: resolution.text,
                    remark: settings.remark.clone(),
                    source: resolution.source,
                }
            })
            .collect();

        Self {
            clinic: clinic.clone(),
            patient: PrescriptionPatient {
                name: intake.name.clone(),
                phone: intake.phone.clone(),
                age,
                gender: intake.gender.clone(),
                id_suffix: intake.id_suffix(),
            },
            issued_on: today.format("%d/%m/%Y").to_string(),
            medical_condition: intake.medical_condition.clone(),
            symptoms: non_blank(intake.symptoms.as_deref()),
            medical_history: non_blank(intake.medical_history.as_deref()),
            lines,
            advice: settings.advice.clone(),
            notes: settings.notes.clone(),
            guidance_url: settings.guidance_url.clone(),
            validity_note: settings.validity_note.clone(),
        }
    }

    /// Plain-text rendering, one section per block.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", self.clinic.name)?;
        for line in &self.clinic.address_lines {
            writeln!(out, "{line}")?;
        }
        if let Some(email) = &self.clinic.email {
            writeln!(out, "Email: {email}")?;
        }
        writeln!(out)?;

        let p = &self.patient;
        writeln!(
            out,
            "Patient: {} | Phone: {} | Age: {} | Gender: {} | ID: {}",
            p.name, p.phone, p.age, p.gender, p.id_suffix
        )?;
        writeln!(out, "Date: {}", self.issued_on)?;
        writeln!(out, "Condition: {}", self.medical_condition)?;
        if let Some(symptoms) = &self.symptoms {
            writeln!(out, "Symptoms: {symptoms}")?;
        }
        if let Some(history) = &self.medical_history {
            writeln!(out, "History: {history}")?;
        }
        writeln!(out)?;

        writeln!(out, "Rx")?;
        for (i, line) in self.lines.iter().enumerate() {
            writeln!(
                out,
                "{}. {} | {} days | {} | {}",
                i + 1,
                line.product_name,
                line.days,
                line.dose,
                line.remark
            )?;
        }

        if !self.advice.is_empty() || !self.notes.is_empty() {
            writeln!(out)?;
            for item in self.advice.iter().chain(&self.notes) {
                writeln!(out, "- {item}")?;
            }
        }
        if let Some(url) = &self.guidance_url {
            writeln!(out, "Guidance: {url}")?;
        }

        writeln!(out)?;
        writeln!(out, "{}", self.clinic.prescriber)?;
        if let Some(q) = &self.clinic.qualifications {
            writeln!(out, "{q}")?;
        }
        if let Some(reg) = &self.clinic.registration_number {
            writeln!(out, "Reg. No: {reg}")?;
        }
        if let Some(contact) = &self.clinic.contact {
            writeln!(out, "Contact: {contact}")?;
        }
        writeln!(out)?;
        write!(out, "{}", self.validity_note)
    }

    /// Export as pretty JSON.
    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Attachment file name for a patient's prescription.
///
/// Each whitespace run in the name, including leading and trailing ones,
/// becomes a single underscore.
pub fn attachment_filename(patient_name: &str) -> String {
    let mut stem = String::with_capacity(patient_name.len());
    let mut in_space = false;
    for c in patient_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    format!("Prescription-{stem}.pdf")
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductCatalog;
    use crate::resolver::AS_DIRECTED;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn intake() -> PatientIntake {
        let mut intake = PatientIntake::new(
            "Ravi Kumar".into(),
            "ravi@example.com".into(),
            "9123456780".into(),
            "Male".into(),
            date(1960, 3, 1),
            "Chronic pain".into(),
        );
        intake.aadhaar_number = Some("111122223333".into());
        intake.symptoms = Some("Insomnia, Anxiety".into());
        intake.medical_history = Some("   ".into());
        intake.selected_products = vec!["Calm Drops".into(), "11".into(), " Herbal Tea ".into()];
        intake
    }

    #[test]
    fn test_build_lines() {
        let catalog = ProductCatalog::builtin().unwrap();
        let resolver = Resolver::new(&catalog);
        let settings = PrescriptionConfig::default();

        let rx = Prescription::build(
            &intake(),
            &resolver,
            &ClinicConfig::default(),
            &settings,
            date(2026, 10, 19),
        );

        assert_eq!(rx.patient.age, 66);
        assert_eq!(rx.patient.id_suffix, "3333");
        assert_eq!(rx.issued_on, "19/10/2026");
        assert_eq!(rx.medical_history, None);
        assert_eq!(rx.lines.len(), 3);

        assert_eq!(rx.lines[0].product_name, "Calm Drops");
        assert_eq!(rx.lines[0].source, DoseSource::SeniorBand);
        assert_eq!(rx.lines[1].product_name, "Full Spectrum Capsules");
        assert_eq!(rx.lines[1].source, DoseSource::FallbackDose);

        // Unknown selection keeps its label
        assert_eq!(rx.lines[2].product_name, "Herbal Tea");
        assert_eq!(rx.lines[2].dose, AS_DIRECTED);

        assert!(rx.lines.iter().all(|l| l.days == 30));
        assert!(rx.lines.iter().all(|l| l.remark == "After Meal - Daily"));
    }

    #[test]
    fn test_render_text() {
        let catalog = ProductCatalog::builtin().unwrap();
        let resolver = Resolver::new(&catalog);
        let rx = Prescription::build(
            &intake(),
            &resolver,
            &ClinicConfig::default(),
            &PrescriptionConfig::default(),
            date(2026, 10, 19),
        );

        let text = rx.render_text();
        assert!(text.starts_with("Health Solution Clinic"));
        assert!(text.contains("Patient: Ravi Kumar"));
        assert!(text.contains("3. Herbal Tea | 30 days | As Directed"));
        assert!(text.ends_with("THIS PRESCRIPTION IS VALID ONLY FOR THE NEXT 24 HOURS."));
        assert!(!text.contains("History:"));
    }

    #[test]
    fn test_attachment_filename() {
        assert_eq!(attachment_filename("Ravi Kumar"), "Prescription-Ravi_Kumar.pdf");
        assert_eq!(attachment_filename("Asha   M\tRao"), "Prescription-Asha_M_Rao.pdf");
        // Edge whitespace is kept as an underscore, not trimmed
        assert_eq!(
            attachment_filename("  Asha Rao "),
            "Prescription-_Asha_Rao_.pdf"
        );
    }
}
