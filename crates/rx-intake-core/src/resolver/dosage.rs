//! Age/gender banded dosage resolution.
//!
//! Policy, in order:
//! 1. No product or no dosage table: generic `dose`, else "As Directed"
//! 2. Under 18: child band unless "N/A", else `dose`, else "Consult Physician"
//! 3. Over 50: senior band for the gender
//! 4. Otherwise: 18-50 band for the gender

use serde::{Deserialize, Serialize};

use crate::models::{GenderBand, Product};

/// Printed when nothing more specific is known.
pub const AS_DIRECTED: &str = "As Directed";

/// Printed for minors when the product has no pediatric dose.
pub const CONSULT_PHYSICIAN: &str = "Consult Physician";

/// Which branch of the dosage policy produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseSource {
    /// Adults 18-50 band
    AdultBand,
    /// Adults over 50 band
    SeniorBand,
    /// Pediatric band
    ChildBand,
    /// Product's generic dose note
    FallbackDose,
    /// Literal "As Directed"
    AsDirected,
    /// Literal "Consult Physician"
    ConsultPhysician,
}

/// Resolved dosage text plus the policy branch that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseResolution {
    pub text: String,
    pub source: DoseSource,
}

impl DoseResolution {
    fn new(text: &str, source: DoseSource) -> Self {
        Self {
            text: text.to_string(),
            source,
        }
    }

    /// Adult band text; a blank band counts as missing data.
    fn band(product: Option<&Product>, text: &str, source: DoseSource) -> Self {
        if text.trim().is_empty() {
            Self::fallback(product, AS_DIRECTED, DoseSource::AsDirected)
        } else {
            Self::new(text, source)
        }
    }

    /// Use the product's generic dose when set, otherwise the given literal.
    fn fallback(product: Option<&Product>, literal: &str, literal_source: DoseSource) -> Self {
        let dose = product
            .and_then(|p| p.dose.as_deref())
            .filter(|d| !d.trim().is_empty());
        match dose {
            Some(dose) => Self::new(dose, DoseSource::FallbackDose),
            None => Self::new(literal, literal_source),
        }
    }
}

/// Resolve the printed dosage for a product, patient age and gender.
pub fn resolve(product: Option<&Product>, age_years: i64, gender: &str) -> DoseResolution {
    let Some(table) = product.and_then(|p| p.dosage.as_ref()) else {
        return DoseResolution::fallback(product, AS_DIRECTED, DoseSource::AsDirected);
    };

    let band = GenderBand::from_label(gender);

    let resolution = if age_years < 18 {
        match table.child_dose() {
            Some(dose) => DoseResolution::new(dose, DoseSource::ChildBand),
            None => {
                DoseResolution::fallback(product, CONSULT_PHYSICIAN, DoseSource::ConsultPhysician)
            }
        }
    } else if age_years > 50 {
        DoseResolution::band(product, table.adults.above_50.for_band(band), DoseSource::SeniorBand)
    } else {
        DoseResolution::band(product, table.adults.age_18_to_50.for_band(band), DoseSource::AdultBand)
    };

    tracing::debug!(
        product = product.map(|p| p.id.as_str()).unwrap_or_default(),
        age_years,
        band = ?band,
        source = ?resolution.source,
        "dose resolved"
    );

    resolution
}

/// Resolve the printed dosage text.
pub fn resolve_dose(product: Option<&Product>, age_years: i64, gender: &str) -> String {
    resolve(product, age_years, gender).text
}
