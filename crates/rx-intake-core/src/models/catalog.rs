//! Product catalog models.

use serde::{Deserialize, Serialize};

/// Values of [`DosageTable::children`] meaning "no pediatric dose".
const NOT_APPLICABLE: [&str; 2] = ["n/a", "not applicable"];

/// A single product in the dispensary catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique identifier
    pub id: String,
    /// Display name printed on the prescription
    pub name: String,
    /// Product form (e.g., "Tincture", "Extract", "Capsules", "Tablets")
    pub category: String,
    /// Short marketing description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image path for the product card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Symptoms/indications this product addresses
    #[serde(default)]
    pub tags: Vec<String>,
    /// Age/gender banded dosage instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<DosageTable>,
    /// Generic dose note used when no band applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
}

/// Banded dosage table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DosageTable {
    /// Dose for patients under 18, or "N/A"
    pub children: String,
    /// Adult bands
    pub adults: AdultDosage,
}

/// Adult dosage bands split at age 50.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdultDosage {
    #[serde(rename = "age18to50")]
    pub age_18_to_50: GenderDosage,
    #[serde(rename = "above50")]
    pub above_50: GenderDosage,
}

/// Dose per gender band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenderDosage {
    pub male: String,
    pub female: String,
}

/// Gender band used for dosage lookup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenderBand {
    Male,
    Female,
}

impl GenderBand {
    /// Reduce a free-form gender value to a dosage band.
    ///
    /// Anything not starting with "m" (case-insensitive) lands in the female band,
    /// including "Other" and empty input.
    pub fn from_label(gender: &str) -> Self {
        match gender.chars().next() {
            Some(c) if c.eq_ignore_ascii_case(&'m') => GenderBand::Male,
            _ => GenderBand::Female,
        }
    }
}

impl GenderDosage {
    /// Dose for a gender band.
    pub fn for_band(&self, band: GenderBand) -> &str {
        match band {
            GenderBand::Male => &self.male,
            GenderBand::Female => &self.female,
        }
    }
}

impl DosageTable {
    /// Pediatric dose, or `None` when marked not applicable.
    pub fn child_dose(&self) -> Option<&str> {
        let trimmed = self.children.trim();
        let lower = trimmed.to_lowercase();
        if trimmed.is_empty() || NOT_APPLICABLE.contains(&lower.as_str()) {
            None
        } else {
            Some(&self.children)
        }
    }
}

impl Product {
    /// Create a new product with required fields.
    pub fn new(id: String, name: String, category: String) -> Self {
        Self {
            id,
            name,
            category,
            description: None,
            image: None,
            tags: Vec::new(),
            dosage: None,
            dose: None,
        }
    }

    /// Check whether this product's display name matches, ignoring case.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(children: &str) -> DosageTable {
        DosageTable {
            children: children.into(),
            adults: AdultDosage {
                age_18_to_50: GenderDosage {
                    male: "5 drops".into(),
                    female: "4 drops".into(),
                },
                above_50: GenderDosage {
                    male: "3 drops".into(),
                    female: "2 drops".into(),
                },
            },
        }
    }

    #[test]
    fn test_gender_band_prefix() {
        assert_eq!(GenderBand::from_label("Male"), GenderBand::Male);
        assert_eq!(GenderBand::from_label("m"), GenderBand::Male);
        assert_eq!(GenderBand::from_label("MALE"), GenderBand::Male);
        assert_eq!(GenderBand::from_label("Female"), GenderBand::Female);
        assert_eq!(GenderBand::from_label("Other"), GenderBand::Female);
        assert_eq!(GenderBand::from_label(""), GenderBand::Female);
    }

    #[test]
    fn test_child_dose_sentinel() {
        assert_eq!(table("N/A").child_dose(), None);
        assert_eq!(table("not applicable").child_dose(), None);
        assert_eq!(table("Not Applicable").child_dose(), None);
        assert_eq!(table("1 drop").child_dose(), Some("1 drop"));
    }

    #[test]
    fn test_deserialize_banded_product() {
        let json = r#"{
            "id": "1",
            "name": "Calm Drops",
            "category": "Tincture",
            "tags": ["Anxiety"],
            "dosage": {
                "children": "N/A",
                "adults": {
                    "age18to50": { "male": "5 drops", "female": "4 drops" },
                    "above50": { "male": "3 drops", "female": "2 drops" }
                }
            }
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        let dosage = product.dosage.unwrap();
        assert_eq!(dosage.adults.age_18_to_50.for_band(GenderBand::Female), "4 drops");
        assert_eq!(dosage.adults.above_50.for_band(GenderBand::Male), "3 drops");
        assert!(product.dose.is_none());
        assert!(product.description.is_none());
    }

    #[test]
    fn test_has_name() {
        let product = Product::new("1".into(), "Calm Drops".into(), "Tincture".into());
        assert!(product.has_name("calm drops"));
        assert!(product.has_name(" Calm Drops "));
        assert!(!product.has_name("Calm"));
    }
}
