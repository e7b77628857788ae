//! Product recommendation and dosage resolution.
//!
//! Pipeline: Symptom list → Normalization → Tag scoring → Product selection → Dosage

mod dosage;
mod normalizer;
mod recommender;

pub use dosage::*;
pub use normalizer::*;
pub use recommender::*;

use chrono::NaiveDate;

use crate::catalog::ProductCatalog;
use crate::models::{age_on, CategoryFilter, Product, Recommendations};

/// Main resolver that coordinates recommendation and dosage over one catalog.
pub struct Resolver<'a> {
    catalog: &'a ProductCatalog,
    recommender: Recommender<'a>,
}

impl<'a> Resolver<'a> {
    /// Create a new resolver.
    pub fn new(catalog: &'a ProductCatalog) -> Self {
        Self {
            catalog,
            recommender: Recommender::new(catalog),
        }
    }

    /// Score the catalog against a symptom list.
    pub fn recommend<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        filter: &CategoryFilter,
    ) -> Recommendations {
        self.recommender.recommend(symptoms, filter)
    }

    /// Score the catalog against a comma-delimited symptom field.
    pub fn recommend_text(&self, symptoms: &str, filter: &CategoryFilter) -> Recommendations {
        self.recommend(&split_symptoms(symptoms), filter)
    }

    /// Find the product behind a selection key (id or display name).
    pub fn product(&self, key: &str) -> Option<&'a Product> {
        self.catalog.lookup(key)
    }

    /// Resolve the dosage for a selected product.
    ///
    /// Unknown keys resolve like an absent product ("As Directed").
    pub fn resolve_dose(&self, key: &str, age_years: i64, gender: &str) -> DoseResolution {
        resolve(self.product(key), age_years, gender)
    }

    /// Resolve the dosage for a patient by date of birth.
    pub fn dose_for_patient(
        &self,
        key: &str,
        date_of_birth: NaiveDate,
        gender: &str,
        today: NaiveDate,
    ) -> DoseResolution {
        self.resolve_dose(key, age_on(date_of_birth, today), gender)
    }

    /// Get the catalog for direct access.
    pub fn catalog(&self) -> &'a ProductCatalog {
        self.catalog
    }

    /// Get the recommender for direct access.
    pub fn recommender(&self) -> &Recommender<'a> {
        &self.recommender
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_recommend_text_splits_field() {
        let catalog = ProductCatalog::builtin().unwrap();
        let resolver = Resolver::new(&catalog);

        let result = resolver.recommend_text("Insomnia, , Sleep disturbances", &CategoryFilter::All);

        assert_eq!(result.recommended[0].product.id, "5");
        assert_eq!(result.recommended[0].match_score, 2);
    }

    #[test]
    fn test_resolve_dose_by_name() {
        let catalog = ProductCatalog::builtin().unwrap();
        let resolver = Resolver::new(&catalog);

        let by_id = resolver.resolve_dose("3", 35, "Female");
        let by_name = resolver.resolve_dose("Calm Drops", 35, "Female");
        assert_eq!(by_id, by_name);
        assert_eq!(by_id.source, DoseSource::AdultBand);
    }

    #[test]
    fn test_unknown_product_is_as_directed() {
        let catalog = ProductCatalog::builtin().unwrap();
        let resolver = Resolver::new(&catalog);

        let resolved = resolver.resolve_dose("Mystery Oil", 35, "Male");
        assert_eq!(resolved.text, AS_DIRECTED);
    }

    #[test]
    fn test_dose_for_patient_uses_birthday() {
        let catalog = ProductCatalog::builtin().unwrap();
        let resolver = Resolver::new(&catalog);
        let dob = date(1975, 10, 20);

        // Day before the 51st birthday: still in the 18-50 band
        let before = resolver.dose_for_patient("1", dob, "Male", date(2026, 10, 19));
        assert_eq!(before.source, DoseSource::AdultBand);

        let after = resolver.dose_for_patient("1", dob, "Male", date(2026, 10, 20));
        assert_eq!(after.source, DoseSource::SeniorBand);
    }
}
