//! Symptom-to-product recommendation by tag overlap.
//!
//! Each input symptom adds one point to every product that declares a tag with
//! the same normalized key. Scores only rank; catalog order breaks ties.

use std::collections::HashMap;

use crate::catalog::ProductCatalog;
use crate::models::{CategoryFilter, Recommendations, ScoredProduct};

/// Scores the catalog against a symptom list.
pub struct Recommender<'a> {
    catalog: &'a ProductCatalog,
}

impl<'a> Recommender<'a> {
    /// Create a new recommender over a catalog.
    pub fn new(catalog: &'a ProductCatalog) -> Self {
        Self { catalog }
    }

    /// Partition the (filtered) catalog into recommended and other products.
    pub fn recommend<S: AsRef<str>>(
        &self,
        symptoms: &[S],
        filter: &CategoryFilter,
    ) -> Recommendations {
        let scores = self.score_table(symptoms);

        let (mut recommended, others): (Vec<ScoredProduct>, Vec<ScoredProduct>) = self
            .catalog
            .products()
            .iter()
            .filter(|p| filter.accepts(&p.category))
            .map(|p| ScoredProduct {
                product: p.clone(),
                match_score: scores.get(p.id.as_str()).copied().unwrap_or(0),
            })
            .partition(|p| p.match_score > 0);

        // Stable: equal scores keep catalog order
        recommended.sort_by(|a, b| b.match_score.cmp(&a.match_score));

        tracing::debug!(
            symptoms = symptoms.len(),
            recommended = recommended.len(),
            others = others.len(),
            "scored catalog"
        );

        Recommendations {
            recommended,
            others,
        }
    }

    /// Per-request score table: product id → number of matching symptoms.
    fn score_table<S: AsRef<str>>(&self, symptoms: &[S]) -> HashMap<&'a str, u32> {
        let mut scores: HashMap<&'a str, u32> = HashMap::new();
        let catalog: &'a ProductCatalog = self.catalog;
        let index = catalog.index();

        for symptom in symptoms {
            // Index ids are unique per key, so a symptom adds at most 1 per product
            for id in index.lookup(symptom.as_ref()) {
                *scores.entry(id.as_str()).or_insert(0) += 1;
            }
        }

        scores
    }
}
