//! Recommendation models for the symptom matcher.

use serde::{Deserialize, Serialize};

use super::Product;

/// Category filter value meaning "every category".
pub const ALL_CATEGORIES: &str = "All";

/// Restriction over the catalog's category field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// No filtering
    All,
    /// Exact, case-sensitive category match
    Only(String),
}

impl CategoryFilter {
    /// Check whether a category passes this filter.
    pub fn accepts(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value)
        }
    }
}

/// A catalog product with its per-request match score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    /// Number of input symptoms that map to this product
    #[serde(rename = "matchScore")]
    pub match_score: u32,
}

/// Catalog partitioned by symptom match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recommendations {
    /// Products with a positive score, best first
    pub recommended: Vec<ScoredProduct>,
    /// Products that matched nothing, in catalog order
    pub others: Vec<ScoredProduct>,
}

impl Recommendations {
    /// Total number of products across both partitions.
    pub fn len(&self) -> usize {
        self.recommended.len() + self.others.len()
    }

    /// True if the filter left nothing to show.
    pub fn is_empty(&self) -> bool {
        self.recommended.is_empty() && self.others.is_empty()
    }

    /// Product ids in display order: recommended first, then others.
    pub fn ids(&self) -> Vec<&str> {
        self.recommended
            .iter()
            .chain(self.others.iter())
            .map(|p| p.product.id.as_str())
            .collect()
    }
}
