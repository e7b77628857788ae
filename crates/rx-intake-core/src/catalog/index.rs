//! Symptom index: normalized tag → product ids.

use std::collections::HashMap;

use crate::models::Product;
use crate::resolver::normalize_tag;

/// Read-only lookup from normalized tag to the products declaring it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymptomIndex {
    entries: HashMap<String, Vec<String>>,
}

impl SymptomIndex {
    /// Build the index from catalog products.
    ///
    /// Ids are kept in catalog order and appear at most once per tag, even when
    /// a product lists the same symptom twice under different spellings.
    pub fn build(products: &[Product]) -> Self {
        let mut entries: HashMap<String, Vec<String>> = HashMap::new();

        for product in products {
            for tag in &product.tags {
                let key = normalize_tag(tag);
                if key.is_empty() {
                    continue;
                }
                let ids = entries.entry(key).or_default();
                if !ids.iter().any(|id| id == &product.id) {
                    ids.push(product.id.clone());
                }
            }
        }

        Self { entries }
    }

    /// Product ids for a raw symptom string (normalized here).
    pub fn lookup(&self, symptom: &str) -> &[String] {
        self.get(&normalize_tag(symptom))
    }

    /// Product ids for an already-normalized key.
    pub fn get(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct normalized tags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All normalized tags, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
