//! Product catalog: the static product list plus its derived symptom index.
//!
//! The catalog is built once at startup and shared read-only with the
//! recommender and the dosage resolver.

mod index;

pub use index::*;

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use crate::models::{Product, ALL_CATEGORIES};

/// Catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../data/products.json");

/// Catalog errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Could not read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate product id: {0}")]
    DuplicateId(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Immutable product catalog with its symptom index.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products: Vec<Product>,
    index: SymptomIndex,
}

impl ProductCatalog {
    /// Build a catalog, rejecting duplicate product ids.
    pub fn new(products: Vec<Product>) -> CatalogResult<Self> {
        let mut seen = HashSet::new();
        for product in &products {
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        let index = SymptomIndex::build(&products);
        tracing::debug!(
            products = products.len(),
            symptoms = index.len(),
            "product catalog indexed"
        );

        Ok(Self { products, index })
    }

    /// Parse a catalog from a JSON array of products.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Load a catalog from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path` when set, otherwise the built-in catalog.
    pub fn load_or_builtin(path: Option<&Path>) -> CatalogResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    /// The catalog compiled into the crate.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn index(&self) -> &SymptomIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Get a product by id.
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Get a product by display name, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.has_name(name))
    }

    /// Resolve a selection key: product id first, then display name.
    pub fn lookup(&self, key: &str) -> Option<&Product> {
        self.get(key.trim()).or_else(|| self.find_by_name(key))
    }

    /// "All" followed by each distinct category in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = ProductCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 12);
        assert!(!catalog.index().is_empty());
    }

    #[test]
    fn test_builtin_categories() {
        let catalog = ProductCatalog::builtin().unwrap();
        assert_eq!(
            catalog.categories(),
            vec!["All", "Tincture", "Extract", "Capsules", "Tablets"]
        );
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let products = vec![
            Product::new("1".into(), "A".into(), "Tincture".into()),
            Product::new("1".into(), "B".into(), "Extract".into()),
        ];
        let err = ProductCatalog::new(products).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "1"));
    }

    #[test]
    fn test_lookup_by_id_then_name() {
        let catalog = ProductCatalog::builtin().unwrap();

        assert_eq!(catalog.lookup("3").unwrap().name, "Calm Drops");
        assert_eq!(catalog.lookup("calm drops").unwrap().id, "3");
        assert!(catalog.lookup("Nonexistent").is_none());
    }

    #[test]
    fn test_invalid_json() {
        let err = ProductCatalog::from_json("{not json").unwrap_err();
        assert!(matches!(err, CatalogError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[{"id": "x", "name": "Test Oil", "category": "Tincture", "tags": ["Pain"], "dose": "2 drops"}]"#,
        )
        .unwrap();

        let catalog = ProductCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.index().lookup("pain"), ["x"]);
    }
}
