use anyhow::Result;
use rx_intake_core::ProductCatalog;
use serde_json::{json, Value};

/// Categories, products and the normalized symptom keys.
pub fn run(catalog: &ProductCatalog) -> Result<Value> {
    Ok(json!({
        "categories": catalog.categories(),
        "products": catalog.products(),
        "symptoms": catalog.index().keys(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_listing() {
        let catalog = ProductCatalog::builtin().unwrap();
        let value = run(&catalog).unwrap();

        assert_eq!(value["categories"][0], "All");
        assert_eq!(value["products"].as_array().unwrap().len(), 12);
        let symptoms = value["symptoms"].as_array().unwrap();
        assert!(symptoms.iter().any(|s| s == "chronicpain"));
    }
}
