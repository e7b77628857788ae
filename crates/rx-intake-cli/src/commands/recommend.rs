use anyhow::Result;
use rx_intake_core::resolver::Resolver;
use rx_intake_core::{CategoryFilter, ProductCatalog};
use serde_json::{json, Value};

/// Score the catalog against a comma-delimited symptom list.
pub fn run(catalog: &ProductCatalog, symptoms: &str, category: &str) -> Result<Value> {
    let resolver = Resolver::new(catalog);
    let recommendations = resolver.recommend_text(symptoms, &CategoryFilter::from(category));

    tracing::debug!(
        recommended = recommendations.recommended.len(),
        others = recommendations.others.len(),
        "recommend command"
    );

    Ok(json!({
        "category": category,
        "recommended": recommendations.recommended,
        "others": recommendations.others,
    }))
}
