use anyhow::Result;
use chrono::NaiveDate;
use rx_intake_core::models::age_on;
use rx_intake_core::resolver::Resolver;
use rx_intake_core::ProductCatalog;
use serde_json::{json, Value};

use super::InvalidArgument;

#[derive(Debug, Clone)]
pub struct DoseArgs {
    /// Product id or display name
    pub product: String,
    pub gender: String,
    pub age: Option<i64>,
    pub date_of_birth: Option<NaiveDate>,
    pub today: NaiveDate,
}

pub fn run(catalog: &ProductCatalog, args: &DoseArgs) -> Result<Value> {
    let age_years = match (args.age, args.date_of_birth) {
        (Some(age), None) => age,
        (None, Some(dob)) => age_on(dob, args.today),
        _ => {
            return Err(InvalidArgument(
                "exactly one of --age or --dob is required".to_string(),
            )
            .into())
        }
    };

    let resolver = Resolver::new(catalog);
    let product = resolver.product(&args.product);
    let resolved = resolver.resolve_dose(&args.product, age_years, &args.gender);

    Ok(json!({
        "product": args.product,
        "product_id": product.map(|p| p.id.as_str()),
        "product_name": product.map(|p| p.name.as_str()),
        "age_years": age_years,
        "gender": args.gender,
        "dose": resolved.text,
        "source": resolved.source,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(product: &str, age: Option<i64>, dob: Option<NaiveDate>) -> DoseArgs {
        DoseArgs {
            product: product.into(),
            gender: "male".into(),
            age,
            date_of_birth: dob,
            today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        }
    }

    #[test]
    fn test_dose_by_age() {
        let catalog = ProductCatalog::builtin().unwrap();
        let value = run(&catalog, &args("Brain Easer", Some(55), None)).unwrap();

        assert_eq!(value["product_id"], "5");
        assert_eq!(value["dose"], "3-5 drops at bedtime");
        assert_eq!(value["source"], "senior_band");
    }

    #[test]
    fn test_dose_by_date_of_birth() {
        let catalog = ProductCatalog::builtin().unwrap();
        let dob = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let value = run(&catalog, &args("1", None, Some(dob))).unwrap();

        assert_eq!(value["age_years"], 11);
        assert_eq!(value["dose"], "2-4 drops twice daily");
    }

    #[test]
    fn test_unknown_product() {
        let catalog = ProductCatalog::builtin().unwrap();
        let value = run(&catalog, &args("Rose Water", Some(30), None)).unwrap();

        assert!(value["product_id"].is_null());
        assert_eq!(value["dose"], "As Directed");
    }

    #[test]
    fn test_requires_one_age_source() {
        let catalog = ProductCatalog::builtin().unwrap();
        let err = run(&catalog, &args("1", None, None)).unwrap_err();
        assert!(err.downcast_ref::<InvalidArgument>().is_some());
    }
}
