use anyhow::{Context, Result};
use chrono::NaiveDate;
use rx_intake_core::IntakeService;
use serde_json::{json, Value};

/// Admin list view.
pub fn list(service: &IntakeService, search: Option<String>, page: u32) -> Result<Value> {
    let page = service.list(search, page).context("listing intakes")?;
    Ok(serde_json::to_value(page)?)
}

/// One intake, with its prescription as of `today` when asked.
pub fn show(
    service: &IntakeService,
    id: &str,
    prescription_on: Option<NaiveDate>,
) -> Result<Value> {
    let intake = service
        .require(id)
        .with_context(|| format!("loading intake {id}"))?;

    let prescription = prescription_on.map(|today| service.prescription(&intake, today));
    Ok(json!({
        "intake": intake,
        "prescription": prescription,
    }))
}
