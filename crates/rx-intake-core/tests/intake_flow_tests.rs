//! End-to-end intake flow: submit, store, list, rebuild the prescription.

use chrono::NaiveDate;
use rx_intake_core::config::IntakeConfig;
use rx_intake_core::resolver::DoseSource;
use rx_intake_core::{Database, IntakeService, PatientIntake, ProductCatalog};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn on_disk_service(dir: &std::path::Path) -> IntakeService {
    let mut config = IntakeConfig::default();
    config.database.path = dir.join("intake.db");
    config.admin.page_size = 3;
    IntakeService::open(config).unwrap()
}

fn intake(name: &str, gender: &str, dob: NaiveDate, symptoms: &str) -> PatientIntake {
    let mut intake = PatientIntake::new(
        name.into(),
        format!("{}@example.com", name.split_whitespace().next().unwrap().to_lowercase()),
        "9000000000".into(),
        gender.into(),
        dob,
        "General wellness".into(),
    );
    intake.symptoms = Some(symptoms.into());
    intake
}

#[test]
fn test_recommend_then_submit() {
    let dir = tempfile::tempdir().unwrap();
    let service = on_disk_service(dir.path());
    let today = date(2026, 10, 19);

    let mut patient = intake("Sunil Mehta", "Male", date(1970, 1, 1), "Insomnia, Chronic pain");
    let recommendations = service
        .resolver()
        .recommend_text(patient.symptoms.as_deref().unwrap_or_default(), &"All".into());

    // Pick the top two the way the form pre-selects them
    patient.selected_products = recommendations
        .recommended
        .iter()
        .take(2)
        .map(|p| p.product.name.clone())
        .collect();
    assert_eq!(patient.selected_products, vec!["Brain Easer", "Vijaya Ambrosia (High THC 1:4)"]);

    let submission = service.submit(&patient, today).unwrap();
    let lines = &submission.prescription.lines;
    assert_eq!(lines[0].dose, "3-5 drops at bedtime");
    assert_eq!(lines[0].source, DoseSource::SeniorBand);
    assert_eq!(lines[1].dose, "1-3 drops at bedtime");
    assert_eq!(submission.prescription.patient.age, 56);
}

#[test]
fn test_records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let today = date(2026, 10, 19);

    let ids: Vec<String> = {
        let service = on_disk_service(dir.path());
        (0..4)
            .map(|i| {
                let patient = intake(&format!("Patient {i}"), "Female", date(1990, 1, 1), "Anxiety");
                service.submit(&patient, today).unwrap().intake_id
            })
            .collect()
    };

    let service = on_disk_service(dir.path());
    let first = service.list(None, 1).unwrap();
    assert_eq!(first.pagination.total, 4);
    assert_eq!(first.pagination.total_pages, 2);
    assert!(first.pagination.has_more);
    assert_eq!(first.records[0].id, ids[3]);

    let second = service.list(None, 2).unwrap();
    assert_eq!(second.records.len(), 1);
    assert!(!second.pagination.has_more);
    assert_eq!(second.records[0].id, ids[0]);
}

#[test]
fn test_prescription_rebuilt_from_store() {
    let service = IntakeService::new(
        Database::open_in_memory().unwrap(),
        ProductCatalog::builtin().unwrap(),
        IntakeConfig::default(),
    );
    let mut patient = intake("Rekha Pillai", "Female", date(2000, 12, 25), "Fatigue");
    patient.selected_products = vec!["Calm Drops".into()];
    service.db().insert_intake(&patient).unwrap();

    let stored = service.require(&patient.id).unwrap();
    // Turns 26 on Christmas; still 25 on the issue date
    let rx = service.prescription(&stored, date(2026, 10, 19));
    assert_eq!(rx.patient.age, 25);
    assert_eq!(rx.lines[0].dose, "3-5 drops twice daily");
}
