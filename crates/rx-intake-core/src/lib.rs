//! Rx Intake Core Library
//!
//! Patient intake backend for a medical-cannabis consultation service.
//!
//! # Architecture
//!
//! ```text
//! Intake form → Symptom list → Recommendation Engine → Product selection
//!                                                            │
//!                                                    [STORE: patient_intakes]
//!                                                            │
//!                                     ┌──────────────────────▼──────────────────────┐
//!                                     │  Dosage Resolver (age band × gender band)   │
//!                                     │  once per selected product                  │
//!                                     └──────────────────────┬──────────────────────┘
//!                                                            │
//!                                        ┌───────────────────┴───────────────────┐
//!                                        ▼                                       ▼
//!                                  Prescription                          Prescription
//!                                    document                               e-mail
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: Static product catalog and symptom index
//! - [`models`]: Domain types (Product, DosageTable, PatientIntake, etc.)
//! - [`resolver`]: Recommendation engine and dosage resolver
//! - [`db`]: SQLite intake store with search and pagination
//! - [`export`]: Prescription and e-mail composition
//! - [`config`]: TOML + environment configuration
//! - [`service`]: Submission workflow tying the above together

pub mod catalog;
pub mod config;
pub mod db;
pub mod export;
pub mod models;
pub mod resolver;
pub mod service;

// Re-export commonly used types
pub use catalog::{ProductCatalog, SymptomIndex};
pub use config::{IntakeConfig, LoadOptions, LogFormat};
pub use db::{Database, IntakePage, IntakeQuery, Pagination};
pub use export::{IntakeSubmission, Prescription, PrescriptionEmail};
pub use models::{
    CategoryFilter, DosageTable, PatientIntake, Product, Recommendations, ScoredProduct,
};
pub use resolver::{DoseResolution, DoseSource, Resolver};
pub use service::IntakeService;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum RxIntakeError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Catalog error: {0}")]
    CatalogError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<db::DbError> for RxIntakeError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::NotFound(id) => RxIntakeError::NotFound(id),
            other => RxIntakeError::DatabaseError(other.to_string()),
        }
    }
}

impl From<catalog::CatalogError> for RxIntakeError {
    fn from(e: catalog::CatalogError) -> Self {
        RxIntakeError::CatalogError(e.to_string())
    }
}

impl From<service::ServiceError> for RxIntakeError {
    fn from(e: service::ServiceError) -> Self {
        match e {
            service::ServiceError::Catalog(e) => e.into(),
            service::ServiceError::Db(e) => e.into(),
        }
    }
}

impl From<export::ExportError> for RxIntakeError {
    fn from(e: export::ExportError) -> Self {
        RxIntakeError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for RxIntakeError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        RxIntakeError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create an intake store at the given path.
///
/// `catalog_json` replaces the built-in product catalog when given.
#[uniffi::export]
pub fn open_service(
    db_path: String,
    catalog_json: Option<String>,
) -> Result<Arc<RxIntakeCore>, RxIntakeError> {
    let catalog = match catalog_json {
        Some(json) => ProductCatalog::from_json(&json)?,
        None => ProductCatalog::builtin()?,
    };
    let mut config = IntakeConfig::default();
    config.database.path = db_path.into();
    let db = Database::open(&config.database.path)?;
    Ok(RxIntakeCore::wrap(IntakeService::new(db, catalog, config)))
}

/// Create an in-memory store over the built-in catalog (for testing).
#[uniffi::export]
pub fn open_service_in_memory() -> Result<Arc<RxIntakeCore>, RxIntakeError> {
    let db = Database::open_in_memory()?;
    let catalog = ProductCatalog::builtin()?;
    Ok(RxIntakeCore::wrap(IntakeService::new(
        db,
        catalog,
        IntakeConfig::default(),
    )))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe service wrapper for FFI.
#[derive(uniffi::Object)]
pub struct RxIntakeCore {
    service: Arc<Mutex<IntakeService>>,
}

impl RxIntakeCore {
    fn wrap(service: IntakeService) -> Arc<Self> {
        Arc::new(Self {
            service: Arc::new(Mutex::new(service)),
        })
    }
}

#[uniffi::export]
impl RxIntakeCore {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Category filter options, "All" first.
    pub fn categories(&self) -> Result<Vec<String>, RxIntakeError> {
        let service = self.service.lock()?;
        Ok(service.catalog().categories())
    }

    /// All catalog products in catalog order.
    pub fn products(&self) -> Result<Vec<FfiProduct>, RxIntakeError> {
        let service = self.service.lock()?;
        Ok(service
            .catalog()
            .products()
            .iter()
            .cloned()
            .map(|p| p.into())
            .collect())
    }

    // =========================================================================
    // Recommendation and Dosage
    // =========================================================================

    /// Partition the catalog by symptom match.
    pub fn recommend(
        &self,
        symptoms: Vec<String>,
        category: String,
    ) -> Result<FfiRecommendations, RxIntakeError> {
        let service = self.service.lock()?;
        let filter = CategoryFilter::from(category);
        Ok(service.resolver().recommend(&symptoms, &filter).into())
    }

    /// Resolve the dosage for a product id or display name.
    pub fn resolve_dose(
        &self,
        product_key: String,
        age_years: i64,
        gender: String,
    ) -> Result<FfiDoseResolution, RxIntakeError> {
        let service = self.service.lock()?;
        let resolved = service
            .resolver()
            .resolve_dose(&product_key, age_years, &gender);
        Ok(resolved.into())
    }

    // =========================================================================
    // Intake Operations
    // =========================================================================

    /// Store an intake and build its prescription and e-mail.
    pub fn submit_intake(&self, form: FfiIntakeForm) -> Result<FfiSubmission, RxIntakeError> {
        let intake = PatientIntake::try_from(form)?;
        let service = self.service.lock()?;
        let today = chrono::Local::now().date_naive();
        let submission = service.submit(&intake, today)?;
        FfiSubmission::try_from(submission)
    }

    /// Get an intake by ID.
    pub fn get_intake(&self, id: String) -> Result<Option<FfiPatientIntake>, RxIntakeError> {
        let service = self.service.lock()?;
        let intake = service.get(&id)?;
        Ok(intake.map(|i| i.into()))
    }

    /// Admin list, newest first.
    pub fn list_intakes(
        &self,
        search: Option<String>,
        page: u32,
    ) -> Result<FfiIntakePage, RxIntakeError> {
        let service = self.service.lock()?;
        let page = service.list(search, page)?;
        Ok(page.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe product.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiProduct {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
}

impl From<Product> for FfiProduct {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            category: product.category,
            description: product.description,
            image: product.image,
            tags: product.tags,
        }
    }
}

/// FFI-safe scored product.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiScoredProduct {
    pub product: FfiProduct,
    pub match_score: u32,
}

impl From<ScoredProduct> for FfiScoredProduct {
    fn from(scored: ScoredProduct) -> Self {
        Self {
            product: scored.product.into(),
            match_score: scored.match_score,
        }
    }
}

/// FFI-safe recommendation partition.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecommendations {
    pub recommended: Vec<FfiScoredProduct>,
    pub others: Vec<FfiScoredProduct>,
}

impl From<Recommendations> for FfiRecommendations {
    fn from(recs: Recommendations) -> Self {
        Self {
            recommended: recs.recommended.into_iter().map(|p| p.into()).collect(),
            others: recs.others.into_iter().map(|p| p.into()).collect(),
        }
    }
}

/// FFI-safe dose resolution.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDoseResolution {
    pub text: String,
    pub source: String,
}

impl From<DoseResolution> for FfiDoseResolution {
    fn from(resolved: DoseResolution) -> Self {
        Self {
            text: resolved.text,
            source: format!("{:?}", resolved.source),
        }
    }
}

/// FFI-safe intake form as submitted by the host app.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiIntakeForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    /// YYYY-MM-DD
    pub date_of_birth: String,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub aadhaar_number: Option<String>,
    pub address: Option<String>,
    pub medical_condition: String,
    pub symptoms: Option<String>,
    pub medical_history: Option<String>,
    pub selected_products: Vec<String>,
}

impl TryFrom<FfiIntakeForm> for PatientIntake {
    type Error = RxIntakeError;

    fn try_from(form: FfiIntakeForm) -> Result<Self, Self::Error> {
        let date_of_birth = NaiveDate::parse_from_str(form.date_of_birth.trim(), "%Y-%m-%d")
            .map_err(|e| {
                RxIntakeError::InvalidInput(format!(
                    "date_of_birth `{}`: {}",
                    form.date_of_birth, e
                ))
            })?;

        let mut intake = PatientIntake::new(
            form.name,
            form.email,
            form.phone,
            form.gender,
            date_of_birth,
            form.medical_condition,
        );
        intake.weight = form.weight;
        intake.height = form.height;
        intake.aadhaar_number = form.aadhaar_number;
        intake.address = form.address;
        intake.symptoms = form.symptoms;
        intake.medical_history = form.medical_history;
        intake.selected_products = form.selected_products;
        Ok(intake)
    }
}

/// FFI-safe stored intake.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientIntake {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub date_of_birth: String,
    pub medical_condition: String,
    pub symptoms: Option<String>,
    pub selected_products: Vec<String>,
    pub created_at: String,
}

impl From<PatientIntake> for FfiPatientIntake {
    fn from(intake: PatientIntake) -> Self {
        Self {
            id: intake.id,
            name: intake.name,
            email: intake.email,
            phone: intake.phone,
            gender: intake.gender,
            date_of_birth: intake.date_of_birth.format("%Y-%m-%d").to_string(),
            medical_condition: intake.medical_condition,
            symptoms: intake.symptoms,
            selected_products: intake.selected_products,
            created_at: intake.created_at,
        }
    }
}

/// FFI-safe admin list page.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiIntakePage {
    pub records: Vec<FfiPatientIntake>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub has_more: bool,
}

impl From<IntakePage> for FfiIntakePage {
    fn from(page: IntakePage) -> Self {
        Self {
            records: page.records.into_iter().map(|r| r.into()).collect(),
            total: page.pagination.total,
            page: page.pagination.page,
            limit: page.pagination.limit,
            total_pages: page.pagination.total_pages,
            has_more: page.pagination.has_more,
        }
    }
}

/// FFI-safe composed e-mail.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrescriptionEmail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
    pub attachment_filename: String,
    pub content_type: String,
}

impl From<PrescriptionEmail> for FfiPrescriptionEmail {
    fn from(email: PrescriptionEmail) -> Self {
        Self {
            to: email.to,
            from: email.from,
            subject: email.subject,
            body: email.body,
            attachment_filename: email.attachment_filename,
            content_type: email.content_type,
        }
    }
}

/// FFI-safe submission result; the host renders the prescription.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSubmission {
    pub intake_id: String,
    pub prescription_json: String,
    pub prescription_text: String,
    pub email: FfiPrescriptionEmail,
}

impl TryFrom<IntakeSubmission> for FfiSubmission {
    type Error = RxIntakeError;

    fn try_from(submission: IntakeSubmission) -> Result<Self, Self::Error> {
        Ok(Self {
            prescription_json: submission.prescription.to_json()?,
            prescription_text: submission.prescription.render_text(),
            intake_id: submission.intake_id,
            email: submission.email.into(),
        })
    }
}
