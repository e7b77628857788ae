//! Intake workflow over one store, one catalog and one configuration.

use chrono::NaiveDate;
use thiserror::Error;

use crate::catalog::{CatalogError, ProductCatalog};
use crate::config::IntakeConfig;
use crate::db::{Database, DbError, IntakePage, IntakeQuery};
use crate::export::{IntakeSubmission, Prescription, PrescriptionEmail};
use crate::models::PatientIntake;
use crate::resolver::Resolver;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct IntakeService {
    db: Database,
    catalog: ProductCatalog,
    config: IntakeConfig,
}

impl IntakeService {
    /// Open the store and catalog named by the configuration.
    pub fn open(config: IntakeConfig) -> ServiceResult<Self> {
        let catalog = ProductCatalog::load_or_builtin(config.catalog.path.as_deref())?;
        let db = Database::open(&config.database.path)?;
        Ok(Self::new(db, catalog, config))
    }

    pub fn new(db: Database, catalog: ProductCatalog, config: IntakeConfig) -> Self {
        Self {
            db,
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.catalog)
    }

    /// Store an intake, then build its prescription and e-mail as of `today`.
    pub fn submit(
        &self,
        intake: &PatientIntake,
        today: NaiveDate,
    ) -> ServiceResult<IntakeSubmission> {
        self.db.insert_intake(intake)?;

        let prescription = self.prescription(intake, today);
        let email = PrescriptionEmail::compose(intake, &self.config.email);

        tracing::info!(
            intake_id = %intake.id,
            products = prescription.lines.len(),
            "intake submitted"
        );

        Ok(IntakeSubmission {
            intake_id: intake.id.clone(),
            prescription,
            email,
        })
    }

    pub fn prescription(&self, intake: &PatientIntake, today: NaiveDate) -> Prescription {
        Prescription::build(
            intake,
            &self.resolver(),
            &self.config.clinic,
            &self.config.prescription,
            today,
        )
    }

    /// Admin list page using the configured page size.
    pub fn list(&self, search: Option<String>, page: u32) -> ServiceResult<IntakePage> {
        let query = IntakeQuery {
            search,
            page,
            limit: self.config.admin.page_size,
        };
        Ok(self.db.list_intakes(&query)?)
    }

    pub fn get(&self, id: &str) -> ServiceResult<Option<PatientIntake>> {
        Ok(self.db.get_intake(id)?)
    }

    pub fn require(&self, id: &str) -> ServiceResult<PatientIntake> {
        Ok(self.db.require_intake(id)?)
    }
}
