//! Patient intake database operations.

use chrono::NaiveDate;
use rusqlite::{params, ErrorCode, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::{Database, DbError, DbResult};
use crate::models::PatientIntake;

/// Default admin page size.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

const DATE_FORMAT: &str = "%Y-%m-%d";

const INTAKE_COLUMNS: &str = r#"
    id, name, email, phone, gender, date_of_birth, weight, height,
    aadhaar_number, address, medical_condition, symptoms, medical_history,
    selected_products, created_at
"#;

/// Admin list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeQuery {
    /// Substring matched against name, email and condition
    pub search: Option<String>,
    /// 1-based page number
    pub page: u32,
    /// Records per page
    pub limit: u32,
}

impl Default for IntakeQuery {
    fn default() -> Self {
        Self {
            search: None,
            page: 1,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl IntakeQuery {
    /// Trimmed search term, `None` when blank.
    fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Pagination metadata for the admin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub has_more: bool,
}

impl Pagination {
    fn new(total: u64, page: u32, limit: u32, returned: usize) -> Self {
        let offset = u64::from(page - 1) * u64::from(limit);
        Self {
            total,
            page,
            limit,
            total_pages: total.div_ceil(u64::from(limit)),
            has_more: offset + (returned as u64) < total,
        }
    }
}

/// One page of intakes, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakePage {
    pub records: Vec<PatientIntake>,
    pub pagination: Pagination,
}

impl Database {
    /// Insert a new intake.
    pub fn insert_intake(&self, intake: &PatientIntake) -> DbResult<()> {
        let selected_json = serde_json::to_string(&intake.selected_products)?;

        let result = self.conn.execute(
            r#"
            INSERT INTO patient_intakes (
                id, name, email, phone, gender, date_of_birth, weight, height,
                aadhaar_number, address, medical_condition, symptoms, medical_history,
                selected_products, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
            "#,
            params![
                intake.id,
                intake.name,
                intake.email,
                intake.phone,
                intake.gender,
                intake.date_of_birth.format(DATE_FORMAT).to_string(),
                intake.weight,
                intake.height,
                intake.aadhaar_number,
                intake.address,
                intake.medical_condition,
                intake.symptoms,
                intake.medical_history,
                selected_json,
                intake.created_at,
            ],
        );

        match result {
            Ok(_) => {
                tracing::info!(intake_id = %intake.id, "intake stored");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(DbError::Constraint(format!("intake {} already exists", intake.id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Get an intake by ID.
    pub fn get_intake(&self, id: &str) -> DbResult<Option<PatientIntake>> {
        let sql = format!("SELECT {INTAKE_COLUMNS} FROM patient_intakes WHERE id = ?");
        let row = self
            .conn
            .query_row(&sql, [id], IntakeRow::from_row)
            .optional()?;

        row.map(|row| row.try_into()).transpose()
    }

    /// Get an intake by ID, failing if it does not exist.
    pub fn require_intake(&self, id: &str) -> DbResult<PatientIntake> {
        self.get_intake(id)?
            .ok_or_else(|| DbError::NotFound(format!("intake {id}")))
    }

    /// Count intakes matching an optional search term.
    pub fn count_intakes(&self, search: Option<&str>) -> DbResult<u64> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let count: i64 = match search {
            Some(term) => self.conn.query_row(
                &format!("SELECT COUNT(*) FROM patient_intakes WHERE {SEARCH_CLAUSE}"),
                [like_pattern(term)],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM patient_intakes", [], |row| row.get(0))?,
        };
        Ok(count.max(0) as u64)
    }

    /// List intakes for the admin view.
    pub fn list_intakes(&self, query: &IntakeQuery) -> DbResult<IntakePage> {
        let page = query.page.max(1);
        let limit = query.limit.max(1);
        let offset = i64::from(page - 1) * i64::from(limit);
        let search = query.search_term();

        let mut records: Vec<PatientIntake> = Vec::new();
        match search {
            Some(term) => {
                let sql = format!(
                    "SELECT {INTAKE_COLUMNS} FROM patient_intakes WHERE {SEARCH_CLAUSE} \
                     ORDER BY created_at DESC, rowid DESC LIMIT ?2 OFFSET ?3"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map(
                    params![like_pattern(term), i64::from(limit), offset],
                    IntakeRow::from_row,
                )?;
                for row in rows {
                    records.push(row?.try_into()?);
                }
            }
            None => {
                let sql = format!(
                    "SELECT {INTAKE_COLUMNS} FROM patient_intakes \
                     ORDER BY created_at DESC, rowid DESC LIMIT ?1 OFFSET ?2"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows =
                    stmt.query_map(params![i64::from(limit), offset], IntakeRow::from_row)?;
                for row in rows {
                    records.push(row?.try_into()?);
                }
            }
        }

        let total = self.count_intakes(search)?;
        let pagination = Pagination::new(total, page, limit, records.len());

        Ok(IntakePage {
            records,
            pagination,
        })
    }

    /// Delete an intake.
    pub fn delete_intake(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM patient_intakes WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }
}

/// Case-insensitive (ASCII) substring match on the searchable columns.
const SEARCH_CLAUSE: &str = r#"(
    name LIKE ?1 ESCAPE '\' OR
    email LIKE ?1 ESCAPE '\' OR
    medical_condition LIKE ?1 ESCAPE '\'
)"#;

/// Wrap a search term for LIKE, escaping its wildcards.
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Intermediate row struct for database mapping.
struct IntakeRow {
    id: String,
    name: String,
    email: String,
    phone: String,
    gender: String,
    date_of_birth: String,
    weight: Option<String>,
    height: Option<String>,
    aadhaar_number: Option<String>,
    address: Option<String>,
    medical_condition: String,
    symptoms: Option<String>,
    medical_history: Option<String>,
    selected_products: String,
    created_at: String,
}

impl IntakeRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            gender: row.get(4)?,
            date_of_birth: row.get(5)?,
            weight: row.get(6)?,
            height: row.get(7)?,
            aadhaar_number: row.get(8)?,
            address: row.get(9)?,
            medical_condition: row.get(10)?,
            symptoms: row.get(11)?,
            medical_history: row.get(12)?,
            selected_products: row.get(13)?,
            created_at: row.get(14)?,
        })
    }
}

impl TryFrom<IntakeRow> for PatientIntake {
    type Error = DbError;

    fn try_from(row: IntakeRow) -> Result<Self, Self::Error> {
        let date_of_birth = NaiveDate::parse_from_str(&row.date_of_birth, DATE_FORMAT)
            .map_err(|e| DbError::Constraint(format!("bad date_of_birth for {}: {e}", row.id)))?;

        Ok(PatientIntake {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            gender: row.gender,
            date_of_birth,
            weight: row.weight,
            height: row.height,
            aadhaar_number: row.aadhaar_number,
            address: row.address,
            medical_condition: row.medical_condition,
            symptoms: row.symptoms,
            medical_history: row.medical_history,
            selected_products: serde_json::from_str(&row.selected_products)?,
            created_at: row.created_at,
        })
    }
}
