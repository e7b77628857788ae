//! SQLite schema definition.

/// Complete database schema for rx-intake.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patient Intakes
-- ============================================================================

CREATE TABLE IF NOT EXISTS patient_intakes (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    gender TEXT NOT NULL,
    date_of_birth TEXT NOT NULL,                  -- YYYY-MM-DD
    weight TEXT,
    height TEXT,
    aadhaar_number TEXT,
    address TEXT,
    medical_condition TEXT NOT NULL,
    symptoms TEXT,
    medical_history TEXT,
    selected_products TEXT NOT NULL DEFAULT '[]', -- JSON array of strings
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- Admin list is newest first
CREATE INDEX IF NOT EXISTS idx_intakes_created_at ON patient_intakes(created_at);
CREATE INDEX IF NOT EXISTS idx_intakes_email ON patient_intakes(email);
"#;
