//! SQLite persistence
//!
//! One pool for the whole process; the schema is applied on connect and
//! every statement is idempotent, so there is no separate migration step.

pub mod software_activities;

use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS software_activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    career TEXT,
    year INTEGER NOT NULL,
    semester INTEGER NOT NULL,
    start_date DATE,
    end_date DATE,
    execution_place TEXT NOT NULL DEFAULT '',
    campus TEXT NOT NULL DEFAULT '',
    activity_name TEXT NOT NULL DEFAULT '',
    agreement_entity TEXT,
    description TEXT,
    cine_isced_name TEXT,
    cine_field_detailed_id TEXT,
    num_hours INTEGER,
    activity_type TEXT,
    course_value TEXT,
    teacher_document_type TEXT,
    teacher_document_number TEXT,
    total_beneficiaries INTEGER,
    professors_count INTEGER,
    administrative_count INTEGER,
    external_people_count INTEGER,
    speaker_full_name TEXT,
    speaker_origin TEXT,
    speaker_company TEXT,
    consultancy_entity_name TEXT,
    consultancy_sector_id TEXT,
    consultancy_value TEXT,
    evidence_event_planning INTEGER NOT NULL DEFAULT 0,
    evidence_event_planning_file TEXT,
    evidence_attendance_control INTEGER NOT NULL DEFAULT 0,
    evidence_attendance_control_file TEXT,
    evidence_program_design_guide INTEGER NOT NULL DEFAULT 0,
    evidence_program_design_guide_file TEXT,
    evidence_audiovisual_record INTEGER NOT NULL DEFAULT 0,
    evidence_audiovisual_record_file TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS software_activity_breakdowns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    activity_id INTEGER NOT NULL
        REFERENCES software_activities(id) ON DELETE CASCADE,
    population TEXT NOT NULL,
    campus TEXT NOT NULL,
    program TEXT NOT NULL,
    level TEXT NOT NULL,
    count INTEGER NOT NULL CHECK (count >= 0)
);

CREATE INDEX IF NOT EXISTS idx_breakdowns_activity
    ON software_activity_breakdowns(activity_id);
"#;

/// Apply the schema; safe to call on every startup.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA)
        .execute(pool)
        .await
        .context("Failed to initialize database schema")?;
    Ok(())
}

/// Open (creating if needed) the database at `url` and apply the schema.
pub async fn connect(url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid database url: {url}"))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {url}"))?;
    init_schema(&pool).await?;
    Ok(pool)
}
