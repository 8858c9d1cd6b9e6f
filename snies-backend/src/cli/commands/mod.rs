//! Command handlers

use std::path::Path;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::excel::{export_workbook, import_workbook};
use crate::storage::software_activities as repo;

pub async fn serve(pool: SqlitePool, addr: Option<String>) -> Result<()> {
    let addr = crate::cli::bind_addr(addr);
    crate::api::serve(pool, &addr).await
}

pub async fn import(pool: SqlitePool, file: &Path) -> Result<()> {
    let data = std::fs::read(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let parsed = import_workbook(&data)?;
    let created = repo::bulk_create(&pool, &parsed.activities, &parsed.breakdowns_by_index)
        .await?;
    println!(
        "Imported {created} activities ({} empty rows skipped)",
        parsed.skipped_empty_rows
    );
    Ok(())
}

pub async fn export(pool: SqlitePool, file: &Path, limit: i64, offset: i64) -> Result<()> {
    let rows = repo::list_with_breakdowns(&pool, limit, offset).await?;
    let result = export_workbook(&rows)?;
    std::fs::write(file, &result.data)
        .with_context(|| format!("Failed to write {}", file.display()))?;
    println!("Exported {} activities to {}", rows.len(), file.display());
    Ok(())
}

pub async fn list(pool: SqlitePool, limit: i64, offset: i64) -> Result<()> {
    let rows = repo::list_with_breakdowns(&pool, limit, offset).await?;
    if rows.is_empty() {
        println!("No activities stored");
        return Ok(());
    }
    for (a, bds) in &rows {
        println!(
            "#{} {}-{} {} ({}, {} breakdowns)",
            a.id.unwrap_or(0),
            a.year,
            a.semester,
            a.activity_name,
            a.campus,
            bds.len()
        );
    }
    Ok(())
}
