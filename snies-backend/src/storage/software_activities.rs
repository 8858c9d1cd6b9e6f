//! Software-activity queries
//!
//! Decimals travel as TEXT to keep their exact scale, dates as DATE,
//! the classification enums as their canonical lowercase strings.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, SqlitePool, Transaction};

use crate::domain::{BeneficiaryBreakdown, EducationLevel, Population, SoftwareActivity};

const INSERT_ACTIVITY: &str = "INSERT INTO software_activities (
    career, year, semester, start_date, end_date, execution_place, campus,
    activity_name, agreement_entity, description, cine_isced_name,
    cine_field_detailed_id, num_hours, activity_type, course_value,
    teacher_document_type, teacher_document_number, total_beneficiaries,
    professors_count, administrative_count, external_people_count,
    speaker_full_name, speaker_origin, speaker_company,
    consultancy_entity_name, consultancy_sector_id, consultancy_value,
    evidence_event_planning, evidence_attendance_control,
    evidence_program_design_guide, evidence_audiovisual_record
) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
RETURNING id";

const SELECT_ACTIVITY: &str = "SELECT * FROM software_activities
 ORDER BY id DESC LIMIT ? OFFSET ?";

async fn insert_activity(tx: &mut Transaction<'_, Sqlite>, a: &SoftwareActivity) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(INSERT_ACTIVITY)
        .bind(&a.career)
        .bind(a.year)
        .bind(a.semester)
        .bind(a.start_date)
        .bind(a.end_date)
        .bind(&a.execution_place)
        .bind(&a.campus)
        .bind(&a.activity_name)
        .bind(&a.agreement_entity)
        .bind(&a.description)
        .bind(&a.cine_isced_name)
        .bind(&a.cine_field_detailed_id)
        .bind(a.num_hours)
        .bind(&a.activity_type)
        .bind(a.course_value.map(|v| v.to_string()))
        .bind(&a.teacher_document_type)
        .bind(&a.teacher_document_number)
        .bind(a.total_beneficiaries)
        .bind(a.professors_count)
        .bind(a.administrative_count)
        .bind(a.external_people_count)
        .bind(&a.speaker_full_name)
        .bind(&a.speaker_origin)
        .bind(&a.speaker_company)
        .bind(&a.consultancy_entity_name)
        .bind(&a.consultancy_sector_id)
        .bind(a.consultancy_value.map(|v| v.to_string()))
        .bind(a.evidence_event_planning)
        .bind(a.evidence_attendance_control)
        .bind(a.evidence_program_design_guide)
        .bind(a.evidence_audiovisual_record)
        .fetch_one(&mut **tx)
        .await
        .context("Failed to insert software activity")?;
    Ok(id)
}

async fn insert_breakdown(
    tx: &mut Transaction<'_, Sqlite>,
    activity_id: i64,
    b: &BeneficiaryBreakdown,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO software_activity_breakdowns
         (activity_id, population, campus, program, level, count)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(activity_id)
    .bind(b.population.as_str())
    .bind(&b.campus)
    .bind(&b.program)
    .bind(b.level.as_str())
    .bind(b.count)
    .execute(&mut **tx)
    .await
    .context("Failed to insert beneficiary breakdown")?;
    Ok(())
}

fn opt_decimal(row: &SqliteRow, column: &str) -> Result<Option<Decimal>> {
    let raw: Option<String> = row.try_get(column)?;
    match raw {
        Some(s) => {
            let v = Decimal::from_str(&s)
                .with_context(|| format!("Malformed decimal in column {column}: {s}"))?;
            Ok(Some(v))
        }
        None => Ok(None),
    }
}

fn activity_from_row(row: &SqliteRow) -> Result<SoftwareActivity> {
    Ok(SoftwareActivity {
        id: Some(row.try_get("id")?),
        career: row.try_get("career")?,
        year: row.try_get("year")?,
        semester: row.try_get("semester")?,
        start_date: row.try_get::<Option<NaiveDate>, _>("start_date")?,
        end_date: row.try_get::<Option<NaiveDate>, _>("end_date")?,
        execution_place: row.try_get("execution_place")?,
        campus: row.try_get("campus")?,
        activity_name: row.try_get("activity_name")?,
        agreement_entity: row.try_get("agreement_entity")?,
        description: row.try_get("description")?,
        cine_isced_name: row.try_get("cine_isced_name")?,
        cine_field_detailed_id: row.try_get("cine_field_detailed_id")?,
        num_hours: row.try_get("num_hours")?,
        activity_type: row.try_get("activity_type")?,
        course_value: opt_decimal(row, "course_value")?,
        teacher_document_type: row.try_get("teacher_document_type")?,
        teacher_document_number: row.try_get("teacher_document_number")?,
        total_beneficiaries: row.try_get("total_beneficiaries")?,
        professors_count: row.try_get("professors_count")?,
        administrative_count: row.try_get("administrative_count")?,
        external_people_count: row.try_get("external_people_count")?,
        speaker_full_name: row.try_get("speaker_full_name")?,
        speaker_origin: row.try_get("speaker_origin")?,
        speaker_company: row.try_get("speaker_company")?,
        consultancy_entity_name: row.try_get("consultancy_entity_name")?,
        consultancy_sector_id: row.try_get("consultancy_sector_id")?,
        consultancy_value: opt_decimal(row, "consultancy_value")?,
        evidence_event_planning: row.try_get("evidence_event_planning")?,
        evidence_attendance_control: row.try_get("evidence_attendance_control")?,
        evidence_program_design_guide: row.try_get("evidence_program_design_guide")?,
        evidence_audiovisual_record: row.try_get("evidence_audiovisual_record")?,
    })
}

fn breakdown_from_row(row: &SqliteRow) -> Result<BeneficiaryBreakdown> {
    let population: String = row.try_get("population")?;
    let level: String = row.try_get("level")?;
    let Some(population) = Population::parse(&population) else {
        bail!("Unknown population in database: {population}");
    };
    let Some(level) = EducationLevel::parse(&level) else {
        bail!("Unknown education level in database: {level}");
    };
    Ok(BeneficiaryBreakdown {
        id: Some(row.try_get("id")?),
        activity_id: Some(row.try_get("activity_id")?),
        population,
        campus: row.try_get("campus")?,
        program: row.try_get("program")?,
        level,
        count: row.try_get("count")?,
    })
}

/// Insert one activity and its breakdowns atomically; returns it with
/// the assigned id.
pub async fn create(
    pool: &SqlitePool,
    activity: &SoftwareActivity,
    breakdowns: &[BeneficiaryBreakdown],
) -> Result<SoftwareActivity> {
    let mut tx = pool.begin().await.context("Failed to start transaction")?;
    let id = insert_activity(&mut tx, activity).await?;
    for b in breakdowns {
        insert_breakdown(&mut tx, id, b).await?;
    }
    tx.commit().await.context("Failed to commit transaction")?;

    let mut created = activity.clone();
    created.id = Some(id);
    Ok(created)
}

/// Insert a batch of activities in one transaction. Breakdowns are keyed
/// by the activity's position in the slice. Returns how many activities
/// were created; on any failure nothing is persisted.
pub async fn bulk_create(
    pool: &SqlitePool,
    activities: &[SoftwareActivity],
    breakdowns_by_index: &HashMap<usize, Vec<BeneficiaryBreakdown>>,
) -> Result<usize> {
    if activities.is_empty() {
        return Ok(0);
    }
    let mut tx = pool.begin().await.context("Failed to start transaction")?;
    for (index, activity) in activities.iter().enumerate() {
        let id = insert_activity(&mut tx, activity).await?;
        if let Some(breakdowns) = breakdowns_by_index.get(&index) {
            for b in breakdowns {
                insert_breakdown(&mut tx, id, b).await?;
            }
        }
    }
    tx.commit().await.context("Failed to commit transaction")?;
    Ok(activities.len())
}

/// Newest-first page of activities.
pub async fn list(pool: &SqlitePool, limit: i64, offset: i64) -> Result<Vec<SoftwareActivity>> {
    let rows = sqlx::query(SELECT_ACTIVITY)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list software activities")?;
    rows.iter().map(activity_from_row).collect()
}

/// Newest-first page of activities, each with its breakdowns.
pub async fn list_with_breakdowns(
    pool: &SqlitePool,
    limit: i64,
    offset: i64,
) -> Result<Vec<(SoftwareActivity, Vec<BeneficiaryBreakdown>)>> {
    let activities = list(pool, limit, offset).await?;
    let mut out = Vec::with_capacity(activities.len());
    for activity in activities {
        let rows = sqlx::query(
            "SELECT * FROM software_activity_breakdowns WHERE activity_id = ? ORDER BY id",
        )
        .bind(activity.id)
        .fetch_all(pool)
        .await
        .context("Failed to list beneficiary breakdowns")?;
        let breakdowns: Result<Vec<_>> = rows.iter().map(breakdown_from_row).collect();
        out.push((activity, breakdowns?));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    async fn test_pool() -> SqlitePool {
        // In-memory databases are per-connection, so the pool must hold
        // exactly one.
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        crate::storage::init_schema(&pool).await.unwrap();
        pool
    }

    fn activity(year: i32, name: &str) -> SoftwareActivity {
        SoftwareActivity {
            year,
            semester: 1,
            execution_place: "Campus".into(),
            campus: "CÚCUTA".into(),
            activity_name: name.into(),
            course_value: Decimal::from_str("99000.50").ok(),
            evidence_event_planning: true,
            ..Default::default()
        }
    }

    fn breakdown(count: i32) -> BeneficiaryBreakdown {
        BeneficiaryBreakdown {
            id: None,
            activity_id: None,
            population: Population::Students,
            campus: "CÚCUTA".into(),
            program: "Ing. Software".into(),
            level: EducationLevel::Tecnologo,
            count,
        }
    }

    #[tokio::test]
    async fn test_create_then_list_round_trips_fields() {
        let pool = test_pool().await;
        let created = create(&pool, &activity(2025, "Semana TIC"), &[breakdown(4)])
            .await
            .unwrap();
        assert!(created.id.is_some());

        let rows = list_with_breakdowns(&pool, 10, 0).await.unwrap();
        assert_eq!(rows.len(), 1);
        let (a, bds) = &rows[0];
        assert_eq!(a.id, created.id);
        assert_eq!(a.activity_name, "Semana TIC");
        assert_eq!(a.course_value, Decimal::from_str("99000.50").ok());
        assert!(a.evidence_event_planning);
        assert_eq!(bds.len(), 1);
        assert_eq!(bds[0].activity_id, created.id);
        assert_eq!(bds[0].population, Population::Students);
        assert_eq!(bds[0].level, EducationLevel::Tecnologo);
        assert_eq!(bds[0].count, 4);
    }

    #[tokio::test]
    async fn test_list_is_newest_first_and_paged() {
        let pool = test_pool().await;
        for year in [2023, 2024, 2025] {
            create(&pool, &activity(year, "x"), &[]).await.unwrap();
        }
        let page = list(&pool, 2, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].year, 2025);
        assert_eq!(page[1].year, 2024);
        let rest = list(&pool, 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].year, 2023);
    }

    #[tokio::test]
    async fn test_bulk_create_attaches_breakdowns_by_position() {
        let pool = test_pool().await;
        let activities = vec![activity(2024, "a"), activity(2025, "b")];
        let mut by_index = HashMap::new();
        by_index.insert(1usize, vec![breakdown(7)]);

        let created = bulk_create(&pool, &activities, &by_index).await.unwrap();
        assert_eq!(created, 2);

        let rows = list_with_breakdowns(&pool, 10, 0).await.unwrap();
        // Newest first: "b" leads and owns the breakdown.
        assert_eq!(rows[0].0.activity_name, "b");
        assert_eq!(rows[0].1.len(), 1);
        assert_eq!(rows[0].1[0].count, 7);
        assert!(rows[1].1.is_empty());
    }

    #[tokio::test]
    async fn test_bulk_create_rolls_back_entirely_on_bad_row() {
        let pool = test_pool().await;
        let activities = vec![activity(2024, "ok"), activity(2025, "bad")];
        let mut by_index = HashMap::new();
        // Violates the non-negative count constraint.
        by_index.insert(1usize, vec![breakdown(-1)]);

        assert!(bulk_create(&pool, &activities, &by_index).await.is_err());
        assert!(list(&pool, 10, 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_create_of_nothing_is_zero() {
        let pool = test_pool().await;
        let created = bulk_create(&pool, &[], &HashMap::new()).await.unwrap();
        assert_eq!(created, 0);
    }
}
