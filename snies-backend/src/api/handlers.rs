//! Handlers for the software-activities endpoints: paged listing, the
//! template export download, and the multipart template import.

use axum::extract::{Multipart, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::{AppError, AppResult};
use crate::api::AppState;
use crate::domain::{BeneficiaryBreakdown, SoftwareActivity};
use crate::excel::{export_workbook, import_workbook};
use crate::storage::software_activities as repo;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    #[serde(flatten)]
    pub activity: SoftwareActivity,
    pub breakdowns: Vec<BeneficiaryBreakdown>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub created: usize,
    pub skipped_empty_rows: usize,
}

/// GET /api/software-activities
pub async fn list_activities(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<Vec<ActivityResponse>>> {
    let limit = params.limit.unwrap_or(100).max(0);
    let offset = params.offset.unwrap_or(0).max(0);
    let rows = repo::list_with_breakdowns(&state.pool, limit, offset).await?;
    let out = rows
        .into_iter()
        .map(|(activity, mut breakdowns)| {
            breakdowns.sort_by_key(|b| b.sort_key());
            ActivityResponse { activity, breakdowns }
        })
        .collect();
    Ok(Json(out))
}

/// GET /api/software-activities/export
///
/// Streams the filled-in template as an attachment.
pub async fn export_activities(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(5000).max(0);
    let offset = params.offset.unwrap_or(0).max(0);
    let rows = repo::list_with_breakdowns(&state.pool, limit, offset).await?;
    let result = export_workbook(&rows)?;

    let headers = [
        (header::CONTENT_TYPE, result.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", result.filename),
        ),
    ];
    Ok((headers, result.data))
}

/// POST /api/software-activities/import
///
/// Takes the template as a multipart "file" field and creates the rows
/// it contains. 201 on success with created/skipped counts.
pub async fn import_activities(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ImportResponse>)> {
    let mut file: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Malformed multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
            file = Some(bytes.to_vec());
        }
    }
    let Some(file) = file else {
        return Err(AppError::BadRequest("Missing \"file\" field".to_string()));
    };

    let parsed = import_workbook(&file)
        .map_err(|e| AppError::BadRequest(format!("Could not read workbook: {e}")))?;
    let created = repo::bulk_create(
        &state.pool,
        &parsed.activities,
        &parsed.breakdowns_by_index,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            created,
            skipped_empty_rows: parsed.skipped_empty_rows,
        }),
    ))
}
