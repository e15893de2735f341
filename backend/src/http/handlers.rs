//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! coverage service.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use log::info;

use super::dto::{
    CoverageQuery, CoverageResponse, DatasetInfo, DatasetListResponse, HealthResponse,
    UploadQuery, UploadResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{DatasetId, PriorityMetric};
use crate::services::coverage_service;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

const DEFAULT_UPLOAD_NAME: &str = "upload.csv";

/// Requested priority, or the configured default.
fn resolve_priority(state: &AppState, requested: Option<&str>) -> Result<PriorityMetric, AppError> {
    match requested {
        Some(value) => value.parse().map_err(AppError::BadRequest),
        None => Ok(state.config.coverage.priority),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let healthy = state.repository.health_check().await?;
    // listing would wait on the same lock the check gave up on
    let (status, datasets) = if healthy {
        ("ok", state.repository.list_datasets().await?.len())
    } else {
        ("degraded", 0)
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        datasets,
    }))
}

// =============================================================================
// Datasets
// =============================================================================

/// POST /v1/datasets?name=&priority=
///
/// Body is the raw CSV. Responds 201 with the stored dataset and its coverage,
/// or 200 when an identical upload already exists.
pub async fn upload_dataset(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let priority = resolve_priority(&state, query.priority.as_deref())?;
    let name = query
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_NAME.to_string());

    let stored =
        coverage_service::store_upload(state.repository.as_ref(), &name, body.to_vec()).await?;
    let dataset_id = stored.info.dataset_id;

    let report = coverage_service::coverage_for(
        state.repository.as_ref(),
        dataset_id,
        priority,
        &state.config.coverage.thresholds,
    )
    .await?;
    let warnings = state.repository.get_dataset(dataset_id).await?.warnings.clone();

    let status = if stored.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    info!("Upload '{}' -> dataset {} ({})", name, dataset_id, status);

    Ok((
        status,
        Json(UploadResponse {
            dataset: stored.info,
            created: stored.created,
            warnings,
            report,
        }),
    ))
}

/// GET /v1/datasets
pub async fn list_datasets(State(state): State<AppState>) -> HandlerResult<DatasetListResponse> {
    let datasets = state.repository.list_datasets().await?;
    let total = datasets.len();
    Ok(Json(DatasetListResponse { datasets, total }))
}

/// GET /v1/datasets/{dataset_id}
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
) -> HandlerResult<DatasetInfo> {
    let info = state
        .repository
        .get_dataset_info(DatasetId::new(dataset_id))
        .await?;
    Ok(Json(info))
}

/// DELETE /v1/datasets/{dataset_id}
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state
        .repository
        .delete_dataset(DatasetId::new(dataset_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Coverage
// =============================================================================

/// GET /v1/datasets/{dataset_id}/coverage?priority=
pub async fn get_coverage(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
    Query(query): Query<CoverageQuery>,
) -> HandlerResult<CoverageResponse> {
    let priority = resolve_priority(&state, query.priority.as_deref())?;
    let dataset_id = DatasetId::new(dataset_id);

    let report = coverage_service::coverage_for(
        state.repository.as_ref(),
        dataset_id,
        priority,
        &state.config.coverage.thresholds,
    )
    .await?;

    Ok(Json(CoverageResponse { dataset_id, report }))
}

/// GET /v1/datasets/{dataset_id}/export?priority=
///
/// The combined per-threshold export as a CSV attachment.
pub async fn export_coverage(
    State(state): State<AppState>,
    Path(dataset_id): Path<i64>,
    Query(query): Query<CoverageQuery>,
) -> Result<Response, AppError> {
    let priority = resolve_priority(&state, query.priority.as_deref())?;

    let report = coverage_service::coverage_for(
        state.repository.as_ref(),
        DatasetId::new(dataset_id),
        priority,
        &state.config.coverage.thresholds,
    )
    .await?;
    let csv = tokio::task::spawn_blocking(move || report.export_csv())
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.config.coverage.export_filename
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
