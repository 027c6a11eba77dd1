use crate::{AppState, error::AppError};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection, StringRejection},
    },
};
use chrono::Utc;
use core_types::{ExtractionId, MoonId};
use feeds::{
    ExtractionCategory, ExtractionDetail, ExtractionRow, Footer, MoonCategory, MoonDetail,
    MoonRow, OwnedValueRow, SortDirection, TableRow, UserMiningRow, extraction_detail,
    extraction_rows, moon_detail, moon_rows, owned_value_report, sort_rows, user_mining_report,
};
use ingest::parse_survey;
use serde::Deserialize;
use std::sync::Arc;
use store::ImportSummary;

#[derive(Debug, Deserialize)]
pub struct MoonQuery {
    #[serde(default)]
    pub category: MoonCategory,
    pub uploader: Option<String>,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortDirection,
}

#[derive(Debug, Deserialize)]
pub struct ExtractionQuery {
    #[serde(default)]
    pub category: ExtractionCategory,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortDirection,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub uploader: String,
}

/// Applies the optional `sort`/`order` query parameters.
fn sort_if_requested<R: TableRow>(
    rows: &mut [R],
    column: Option<&str>,
    direction: SortDirection,
) -> Result<(), AppError> {
    if let Some(column) = column {
        sort_rows(rows, column, direction)?;
    }
    Ok(())
}

/// # GET /api/moons
pub async fn list_moons(
    State(state): State<Arc<AppState>>,
    query: Result<Query<MoonQuery>, QueryRejection>,
) -> Result<Json<Vec<MoonRow>>, AppError> {
    let Query(query) = query?;
    let snapshot = state.source.snapshot().await?;
    let mut rows = moon_rows(&snapshot, query.category, query.uploader.as_deref());
    sort_if_requested(&mut rows, query.sort.as_deref(), query.order)?;
    Ok(Json(rows))
}

/// # GET /api/moons/:moon_id
pub async fn get_moon_detail(
    State(state): State<Arc<AppState>>,
    path: Result<Path<MoonId>, PathRejection>,
) -> Result<Json<MoonDetail>, AppError> {
    let Path(moon_id) = path?;
    let snapshot = state.source.snapshot().await?;
    let detail = moon_detail(&snapshot, moon_id, state.mining.volume_per_month)?;
    Ok(Json(detail))
}

/// # GET /api/extractions
pub async fn list_extractions(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ExtractionQuery>, QueryRejection>,
) -> Result<Json<Vec<ExtractionRow>>, AppError> {
    let Query(query) = query?;
    let snapshot = state.source.snapshot().await?;
    let mut rows = extraction_rows(&snapshot, query.category, Utc::now());
    sort_if_requested(&mut rows, query.sort.as_deref(), query.order)?;
    Ok(Json(rows))
}

/// # GET /api/extractions/:extraction_id
pub async fn get_extraction_detail(
    State(state): State<Arc<AppState>>,
    path: Result<Path<ExtractionId>, PathRejection>,
) -> Result<Json<ExtractionDetail>, AppError> {
    let Path(extraction_id) = path?;
    let snapshot = state.source.snapshot().await?;
    let detail = extraction_detail(&snapshot, extraction_id)?;
    Ok(Json(detail))
}

/// # GET /api/reports/owned-value
pub async fn get_owned_value_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OwnedValueRow>>, AppError> {
    let snapshot = state.source.snapshot().await?;
    Ok(Json(owned_value_report(&snapshot)))
}

/// # GET /api/reports/owned-value/footer
/// Column sums of the owned value report.
pub async fn get_owned_value_footer(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Footer>, AppError> {
    let snapshot = state.source.snapshot().await?;
    Ok(Json(Footer::sum(&owned_value_report(&snapshot))))
}

/// # GET /api/reports/user-mining
pub async fn get_user_mining_report(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserMiningRow>>, AppError> {
    let snapshot = state.source.snapshot().await?;
    let today = Utc::now().date_naive();
    Ok(Json(user_mining_report(
        &snapshot,
        today,
        state.mining.user_mining_months,
    )))
}

/// # POST /api/surveys
/// Takes the survey text as body and merges it into the source.
pub async fn upload_survey(
    State(state): State<Arc<AppState>>,
    query: Result<Query<UploadQuery>, QueryRejection>,
    body: Result<String, StringRejection>,
) -> Result<Json<ImportSummary>, AppError> {
    let Query(query) = query?;
    let body = body?;
    let moons = parse_survey(&body)?;
    let summary = state
        .source
        .apply_survey(moons, &query.uploader, Utc::now())
        .await?;
    Ok(Json(summary))
}
