use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{
        extract::AppJson,
        handlers::types::{Envelope, PageEnvelope},
        state::AppState,
    },
    domain::{Condolence, DonationStats, Funeral, FuneralFilter, FuneralStatus, NewFuneral},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ListFuneralsQuery {
    pub search: Option<String>,
    pub region: Option<String>,
    pub status: Option<String>,
    #[serde(alias = "dateRange")]
    pub date_range: Option<String>,
    #[serde(alias = "sortBy")]
    pub sort_by: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListFuneralsQuery>,
) -> Result<Json<PageEnvelope<Funeral>>> {
    let filter = FuneralFilter::from_raw(
        params.search,
        params.region,
        params.status.as_deref(),
        params.date_range.as_deref(),
        params.sort_by.as_deref(),
        params.limit,
        params.offset,
    );

    let page = state.service_context.funeral_repo.list_public(&filter).await?;

    Ok(PageEnvelope::ok(page.rows, page.count))
}

pub async fn featured(State(state): State<AppState>) -> Result<Json<Envelope<Vec<Funeral>>>> {
    let funerals = state.service_context.funeral_repo.list_featured().await?;
    Ok(Envelope::ok(funerals))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Funeral>>> {
    let funeral = find_public(&state, id).await?;
    Ok(Envelope::ok(funeral))
}

pub async fn create(
    State(state): State<AppState>,
    AppJson(request): AppJson<NewFuneral>,
) -> Result<(StatusCode, Json<Envelope<Funeral>>)> {
    request.validate().map_err(AppError::from_validation)?;

    let funeral = state.service_context.funeral_repo.create(request).await?;

    Ok((StatusCode::CREATED, Envelope::ok(funeral)))
}

/// Approved condolences for one publicly listed funeral.
pub async fn condolences(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Vec<Condolence>>>> {
    let funeral = find_public(&state, id).await?;

    let condolences = state
        .service_context
        .condolence_repo
        .list_approved_for_funeral(funeral.id)
        .await?;

    Ok(Envelope::ok(condolences))
}

/// Aggregate donation figures. A funeral with no completed donations gets
/// zeros, not an error.
pub async fn donation_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<DonationStats>>> {
    let stats = state
        .service_context
        .donation_repo
        .stats_for_funeral(id)
        .await?;

    Ok(Envelope::ok(stats))
}

/// Looks a funeral up as the public sees it: pending or hidden rows read
/// as missing.
async fn find_public(state: &AppState, id: Uuid) -> Result<Funeral> {
    let funeral = state
        .service_context
        .funeral_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Funeral not found".to_string()))?;

    if funeral.status != FuneralStatus::Approved || !funeral.is_visible {
        return Err(AppError::NotFound("Funeral not found".to_string()));
    }

    Ok(funeral)
}
