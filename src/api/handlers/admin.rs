use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    api::{extract::AppJson, handlers::types::Envelope, state::AppState},
    domain::{Condolence, Donation, DonationStatus, Funeral, FuneralStatus},
    error::{AppError, Result},
    storage::{self, StorageStatus},
};

#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub pending_funerals: i64,
    pub approved_funerals: i64,
    pub pending_condolences: i64,
    pub completed_donation_total: f64,
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<Envelope<DashboardStats>>> {
    let ctx = &state.service_context;

    let (pending_funerals, approved_funerals, pending_condolences, completed_donation_total) = tokio::join!(
        ctx.funeral_repo.count_by_status(FuneralStatus::Pending),
        ctx.funeral_repo.count_by_status(FuneralStatus::Approved),
        ctx.condolence_repo.count_pending(),
        ctx.donation_repo.completed_total(),
    );

    Ok(Envelope::ok(DashboardStats {
        pending_funerals: pending_funerals?,
        approved_funerals: approved_funerals?,
        pending_condolences: pending_condolences?,
        completed_donation_total: completed_donation_total?,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    fn limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 200)
    }

    fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// Every funeral regardless of status, newest submissions first.
pub async fn list_funerals(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Funeral>>>> {
    let funerals = state
        .service_context
        .funeral_repo
        .list_all(params.limit(), params.offset())
        .await?;

    Ok(Envelope::ok(funerals))
}

pub async fn approve_funeral(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Funeral>>> {
    let funeral = state
        .service_context
        .funeral_repo
        .set_status(id, FuneralStatus::Approved)
        .await?;

    Ok(Envelope::ok(funeral))
}

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub visible: bool,
}

pub async fn set_visibility(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<VisibilityRequest>,
) -> Result<Json<Envelope<Funeral>>> {
    let funeral = state
        .service_context
        .funeral_repo
        .set_visibility(id, request.visible)
        .await?;

    Ok(Envelope::ok(funeral))
}

#[derive(Debug, Deserialize)]
pub struct FeatureRequest {
    pub featured: bool,
}

pub async fn set_featured(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<FeatureRequest>,
) -> Result<Json<Envelope<Funeral>>> {
    let funeral = state
        .service_context
        .funeral_repo
        .set_featured(id, request.featured)
        .await?;

    Ok(Envelope::ok(funeral))
}

/// Multipart upload of a funeral program PDF. Refused while storage is
/// degraded; the error names the fallback provider.
pub async fn upload_program(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<Envelope<Funeral>>> {
    if let StorageStatus::Degraded { fallback, .. } = &*state.storage {
        return Err(AppError::ServiceUnavailable(format!(
            "Program storage is degraded; upload via the {} fallback provider",
            fallback
        )));
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .unwrap_or("program.pdf")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;

        let url =
            storage::save_program_pdf(&state.settings.storage.asset_root, &filename, &data)
                .await?;

        let funeral = state
            .service_context
            .funeral_repo
            .set_program_pdf(id, &url)
            .await?;

        return Ok(Envelope::ok(funeral));
    }

    Err(AppError::BadRequest("Missing 'file' field".to_string()))
}

/// Moderation queue: condolences awaiting approval, oldest first.
pub async fn pending_condolences(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Envelope<Vec<Condolence>>>> {
    let condolences = state
        .service_context
        .condolence_repo
        .list_pending(params.limit(), params.offset())
        .await?;

    Ok(Envelope::ok(condolences))
}

pub async fn approve_condolence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Condolence>>> {
    let condolence = state.service_context.condolence_repo.approve(id).await?;
    Ok(Envelope::ok(condolence))
}

pub async fn delete_condolence(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.condolence_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All donations for one funeral, any status, newest first.
pub async fn list_donations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Envelope<Vec<Donation>>>> {
    let donations = state
        .service_context
        .donation_repo
        .list_for_funeral(id)
        .await?;

    Ok(Envelope::ok(donations))
}

#[derive(Debug, Deserialize)]
pub struct UpdateDonationStatusRequest {
    pub status: String,
    pub payment_reference: Option<String>,
}

pub async fn update_donation_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(request): AppJson<UpdateDonationStatusRequest>,
) -> Result<Json<Envelope<Donation>>> {
    let status = DonationStatus::parse(&request.status).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown donation status: {}", request.status))
    })?;

    let donation = state
        .service_context
        .donation_repo
        .update_status(id, status, request.payment_reference.as_deref())
        .await?;

    Ok(Envelope::ok(donation))
}
