use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{extract::AppJson, handlers::types::Envelope, state::AppState},
    domain::{Donation, DonationStatus, NewDonation},
    error::{AppError, Result},
};

/// Public donation submission. The created row is always Pending with the
/// default currency applied when none was sent.
pub async fn create(
    State(state): State<AppState>,
    AppJson(request): AppJson<NewDonation>,
) -> Result<(StatusCode, Json<Envelope<Donation>>)> {
    request.validate().map_err(AppError::from_validation)?;

    let donation = state.service_context.donation_repo.create(request).await?;

    Ok((StatusCode::CREATED, Envelope::ok(donation)))
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub donation_id: Uuid,
    pub status: String,
    pub payment_reference: Option<String>,
}

/// Payment-provider confirmation callback. Carries the same transition
/// rules as the admin status update: Pending rows only, never back to
/// Pending.
pub async fn confirm(
    State(state): State<AppState>,
    AppJson(request): AppJson<ConfirmPaymentRequest>,
) -> Result<Json<Envelope<Donation>>> {
    let status = DonationStatus::parse(&request.status).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown donation status: {}", request.status))
    })?;

    let donation = state
        .service_context
        .donation_repo
        .update_status(request.donation_id, status, request.payment_reference.as_deref())
        .await?;

    Ok(Envelope::ok(donation))
}
