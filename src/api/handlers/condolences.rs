use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{
    api::{extract::AppJson, handlers::types::Envelope, state::AppState},
    domain::{Condolence, NewCondolence},
    error::{AppError, Result},
};

/// Public condolence submission. Validation runs before any store call;
/// the created row is always unapproved.
pub async fn create(
    State(state): State<AppState>,
    AppJson(request): AppJson<NewCondolence>,
) -> Result<(StatusCode, Json<Envelope<Condolence>>)> {
    request.validate().map_err(AppError::from_validation)?;

    if request.author_name.trim().is_empty() {
        return Err(AppError::BadRequest("author_name is required".to_string()));
    }
    if request.message.trim().is_empty() {
        return Err(AppError::BadRequest("message is required".to_string()));
    }

    let condolence = state.service_context.condolence_repo.create(request).await?;

    Ok((StatusCode::CREATED, Envelope::ok(condolence)))
}
