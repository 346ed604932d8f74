use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::{api::state::AppState, error::AppError};

const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Gate for /admin routes: the caller must present the configured service
/// credential. Comparison is constant-time.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let expected = state.settings.admin.service_key.as_bytes();
    if !bool::from(provided.as_bytes().ct_eq(expected)) {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
