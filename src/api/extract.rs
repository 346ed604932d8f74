use async_trait::async_trait;
use axum::extract::{rejection::JsonRejection, FromRequest, Request};

use crate::error::AppError;

/// JSON body extractor that keeps rejections inside the error envelope:
/// a missing field or malformed body answers 400 with `{"error": ...}`
/// instead of axum's plain-text 422.
pub struct AppJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}
