use axum::Json;
use serde::Serialize;

/// Uniform success envelope: `{"success": true, "data": ...}`.
/// Failures never use this shape; they go through AppError's
/// `{"error": ...}` rendering.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

/// Success envelope for the filtered listing, carrying the total row count
/// alongside the page.
#[derive(Debug, Serialize)]
pub struct PageEnvelope<T> {
    pub success: bool,
    pub data: Vec<T>,
    pub count: i64,
}

impl<T: Serialize> PageEnvelope<T> {
    pub fn ok(data: Vec<T>, count: i64) -> Json<Self> {
        Json(Self { success: true, data, count })
    }
}
