use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Condolence {
    pub id: Uuid,
    pub funeral_id: Uuid,
    pub author_name: String,
    pub author_email: Option<String>,
    pub author_location: Option<String>,
    pub message: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

/// Public submission shape. Has no `is_approved` field: every condolence
/// is persisted unapproved and only an admin action publishes it.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCondolence {
    pub funeral_id: Uuid,
    #[validate(length(min = 1, message = "author_name is required"))]
    pub author_name: String,
    #[validate(email(message = "author_email is not a valid email"))]
    pub author_email: Option<String>,
    pub author_location: Option<String>,
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,
}
