use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_PUBLISHED: &str = "published";

/// A quiz owns its questions and answers; deleting it cascades to both.
/// Quizzes are always created in `draft` status and become visible to
/// students only after an explicit publish action.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub title: String,
    pub status: String,
    pub allow_retake: bool,
    pub created_at: Option<DateTime<Utc>>,
}
