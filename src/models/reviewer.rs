use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A saved study reviewer: the model's markdown summary of one lesson,
/// kept per student. `lesson_title` is denormalized at generation time
/// so the saved reviewer outlives its lesson (`lesson_id` is nulled
/// when the lesson is deleted).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reviewer {
    pub id: Uuid,
    pub student_id: Uuid,
    pub lesson_id: Option<Uuid>,
    pub lesson_title: String,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// List projection: the content body is omitted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewerSummary {
    pub id: Uuid,
    pub lesson_title: String,
    pub created_at: Option<DateTime<Utc>>,
}
