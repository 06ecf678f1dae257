use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lesson bodies arrive as plain text extracted by the upload pipeline;
/// the quiz engine only ever reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub faculty_id: Uuid,
    pub title: String,
    pub extracted_text: String,
    pub created_at: Option<DateTime<Utc>>,
}
