use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One graded submission. Append-only: after insertion the only field
/// ever mutated is `hidden_from_student` (the "clear history" soft
/// delete). Invariant: `0 <= score <= total_questions`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StudentAttempt {
    pub id: Uuid,
    pub student_id: Uuid,
    pub quiz_id: Uuid,
    pub score: i32,
    pub total_questions: i32,
    pub hidden_from_student: bool,
    pub created_at: Option<DateTime<Utc>>,
}
