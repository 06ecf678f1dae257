use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted answer row. For `mcq` questions exactly one of the four
/// rows has `is_correct = true`; for `tf` questions the two rows are
/// `"True"` / `"False"` with complementary flags.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Answer {
    pub id: Uuid,
    pub question_id: Uuid,
    pub answer_text: String,
    pub is_correct: bool,
}

/// Student-facing projection of an answer: the correctness flag is
/// deliberately absent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerOption {
    pub id: Uuid,
    pub question_id: Uuid,
    pub answer_text: String,
}
