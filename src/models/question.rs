use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TYPE_MCQ: &str = "mcq";
pub const TYPE_TF: &str = "tf";

/// A persisted question. `question_type` is immutable after creation:
/// the edit path may change the text but never the type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub question_text: String,
    pub question_type: String,
}

/// One option of a validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqOption {
    pub text: String,
    pub is_correct: bool,
}

/// A question that has passed response validation. Invariants hold by
/// construction: an `Mcq` carries exactly 4 options with exactly one
/// marked correct; a `Tf` carries the truth value of the statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedQuestion {
    Mcq {
        question_text: String,
        options: Vec<McqOption>,
    },
    Tf {
        question_text: String,
        answer: bool,
    },
}

impl ValidatedQuestion {
    pub fn question_type(&self) -> &'static str {
        match self {
            ValidatedQuestion::Mcq { .. } => TYPE_MCQ,
            ValidatedQuestion::Tf { .. } => TYPE_TF,
        }
    }

    pub fn question_text(&self) -> &str {
        match self {
            ValidatedQuestion::Mcq { question_text, .. } => question_text,
            ValidatedQuestion::Tf { question_text, .. } => question_text,
        }
    }
}
