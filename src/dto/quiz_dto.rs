use crate::models::answer::{Answer, AnswerOption};
use crate::models::question::Question;
use crate::models::quiz::Quiz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionMix {
    Mcq,
    Tf,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Generation options arrive in the same request that triggers
/// generation; nothing is stashed in server-side state between a
/// "configure" step and a "generate" step.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateQuizPayload {
    pub question_count: i32,
    #[serde(default = "default_mix")]
    pub question_type: QuestionMix,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub allow_retake: bool,
}

fn default_mix() -> QuestionMix {
    QuestionMix::Both
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateManualQuizPayload {
    pub lesson_id: Uuid,
    #[validate(length(min = 1, message = "Quiz title must not be empty"))]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOption {
    pub text: String,
    pub is_correct: bool,
}

/// A manually authored question. Carries the same invariants the
/// response validator enforces on generated questions, checked at
/// write time by the quiz service.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "question_type", rename_all = "lowercase")]
pub enum NewQuestionPayload {
    Mcq {
        question_text: String,
        options: Vec<NewOption>,
    },
    Tf {
        question_text: String,
        is_correct: bool,
    },
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub question_text: String,
}

/// Faculty view of a quiz: full questions with correctness flags.
#[derive(Debug, Serialize)]
pub struct QuizDetail {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<QuestionDetail>,
}

#[derive(Debug, Serialize)]
pub struct QuestionDetail {
    #[serde(flatten)]
    pub question: Question,
    pub answers: Vec<Answer>,
}

/// Student view of a published quiz: answer options only, no
/// correctness flags.
#[derive(Debug, Serialize)]
pub struct StudentQuizDetail {
    pub id: Uuid,
    pub title: String,
    pub allow_retake: bool,
    pub questions: Vec<StudentQuestionDetail>,
}

#[derive(Debug, Serialize)]
pub struct StudentQuestionDetail {
    #[serde(flatten)]
    pub question: Question,
    pub answers: Vec<AnswerOption>,
}
