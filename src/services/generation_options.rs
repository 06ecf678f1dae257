use crate::dto::quiz_dto::{Difficulty, GenerateQuizPayload, QuestionMix};
use crate::error::{Error, Result};

pub const MIN_QUESTIONS: i32 = 1;
pub const MAX_QUESTIONS: i32 = 50;

/// Fully resolved generation parameters.
///
/// Deliberately not `Clone`: the generation pipeline consumes the value
/// by move, so a retried request has to go through [`ResolvedOptions::resolve`]
/// again instead of reusing stale options.
#[derive(Debug, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub question_count: usize,
    pub mcq_count: usize,
    pub tf_count: usize,
    pub difficulty: Difficulty,
    pub allow_retake: bool,
}

impl ResolvedOptions {
    pub fn resolve(payload: &GenerateQuizPayload, lesson_text: &str) -> Result<Self> {
        if payload.question_count < MIN_QUESTIONS || payload.question_count > MAX_QUESTIONS {
            return Err(Error::InvalidOptions(format!(
                "Number of questions must be between {} and {}",
                MIN_QUESTIONS, MAX_QUESTIONS
            )));
        }

        if lesson_text.trim().is_empty() {
            return Err(Error::EmptyLessonContent);
        }

        let total = payload.question_count as usize;
        let (mcq_count, tf_count) = match payload.question_type {
            QuestionMix::Mcq => (total, 0),
            QuestionMix::Tf => (0, total),
            QuestionMix::Both => {
                // Majority multiple-choice: 60% MCQ rounded, at least one.
                let mcq = ((total as f64 * 0.6).round() as usize).max(1);
                (mcq, total - mcq)
            }
        };

        Ok(Self {
            question_count: total,
            mcq_count,
            tf_count,
            difficulty: payload.difficulty,
            allow_retake: payload.allow_retake,
        })
    }
}
