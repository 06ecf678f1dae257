use crate::error::{Error, Result};
use crate::models::attempt::StudentAttempt;
use crate::models::quiz::STATUS_PUBLISHED;
use crate::services::grading::GradingService;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

const ATTEMPT_COLUMNS: &str =
    "id, student_id, quiz_id, score, total_questions, hidden_from_student, created_at";

#[derive(Clone)]
pub struct AttemptService {
    pool: PgPool,
}

impl AttemptService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grades a submission and records it as a terminal attempt.
    ///
    /// The only state transition per (student, quiz) is
    /// never-attempted -> attempted; a further submission is allowed
    /// only when the quiz permits retakes. Policy refusals leave the
    /// database untouched.
    pub async fn submit_attempt(
        &self,
        quiz_id: Uuid,
        student_id: Uuid,
        answers: &HashMap<Uuid, Uuid>,
    ) -> Result<Uuid> {
        if answers.is_empty() {
            return Err(Error::BadRequest("No answers submitted".to_string()));
        }

        let quiz: Option<(bool,)> =
            sqlx::query_as("SELECT allow_retake FROM quizzes WHERE id = $1 AND status = $2")
                .bind(quiz_id)
                .bind(STATUS_PUBLISHED)
                .fetch_optional(&self.pool)
                .await?;

        let Some((allow_retake,)) = quiz else {
            return Err(Error::NotFound("Quiz not available".to_string()));
        };

        let prior_attempts: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM student_attempts WHERE quiz_id = $1 AND student_id = $2",
        )
        .bind(quiz_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        if prior_attempts > 0 && !allow_retake {
            return Err(Error::RetakeNotAllowed);
        }

        let question_ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM questions WHERE quiz_id = $1")
                .bind(quiz_id)
                .fetch_all(&self.pool)
                .await?;

        if question_ids.is_empty() {
            return Err(Error::BadRequest("Quiz has no questions".to_string()));
        }
        if answers.len() > question_ids.len() {
            return Err(Error::BadRequest(
                "More answers submitted than the quiz has questions".to_string(),
            ));
        }

        let correct_rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            "SELECT a.question_id, a.id FROM answers a \
             JOIN questions qn ON a.question_id = qn.id \
             WHERE qn.quiz_id = $1 AND a.is_correct = TRUE",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let quiz_questions: HashSet<Uuid> = question_ids.into_iter().collect();
        let correct_answers: HashMap<Uuid, Uuid> = correct_rows.into_iter().collect();

        let (score, total_questions) =
            GradingService::score_submission(answers, &quiz_questions, &correct_answers);

        // Re-checks the retake policy inside the INSERT itself: two
        // concurrent submissions racing past the COUNT above cannot
        // both insert when retakes are off.
        let attempt_id: Option<Uuid> = sqlx::query_scalar(
            "INSERT INTO student_attempts (student_id, quiz_id, score, total_questions) \
             SELECT $1, $2, $3, $4 \
             WHERE $5 OR NOT EXISTS ( \
                 SELECT 1 FROM student_attempts WHERE quiz_id = $2 AND student_id = $1 \
             ) RETURNING id",
        )
        .bind(student_id)
        .bind(quiz_id)
        .bind(score)
        .bind(total_questions)
        .bind(allow_retake)
        .fetch_optional(&self.pool)
        .await?;

        let Some(attempt_id) = attempt_id else {
            return Err(Error::RetakeNotAllowed);
        };

        tracing::info!(%attempt_id, %quiz_id, %student_id, score, total_questions, "Attempt recorded");
        Ok(attempt_id)
    }

    /// Attempts visible to the student, newest first.
    pub async fn list_attempts(&self, student_id: Uuid) -> Result<Vec<StudentAttempt>> {
        let attempts = sqlx::query_as::<_, StudentAttempt>(&format!(
            "SELECT {} FROM student_attempts \
             WHERE student_id = $1 AND hidden_from_student = FALSE \
             ORDER BY created_at DESC",
            ATTEMPT_COLUMNS
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attempts)
    }

    pub async fn get_attempt(&self, attempt_id: Uuid, student_id: Uuid) -> Result<StudentAttempt> {
        let attempt = sqlx::query_as::<_, StudentAttempt>(&format!(
            "SELECT {} FROM student_attempts \
             WHERE id = $1 AND student_id = $2 AND hidden_from_student = FALSE",
            ATTEMPT_COLUMNS
        ))
        .bind(attempt_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Attempt not found".to_string()))?;

        // The grader cannot produce an out-of-range pair; a row failing
        // this check is corrupted state, not a displayable result.
        if attempt.score < 0 || attempt.score > attempt.total_questions {
            tracing::error!(attempt_id = %attempt.id, "Attempt row has inconsistent score");
            return Err(Error::Internal("Attempt record is corrupted".to_string()));
        }

        Ok(attempt)
    }

    /// "Clear history": hides every attempt from the student without
    /// destroying score data. Returns the number of rows hidden.
    pub async fn clear_history(&self, student_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE student_attempts SET hidden_from_student = TRUE \
             WHERE student_id = $1 AND hidden_from_student = FALSE",
        )
        .bind(student_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
