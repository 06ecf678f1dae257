use crate::error::{Error, Result};
use crate::models::lesson::Lesson;
use crate::models::reviewer::{Reviewer, ReviewerSummary};
use crate::services::gemini::{OutputFormat, TextGenerator};
use crate::services::prompt;
use sqlx::PgPool;
use uuid::Uuid;

const REVIEWER_COLUMNS: &str = "id, student_id, lesson_id, lesson_title, content, created_at";

/// Study-reviewer pipeline: the second consumer of the generation
/// client. Unlike quiz batches the model's reply is free-form markdown,
/// so there is no schema validation step, only the empty-reply guard in
/// the client itself.
#[derive(Clone)]
pub struct ReviewerService {
    pool: PgPool,
}

impl ReviewerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Generates a markdown summary of one lesson and saves it to the
    /// student's reviewer history.
    pub async fn generate_reviewer(
        &self,
        generator: &dyn TextGenerator,
        lesson: &Lesson,
        student_id: Uuid,
    ) -> Result<Reviewer> {
        if lesson.extracted_text.trim().is_empty() {
            return Err(Error::EmptyLessonContent);
        }

        let compiled = prompt::compile_reviewer_prompt(&lesson.extracted_text);
        let content = generator.generate(&compiled, OutputFormat::Text).await?;

        let reviewer = sqlx::query_as::<_, Reviewer>(&format!(
            "INSERT INTO student_reviewers (student_id, lesson_id, lesson_title, content) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            REVIEWER_COLUMNS
        ))
        .bind(student_id)
        .bind(lesson.id)
        .bind(&lesson.title)
        .bind(&content)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(reviewer_id = %reviewer.id, lesson_id = %lesson.id, %student_id, "Reviewer saved");
        Ok(reviewer)
    }

    /// The student's saved reviewers, newest first, without bodies.
    pub async fn list_reviewers(&self, student_id: Uuid) -> Result<Vec<ReviewerSummary>> {
        let reviewers = sqlx::query_as::<_, ReviewerSummary>(
            "SELECT id, lesson_title, created_at FROM student_reviewers \
             WHERE student_id = $1 ORDER BY created_at DESC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviewers)
    }

    pub async fn get_reviewer(&self, reviewer_id: Uuid, student_id: Uuid) -> Result<Reviewer> {
        let reviewer = sqlx::query_as::<_, Reviewer>(&format!(
            "SELECT {} FROM student_reviewers WHERE id = $1 AND student_id = $2",
            REVIEWER_COLUMNS
        ))
        .bind(reviewer_id)
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Reviewer not found".to_string()))?;

        // The generation path never saves an empty body; a row without
        // one is corrupted state.
        if reviewer.content.trim().is_empty() {
            tracing::error!(reviewer_id = %reviewer.id, "Reviewer row has no content");
            return Err(Error::Internal("Reviewer record is corrupted".to_string()));
        }

        Ok(reviewer)
    }

    /// Deletes one saved reviewer, only if it belongs to the student.
    pub async fn delete_reviewer(&self, reviewer_id: Uuid, student_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM student_reviewers WHERE id = $1 AND student_id = $2")
            .bind(reviewer_id)
            .bind(student_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Reviewer not found".to_string()));
        }
        Ok(())
    }
}
