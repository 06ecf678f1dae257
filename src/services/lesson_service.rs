use crate::error::{Error, Result};
use crate::models::lesson::Lesson;
use sqlx::PgPool;
use uuid::Uuid;

const LESSON_COLUMNS: &str = "id, faculty_id, title, extracted_text, created_at";

/// Lesson text provider. The quiz engine treats lesson bodies as
/// opaque text; how they were extracted from uploads is not this
/// service's concern.
#[derive(Clone)]
pub struct LessonService {
    pool: PgPool,
}

impl LessonService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_owned_lesson(&self, lesson_id: Uuid, faculty_id: Uuid) -> Result<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {} FROM lessons WHERE id = $1 AND faculty_id = $2",
            LESSON_COLUMNS
        ))
        .bind(lesson_id)
        .bind(faculty_id)
        .fetch_optional(&self.pool)
        .await?;

        lesson.ok_or_else(|| Error::NotFound("Lesson not found or permission denied".to_string()))
    }

    /// Lookup without an ownership scope, for the student-side reviewer
    /// path. Enrollment gating lives outside this service.
    pub async fn get_lesson(&self, lesson_id: Uuid) -> Result<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {} FROM lessons WHERE id = $1",
            LESSON_COLUMNS
        ))
        .bind(lesson_id)
        .fetch_optional(&self.pool)
        .await?;

        lesson.ok_or_else(|| Error::NotFound("Lesson not found".to_string()))
    }

    pub async fn create_lesson(
        &self,
        faculty_id: Uuid,
        title: &str,
        extracted_text: &str,
    ) -> Result<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            "INSERT INTO lessons (faculty_id, title, extracted_text) \
             VALUES ($1, $2, $3) RETURNING {}",
            LESSON_COLUMNS
        ))
        .bind(faculty_id)
        .bind(title)
        .bind(extracted_text)
        .fetch_one(&self.pool)
        .await?;

        Ok(lesson)
    }
}
