use crate::dto::quiz_dto::{
    CreateManualQuizPayload, GenerateQuizPayload, NewQuestionPayload, QuestionDetail, QuizDetail,
    StudentQuestionDetail, StudentQuizDetail,
};
use crate::error::{Error, Result};
use crate::models::answer::{Answer, AnswerOption};
use crate::models::lesson::Lesson;
use crate::models::question::{Question, ValidatedQuestion, TYPE_MCQ, TYPE_TF};
use crate::models::quiz::{Quiz, STATUS_DRAFT, STATUS_PUBLISHED};
use crate::services::gemini::{OutputFormat, TextGenerator};
use crate::services::generation_options::ResolvedOptions;
use crate::services::{prompt, response_validation};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

const QUIZ_COLUMNS: &str = "id, lesson_id, title, status, allow_retake, created_at";

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the full generation pipeline for one lesson: resolve
    /// options, compile the prompt, call the model, validate the
    /// untrusted response, and persist the aggregate atomically.
    ///
    /// Any failure leaves no rows behind; the caller must re-submit
    /// options to try again.
    pub async fn generate_quiz(
        &self,
        generator: &dyn TextGenerator,
        lesson: &Lesson,
        payload: &GenerateQuizPayload,
    ) -> Result<Uuid> {
        let opts = ResolvedOptions::resolve(payload, &lesson.extracted_text)?;
        let compiled = prompt::compile_prompt(&lesson.extracted_text, &opts);

        let raw = generator.generate(&compiled, OutputFormat::Json).await?;
        let batch = response_validation::validate_generated_quiz(&raw, opts.question_count)?;

        let title = format!("Quiz for: {}", lesson.title);
        let quiz_id = self
            .persist_generated(lesson.id, &title, &batch, opts.allow_retake)
            .await?;

        tracing::info!(%quiz_id, lesson_id = %lesson.id, questions = batch.len(), "Generated quiz persisted");
        Ok(quiz_id)
    }

    /// Writes the quiz, its questions, and their answers as one unit of
    /// work. A failure at any point rolls everything back, so readers
    /// never observe a quiz with some but not all of its questions.
    async fn persist_generated(
        &self,
        lesson_id: Uuid,
        title: &str,
        batch: &[ValidatedQuestion],
        allow_retake: bool,
    ) -> Result<Uuid> {
        let mut tx = self.pool.begin().await?;

        let quiz_id: Uuid = sqlx::query_scalar(
            "INSERT INTO quizzes (lesson_id, title, status, allow_retake) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(lesson_id)
        .bind(title)
        .bind(STATUS_DRAFT)
        .bind(allow_retake)
        .fetch_one(&mut *tx)
        .await?;

        for (position, question) in batch.iter().enumerate() {
            let question_id = insert_question(
                &mut tx,
                quiz_id,
                question.question_text(),
                question.question_type(),
                position as i32,
            )
            .await?;

            match question {
                ValidatedQuestion::Mcq { options, .. } => {
                    for (i, option) in options.iter().enumerate() {
                        insert_answer(&mut tx, question_id, &option.text, option.is_correct, i as i32)
                            .await?;
                    }
                }
                ValidatedQuestion::Tf { answer, .. } => {
                    // Always materialize both rows with complementary flags.
                    insert_answer(&mut tx, question_id, "True", *answer, 0).await?;
                    insert_answer(&mut tx, question_id, "False", !*answer, 1).await?;
                }
            }
        }

        tx.commit().await?;
        Ok(quiz_id)
    }

    /// Creates a blank draft quiz for later manual question entry.
    pub async fn create_manual_quiz(
        &self,
        faculty_id: Uuid,
        payload: &CreateManualQuizPayload,
    ) -> Result<Quiz> {
        let lesson: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM lessons WHERE id = $1 AND faculty_id = $2")
                .bind(payload.lesson_id)
                .bind(faculty_id)
                .fetch_optional(&self.pool)
                .await?;

        if lesson.is_none() {
            return Err(Error::NotFound(
                "Lesson not found or permission denied".to_string(),
            ));
        }

        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "INSERT INTO quizzes (lesson_id, title, status, allow_retake) \
             VALUES ($1, $2, $3, TRUE) RETURNING {}",
            QUIZ_COLUMNS
        ))
        .bind(payload.lesson_id)
        .bind(&payload.title)
        .bind(STATUS_DRAFT)
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    /// Adds one manually authored question to an owned quiz. Same
    /// invariants as generated questions, at single-question
    /// granularity: the question and its answers land in one
    /// transaction or not at all.
    pub async fn add_question(
        &self,
        quiz_id: Uuid,
        faculty_id: Uuid,
        payload: &NewQuestionPayload,
    ) -> Result<Uuid> {
        self.get_owned_quiz(quiz_id, faculty_id).await?;

        let question_text = match payload {
            NewQuestionPayload::Mcq { question_text, .. }
            | NewQuestionPayload::Tf { question_text, .. } => question_text.trim(),
        };
        if question_text.is_empty() {
            return Err(Error::BadRequest(
                "Question text must not be empty".to_string(),
            ));
        }

        if let NewQuestionPayload::Mcq { options, .. } = payload {
            if options.len() != 4 {
                return Err(Error::BadRequest(
                    "A multiple-choice question must have exactly 4 options".to_string(),
                ));
            }
            let correct = options.iter().filter(|o| o.is_correct).count();
            if correct != 1 {
                return Err(Error::BadRequest(format!(
                    "A multiple-choice question must have exactly one correct option, got {}",
                    correct
                )));
            }
        }

        let mut tx = self.pool.begin().await?;

        let position: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM questions WHERE quiz_id = $1",
        )
        .bind(quiz_id)
        .fetch_one(&mut *tx)
        .await?;

        let question_id = match payload {
            NewQuestionPayload::Mcq { options, .. } => {
                let question_id =
                    insert_question(&mut tx, quiz_id, question_text, TYPE_MCQ, position).await?;
                for (i, option) in options.iter().enumerate() {
                    insert_answer(&mut tx, question_id, &option.text, option.is_correct, i as i32)
                        .await?;
                }
                question_id
            }
            NewQuestionPayload::Tf { is_correct, .. } => {
                let question_id =
                    insert_question(&mut tx, quiz_id, question_text, TYPE_TF, position).await?;
                insert_answer(&mut tx, question_id, "True", *is_correct, 0).await?;
                insert_answer(&mut tx, question_id, "False", !*is_correct, 1).await?;
                question_id
            }
        };

        tx.commit().await?;
        Ok(question_id)
    }

    /// Edits question text. The question type is immutable after
    /// creation and there is intentionally no way to change it here.
    pub async fn update_question_text(
        &self,
        question_id: Uuid,
        faculty_id: Uuid,
        question_text: &str,
    ) -> Result<()> {
        let owner: Option<(Uuid,)> = sqlx::query_as(
            "SELECT l.faculty_id FROM questions qn \
             JOIN quizzes q ON qn.quiz_id = q.id \
             JOIN lessons l ON q.lesson_id = l.id \
             WHERE qn.id = $1",
        )
        .bind(question_id)
        .fetch_optional(&self.pool)
        .await?;

        match owner {
            None => Err(Error::NotFound("Question not found".to_string())),
            Some((owner,)) if owner != faculty_id => Err(Error::UnauthorizedQuestion),
            Some(_) => {
                sqlx::query("UPDATE questions SET question_text = $1 WHERE id = $2")
                    .bind(question_text)
                    .bind(question_id)
                    .execute(&self.pool)
                    .await?;
                Ok(())
            }
        }
    }

    pub async fn publish_quiz(&self, quiz_id: Uuid, faculty_id: Uuid) -> Result<Quiz> {
        self.get_owned_quiz(quiz_id, faculty_id).await?;

        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "UPDATE quizzes SET status = $1 WHERE id = $2 RETURNING {}",
            QUIZ_COLUMNS
        ))
        .bind(STATUS_PUBLISHED)
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    /// Deletes the whole aggregate; questions and answers go with the
    /// quiz via cascade.
    pub async fn delete_quiz(&self, quiz_id: Uuid, faculty_id: Uuid) -> Result<()> {
        self.get_owned_quiz(quiz_id, faculty_id).await?;

        sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_owned_quiz(&self, quiz_id: Uuid, faculty_id: Uuid) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(
            "SELECT q.id, q.lesson_id, q.title, q.status, q.allow_retake, q.created_at \
             FROM quizzes q JOIN lessons l ON q.lesson_id = l.id \
             WHERE q.id = $1 AND l.faculty_id = $2",
        )
        .bind(quiz_id)
        .bind(faculty_id)
        .fetch_optional(&self.pool)
        .await?;

        quiz.ok_or_else(|| Error::NotFound("Quiz not found or permission denied".to_string()))
    }

    /// Faculty read side: the full aggregate including correctness flags.
    pub async fn get_quiz_detail(&self, quiz_id: Uuid, faculty_id: Uuid) -> Result<QuizDetail> {
        let quiz = self.get_owned_quiz(quiz_id, faculty_id).await?;

        let questions = sqlx::query_as::<_, Question>(
            "SELECT id, quiz_id, question_text, question_type \
             FROM questions WHERE quiz_id = $1 ORDER BY position",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let answers = sqlx::query_as::<_, Answer>(
            "SELECT a.id, a.question_id, a.answer_text, a.is_correct \
             FROM answers a JOIN questions qn ON a.question_id = qn.id \
             WHERE qn.quiz_id = $1 ORDER BY qn.position, a.position",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let mut details: Vec<QuestionDetail> = questions
            .into_iter()
            .map(|question| QuestionDetail {
                question,
                answers: Vec::new(),
            })
            .collect();

        for answer in answers {
            if let Some(detail) = details
                .iter_mut()
                .find(|d| d.question.id == answer.question_id)
            {
                detail.answers.push(answer);
            }
        }

        Ok(QuizDetail {
            quiz,
            questions: details,
        })
    }

    /// Student read side: only published quizzes, and answer options
    /// are stripped of their correctness flags.
    pub async fn get_published_quiz(&self, quiz_id: Uuid) -> Result<StudentQuizDetail> {
        let quiz = sqlx::query_as::<_, Quiz>(&format!(
            "SELECT {} FROM quizzes WHERE id = $1 AND status = $2",
            QUIZ_COLUMNS
        ))
        .bind(quiz_id)
        .bind(STATUS_PUBLISHED)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Quiz not available".to_string()))?;

        let questions = sqlx::query_as::<_, Question>(
            "SELECT id, quiz_id, question_text, question_type \
             FROM questions WHERE quiz_id = $1 ORDER BY position",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let options = sqlx::query_as::<_, AnswerOption>(
            "SELECT a.id, a.question_id, a.answer_text \
             FROM answers a JOIN questions qn ON a.question_id = qn.id \
             WHERE qn.quiz_id = $1 ORDER BY qn.position, a.position",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        let mut details: Vec<StudentQuestionDetail> = questions
            .into_iter()
            .map(|question| StudentQuestionDetail {
                question,
                answers: Vec::new(),
            })
            .collect();

        for option in options {
            if let Some(detail) = details
                .iter_mut()
                .find(|d| d.question.id == option.question_id)
            {
                detail.answers.push(option);
            }
        }

        Ok(StudentQuizDetail {
            id: quiz.id,
            title: quiz.title,
            allow_retake: quiz.allow_retake,
            questions: details,
        })
    }
}

async fn insert_question(
    tx: &mut Transaction<'_, Postgres>,
    quiz_id: Uuid,
    question_text: &str,
    question_type: &str,
    position: i32,
) -> Result<Uuid> {
    let id = sqlx::query_scalar(
        "INSERT INTO questions (quiz_id, question_text, question_type, position) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(quiz_id)
    .bind(question_text)
    .bind(question_type)
    .bind(position)
    .fetch_one(&mut **tx)
    .await?;

    Ok(id)
}

async fn insert_answer(
    tx: &mut Transaction<'_, Postgres>,
    question_id: Uuid,
    answer_text: &str,
    is_correct: bool,
    position: i32,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO answers (question_id, answer_text, is_correct, position) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(question_id)
    .bind(answer_text)
    .bind(is_correct)
    .bind(position)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
