use crate::{
    dto::{
        lesson_dto::CreateLessonPayload,
        quiz_dto::{
            CreateManualQuizPayload, GenerateQuizPayload, NewQuestionPayload,
            UpdateQuestionPayload,
        },
    },
    error::Result,
    middleware::auth::Claims,
    AppState,
};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

#[axum::debug_handler]
pub async fn create_lesson(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateLessonPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let faculty_id = claims.user_id()?;

    let lesson = state
        .lesson_service
        .create_lesson(faculty_id, &payload.title, &payload.extracted_text)
        .await?;

    Ok((StatusCode::CREATED, Json(lesson)))
}

#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(lesson_id): Path<Uuid>,
    Json(payload): Json<GenerateQuizPayload>,
) -> Result<impl IntoResponse> {
    let faculty_id = claims.user_id()?;
    let lesson = state
        .lesson_service
        .get_owned_lesson(lesson_id, faculty_id)
        .await?;

    let quiz_id = state
        .quiz_service
        .generate_quiz(&state.gemini_service, &lesson, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "quiz_id": quiz_id }))))
}

#[axum::debug_handler]
pub async fn create_manual_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateManualQuizPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let faculty_id = claims.user_id()?;

    let quiz = state
        .quiz_service
        .create_manual_quiz(faculty_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(quiz)))
}

pub async fn get_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let faculty_id = claims.user_id()?;
    let detail = state.quiz_service.get_quiz_detail(quiz_id, faculty_id).await?;
    Ok(Json(detail))
}

#[axum::debug_handler]
pub async fn add_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<NewQuestionPayload>,
) -> Result<impl IntoResponse> {
    let faculty_id = claims.user_id()?;

    let question_id = state
        .quiz_service
        .add_question(quiz_id, faculty_id, &payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "question_id": question_id })),
    ))
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(question_id): Path<Uuid>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let faculty_id = claims.user_id()?;

    state
        .quiz_service
        .update_question_text(question_id, faculty_id, &payload.question_text)
        .await?;

    Ok(Json(json!({ "status": "success" })))
}

pub async fn publish_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let faculty_id = claims.user_id()?;
    let quiz = state.quiz_service.publish_quiz(quiz_id, faculty_id).await?;
    Ok(Json(quiz))
}

pub async fn delete_quiz(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let faculty_id = claims.user_id()?;
    state.quiz_service.delete_quiz(quiz_id, faculty_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
