use crate::{
    dto::attempt_dto::SubmitAttemptPayload, error::Result, middleware::auth::Claims, AppState,
};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;

pub async fn get_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.quiz_service.get_published_quiz(quiz_id).await?;
    Ok(Json(detail))
}

#[axum::debug_handler]
pub async fn submit_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<SubmitAttemptPayload>,
) -> Result<impl IntoResponse> {
    let student_id = claims.user_id()?;

    let attempt_id = state
        .attempt_service
        .submit_attempt(quiz_id, student_id, &payload.answers)
        .await?;

    let attempt = state
        .attempt_service
        .get_attempt(attempt_id, student_id)
        .await?;

    Ok((StatusCode::CREATED, Json(attempt)))
}

pub async fn list_attempts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let student_id = claims.user_id()?;
    let attempts = state.attempt_service.list_attempts(student_id).await?;
    Ok(Json(attempts))
}

pub async fn get_attempt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(attempt_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let student_id = claims.user_id()?;
    let attempt = state
        .attempt_service
        .get_attempt(attempt_id, student_id)
        .await?;
    Ok(Json(attempt))
}

pub async fn clear_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let student_id = claims.user_id()?;
    let hidden = state.attempt_service.clear_history(student_id).await?;
    Ok(Json(json!({ "status": "success", "hidden": hidden })))
}

#[axum::debug_handler]
pub async fn generate_reviewer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(lesson_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let student_id = claims.user_id()?;
    let lesson = state.lesson_service.get_lesson(lesson_id).await?;

    let reviewer = state
        .reviewer_service
        .generate_reviewer(&state.gemini_service, &lesson, student_id)
        .await?;

    Ok((StatusCode::CREATED, Json(reviewer)))
}

pub async fn list_reviewers(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let student_id = claims.user_id()?;
    let reviewers = state.reviewer_service.list_reviewers(student_id).await?;
    Ok(Json(reviewers))
}

pub async fn get_reviewer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(reviewer_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let student_id = claims.user_id()?;
    let reviewer = state
        .reviewer_service
        .get_reviewer(reviewer_id, student_id)
        .await?;
    Ok(Json(reviewer))
}

pub async fn delete_reviewer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(reviewer_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let student_id = claims.user_id()?;
    state
        .reviewer_service
        .delete_reviewer(reviewer_id, student_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
