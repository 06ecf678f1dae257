use std::env;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use lernova_backend::dto::quiz_dto::GenerateQuizPayload;
use lernova_backend::error::Result;
use lernova_backend::middleware::auth;
use lernova_backend::services::gemini::{OutputFormat, TextGenerator};

/// Stands in for the hosted model so the flow is deterministic.
struct CannedGenerator(String);

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _prompt: &str, _format: OutputFormat) -> Result<String> {
        Ok(self.0.clone())
    }
}

fn bearer_token(user_id: Uuid, role: &str) -> String {
    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        exp: usize,
        role: Option<String>,
    }
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    let token = encode(
        &Header::default(),
        &Claims {
            sub: user_id.to_string(),
            exp,
            role: Some(role.to_string()),
        },
        &EncodingKey::from_secret(
            lernova_backend::config::get_config().jwt_secret.as_bytes(),
        ),
    )
    .expect("sign token");
    format!("Bearer {}", token)
}

fn canned_batch() -> String {
    json!({
        "questions": [
            {
                "type": "mcq",
                "question_text": "Which layer routes packets?",
                "options": [
                    {"text": "Physical", "is_correct": false},
                    {"text": "Network", "is_correct": true},
                    {"text": "Session", "is_correct": false},
                    {"text": "Application", "is_correct": false}
                ]
            },
            {
                "type": "mcq",
                "question_text": "What does TCP provide?",
                "options": [
                    {"text": "Reliable delivery", "is_correct": true},
                    {"text": "Name resolution", "is_correct": false},
                    {"text": "Routing", "is_correct": false},
                    {"text": "Encryption", "is_correct": false}
                ]
            },
            {
                "type": "mcq",
                "question_text": "Which protocol resolves hostnames?",
                "options": [
                    {"text": "ARP", "is_correct": false},
                    {"text": "ICMP", "is_correct": false},
                    {"text": "DNS", "is_correct": true},
                    {"text": "DHCP", "is_correct": false}
                ]
            },
            {
                "type": "tf",
                "question_text": "UDP guarantees ordered delivery.",
                "is_correct": false
            },
            {
                "type": "tf",
                "question_text": "IPv6 addresses are 128 bits long.",
                "is_correct": true
            }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn quiz_generation_end_to_end() {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", "test_secret_key");
    env::set_var("GEMINI_API_KEY", "test-key");

    lernova_backend::config::init_config().expect("init config");

    let pool = lernova_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations");

    let faculty_id = Uuid::new_v4();
    let student_id = Uuid::new_v4();
    for (id, role) in [(faculty_id, "faculty"), (student_id, "student")] {
        sqlx::query("INSERT INTO users (id, email, role) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(format!("it_{}@example.com", id))
            .bind(role)
            .execute(&pool)
            .await
            .expect("seed user");
    }

    let app_state = lernova_backend::AppState::new(pool.clone());

    let lesson = app_state
        .lesson_service
        .create_lesson(
            faculty_id,
            "Networking Basics",
            "The network layer routes packets between hosts. TCP provides \
             reliable, ordered delivery while UDP does not. DNS resolves \
             hostnames and IPv6 addresses are 128 bits long.",
        )
        .await
        .expect("create lesson");

    let generator = CannedGenerator(canned_batch());
    let payload: GenerateQuizPayload =
        serde_json::from_value(json!({ "question_count": 5 })).expect("payload defaults");
    let quiz_id = app_state
        .quiz_service
        .generate_quiz(&generator, &lesson, &payload)
        .await
        .expect("generate quiz");

    // Faculty detail view: every question present, in generation order,
    // TF questions materialized as exactly True/False rows.
    let detail = app_state
        .quiz_service
        .get_quiz_detail(quiz_id, faculty_id)
        .await
        .expect("quiz detail");
    assert_eq!(detail.quiz.title, "Quiz for: Networking Basics");
    assert_eq!(detail.quiz.status, "draft");
    assert_eq!(detail.questions.len(), 5);
    for q in &detail.questions[..3] {
        assert_eq!(q.question.question_type, "mcq");
        assert_eq!(q.answers.len(), 4);
        assert_eq!(q.answers.iter().filter(|a| a.is_correct).count(), 1);
    }
    for q in &detail.questions[3..] {
        assert_eq!(q.question.question_type, "tf");
        let texts: Vec<&str> = q.answers.iter().map(|a| a.answer_text.as_str()).collect();
        assert_eq!(texts, ["True", "False"]);
        assert_eq!(q.answers.iter().filter(|a| a.is_correct).count(), 1);
    }
    // "UDP guarantees ordered delivery." is false, so "False" is correct.
    assert!(detail.questions[3].answers[1].is_correct);
    assert!(detail.questions[4].answers[0].is_correct);

    let faculty_api = Router::new()
        .route(
            "/api/faculty/quizzes",
            post(lernova_backend::routes::faculty::create_manual_quiz),
        )
        .route(
            "/api/faculty/quizzes/:id/questions",
            post(lernova_backend::routes::faculty::add_question),
        )
        .route(
            "/api/faculty/quizzes/:id/publish",
            post(lernova_backend::routes::faculty::publish_quiz),
        )
        .layer(axum::middleware::from_fn(auth::require_faculty));
    let student_api = Router::new()
        .route(
            "/api/student/quizzes/:id",
            get(lernova_backend::routes::student::get_quiz),
        )
        .route(
            "/api/student/quizzes/:id/submit",
            post(lernova_backend::routes::student::submit_attempt),
        )
        .route(
            "/api/student/attempts",
            get(lernova_backend::routes::student::list_attempts)
                .delete(lernova_backend::routes::student::clear_history),
        )
        .layer(axum::middleware::from_fn(auth::require_student));
    let app = faculty_api
        .merge(student_api)
        .with_state(app_state.clone());

    let faculty_auth = bearer_token(faculty_id, "faculty");
    let student_auth = bearer_token(student_id, "student");

    // Students cannot see the quiz until it is published.
    let req = Request::builder()
        .uri(format!("/api/student/quizzes/{}", quiz_id))
        .header("authorization", student_auth.clone())
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/faculty/quizzes/{}/publish", quiz_id))
        .header("authorization", faculty_auth.clone())
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // The student view must not leak correctness flags.
    let req = Request::builder()
        .uri(format!("/api/student/quizzes/{}", quiz_id))
        .header("authorization", student_auth.clone())
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    assert!(!String::from_utf8_lossy(&bytes).contains("is_correct"));
    let view: JsonValue = serde_json::from_slice(&bytes).unwrap();
    let questions = view["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 5);

    // Answer the three MCQs correctly and both TF questions wrong.
    let mut answers = serde_json::Map::new();
    for q in &detail.questions[..3] {
        let correct = q.answers.iter().find(|a| a.is_correct).unwrap();
        answers.insert(q.question.id.to_string(), json!(correct.id));
    }
    for q in &detail.questions[3..] {
        let wrong = q.answers.iter().find(|a| !a.is_correct).unwrap();
        answers.insert(q.question.id.to_string(), json!(wrong.id));
    }

    let submit = |auth: String, body: String| {
        Request::builder()
            .method("POST")
            .uri(format!("/api/student/quizzes/{}/submit", quiz_id))
            .header("content-type", "application/json")
            .header("authorization", auth)
            .body(Body::from(body))
            .unwrap()
    };
    let body = json!({ "answers": answers }).to_string();
    let resp = app
        .clone()
        .oneshot(submit(student_auth.clone(), body.clone()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let attempt: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(attempt["score"], 3);
    assert_eq!(attempt["total_questions"], 5);

    // Retakes stay off unless requested at generation time.
    let resp = app
        .clone()
        .oneshot(submit(student_auth.clone(), body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let list = |auth: String| {
        Request::builder()
            .uri("/api/student/attempts")
            .header("authorization", auth)
            .body(Body::empty())
            .unwrap()
    };
    let resp = app.clone().oneshot(list(student_auth.clone())).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let attempts: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(attempts.as_array().unwrap().len(), 1);

    // Clearing history hides attempts without deleting the rows.
    let req = Request::builder()
        .method("DELETE")
        .uri("/api/student/attempts")
        .header("authorization", student_auth.clone())
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(list(student_auth.clone())).await.unwrap();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let attempts: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert!(attempts.as_array().unwrap().is_empty());

    let (hidden,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM student_attempts WHERE student_id = $1")
            .bind(student_id)
            .fetch_one(&pool)
            .await
            .expect("count attempts");
    assert_eq!(hidden, 1);

    // Manually authored quizzes allow retakes: both attempts persist.
    let req = Request::builder()
        .method("POST")
        .uri("/api/faculty/quizzes")
        .header("content-type", "application/json")
        .header("authorization", faculty_auth.clone())
        .body(Body::from(
            json!({ "lesson_id": lesson.id, "title": "Practice Quiz" }).to_string(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let manual: JsonValue = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(manual["allow_retake"], true);
    let manual_id = Uuid::parse_str(manual["id"].as_str().unwrap()).unwrap();

    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/faculty/quizzes/{}/questions", manual_id))
        .header("content-type", "application/json")
        .header("authorization", faculty_auth.clone())
        .body(Body::from(
            json!({
                "question_type": "tf",
                "question_text": "TCP is connection-oriented.",
                "is_correct": true
            })
            .to_string(),
        ))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = Request::builder()
        .method("POST")
        .uri(format!("/api/faculty/quizzes/{}/publish", manual_id))
        .header("authorization", faculty_auth)
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let manual_detail = app_state
        .quiz_service
        .get_quiz_detail(manual_id, faculty_id)
        .await
        .expect("manual detail");
    let tf_answer = manual_detail.questions[0]
        .answers
        .iter()
        .find(|a| a.is_correct)
        .unwrap();
    let mut retake_answers = serde_json::Map::new();
    retake_answers.insert(
        manual_detail.questions[0].question.id.to_string(),
        json!(tf_answer.id),
    );
    let retake_body = json!({ "answers": retake_answers }).to_string();

    let submit_manual = |auth: String, body: String| {
        Request::builder()
            .method("POST")
            .uri(format!("/api/student/quizzes/{}/submit", manual_id))
            .header("content-type", "application/json")
            .header("authorization", auth)
            .body(Body::from(body))
            .unwrap()
    };
    for _ in 0..2 {
        let resp = app
            .clone()
            .oneshot(submit_manual(student_auth.clone(), retake_body.clone()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }
    let (persisted,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM student_attempts WHERE quiz_id = $1")
            .bind(manual_id)
            .fetch_one(&pool)
            .await
            .expect("count retakes");
    assert_eq!(persisted, 2);
}
