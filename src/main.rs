use axum::{
    routing::{get, patch, post},
    Router,
};
use lernova_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::auth,
    routes, AppState,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    let base_routes = Router::new().route("/health", get(routes::health::health));

    let faculty_api = Router::new()
        .route("/api/faculty/lessons", post(routes::faculty::create_lesson))
        .route(
            "/api/faculty/lessons/:id/quizzes/generate",
            post(routes::faculty::generate_quiz),
        )
        .route(
            "/api/faculty/quizzes",
            post(routes::faculty::create_manual_quiz),
        )
        .route(
            "/api/faculty/quizzes/:id",
            get(routes::faculty::get_quiz).delete(routes::faculty::delete_quiz),
        )
        .route(
            "/api/faculty/quizzes/:id/questions",
            post(routes::faculty::add_question),
        )
        .route(
            "/api/faculty/questions/:id",
            patch(routes::faculty::update_question),
        )
        .route(
            "/api/faculty/quizzes/:id/publish",
            post(routes::faculty::publish_quiz),
        )
        .layer(axum::middleware::from_fn(auth::require_faculty));

    let student_api = Router::new()
        .route("/api/student/quizzes/:id", get(routes::student::get_quiz))
        .route(
            "/api/student/quizzes/:id/submit",
            post(routes::student::submit_attempt),
        )
        .route(
            "/api/student/attempts",
            get(routes::student::list_attempts).delete(routes::student::clear_history),
        )
        .route(
            "/api/student/attempts/:id",
            get(routes::student::get_attempt),
        )
        .route(
            "/api/student/lessons/:id/reviewer",
            post(routes::student::generate_reviewer),
        )
        .route(
            "/api/student/reviewers",
            get(routes::student::list_reviewers),
        )
        .route(
            "/api/student/reviewers/:id",
            get(routes::student::get_reviewer).delete(routes::student::delete_reviewer),
        )
        .layer(axum::middleware::from_fn(auth::require_student));

    let app = base_routes
        .merge(faculty_api)
        .merge(student_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
