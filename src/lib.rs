pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::services::{
    attempt_service::AttemptService, gemini::GeminiService, lesson_service::LessonService,
    quiz_service::QuizService, reviewer_service::ReviewerService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub lesson_service: LessonService,
    pub quiz_service: QuizService,
    pub attempt_service: AttemptService,
    pub reviewer_service: ReviewerService,
    pub gemini_service: GeminiService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(services::gemini::GENERATION_TIMEOUT)
            .build()
            .unwrap();

        let lesson_service = LessonService::new(pool.clone());
        let quiz_service = QuizService::new(pool.clone());
        let attempt_service = AttemptService::new(pool.clone());
        let reviewer_service = ReviewerService::new(pool.clone());
        let gemini_service = GeminiService::new(config.gemini_api_key.clone(), http_client);

        Self {
            pool,
            lesson_service,
            quiz_service,
            attempt_service,
            reviewer_service,
            gemini_service,
        }
    }
}
