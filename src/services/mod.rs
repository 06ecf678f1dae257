pub mod attempt_service;
pub mod gemini;
pub mod generation_options;
pub mod grading;
pub mod lesson_service;
pub mod prompt;
pub mod quiz_service;
pub mod response_validation;
pub mod reviewer_service;
