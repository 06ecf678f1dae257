pub mod attempt_dto;
pub mod lesson_dto;
pub mod quiz_dto;
