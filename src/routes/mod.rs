pub mod faculty;
pub mod health;
pub mod student;
