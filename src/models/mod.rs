pub mod answer;
pub mod attempt;
pub mod lesson;
pub mod question;
pub mod quiz;
pub mod reviewer;
