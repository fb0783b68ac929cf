//! Pure value types and trait contracts shared across the scraper and
//! worker pipelines.

pub mod config;
pub mod models;
pub mod ports;

pub use models::{Difficulty, Generation, Language, QuestionState, Task, TaskResult, QA};
