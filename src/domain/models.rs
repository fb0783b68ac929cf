//! Shared value types that flow through the scraper and worker pipelines.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Difficulty distribution policy for generated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Mixed,
    Balanced,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Mixed
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Mixed => "mixed",
            Difficulty::Balanced => "balanced",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "mixed" => Ok(Difficulty::Mixed),
            "balanced" => Ok(Difficulty::Balanced),
            other => Err(format!("unknown difficulty ratio '{other}'")),
        }
    }
}

/// The language a Task, TaskResult, or Generation is carried in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
}

impl Default for Language {
    fn default() -> Self {
        Language::De
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Language::De => "de",
            Language::En => "en",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "de" => Ok(Language::De),
            "en" => Ok(Language::En),
            other => Err(format!("unknown language '{other}', expected 'de' or 'en'")),
        }
    }
}

/// A unit of work describing a page to fetch and process. Immutable once
/// submitted to the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    pub url: String,
    pub downloader: String,
    pub idempotency_key: String,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_temperature() -> f64 {
    0.7
}

/// The outcome of downloading (and, later, normalizing) one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    pub title: String,
    pub url: String,
    pub status_code: u16,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    pub content: String,
    pub hash: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

impl TaskResult {
    pub fn is_error(&self) -> bool {
        !(200..300).contains(&self.status_code)
    }
}

/// One question/answer pair with the supporting excerpts the answer was
/// grounded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QA {
    pub question: String,
    pub answer: String,
    pub chunks: Vec<String>,
}

/// The output of the generator: a set of QAs grounded in one or more
/// TaskResults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub question_answers: Vec<QA>,
    pub references: Vec<TaskResult>,
    pub language: Language,
}

/// Structured-output shape requested for the question-generation call.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSchema {
    pub question: String,
}

/// Structured-output shape requested for the answer-generation call.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerSchema {
    pub answer: String,
    pub chunks: Vec<String>,
}

/// Per-question progress through the generation pipeline. Only `Answered`
/// QAs are persisted; a QA whose chunks end up empty is `Dropped` rather
/// than `Answered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionState {
    Pending,
    Asked,
    Answered,
    Failed,
    Dropped,
}
