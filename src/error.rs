//! Error types for the docslurp pipeline.
//!
//! Defines per-subsystem error types:
//! - Confluence producer and downloader
//! - Kafka queue submission and consumption
//! - HTML normalization
//! - SQLite persistence
//! - LLM generation
//! - Configuration loading

use thiserror::Error;

/// Errors that can occur while enumerating or filtering Confluence pages.
#[derive(Debug, Error)]
pub enum ConfluenceError {
    #[error("Confluence request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Confluence returned {status} for space '{space}': {body}")]
    ApiError {
        status: u16,
        space: String,
        body: String,
    },

    #[error("failed to parse Confluence page list: {0}")]
    ParseError(String),

    #[error("page '{0}' has no usable title or id")]
    MalformedPage(String),
}

/// Errors that can occur while downloading a single page.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("transport error fetching page '{0}': {1}")]
    Transport(String, #[source] reqwest::Error),

    #[error("downloader tag '{expected}' does not match task tag '{actual}'")]
    WrongDownloader { expected: String, actual: String },

    #[error("page '{0}' returned an empty or malformed body")]
    EmptyBody(String),
}

/// Errors that can occur while normalizing HTML.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("normalization pool task panicked: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

/// Errors that can occur during the Kafka-backed queue handoff.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("kafka client error: {0}")]
    Kafka(#[from] rdkafka::error::KafkaError),

    #[error("failed to serialize task: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("producer was not opened before use")]
    NotOpened,

    #[error("message delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("consumed message carried no payload")]
    EmptyPayload,
}

/// Errors that can occur while appending records to the embedded store.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to serialize record field: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("database path must be provided in the configuration")]
    MissingDatabasePath,
}

/// Errors that can occur while driving LLM-backed generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("missing OPENROUTER_API_KEY")]
    MissingApiKey,

    #[error("request to model provider failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("model response did not conform to the expected structured shape after {retries} attempts: {reason}")]
    StructuralMismatch { retries: u32, reason: String },

    #[error("provider returned an API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("no prompt template registered for language '{language}', family '{family}'")]
    MissingTemplate { language: String, family: String },
}

/// Errors that can occur while assembling configuration from the CLI and environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required value for '{0}'; set the flag or the environment variable")]
    MissingValue(String),

    #[error("invalid value '{value}' for '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}
