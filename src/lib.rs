//! docslurp: scrapes a Confluence space, queues pages through Kafka, and
//! drives a worker pipeline that downloads, normalizes, and optionally
//! generates a calibrated RAG evaluation corpus from each page.

pub mod adapters;
pub mod asyncio;
pub mod cli;
pub mod domain;
pub mod error;
pub mod generator;
pub mod hash;
pub mod telemetry;
pub mod usecases;

// Re-export commonly used error types
pub use error::{
    ConfigError, ConfluenceError, DownloadError, GeneratorError, NormalizeError, PersistError,
    QueueError,
};
