//! Configuration types, loaded from CLI flags with environment-variable
//! fallbacks (CLI always wins when both are present).

use clap::Args;

use crate::error::ConfigError;

/// Credentials for the LLM provider. Not derived via `clap::Args` because it
/// has no corresponding flags; it is pure environment.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub openrouter_api_key: String,
}

impl TokenConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let openrouter_api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingValue("OPENROUTER_API_KEY".into()))?;
        Ok(Self { openrouter_api_key })
    }
}

/// Producer configuration: which space to enumerate, how aggressively, and
/// under what recency policy.
#[derive(Debug, Clone, Args)]
pub struct ConfluenceConfig {
    /// Space key to operate on.
    #[arg(long = "confluence-space", env = "CONFLUENCE_SPACE", default_value = "")]
    pub space: String,

    /// Base URL for API calls.
    #[arg(
        long = "confluence-base-url",
        env = "CONFLUENCE_BASE_URL",
        default_value = "https://example.atlassian.net"
    )]
    pub base_url: String,

    /// User email for Confluence authentication.
    #[arg(long = "confluence-username", env = "CONFLUENCE_USERNAME", default_value = "")]
    pub username: String,

    /// API token for Confluence authentication.
    #[arg(long = "confluence-api-key", env = "CONFLUENCE_API_KEY", default_value = "")]
    pub api_key: String,

    /// Use the Confluence Cloud API surface.
    #[arg(long = "confluence-cloud", default_value_t = true, conflicts_with = "no_cloud")]
    pub cloud: bool,

    /// Use the Confluence Server/Data Center API surface.
    #[arg(long = "confluence-no-cloud", default_value_t = false)]
    pub no_cloud: bool,

    /// Maximum number of pages to fetch.
    #[arg(long = "confluence-max-pages", default_value_t = 50)]
    pub max_pages: u32,

    /// How many months back to look for updates (0 = no filter).
    #[arg(long = "confluence-months-back", default_value_t = 0)]
    pub months_back: i64,

    /// Shuffle surviving pages before emitting Tasks.
    #[arg(
        long = "confluence-random-selection",
        default_value_t = true,
        conflicts_with = "no_random_selection"
    )]
    pub random_selection: bool,

    /// Emit Tasks in flattening order rather than shuffled.
    #[arg(long = "confluence-no-random-selection", default_value_t = false)]
    pub no_random_selection: bool,

    /// Number of concurrent list requests in flight.
    #[arg(long = "confluence-concurrency", default_value_t = 4)]
    pub concurrency: usize,

    /// Page size for list endpoints.
    #[arg(long = "confluence-page-batch-size", default_value_t = 50)]
    pub page_batch_size: u32,

    /// Number of pages to skip before the first window.
    #[arg(long = "confluence-skip", default_value_t = 0)]
    pub skip: u32,

    /// Enable the Confluence producer.
    #[arg(long = "confluence-enabled", default_value_t = true, conflicts_with = "disabled")]
    pub enabled: bool,

    /// Disable the Confluence producer.
    #[arg(long = "confluence-disabled", default_value_t = false)]
    pub disabled: bool,
}

impl ConfluenceConfig {
    /// Resolves the `cloud`/`no_cloud` and `enabled`/`disabled` flag pairs
    /// down to single booleans.
    pub fn is_cloud(&self) -> bool {
        !self.no_cloud && self.cloud
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled && self.enabled
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_enabled() && self.username.is_empty() {
            return Err(ConfigError::MissingValue("--confluence-username".into()));
        }
        if self.is_enabled() && self.api_key.is_empty() {
            return Err(ConfigError::MissingValue("CONFLUENCE_API_KEY".into()));
        }
        Ok(())
    }
}

/// Broker configuration for the durable Task queue.
#[derive(Debug, Clone, Args)]
pub struct KafkaConfig {
    /// Comma-separated list of Kafka bootstrap servers.
    #[arg(
        long = "kafka-bootstrap-servers",
        env = "KAFKA_BOOTSTRAP_SERVERS",
        default_value = "localhost:19092"
    )]
    pub bootstrap_servers: String,

    /// Topic carrying Task messages.
    #[arg(long = "kafka-topic", env = "KAFKA_TOPIC", default_value = "tasks")]
    pub topic: String,

    /// Client id; also seeds the consumer group name (`{client_id}-group`).
    #[arg(long = "kafka-client-id", env = "KAFKA_CLIENT_ID", default_value = "docslurp")]
    pub client_id: String,
}

impl KafkaConfig {
    pub fn group_id(&self) -> String {
        format!("{}-group", self.client_id)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bootstrap_servers.is_empty() {
            return Err(ConfigError::MissingValue("--kafka-bootstrap-servers".into()));
        }
        if self.topic.is_empty() {
            return Err(ConfigError::MissingValue("--kafka-topic".into()));
        }
        Ok(())
    }
}

/// Embedded-store configuration.
#[derive(Debug, Clone, Args)]
pub struct SqliteConfig {
    /// Path to the SQLite database file.
    #[arg(long = "sqlite-database", env = "SQLITE_DATABASE", default_value = "./docslurp.db")]
    pub database: String,

    /// Timeout in seconds for database lock waits.
    #[arg(long = "sqlite-timeout", env = "SQLITE_TIMEOUT", default_value_t = 5.0)]
    pub timeout: f64,
}

impl SqliteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.is_empty() {
            return Err(ConfigError::MissingValue("--sqlite-database".into()));
        }
        Ok(())
    }
}

/// LLM generator configuration.
#[derive(Debug, Clone, Args)]
pub struct GeneratorConfig {
    /// LLM model to use for QA generation.
    #[arg(
        long = "generator-model",
        default_value = "google/gemini-2.5-flash-preview-05-20"
    )]
    pub model: String,

    /// Language for generated questions.
    #[arg(long = "generator-language", default_value = "de")]
    pub language: String,

    /// Maximum number of output tokens per request.
    #[arg(long = "generator-max-tokens", default_value_t = 4096)]
    pub max_tokens: u32,

    /// Sampling temperature.
    #[arg(long = "generator-temperature", default_value_t = 0.7)]
    pub temperature: f64,

    /// Base URL for the LLM API.
    #[arg(long = "generator-base-url", default_value = "https://openrouter.ai/api/v1")]
    pub base_url: String,

    /// Question-difficulty distribution policy.
    #[arg(long = "generator-difficulty-ratio", default_value = "mixed")]
    pub difficulty_ratio: String,

    /// Number of concurrent LLM requests per task's generation.
    #[arg(long = "generator-concurrency", default_value_t = 5)]
    pub concurrency: usize,

    /// Use the short, single-document prompt family.
    #[arg(long = "generator-is-short", default_value_t = true)]
    pub is_short: bool,

    /// Number of documents to accumulate before generating (1 = single-document mode).
    #[arg(long = "generator-batch-size", default_value_t = 1)]
    pub batch_size: usize,

    /// Enable question generation.
    #[arg(long = "generator-enabled", default_value_t = true, conflicts_with = "disabled")]
    pub enabled: bool,

    /// Disable question generation; the worker still downloads and persists.
    #[arg(long = "generator-disabled", default_value_t = false)]
    pub disabled: bool,
}

impl GeneratorConfig {
    pub fn is_enabled(&self) -> bool {
        !self.disabled && self.enabled
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.language.parse::<crate::domain::models::Language>().map_err(|reason| {
            ConfigError::InvalidValue {
                field: "--generator-language".into(),
                value: self.language.clone(),
                reason,
            }
        })?;
        self.difficulty_ratio
            .parse::<crate::domain::models::Difficulty>()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "--generator-difficulty-ratio".into(),
                value: self.difficulty_ratio.clone(),
                reason,
            })?;
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "--generator-concurrency".into(),
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
