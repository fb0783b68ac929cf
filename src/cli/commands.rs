//! Command-line interface for docslurp: `scraper` enumerates pages and
//! submits Tasks, `worker` consumes them and drives download, normalize,
//! generate, and persist.

use clap::{Args, Parser, Subcommand};

use crate::adapters::confluence::{ConfluenceDownloader, ConfluenceProducer};
use crate::adapters::mutators::{HtmlNormalizer, SqlitePersistence};
use crate::adapters::queue::{KafkaConsumer, KafkaQueueSubmitter};
use crate::domain::config::{ConfluenceConfig, GeneratorConfig, KafkaConfig, SqliteConfig, TokenConfig};
use crate::domain::ports::{Downloader, Generator};
use crate::generator::{LlmGenerator, OpenRouterClient};
use crate::telemetry::TelemetryConfig;
use crate::usecases::{run_scraper, run_worker, WorkerChain};

/// docslurp: Confluence-to-RAG-eval-corpus scraper and worker.
#[derive(Parser)]
#[command(name = "docslurp")]
#[command(about = "Scrape a Confluence space and generate a calibrated RAG evaluation corpus")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enumerate Confluence pages and submit Tasks to the queue.
    Scraper(ScraperArgs),
    /// Consume Tasks, download, normalize, generate, and persist.
    Worker(WorkerArgs),
}

#[derive(Args)]
pub struct ScraperArgs {
    #[command(flatten)]
    pub confluence: ConfluenceConfig,
    #[command(flatten)]
    pub kafka: KafkaConfig,
    #[command(flatten)]
    pub generator: GeneratorConfig,

    /// Number of independent producer tasks to run concurrently.
    #[arg(long, default_value_t = 1)]
    pub workers: usize,
}

#[derive(Args)]
pub struct WorkerArgs {
    #[command(flatten)]
    pub confluence: ConfluenceConfig,
    #[command(flatten)]
    pub kafka: KafkaConfig,
    #[command(flatten)]
    pub sqlite: SqliteConfig,
    #[command(flatten)]
    pub generator: GeneratorConfig,

    /// Number of independent worker tasks sharing the consumer group.
    #[arg(long, default_value_t = 1)]
    pub workers: usize,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

pub async fn run() -> anyhow::Result<()> {
    run_with_cli(parse_cli()).await
}

pub async fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    TelemetryConfig::from_env().setup();
    match cli.command {
        Commands::Scraper(args) => run_scraper_command(args).await,
        Commands::Worker(args) => run_worker_command(args).await,
    }
}

async fn run_scraper_command(args: ScraperArgs) -> anyhow::Result<()> {
    args.confluence.validate()?;
    args.kafka.validate()?;
    args.generator.validate()?;

    if !args.confluence.is_enabled() {
        tracing::info!("confluence producer disabled, nothing to do");
        return Ok(());
    }

    let worker_count = args.workers.max(1);
    let mut handles = Vec::with_capacity(worker_count);
    for id in 0..worker_count {
        let confluence = args.confluence.clone();
        let generator = args.generator.clone();
        let kafka = args.kafka.clone();
        handles.push(tokio::spawn(async move {
            let producer = ConfluenceProducer::new(confluence, generator);
            let mut submitter = KafkaQueueSubmitter::new(kafka);
            match run_scraper(&producer, &mut submitter).await {
                Ok(submitted) => tracing::info!(worker = id, submitted, "scraper task finished"),
                Err(err) => tracing::error!(worker = id, error = %err, "scraper task failed"),
            }
        }));
    }
    for handle in handles {
        handle.await?;
    }
    Ok(())
}

async fn run_worker_command(args: WorkerArgs) -> anyhow::Result<()> {
    args.kafka.validate()?;
    args.sqlite.validate()?;
    args.generator.validate()?;
    args.confluence.validate()?;

    let store = SqlitePersistence::connect(&args.sqlite).await?;
    let store = std::sync::Arc::new(store);

    let generator: Option<std::sync::Arc<dyn Generator>> = if args.generator.is_enabled() {
        let token = TokenConfig::from_env()?;
        let client = OpenRouterClient::new(token.openrouter_api_key, &args.generator);
        Some(std::sync::Arc::new(LlmGenerator::new(client, args.generator.clone())))
    } else {
        None
    };

    let worker_count = args.workers.max(1);
    let mut handles = Vec::with_capacity(worker_count);
    for id in 0..worker_count {
        let kafka = args.kafka.clone();
        let confluence = args.confluence.clone();
        let store = std::sync::Arc::clone(&store);
        let generator = generator.clone();
        let batch_size = args.generator.batch_size;
        handles.push(tokio::spawn(async move {
            let consumer = match KafkaConsumer::connect(&kafka) {
                Ok(c) => c,
                Err(err) => {
                    tracing::error!(worker = id, error = %err, "failed to connect worker consumer");
                    return;
                }
            };
            let downloader: Box<dyn Downloader> = Box::new(ConfluenceDownloader::new(confluence));
            let chain = WorkerChain {
                result_mutators: vec![
                    Box::new(HtmlNormalizer::new()),
                    Box::new(std::sync::Arc::clone(&store)),
                ],
                generation_mutators: vec![Box::new(std::sync::Arc::clone(&store))],
            };
            let generator_ref = generator.as_deref();
            if let Err(err) = run_worker(&consumer, downloader.as_ref(), &chain, generator_ref, batch_size).await {
                tracing::error!(worker = id, error = %err, "worker task failed");
            }
        }));
    }
    for handle in handles {
        handle.await?;
    }
    Ok(())
}
