//! Command-line interface for docslurp.
//!
//! Provides the `scraper` and `worker` subcommands that drive the
//! Confluence-to-RAG-eval-corpus pipeline.

mod commands;

pub use commands::{parse_cli, run, run_with_cli};
