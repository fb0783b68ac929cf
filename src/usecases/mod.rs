//! Orchestrates the two independently-deployable halves of the pipeline:
//! the scraper (producer -> queue) and the worker (queue -> download ->
//! normalize -> generate -> persist).

mod scraper;
mod worker;

pub use scraper::run_scraper;
pub use worker::{run_worker, WorkerChain};
