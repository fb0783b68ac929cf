//! Enumerates Tasks from a producer and submits each to the durable queue.

use futures::stream::StreamExt;

use crate::domain::ports::{Producer, QueueSubmitter};
use crate::error::{ConfluenceError, QueueError};

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Producer(#[from] ConfluenceError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// Runs one producer to completion, submitting every emitted Task to
/// `submitter`. Returns the number of Tasks submitted.
pub async fn run_scraper(
    producer: &dyn Producer,
    submitter: &mut dyn QueueSubmitter,
) -> Result<usize, ScrapeError> {
    submitter.open().await?;

    let mut stream = producer.stream().await?;
    let mut submitted = 0usize;
    while let Some(task) = stream.next().await {
        match submitter.submit(&task).await {
            Ok(()) => {
                submitted += 1;
                tracing::debug!(url = %task.url, "submitted task");
            }
            Err(err) => {
                tracing::warn!(error = %err, url = %task.url, "failed to submit task");
            }
        }
    }

    submitter.close().await?;
    tracing::info!(producer = producer.name(), submitted, "scrape pass complete");
    Ok(submitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Task;
    use crate::domain::ports::TaskStream;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FakeProducer {
        tasks: Vec<Task>,
    }

    #[async_trait]
    impl Producer for FakeProducer {
        fn name(&self) -> &str {
            "fake"
        }

        async fn stream(&self) -> Result<TaskStream<'_>, ConfluenceError> {
            Ok(Box::pin(tokio_stream::iter(self.tasks.clone())))
        }
    }

    #[derive(Default)]
    struct FakeSubmitter {
        opened: AtomicUsize,
        closed: AtomicUsize,
        submitted: Mutex<Vec<Task>>,
    }

    #[async_trait]
    impl QueueSubmitter for FakeSubmitter {
        async fn open(&mut self) -> Result<(), QueueError> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn submit(&self, task: &Task) -> Result<(), QueueError> {
            self.submitted.lock().unwrap().push(task.clone());
            Ok(())
        }

        async fn close(&mut self) -> Result<(), QueueError> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn task(url: &str) -> Task {
        Task {
            title: "t".into(),
            url: url.into(),
            downloader: "confluence".into(),
            idempotency_key: url.into(),
            metadata: Default::default(),
            language: Default::default(),
            difficulty: Default::default(),
            temperature: 0.7,
        }
    }

    #[tokio::test]
    async fn submits_every_produced_task_and_opens_then_closes() {
        let producer = FakeProducer {
            tasks: vec![task("1"), task("2"), task("3")],
        };
        let mut submitter = FakeSubmitter::default();
        let submitted = run_scraper(&producer, &mut submitter).await.unwrap();
        assert_eq!(submitted, 3);
        assert_eq!(submitter.opened.load(Ordering::SeqCst), 1);
        assert_eq!(submitter.closed.load(Ordering::SeqCst), 1);
        assert_eq!(submitter.submitted.lock().unwrap().len(), 3);
    }
}
