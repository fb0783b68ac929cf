//! Consumes Tasks from the queue, downloads each page, and acknowledges it
//! to the broker immediately -- before normalization, persistence, or
//! generation run. A page that is downloaded but crashes before being
//! persisted is lost rather than redelivered; that is the accepted
//! trade-off for not holding a page's offset open for the whole chain.

use futures::stream::StreamExt;

use crate::domain::models::{Generation, TaskResult};
use crate::domain::ports::{Consumer, Downloader, GenerationMutator, Generator, TaskResultMutator};
use crate::error::{DownloadError, GeneratorError, PersistError, QueueError};

#[derive(Debug, thiserror::Error)]
pub enum WorkError {
    #[error(transparent)]
    Download(#[from] DownloadError),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Generate(#[from] GeneratorError),
    #[error(transparent)]
    Queue(#[from] QueueError),
}

/// The ordered pipeline stages applied after download: first every
/// TaskResult mutator in sequence (normalization, persistence, ...), then --
/// if generation is enabled -- every Generation mutator in sequence
/// (persistence, ...). A stage returning `None` drops the item for the
/// remaining stages.
#[derive(Default)]
pub struct WorkerChain {
    pub result_mutators: Vec<Box<dyn TaskResultMutator>>,
    pub generation_mutators: Vec<Box<dyn GenerationMutator>>,
}

impl WorkerChain {
    async fn apply_result(&self, mut value: TaskResult) -> Result<Option<TaskResult>, PersistError> {
        for mutator in &self.result_mutators {
            match mutator.call(value).await? {
                Some(next) => value = next,
                None => return Ok(None),
            }
        }
        Ok(Some(value))
    }

    async fn apply_generation(&self, mut value: Generation) -> Result<Option<Generation>, PersistError> {
        for mutator in &self.generation_mutators {
            match mutator.call(value).await? {
                Some(next) => value = next,
                None => return Ok(None),
            }
        }
        Ok(Some(value))
    }
}

/// Drives one worker's event loop to exhaustion of the consumer's stream
/// (in practice, forever -- the stream only ends when the topic is
/// dropped). A downloaded page is acknowledged to the broker first, then
/// run through the mutator chain. `batch_size` of 1 generates
/// per-document; larger values accumulate that many TaskResults before
/// calling `Generator::generate_from_batch`.
pub async fn run_worker(
    consumer: &dyn Consumer,
    downloader: &dyn Downloader,
    chain: &WorkerChain,
    generator: Option<&dyn Generator>,
    batch_size: usize,
) -> Result<(), WorkError> {
    let mut stream = consumer.stream().await?;
    let mut batch: Vec<TaskResult> = Vec::with_capacity(batch_size.max(1));

    while let Some(task) = stream.next().await {
        let downloaded = match downloader.fetch(&task).await {
            Ok(Some(result)) => result,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(error = %err, url = %task.url, "download failed, skipping task");
                continue;
            }
        };

        consumer.acknowledge(&downloaded).await?;

        let persisted = match chain.apply_result(downloaded).await {
            Ok(Some(result)) => result,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!(error = %err, url = %task.url, "result mutator chain failed");
                continue;
            }
        };

        if let Some(generator) = generator {
            if batch_size <= 1 {
                match generator.generate(&persisted).await {
                    Ok(Some(generation)) => {
                        if let Err(err) = chain.apply_generation(generation).await {
                            tracing::warn!(error = %err, "generation mutator chain failed");
                        }
                    }
                    Ok(None) => {}
                    Err(err) => tracing::warn!(error = %err, "generation failed"),
                }
            } else {
                batch.push(persisted.clone());
                if batch.len() >= batch_size {
                    flush_batch(generator, chain, &mut batch).await;
                }
            }
        }
    }

    if let Some(generator) = generator {
        if !batch.is_empty() {
            flush_batch(generator, chain, &mut batch).await;
        }
    }

    Ok(())
}

async fn flush_batch(generator: &dyn Generator, chain: &WorkerChain, batch: &mut Vec<TaskResult>) {
    match generator.generate_from_batch(batch).await {
        Ok(mut generations) => {
            while let Some(generation) = generations.next().await {
                if let Err(err) = chain.apply_generation(generation).await {
                    tracing::warn!(error = %err, "generation mutator chain failed");
                }
            }
        }
        Err(err) => tracing::warn!(error = %err, "batch generation failed"),
    }
    batch.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Difficulty, Language, Task, QA};
    use crate::domain::ports::{GenerationStream, TaskStream};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn task() -> Task {
        Task {
            title: "Doc".into(),
            url: "1".into(),
            downloader: "confluence".into(),
            idempotency_key: "1".into(),
            metadata: Default::default(),
            language: Language::En,
            difficulty: Difficulty::Easy,
            temperature: 0.7,
        }
    }

    struct FakeConsumer {
        tasks: Vec<Task>,
        acked: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Consumer for FakeConsumer {
        async fn stream(&self) -> Result<TaskStream<'_>, QueueError> {
            Ok(Box::pin(tokio_stream::iter(self.tasks.clone())))
        }

        async fn acknowledge(&self, result: &TaskResult) -> Result<(), QueueError> {
            self.acked.lock().unwrap().push(result.url.clone());
            Ok(())
        }
    }

    struct FakeDownloader;

    #[async_trait]
    impl Downloader for FakeDownloader {
        async fn fetch(&self, task: &Task) -> Result<Option<TaskResult>, DownloadError> {
            Ok(Some(TaskResult {
                title: task.title.clone(),
                url: task.url.clone(),
                status_code: 200,
                headers: Default::default(),
                content: "hello world".into(),
                hash: "h".into(),
                language: task.language,
                difficulty: task.difficulty,
                temperature: task.temperature,
            }))
        }
    }

    struct FakeGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Generator for FakeGenerator {
        async fn generate(&self, result: &TaskResult) -> Result<Option<Generation>, GeneratorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Some(Generation {
                question_answers: vec![QA {
                    question: "q".into(),
                    answer: "a".into(),
                    chunks: vec![result.content.clone()],
                }],
                references: vec![result.clone()],
                language: result.language,
            }))
        }

        async fn generate_from_batch(
            &self,
            results: &[TaskResult],
        ) -> Result<GenerationStream<'_>, GeneratorError> {
            let generation = Generation {
                question_answers: vec![QA {
                    question: "cross".into(),
                    answer: "a".into(),
                    chunks: vec!["c".into()],
                }],
                references: results.to_vec(),
                language: Language::En,
            };
            Ok(Box::pin(tokio_stream::iter(vec![generation])))
        }
    }

    #[tokio::test]
    async fn single_document_mode_acknowledges_every_task() {
        let consumer = FakeConsumer {
            tasks: vec![task(), task()],
            acked: Mutex::new(Vec::new()),
        };
        let downloader = FakeDownloader;
        let chain = WorkerChain::default();
        let generator = FakeGenerator {
            calls: AtomicUsize::new(0),
        };

        run_worker(&consumer, &downloader, &chain, Some(&generator), 1)
            .await
            .unwrap();

        assert_eq!(consumer.acked.lock().unwrap().len(), 2);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn batched_mode_flushes_generation_once_batch_fills() {
        let consumer = FakeConsumer {
            tasks: vec![task(), task()],
            acked: Mutex::new(Vec::new()),
        };
        let downloader = FakeDownloader;
        let chain = WorkerChain::default();
        let generator = FakeGenerator {
            calls: AtomicUsize::new(0),
        };

        run_worker(&consumer, &downloader, &chain, Some(&generator), 2)
            .await
            .unwrap();

        assert_eq!(consumer.acked.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn works_without_a_generator() {
        let consumer = FakeConsumer {
            tasks: vec![task()],
            acked: Mutex::new(Vec::new()),
        };
        let downloader = FakeDownloader;
        let chain = WorkerChain::default();

        run_worker(&consumer, &downloader, &chain, None, 1).await.unwrap();
        assert_eq!(consumer.acked.lock().unwrap().len(), 1);
    }

    struct LoggingConsumer {
        tasks: Vec<Task>,
        events: std::sync::Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Consumer for LoggingConsumer {
        async fn stream(&self) -> Result<TaskStream<'_>, QueueError> {
            Ok(Box::pin(tokio_stream::iter(self.tasks.clone())))
        }

        async fn acknowledge(&self, _result: &TaskResult) -> Result<(), QueueError> {
            self.events.lock().unwrap().push("acknowledged");
            Ok(())
        }
    }

    struct LoggingMutator {
        events: std::sync::Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl TaskResultMutator for LoggingMutator {
        async fn call(&self, value: TaskResult) -> Result<Option<TaskResult>, PersistError> {
            self.events.lock().unwrap().push("persisted");
            Ok(Some(value))
        }
    }

    #[tokio::test]
    async fn acknowledges_the_download_before_running_the_mutator_chain() {
        let events = std::sync::Arc::new(Mutex::new(Vec::new()));
        let consumer = LoggingConsumer {
            tasks: vec![task()],
            events: std::sync::Arc::clone(&events),
        };
        let downloader = FakeDownloader;
        let chain = WorkerChain {
            result_mutators: vec![Box::new(LoggingMutator {
                events: std::sync::Arc::clone(&events),
            })],
            generation_mutators: Vec::new(),
        };

        run_worker(&consumer, &downloader, &chain, None, 1).await.unwrap();

        assert_eq!(*events.lock().unwrap(), vec!["acknowledged", "persisted"]);
    }
}
