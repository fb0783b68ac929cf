//! Trait contracts implemented by the adapters.

use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;

use super::models::{Generation, Task, TaskResult};
use crate::error::{ConfluenceError, DownloadError, GeneratorError, PersistError, QueueError};

pub type TaskStream<'a> = Pin<Box<dyn Stream<Item = Task> + Send + 'a>>;
pub type GenerationStream<'a> = Pin<Box<dyn Stream<Item = Generation> + Send + 'a>>;

/// Enumerates candidate pages and emits Tasks.
#[async_trait]
pub trait Producer: Send + Sync {
    fn name(&self) -> &str;

    async fn stream(&self) -> Result<TaskStream<'_>, ConfluenceError>;
}

/// Sends Tasks to the durable queue.
#[async_trait]
pub trait QueueSubmitter: Send + Sync {
    async fn open(&mut self) -> Result<(), QueueError>;
    async fn submit(&self, task: &Task) -> Result<(), QueueError>;
    async fn close(&mut self) -> Result<(), QueueError>;
}

/// Yields Tasks from the queue and commits offsets on acknowledge.
#[async_trait]
pub trait Consumer: Send + Sync {
    async fn stream(&self) -> Result<TaskStream<'_>, QueueError>;
    async fn acknowledge(&self, result: &TaskResult) -> Result<(), QueueError>;
}

/// Fetches the body of one page by id.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn fetch(&self, task: &Task) -> Result<Option<TaskResult>, DownloadError>;
}

/// A pipeline stage over TaskResults: transform, or signal drop by returning
/// `None`.
#[async_trait]
pub trait TaskResultMutator: Send + Sync {
    async fn call(&self, value: TaskResult) -> Result<Option<TaskResult>, PersistError>;
}

#[async_trait]
impl<T: TaskResultMutator + ?Sized> TaskResultMutator for std::sync::Arc<T> {
    async fn call(&self, value: TaskResult) -> Result<Option<TaskResult>, PersistError> {
        T::call(self, value).await
    }
}

/// A pipeline stage over Generations: transform, or signal drop by returning
/// `None`.
#[async_trait]
pub trait GenerationMutator: Send + Sync {
    async fn call(&self, value: Generation) -> Result<Option<Generation>, PersistError>;
}

#[async_trait]
impl<T: GenerationMutator + ?Sized> GenerationMutator for std::sync::Arc<T> {
    async fn call(&self, value: Generation) -> Result<Option<Generation>, PersistError> {
        T::call(self, value).await
    }
}

/// Drives LLM-backed question/answer generation.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, result: &TaskResult) -> Result<Option<Generation>, GeneratorError>;

    async fn generate_from_batch(
        &self,
        results: &[TaskResult],
    ) -> Result<GenerationStream<'_>, GeneratorError>;
}
