//! Async helpers shared across pipeline stages.
//!
//! These mirror the handful of scheduling primitives the pipeline actually
//! needs: bounded fan-out over a batch of futures, enumerating an async
//! stream, draining a stream through a handler, and flattening one level of
//! nesting lazily.

use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Runs `futures` with at most `limit` in flight at once, preserving input
/// order in the returned `Vec`. A future's own `Result` is returned as-is at
/// its result position rather than short-circuiting the batch; callers that
/// want to abort on the first error should inspect the returned vector
/// themselves.
pub async fn run_limited<F, T>(futures: Vec<F>, limit: usize) -> Vec<T>
where
    F: std::future::Future<Output = T>,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let tasks: Vec<_> = futures
        .into_iter()
        .map(|fut| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let _permit = semaphore.acquire().await.expect("semaphore closed");
                fut.await
            }
        })
        .collect();
    futures::future::join_all(tasks).await
}

/// Wraps a stream with a monotonically increasing index, starting at 0.
pub fn aenumerate<S, T>(stream: S) -> impl Stream<Item = (usize, T)>
where
    S: Stream<Item = T>,
{
    stream.enumerate()
}

/// Consumes `stream`, invoking `handler` for each item in order and awaiting
/// the handler's future before pulling the next item.
pub async fn consume_async_gen<S, T, H, Fut>(mut stream: Pin<Box<S>>, mut handler: H)
where
    S: Stream<Item = T> + ?Sized,
    H: FnMut(T) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    while let Some(item) = stream.next().await {
        handler(item).await;
    }
}

/// Lazily flattens one level of nesting from an iterator of `Vec<T>`.
pub fn flatten_lazy<T>(nested: impl IntoIterator<Item = Vec<T>>) -> impl Iterator<Item = T> {
    nested.into_iter().flatten()
}
