//! Chunked, cooperatively scheduled ingestion
//!
//! Large result sets are committed in fixed-size slices. Between slices the
//! ingestor hands control back to the runtime through a [`Scheduler`], so other
//! pending work (UI queries, the other report type's fetch) can run before the
//! next slice. This is interleaving on the caller's task, not parallelism.

use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Records per committed slice
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Yield point between ingestion slices
#[async_trait]
pub trait Scheduler: Send + Sync {
    async fn yield_now(&self);
}

/// Yields to the runtime's run queue; resumes as soon as the task is polled again
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskYieldScheduler;

#[async_trait]
impl Scheduler for TaskYieldScheduler {
    async fn yield_now(&self) {
        tokio::task::yield_now().await;
    }
}

/// Resumes after a timer fires (a deferred continuation)
#[derive(Debug, Default, Clone, Copy)]
pub struct TimerScheduler {
    delay: Duration,
}

impl TimerScheduler {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Scheduler for TimerScheduler {
    async fn yield_now(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// Outcome of one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub records: usize,
    pub chunks: usize,
    pub failed_chunks: usize,
}

/// Commits collections slice by slice
#[derive(Clone)]
pub struct BatchIngestor {
    chunk_size: usize,
    scheduler: Arc<dyn Scheduler>,
}

impl BatchIngestor {
    pub fn new(chunk_size: usize, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            scheduler,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Commit `items` in slices of `chunk_size`.
    ///
    /// A failing commit is logged and the next slice is still attempted. The
    /// future completes once every slice has been attempted.
    pub async fn ingest<T, F, E>(&self, items: &[T], mut commit: F) -> IngestStats
    where
        T: Sync,
        F: FnMut(&[T]) -> Result<(), E> + Send,
        E: Display,
    {
        let total_chunks = items.len().div_ceil(self.chunk_size);
        let mut stats = IngestStats {
            records: items.len(),
            ..IngestStats::default()
        };

        for (index, slice) in items.chunks(self.chunk_size).enumerate() {
            stats.chunks += 1;
            match commit(slice) {
                Ok(()) => debug!(
                    chunk = index + 1,
                    of = total_chunks,
                    size = slice.len(),
                    "Committed ingestion chunk"
                ),
                Err(e) => {
                    stats.failed_chunks += 1;
                    warn!(
                        chunk = index + 1,
                        of = total_chunks,
                        "Failed to commit ingestion chunk: {}",
                        e
                    );
                }
            }

            if index + 1 < total_chunks {
                self.scheduler.yield_now().await;
            }
        }

        stats
    }
}

impl Default for BatchIngestor {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, Arc::new(TaskYieldScheduler))
    }
}
