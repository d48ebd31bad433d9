//! In-process rate snapshot, kept in step with the shared store.
//!
//! The snapshot cell is the only mutable shared state in the API process.
//! Readers clone an `Arc` under a read lock; the sync job swaps the
//! reference under a write lock. Nothing on the read path ever waits on a
//! sync in progress, and no reader can observe a half-updated table.

use std::sync::Arc;
use std::time::Instant;

use futures_util::{Stream, StreamExt};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use forex_types::{Rate, RateStore};

/// The in-process mirror of the shared rate table.
///
/// `None` until the first successful sync; afterwards always the most
/// recently loaded table. Never mutated in place - every update is a whole
/// new table.
#[derive(Clone, Default)]
pub struct SnapshotCache {
    inner: Arc<RwLock<Option<Arc<Vec<Rate>>>>>,
}

impl SnapshotCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current snapshot, or `None` before the first sync.
    pub fn get_rates(&self) -> Option<Arc<Vec<Rate>>> {
        self.inner.read().clone()
    }

    /// Replaces the snapshot atomically.
    ///
    /// Called by the sync job (and by tests); nothing on the HTTP path
    /// writes the snapshot.
    pub fn update_rates(&self, rates: Vec<Rate>) {
        *self.inner.write() = Some(Arc::new(rates));
    }

    /// Builds an empty cache together with the deferred sync job that will
    /// keep it in step with the store. The job does nothing until
    /// [`SyncJob::run`] is awaited.
    pub fn with_sync_job<S>(store: Arc<dyn RateStore>, trigger: S) -> (Self, SyncJob<S>)
    where
        S: Stream<Item = ()> + Send + Sync + Unpin + 'static,
    {
        let cache = Self::new();
        let job = SyncJob {
            cache: cache.clone(),
            store,
            trigger,
        };
        (cache, job)
    }
}

/// Background task applying store state to the snapshot.
///
/// Consumes the trigger stream serially, so at most one sync runs at a
/// time. Every failure is logged and swallowed - the job must never take
/// the API process down.
pub struct SyncJob<S> {
    cache: SnapshotCache,
    store: Arc<dyn RateStore>,
    trigger: S,
}

impl<S> SyncJob<S>
where
    S: Stream<Item = ()> + Send + Unpin + 'static,
{
    /// Runs one initial sync immediately, then one sync per notification,
    /// until the trigger stream ends or the task is aborted.
    pub async fn run(mut self) {
        self.sync_once().await;
        while let Some(()) = self.trigger.next().await {
            self.sync_once().await;
        }
        info!("Rate sync trigger stream ended, sync job stopping");
    }

    async fn sync_once(&self) {
        let started = Instant::now();
        match self.store.get_rates().await {
            Ok(Some(rates)) => {
                let count = rates.len();
                self.cache.update_rates(rates);
                info!(
                    count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Rate snapshot refreshed"
                );
            }
            Ok(None) => {
                // Absent or undecodable blob: stale beats empty.
                debug!("No decodable rate table in store, keeping current snapshot");
            }
            Err(e) => {
                warn!(error = %e, "Rate sync failed, keeping current snapshot");
            }
        }
    }
}
