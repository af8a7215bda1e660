//! Bounded concurrent fan-out.
//!
//! [`BoundedPool`] caps how many spawned tasks run at once. One
//! abstraction serves both pipeline phases: wide for retrieval, narrow
//! for generation — the width is the only difference.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Semaphore-bounded task admission for a [`JoinSet`]
pub(crate) struct BoundedPool {
    semaphore: Arc<Semaphore>,
}

impl BoundedPool {
    pub fn new(workers: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(workers)),
        }
    }

    /// Spawn `future` into `join_set`; it starts only once a worker
    /// permit is free.
    pub fn spawn<T, F>(&self, join_set: &mut JoinSet<T>, future: F)
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
    {
        let semaphore = Arc::clone(&self.semaphore);
        join_set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("pool closed");
            future.await
        });
    }
}
