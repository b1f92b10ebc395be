//! Per-repository serialization of mutating operations.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Number of entries above which idle locks are pruned on acquire.
const PRUNE_THRESHOLD: usize = 1024;

/// Table of async mutexes keyed by `(namespace, repository)`.
///
/// Registration, tag writes and the completion gate hold the lock for their
/// repository while they run. Reads never take it.
#[derive(Debug, Default)]
pub struct RepositoryLocks {
    locks: DashMap<(String, String), Arc<Mutex<()>>>,
}

impl RepositoryLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a repository.
    pub async fn acquire(&self, namespace: &str, repository: &str) -> OwnedMutexGuard<()> {
        // len() must not be called while an entry guard is held.
        if self.locks.len() >= PRUNE_THRESHOLD {
            self.prune();
        }

        let lock = {
            let entry = self
                .locks
                .entry((namespace.to_string(), repository.to_string()))
                .or_default();
            Arc::clone(entry.value())
        };

        lock.lock_owned().await
    }

    /// Drop locks nobody holds or waits on.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    /// Number of tracked repositories.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
