//! services/client/src/app/tasks.rs
//!
//! The task store: the sole owner of the cached attendance-task collection.
//!
//! Refresh is caller-driven (view activation and after every successful
//! completion); there is no implicit polling. A refresh replaces the cache
//! atomically from the caller's perspective: readers see the old snapshot
//! until the new one is installed whole.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use campus_portal_core::domain::{Task, TaskStatus};
use campus_portal_core::ports::{PortResult, PortalService};
use tokio::sync::RwLock;
use tracing::debug;

use crate::app::guard::Clearance;

pub struct TaskStore {
    api: Arc<dyn PortalService>,
    cache: RwLock<Vec<Task>>,
    /// Bumped by `invalidate`; a refresh started under an older generation
    /// discards its result instead of applying it to a view that no longer
    /// wants it.
    generation: AtomicU64,
}

impl TaskStore {
    pub fn new(api: Arc<dyn PortalService>) -> Self {
        Self {
            api,
            cache: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Fetches the caller's tasks and replaces the cache.
    ///
    /// Requires a guard clearance: a denied session can never trigger this
    /// fetch. Returns the newly fetched collection; on failure the cache
    /// keeps its last-known-good contents.
    pub async fn refresh(&self, _clearance: &Clearance) -> PortResult<Vec<Task>> {
        let generation = self.generation.load(Ordering::SeqCst);
        let tasks = self.api.list_my_tasks().await?;

        let mut cache = self.cache.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding task refresh that resolved after invalidation");
            return Ok(tasks);
        }
        *cache = tasks.clone();
        Ok(tasks)
    }

    /// A snapshot of the full cached collection.
    pub async fn snapshot(&self) -> Vec<Task> {
        self.cache.read().await.clone()
    }

    pub async fn pending(&self) -> Vec<Task> {
        self.filtered(TaskStatus::Pending).await
    }

    pub async fn completed(&self) -> Vec<Task> {
        self.filtered(TaskStatus::Completed).await
    }

    async fn filtered(&self, status: TaskStatus) -> Vec<Task> {
        self.cache
            .read()
            .await
            .iter()
            .filter(|task| task.status == status)
            .cloned()
            .collect()
    }

    /// Drops the cache and marks any in-flight refresh stale. Called on
    /// logout and view teardown.
    pub async fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.cache.write().await.clear();
    }
}
