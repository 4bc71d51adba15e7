//! One-shot deferred tasks with cancel-on-teardown.
//!
//! Screens that need "do this after a delay" (the processing redirect, the
//! simulated chat reply) own a `Scheduler`. Each `schedule()` spawns a tokio
//! task that sleeps and then runs its work. Dropping the scheduler aborts
//! whatever has not fired yet. All delays go through `tokio::time`, so a
//! paused runtime clock drives them deterministically in tests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use tokio::task::{AbortHandle, JoinHandle};
use uuid::Uuid;

/// Handle to a single scheduled task.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: Uuid,
    abort: AbortHandle,
}

impl TaskHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Prevent the task from firing. No effect once it has run.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the task has fired or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Owns a set of deferred tasks and aborts the unfired ones on drop.
#[derive(Debug)]
pub struct Scheduler {
    name: &'static str,
    tasks: Mutex<HashMap<Uuid, JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Run `work` once after `delay`.
    ///
    /// Tasks are independent: several may be pending at once and they fire
    /// in deadline order, not scheduling order.
    pub fn schedule<F>(&self, delay: Duration, work: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let id = Uuid::new_v4();
        let name = self.name;
        let deadline = tokio::time::Instant::now() + delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tracing::debug!(scheduler = name, task_id = %id, "Scheduled task fired");
            work.await;
        });
        let abort = handle.abort_handle();

        let mut tasks = self.lock();
        tasks.retain(|_, h| !h.is_finished());
        tasks.insert(id, handle);

        tracing::debug!(
            scheduler = name,
            task_id = %id,
            delay_ms = delay.as_millis() as u64,
            "Scheduled task"
        );
        TaskHandle { id, abort }
    }

    /// Number of tasks that have neither fired nor been cancelled.
    pub fn pending_count(&self) -> usize {
        self.lock().values().filter(|h| !h.is_finished()).count()
    }

    /// Abort every pending task.
    pub fn cancel_all(&self) {
        let mut tasks = self.lock();
        let mut cancelled = 0;
        for (_, handle) in tasks.drain() {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            tracing::debug!(scheduler = self.name, cancelled, "Cancelled pending tasks");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, JoinHandle<()>>> {
        self.tasks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
