//! Cron-like task scheduler: an in-memory ordered set of tasks, a single
//! coordination loop that wakes on the minimum next-fire time across all of
//! them, and best-effort JSON persistence under `~/.slashbot/tasks.json`
//! (see [`crate::paths::tasks_file`]).
//!
//! Grounded on `kernel::Kernel::run_tool`'s `tokio::spawn` + `timeout` shape
//! for running one task body without blocking the coordination loop, and on
//! `memory::memory_saver::MemorySaver`'s `Arc<RwLock<...>>` state shape for
//! the task set itself.

use std::collections::HashSet;
use std::str::FromStr;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cron::Schedule;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid cron expression '{expr}': {source}")]
    InvalidCron {
        expr: String,
        #[source]
        source: cron::error::Error,
    },
    #[error("no task named '{0}'")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Shell,
    Prompt,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    pub id: String,
    pub cron: String,
    pub name: String,
    pub body: String,
    pub body_kind: BodyKind,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub last_run_at: Option<DateTime<Utc>>,
}

fn default_enabled() -> bool {
    true
}

impl ScheduledTask {
    fn schedule(&self) -> Result<Schedule, SchedulerError> {
        Schedule::from_str(&self.cron).map_err(|source| SchedulerError::InvalidCron {
            expr: self.cron.clone(),
            source,
        })
    }

    /// Earliest fire time strictly after `after`, or `None` if the cron
    /// expression never fires again (shouldn't happen for standard cron
    /// expressions, which always repeat).
    pub fn next_fire_after(&self, after: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, SchedulerError> {
        Ok(self.schedule()?.after(&after).next())
    }
}

/// Runs one task body. Implemented once against the real bash executor and
/// agent turn engine; tests supply a recording fake instead.
#[async_trait]
pub trait TaskBodyRunner: Send + Sync {
    async fn run_shell(&self, body: &str) -> Result<(), String>;
    async fn run_prompt(&self, body: &str) -> Result<(), String>;
}

/// In-memory task set plus the coordination loop that fires them.
///
/// `last_run_at` is updated and the whole set persisted after every fire
/// (best-effort: a write failure is logged via `tracing`, not propagated,
/// per this system's "scheduler persistence never crashes the loop" rule).
/// Overlapping runs for one task id are coalesced: [`Scheduler::tick`] skips
/// a task already present in `in_flight`, rather than queuing a second
/// concurrent run.
pub struct Scheduler {
    tasks: RwLock<Vec<ScheduledTask>>,
    in_flight: Mutex<HashSet<String>>,
    tasks_path: std::path::PathBuf,
}

impl Scheduler {
    pub fn new(tasks_path: std::path::PathBuf) -> Self {
        Self {
            tasks: RwLock::new(Vec::new()),
            in_flight: Mutex::new(HashSet::new()),
            tasks_path,
        }
    }

    /// Loads persisted tasks from `tasks_path` if the file exists; a missing
    /// or unparsable file starts with an empty task set rather than erroring,
    /// since a corrupt `tasks.json` shouldn't block startup.
    pub fn load(tasks_path: std::path::PathBuf) -> Self {
        let tasks = std::fs::read_to_string(&tasks_path)
            .ok()
            .and_then(|s| serde_json::from_str::<Vec<ScheduledTask>>(&s).ok())
            .unwrap_or_default();
        Self {
            tasks: RwLock::new(tasks),
            in_flight: Mutex::new(HashSet::new()),
            tasks_path,
        }
    }

    fn persist(&self) {
        let tasks = self.tasks.read().expect("scheduler tasks lock poisoned");
        match serde_json::to_string_pretty(&*tasks) {
            Ok(json) => {
                if let Some(parent) = self.tasks_path.parent() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        tracing::warn!(error = %e, "failed to create scheduler tasks directory");
                        return;
                    }
                }
                if let Err(e) = std::fs::write(&self.tasks_path, json) {
                    tracing::warn!(error = %e, "failed to persist scheduler tasks");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize scheduler tasks"),
        }
    }

    pub fn add_task(&self, task: ScheduledTask) {
        self.tasks.write().expect("scheduler tasks lock poisoned").push(task);
        self.persist();
    }

    pub fn remove_task(&self, id: &str) -> Result<(), SchedulerError> {
        let mut guard = self.tasks.write().expect("scheduler tasks lock poisoned");
        let before = guard.len();
        guard.retain(|t| t.id != id);
        if guard.len() == before {
            return Err(SchedulerError::NotFound(id.to_string()));
        }
        drop(guard);
        self.persist();
        Ok(())
    }

    pub fn tasks(&self) -> Vec<ScheduledTask> {
        self.tasks.read().expect("scheduler tasks lock poisoned").clone()
    }

    /// Earliest fire time across all enabled tasks, or `None` if there are
    /// none; the coordination loop sleeps until this instant.
    pub fn next_wakeup(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.tasks
            .read()
            .expect("scheduler tasks lock poisoned")
            .iter()
            .filter(|t| t.enabled)
            .filter_map(|t| t.next_fire_after(after).ok().flatten())
            .min()
    }

    /// Fires every enabled task whose next scheduled time is `<= now` and
    /// whose last run was strictly before that fire time, skipping any task
    /// already `in_flight`. Returns the ids fired this tick.
    pub async fn tick(&self, now: DateTime<Utc>, runner: &dyn TaskBodyRunner) -> Vec<String> {
        let due: Vec<ScheduledTask> = {
            let guard = self.tasks.read().expect("scheduler tasks lock poisoned");
            guard
                .iter()
                .filter(|t| t.enabled)
                .filter(|t| self.is_due(t, now))
                .cloned()
                .collect()
        };

        let mut fired = Vec::new();
        for task in due {
            let claimed = {
                let mut in_flight = self.in_flight.lock().expect("scheduler in-flight lock poisoned");
                in_flight.insert(task.id.clone())
            };
            if !claimed {
                continue;
            }

            let result = match task.body_kind {
                BodyKind::Shell => runner.run_shell(&task.body).await,
                BodyKind::Prompt => runner.run_prompt(&task.body).await,
            };
            if let Err(e) = result {
                tracing::warn!(task = %task.id, error = %e, "scheduled task run failed");
            }

            self.in_flight
                .lock()
                .expect("scheduler in-flight lock poisoned")
                .remove(&task.id);

            {
                let mut guard = self.tasks.write().expect("scheduler tasks lock poisoned");
                if let Some(t) = guard.iter_mut().find(|t| t.id == task.id) {
                    t.last_run_at = Some(now);
                }
            }
            self.persist();
            fired.push(task.id);
        }
        fired
    }

    fn is_due(&self, task: &ScheduledTask, now: DateTime<Utc>) -> bool {
        let floor = task.last_run_at.unwrap_or(DateTime::<Utc>::MIN_UTC);
        match task.next_fire_after(floor) {
            Ok(Some(next)) => next <= now,
            _ => false,
        }
    }

    /// Runs the coordination loop until `shutdown` resolves: sleeps until
    /// the next wakeup (or a short idle poll when the task set is empty),
    /// then ticks.
    pub async fn run_forever(self: Arc<Self>, runner: Arc<dyn TaskBodyRunner>, mut shutdown: tokio::sync::oneshot::Receiver<()>) {
        loop {
            let now = Utc::now();
            let sleep_for = match self.next_wakeup(now) {
                Some(next) => (next - now).to_std().unwrap_or(std::time::Duration::from_secs(0)),
                None => std::time::Duration::from_secs(60),
            };

            tokio::select! {
                _ = tokio::time::sleep(sleep_for) => {
                    self.tick(Utc::now(), runner.as_ref()).await;
                }
                _ = &mut shutdown => break,
            }
        }
    }
}
