//! Registry of in-flight delegated task ids to a channel that feeds them
//! follow-up messages. `agent-send` registers a new entry when it spawns a
//! delegated turn; `continue-task` looks an entry up and forwards a
//! message into it rather than starting a second turn for the same task.

use std::collections::HashMap;
use std::sync::RwLock;

use tokio::sync::mpsc::UnboundedSender;

#[derive(Default)]
pub struct TaskDirectory {
    tasks: RwLock<HashMap<String, UnboundedSender<String>>>,
}

impl TaskDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, task_id: impl Into<String>, sender: UnboundedSender<String>) {
        self.tasks
            .write()
            .expect("task directory lock poisoned")
            .insert(task_id.into(), sender);
    }

    pub fn unregister(&self, task_id: &str) {
        self.tasks.write().expect("task directory lock poisoned").remove(task_id);
    }

    /// Forwards `message` to the task's channel. Returns `false` if no such
    /// task is registered, or if its receiver has already been dropped.
    pub fn send(&self, task_id: &str, message: String) -> bool {
        let sender = self
            .tasks
            .read()
            .expect("task directory lock poisoned")
            .get(task_id)
            .cloned();
        match sender {
            Some(tx) => tx.send(message).is_ok(),
            None => false,
        }
    }
}
