//! Structured tracing events for graph execution, used by `Runtime` and
//! `LoggingNodeMiddleware` so a run's progress shows up uniformly regardless
//! of which node emitted it.

use tracing::{debug, error, info};

pub fn log_graph_start(thread_id: Option<&str>) {
    info!(thread_id = thread_id.unwrap_or("-"), "graph run started");
}

pub fn log_graph_complete(thread_id: Option<&str>, steps: usize) {
    info!(
        thread_id = thread_id.unwrap_or("-"),
        steps, "graph run completed"
    );
}

pub fn log_graph_error(thread_id: Option<&str>, error_message: &str) {
    error!(
        thread_id = thread_id.unwrap_or("-"),
        error = error_message,
        "graph run failed"
    );
}

pub fn log_node_start(node_id: &str) {
    debug!(node_id, "node started");
}

pub fn log_node_complete(node_id: &str) {
    debug!(node_id, "node completed");
}

pub fn log_state_update(node_id: &str) {
    debug!(node_id, "state updated");
}
