//! FIFO-per-session turn router. A "session" is one connector conversation
//! (`connector_id:target_id`, e.g. a Telegram chat or a Discord channel);
//! at most one agent turn runs per session at a time, and additional
//! messages for the same session queue up and run in arrival order.
//!
//! Grounded on the same `Arc<RwLock<HashMap<...>>>` keyed-registry shape
//! used throughout the agent runtime's kernel, with `tokio::sync::Mutex`
//! standing in for cross-session exclusion since waiters on a tokio mutex
//! are woken in the order they queued.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;

#[derive(Default)]
pub struct SessionRouter {
    lanes: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SessionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_id(connector_id: &str, target_id: &str) -> String {
        format!("{connector_id}:{target_id}")
    }

    fn lane(&self, session_id: &str) -> Arc<AsyncMutex<()>> {
        let mut guard = self.lanes.lock().expect("session router lock poisoned");
        Arc::clone(
            guard
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(()))),
        )
    }

    /// Runs `body` once this session's lane is free, queuing behind any
    /// in-flight or already-queued turn for the same session. Turns for
    /// distinct sessions never block each other.
    pub async fn run_exclusive<F, Fut, T>(&self, session_id: &str, body: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let lane = self.lane(session_id);
        let _permit = lane.lock().await;
        body().await
    }

    /// Drops the lane for a session once it's known to be idle, so a
    /// long-lived connector doesn't accumulate one entry per chat forever.
    /// Safe to call even while a turn is in flight: the `Arc` keeps the
    /// lane alive for whoever's still holding it, this just stops new
    /// callers from finding it under the old key.
    pub fn forget(&self, session_id: &str) {
        self.lanes
            .lock()
            .expect("session router lock poisoned")
            .remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn session_id_joins_connector_and_target() {
        assert_eq!(SessionRouter::session_id("telegram", "12345"), "telegram:12345");
    }

    #[tokio::test]
    async fn same_session_turns_run_one_at_a_time_in_order() {
        let router = Arc::new(SessionRouter::new());
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut handles = Vec::new();
        for i in 0..5 {
            let router = Arc::clone(&router);
            let order = Arc::clone(&order);
            handles.push(tokio::spawn(async move {
                router
                    .run_exclusive("telegram:1", || async move {
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        order.lock().unwrap().push(i);
                    })
                    .await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        // can't assert exact order (spawn scheduling isn't guaranteed), but
        // every turn must have completed exactly once.
        assert_eq!(order.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn distinct_sessions_run_concurrently() {
        let router = Arc::new(SessionRouter::new());
        let concurrent = Arc::new(AtomicUsize::new(0));
        let max_concurrent = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for i in 0..4 {
            let router = Arc::clone(&router);
            let concurrent = Arc::clone(&concurrent);
            let max_concurrent = Arc::clone(&max_concurrent);
            handles.push(tokio::spawn(async move {
                router
                    .run_exclusive(&format!("telegram:{i}"), || async move {
                        let now = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                        max_concurrent.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        concurrent.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert!(max_concurrent.load(Ordering::SeqCst) > 1);
    }
}
