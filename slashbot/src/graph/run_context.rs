//! Per-run context handed to `Node::run_with_context`: config, store, and
//! the stream sink, without requiring every node to take `Runtime<C, S>`
//! directly.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::memory::{RunnableConfig, Store};
use crate::stream::{StreamEvent, StreamMode};

pub struct RunContext<S> {
    pub config: RunnableConfig,
    pub store: Option<Arc<dyn Store>>,
    pub stream_tx: Option<mpsc::Sender<StreamEvent<S>>>,
    pub stream_mode: HashSet<StreamMode>,
}

impl<S> RunContext<S> {
    pub fn new(config: RunnableConfig) -> Self {
        Self {
            config,
            store: None,
            stream_tx: None,
            stream_mode: HashSet::new(),
        }
    }

    pub fn with_store(mut self, store: Arc<dyn Store>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_stream(
        mut self,
        stream_tx: mpsc::Sender<StreamEvent<S>>,
        stream_mode: HashSet<StreamMode>,
    ) -> Self {
        self.stream_tx = Some(stream_tx);
        self.stream_mode = stream_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_has_no_store_or_stream() {
        let ctx: RunContext<i32> = RunContext::new(RunnableConfig::default());
        assert!(ctx.store.is_none());
        assert!(ctx.stream_tx.is_none());
        assert!(ctx.stream_mode.is_empty());
    }
}
