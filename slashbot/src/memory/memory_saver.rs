//! In-memory [`Checkpointer`]. Not persistent; lost on process exit.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::memory::checkpoint::{
    Checkpoint, CheckpointListItem, CheckpointMetadata, CheckpointSource,
};
use crate::memory::checkpointer::{CheckpointError, Checkpointer};
use crate::memory::config::RunnableConfig;
use crate::memory::uuid6::uuid6;

struct Thread<S> {
    checkpoints: Vec<(Checkpoint<S>, CheckpointMetadata)>,
}

impl<S> Default for Thread<S> {
    fn default() -> Self {
        Self {
            checkpoints: Vec::new(),
        }
    }
}

/// Keeps every checkpoint for every thread in memory, keyed by `thread_id`.
pub struct MemorySaver<S> {
    inner: Arc<RwLock<HashMap<String, Thread<S>>>>,
}

impl<S> MemorySaver<S> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<S> Default for MemorySaver<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<S> Checkpointer<S> for MemorySaver<S>
where
    S: Clone + Send + Sync + 'static,
{
    async fn put(
        &self,
        config: &RunnableConfig,
        checkpoint: &Checkpoint<S>,
    ) -> Result<String, CheckpointError> {
        let thread_id = config
            .thread_id
            .clone()
            .ok_or(CheckpointError::ThreadIdRequired)?;
        let mut checkpoint = checkpoint.clone();
        if checkpoint.id.is_empty() {
            checkpoint.id = uuid6().to_string();
        }
        let checkpoint_id = checkpoint.id.clone();

        let mut guard = self.inner.write().await;
        let thread = guard.entry(thread_id).or_default();
        thread.checkpoints.push((
            checkpoint,
            CheckpointMetadata {
                source: CheckpointSource::Loop,
                step: thread.checkpoints.len() as i64,
            },
        ));
        Ok(checkpoint_id)
    }

    async fn get_tuple(
        &self,
        config: &RunnableConfig,
    ) -> Result<Option<(Checkpoint<S>, CheckpointMetadata)>, CheckpointError> {
        let thread_id = match &config.thread_id {
            Some(id) => id,
            None => return Ok(None),
        };
        let guard = self.inner.read().await;
        let Some(thread) = guard.get(thread_id) else {
            return Ok(None);
        };

        if let Some(checkpoint_id) = &config.checkpoint_id {
            return Ok(thread
                .checkpoints
                .iter()
                .find(|(cp, _)| &cp.id == checkpoint_id)
                .cloned());
        }
        Ok(thread.checkpoints.last().cloned())
    }

    async fn list(
        &self,
        config: &RunnableConfig,
        limit: Option<usize>,
        before: Option<&str>,
        after: Option<&str>,
    ) -> Result<Vec<CheckpointListItem>, CheckpointError> {
        let thread_id = config
            .thread_id
            .clone()
            .ok_or(CheckpointError::ThreadIdRequired)?;
        let guard = self.inner.read().await;
        let Some(thread) = guard.get(&thread_id) else {
            return Ok(Vec::new());
        };

        let mut items: Vec<CheckpointListItem> = thread
            .checkpoints
            .iter()
            .rev()
            .map(|(cp, meta)| CheckpointListItem {
                checkpoint_id: cp.id.clone(),
                parent_id: cp.parent_id.clone(),
                metadata: meta.clone(),
                ts: cp.ts,
            })
            .collect();

        if let Some(before) = before {
            if let Some(pos) = items.iter().position(|it| it.checkpoint_id == before) {
                items = items.split_off(pos + 1);
            }
        }
        if let Some(after) = after {
            if let Some(pos) = items.iter().position(|it| it.checkpoint_id == after) {
                items.truncate(pos);
            }
        }
        if let Some(limit) = limit {
            items.truncate(limit);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_tuple_returns_latest() {
        let saver: MemorySaver<i32> = MemorySaver::new();
        let config = RunnableConfig::with_thread_id("t1");

        saver
            .put(&config, &Checkpoint::new(String::new(), 1, None))
            .await
            .unwrap();
        let id2 = saver
            .put(&config, &Checkpoint::new(String::new(), 2, None))
            .await
            .unwrap();

        let (checkpoint, _) = saver.get_tuple(&config).await.unwrap().unwrap();
        assert_eq!(checkpoint.channel_values, 2);
        assert_eq!(checkpoint.id, id2);
    }

    #[tokio::test]
    async fn put_without_thread_id_errors() {
        let saver: MemorySaver<i32> = MemorySaver::new();
        let config = RunnableConfig::default();
        let result = saver.put(&config, &Checkpoint::new(String::new(), 1, None)).await;
        assert!(matches!(result, Err(CheckpointError::ThreadIdRequired)));
    }

    #[tokio::test]
    async fn list_respects_limit() {
        let saver: MemorySaver<i32> = MemorySaver::new();
        let config = RunnableConfig::with_thread_id("t1");
        for v in 0..5 {
            saver
                .put(&config, &Checkpoint::new(String::new(), v, None))
                .await
                .unwrap();
        }
        let items = saver.list(&config, Some(2), None, None).await.unwrap();
        assert_eq!(items.len(), 2);
    }
}
