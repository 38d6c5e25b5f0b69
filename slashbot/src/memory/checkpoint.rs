//! Checkpoint data shapes persisted and loaded by a [`crate::memory::Checkpointer`].

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Where a checkpoint came from, recorded in its metadata for history/debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckpointSource {
    /// Produced by a normal graph step.
    Loop,
    /// Produced by an explicit user update between runs.
    Update,
    /// Produced by resuming an interrupted run.
    Input,
}

/// A persisted snapshot of state `S` after a graph step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint<S> {
    pub id: String,
    pub channel_values: S,
    pub parent_id: Option<String>,
    pub ts: SystemTime,
}

impl<S> Checkpoint<S> {
    pub fn new(id: String, channel_values: S, parent_id: Option<String>) -> Self {
        Self {
            id,
            channel_values,
            parent_id,
            ts: SystemTime::now(),
        }
    }
}

/// Metadata stored alongside a checkpoint, independent of the state type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub source: CheckpointSource,
    pub step: i64,
}

impl Default for CheckpointMetadata {
    fn default() -> Self {
        Self {
            source: CheckpointSource::Loop,
            step: 0,
        }
    }
}

/// A lightweight entry returned by `Checkpointer::list`, without the full state payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointListItem {
    pub checkpoint_id: String,
    pub parent_id: Option<String>,
    pub metadata: CheckpointMetadata,
    pub ts: SystemTime,
}
