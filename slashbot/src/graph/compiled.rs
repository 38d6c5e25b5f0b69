//! Compiled, executable state graph: `invoke` runs it to completion, `stream`
//! runs it while emitting `StreamEvent`s as each node completes.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::channels::BoxedStateUpdater;
use crate::error::AgentError;
use crate::memory::checkpoint::Checkpoint;
use crate::memory::{Checkpointer, RunnableConfig, Store};
use crate::stream::{CheckpointEvent, StreamEvent, StreamMode};

use super::conditional::NextEntry;
use super::interrupt::{GraphInterrupt, Interrupt, InterruptHandler};
use super::next::Next;
use super::node::Node;
use super::node_middleware::NodeMiddleware;
use super::retry::RetryPolicy;
use super::run_context::RunContext;
use super::state_graph::END;

/// An executable graph produced by `StateGraph::compile*`. Immutable; safe to
/// share across concurrent runs via `Arc`.
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) first_node_id: String,
    pub(super) edge_order: Vec<String>,
    pub(super) next_map: HashMap<String, NextEntry<S>>,
    pub(super) checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    pub(super) store: Option<Arc<dyn Store>>,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    pub(super) state_updater: BoxedStateUpdater<S>,
    pub(super) retry_policy: RetryPolicy,
    pub(super) interrupt_handler: Option<Arc<dyn InterruptHandler>>,
}

/// A running graph's event stream; wraps the receiver half of the internal
/// channel so callers don't need to know about `mpsc` directly.
pub struct EventStream<S> {
    rx: mpsc::Receiver<StreamEvent<S>>,
}

impl<S> EventStream<S> {
    pub async fn recv(&mut self) -> Option<StreamEvent<S>> {
        self.rx.recv().await
    }
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Runs the graph to completion from `state`, returning the final state.
    ///
    /// When `config` carries a `thread_id` and a checkpointer was compiled in,
    /// a checkpoint is saved after every node completes.
    pub async fn invoke(&self, state: S, config: Option<RunnableConfig>) -> Result<S, AgentError> {
        let mut stream = self.stream(state, config, HashSet::new());
        let mut last = None;
        while let Some(event) = stream.recv().await {
            if let StreamEvent::Values(s) = event {
                last = Some(s);
            }
        }
        last.ok_or_else(|| AgentError::ExecutionFailed("graph produced no final state".into()))
    }

    /// Runs the graph, emitting `StreamEvent`s for the requested `modes` as
    /// nodes complete, plus a final `StreamEvent::Values` with the finished
    /// state regardless of `modes`.
    pub fn stream(
        &self,
        state: S,
        config: Option<RunnableConfig>,
        modes: HashSet<StreamMode>,
    ) -> EventStream<S> {
        let (tx, rx) = mpsc::channel(256);

        let nodes: HashMap<String, Arc<dyn Node<S>>> = self
            .nodes
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect();
        let first_node_id = self.first_node_id.clone();
        let edge_order = self.edge_order.clone();
        let next_map = self.next_map.clone();
        let checkpointer = self.checkpointer.clone();
        let store = self.store.clone();
        let middleware = self.middleware.clone();
        let state_updater = Arc::clone(&self.state_updater);
        let retry_policy = self.retry_policy.clone();
        let interrupt_handler = self.interrupt_handler.clone();

        tokio::spawn(async move {
            let outcome = drive(
                state,
                config,
                modes,
                nodes,
                first_node_id,
                edge_order,
                next_map,
                checkpointer,
                store,
                middleware,
                state_updater,
                retry_policy,
                interrupt_handler,
                tx.clone(),
            )
            .await;
            if let Err(err) = outcome {
                let _ = tx
                    .send(StreamEvent::Custom(
                        serde_json::json!({ "error": err.to_string() }),
                    ))
                    .await;
            }
        });

        EventStream { rx }
    }
}

#[allow(clippy::too_many_arguments)]
async fn drive<S>(
    mut state: S,
    config: Option<RunnableConfig>,
    modes: HashSet<StreamMode>,
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    first_node_id: String,
    edge_order: Vec<String>,
    next_map: HashMap<String, NextEntry<S>>,
    checkpointer: Option<Arc<dyn Checkpointer<S>>>,
    store: Option<Arc<dyn Store>>,
    middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    state_updater: BoxedStateUpdater<S>,
    retry_policy: RetryPolicy,
    interrupt_handler: Option<Arc<dyn InterruptHandler>>,
    tx: mpsc::Sender<StreamEvent<S>>,
) -> Result<(), AgentError>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    let config = config.unwrap_or_default();
    let mut current_id = first_node_id;
    let mut step: i64 = 0;
    let track_tasks = modes.contains(&StreamMode::Tasks) || modes.contains(&StreamMode::Debug);
    let track_checkpoints =
        modes.contains(&StreamMode::Checkpoints) || modes.contains(&StreamMode::Debug);

    loop {
        let node = nodes
            .get(&current_id)
            .ok_or_else(|| AgentError::ExecutionFailed(format!("node not found: {current_id}")))?;

        if track_tasks {
            let _ = tx
                .send(StreamEvent::TaskStart {
                    node_id: current_id.clone(),
                })
                .await;
        }

        let mut attempt: u32 = 0;
        let (next_state, next) = loop {
            let ctx = RunContext::new(config.clone()).with_stream(tx.clone(), modes.clone());
            let ctx = match &store {
                Some(s) => ctx.with_store(Arc::clone(s)),
                None => ctx,
            };

            let attempt_result = if let Some(mw) = &middleware {
                let node_for_inner = Arc::clone(node);
                let inner: Box<
                    dyn FnOnce(
                            S,
                        ) -> std::pin::Pin<
                            Box<dyn std::future::Future<Output = Result<(S, Next), AgentError>> + Send>,
                        > + Send,
                > = Box::new(move |s: S| {
                    Box::pin(async move { node_for_inner.run_with_context(s, &ctx).await })
                });
                mw.around_run(&current_id, state.clone(), inner).await
            } else {
                node.run_with_context(state.clone(), &ctx).await
            };

            match attempt_result {
                Ok(ok) => break ok,
                Err(err) => {
                    if let AgentError::Denied(ref reason) = err {
                        if let Some(handler) = &interrupt_handler {
                            let interrupt = Interrupt::new(
                                current_id.clone(),
                                reason.clone(),
                                serde_json::Value::Null,
                            );
                            match handler.handle(&interrupt).await {
                                GraphInterrupt::Resume(_) => break (state.clone(), Next::End),
                                GraphInterrupt::Abort => return Err(err),
                            }
                        }
                    }
                    match retry_policy.delay_for_attempt(attempt) {
                        Some(delay) => {
                            attempt += 1;
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            if track_tasks {
                                let _ = tx
                                    .send(StreamEvent::TaskEnd {
                                        node_id: current_id.clone(),
                                        result: Err(err.to_string()),
                                    })
                                    .await;
                            }
                            return Err(err);
                        }
                    }
                }
            }
        };

        state_updater.apply_update(&mut state, &next_state);

        if track_tasks {
            let _ = tx
                .send(StreamEvent::TaskEnd {
                    node_id: current_id.clone(),
                    result: Ok(()),
                })
                .await;
        }
        if modes.contains(&StreamMode::Updates) {
            let _ = tx
                .send(StreamEvent::Updates {
                    node_id: current_id.clone(),
                    state: state.clone(),
                })
                .await;
        }
        if modes.contains(&StreamMode::Values) {
            let _ = tx.send(StreamEvent::Values(state.clone())).await;
        }

        if let Some(cp) = &checkpointer {
            if config.thread_id.is_some() {
                let checkpoint = Checkpoint::new(String::new(), state.clone(), None);
                if let Ok(checkpoint_id) = cp.put(&config, &checkpoint).await {
                    if track_checkpoints {
                        let timestamp = checkpoint
                            .ts
                            .duration_since(std::time::UNIX_EPOCH)
                            .map(|d| d.as_secs().to_string())
                            .unwrap_or_default();
                        let _ = tx
                            .send(StreamEvent::Checkpoint(CheckpointEvent {
                                checkpoint_id,
                                timestamp,
                                step,
                                state: state.clone(),
                                thread_id: config.thread_id.clone(),
                                checkpoint_ns: config.checkpoint_ns.clone(),
                            }))
                            .await;
                    }
                }
            }
        }

        step += 1;

        let resolved_next = match next {
            Next::End => None,
            Next::Node(id) => Some(id),
            Next::Continue => match next_map.get(&current_id) {
                Some(NextEntry::Unconditional(id)) => Some(id.clone()),
                Some(NextEntry::Conditional(router)) => {
                    let key = router.resolve(&state);
                    if key == END {
                        None
                    } else {
                        Some(key)
                    }
                }
                None => {
                    let idx = edge_order.iter().position(|id| id == &current_id);
                    idx.and_then(|i| edge_order.get(i + 1)).cloned()
                }
            },
        };

        match resolved_next {
            Some(id) => current_id = id,
            None => break,
        }
    }

    let _ = tx.send(StreamEvent::Values(state)).await;
    Ok(())
}
