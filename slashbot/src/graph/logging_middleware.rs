//! Node middleware that logs start/complete/error around every node run.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use async_trait::async_trait;

use crate::error::AgentError;

use super::logging::{log_node_complete, log_node_start};
use super::next::Next;
use super::node_middleware::NodeMiddleware;

#[derive(Debug)]
pub struct LoggingNodeMiddleware<S> {
    _marker: PhantomData<fn() -> S>,
}

impl<S> Default for LoggingNodeMiddleware<S> {
    fn default() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<S> NodeMiddleware<S> for LoggingNodeMiddleware<S>
where
    S: Send + 'static,
{
    async fn around_run(
        &self,
        node_id: &str,
        state: S,
        inner: Box<
            dyn FnOnce(S) -> Pin<Box<dyn Future<Output = Result<(S, Next), AgentError>> + Send>>
                + Send,
        >,
    ) -> Result<(S, Next), AgentError> {
        log_node_start(node_id);
        let result = inner(state).await;
        if result.is_ok() {
            log_node_complete(node_id);
        }
        result
    }
}
