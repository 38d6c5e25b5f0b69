//! `graph.with_node_logging()` sugar for attaching [`LoggingNodeMiddleware`]
//! when a runner is built with `verbose: true`.

use std::fmt::Debug;
use std::sync::Arc;

use crate::graph::{LoggingNodeMiddleware, StateGraph};

pub trait WithNodeLogging {
    fn with_node_logging(self) -> Self;
}

impl<S> WithNodeLogging for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn with_node_logging(self) -> Self {
        self.with_middleware(Arc::new(LoggingNodeMiddleware::<S>::default()))
    }
}
