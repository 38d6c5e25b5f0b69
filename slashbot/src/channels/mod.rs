//! State-merge channels used by the graph engine: how a node's returned
//! state is folded back into the running state (replace by default, or a
//! custom per-field merge).

mod error;
mod updater;

pub use error::ChannelError;
pub use updater::{boxed_updater, BoxedStateUpdater, FieldBasedUpdater, ReplaceUpdater, StateUpdater};
