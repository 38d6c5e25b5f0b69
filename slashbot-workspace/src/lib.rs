//! Connector-facing glue that lives outside the agent runtime proper:
//!
//! - [`lock`]: cross-process advisory locks so only one process owns a
//!   given connector (Telegram, Discord, …) at a time, with pid-liveness
//!   reclaim of locks left behind by a crashed process.
//! - [`router`]: FIFO-per-session turn queuing, so concurrent messages in
//!   the same chat run one agent turn at a time while distinct chats run
//!   freely in parallel.
//! - [`splitter`]: platform-aware message splitting for connectors with a
//!   hard per-message character cap.

mod lock;
mod router;
mod splitter;

pub use lock::{AcquireOutcome, LockError, LockManager, LockRecord};
pub use router::SessionRouter;
pub use splitter::{split_message, CLI_MAX_CHARS, DISCORD_MAX_CHARS, TELEGRAM_MAX_CHARS};
