//! Library half of the `slashbot` binary: credential persistence, the
//! interactive REPL, and the handful of top-level subcommands
//! (`login`/`update`/`update-check`) that don't need an LLM turn.
//!
//! `main.rs` is a thin `clap` wrapper around these; keeping them in the
//! lib crate lets `tests/` exercise them without shelling out to the
//! binary.

pub mod commands;
pub mod credentials;
pub mod repl;

/// Error type surfaced at the process boundary: a `Display` impl is enough,
/// since `main` only ever turns this into an exit code and a stderr line.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Credentials(#[from] credentials::CredentialsError),
    #[error(transparent)]
    Paths(#[from] slashbot::PathsError),
    #[error(transparent)]
    Build(#[from] slashbot::agent::react::BuildRunnerError),
    #[error(transparent)]
    Run(#[from] slashbot::agent::react::RunError),
    #[error("{0}")]
    Message(String),
}
