use thiserror::Error;

use crate::error::AgentError;
use crate::graph::CompilationError;

#[derive(Debug, Error)]
pub enum BuildRunnerError {
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error(transparent)]
    Compilation(#[from] CompilationError),
}
