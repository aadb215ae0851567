//! High-level error types

use std::time::Duration;

use vaddrust_core::SessionState;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] vaddrust_core::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] vaddrust_types::Error),
    
    #[error("Camera task has stopped")]
    Stopped,
    
    #[error("Timed out after {after:?} waiting for {wanted:?}")]
    Timeout {
        wanted: SessionState,
        after: Duration,
    },
}
