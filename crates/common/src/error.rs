//! Error types for the dragnet scanner
//!
//! Three families: invalid input (caller mistakes, reported before any
//! probe is sent), resource errors (the environment refused us), and
//! probe errors (per-port failures, which surface as `ProbeOutcome::Error`
//! rather than through this enum).

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DragnetError {
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid port spec: {0}")]
    InvalidPortSpec(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Worker pool failure: {0}")]
    WorkerPool(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl DragnetError {
    /// True for errors caused by caller input rather than the environment.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DragnetError::InvalidTarget(_)
                | DragnetError::InvalidPortSpec(_)
                | DragnetError::InvalidOptions(_)
        )
    }
}

/// Result type alias for dragnet operations
pub type DragnetResult<T> = Result<T, DragnetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_classification() {
        assert!(DragnetError::InvalidTarget("bad".into()).is_invalid_input());
        assert!(DragnetError::InvalidPortSpec("bad".into()).is_invalid_input());
        assert!(DragnetError::InvalidOptions("bad".into()).is_invalid_input());
        assert!(!DragnetError::WorkerPool("died".into()).is_invalid_input());
        assert!(!DragnetError::Io(io::Error::new(io::ErrorKind::Other, "x")).is_invalid_input());
    }

    #[test]
    fn display_messages() {
        let err = DragnetError::InvalidPortSpec("port 0 is not scannable".into());
        assert_eq!(
            err.to_string(),
            "Invalid port spec: port 0 is not scannable"
        );
    }
}
