//! Dragnet Common - Shared types and traits
//!
//! This crate provides the core types, traits, and errors used across
//! the dragnet scanner workspace.
//!
//! Key pieces:
//! - the [`Probe`] seam between the coordinator and transport code
//! - [`PortSet`] parsing and normalization
//! - scan options, session states, and progress snapshots
//! - the [`DragnetError`] taxonomy

pub mod error;
pub mod ports;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{DragnetError, DragnetResult};
pub use ports::PortSet;
pub use traits::Probe;
pub use types::{
    PortResult, ProbeOutcome, ProgressSnapshot, ScanOptions, ScanStatus, ScanTarget, SessionState,
    DEFAULT_CONCURRENCY, DEFAULT_PROBE_TIMEOUT,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
