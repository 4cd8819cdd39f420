//! Coordinator - bounded worker pool, session lifecycle, result streaming

mod coordinator;
mod progress;
mod session;

pub use coordinator::ScanCoordinator;
pub use session::ScanSession;
