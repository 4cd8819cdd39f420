//! TCP connect probe - full three-way handshake, no raw sockets
//!
//! Needs no elevated privileges. The probe connects, classifies what the
//! OS reports, and immediately drops the socket.

mod probe;

pub use probe::TcpProbe;
