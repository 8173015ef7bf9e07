//! Networking module
//!
//! This module holds the network-facing pieces the world object core uses:
//! - Little-endian packet buffer and wire primitives
//! - The message transport abstraction
//! - Client sessions with bounded outbound queues

pub mod buffer;
pub mod session;
pub mod transport;
