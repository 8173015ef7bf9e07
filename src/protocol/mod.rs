//! Protocol module
//!
//! Encoders for the object messages sent to game clients:
//! - Object descriptions (create and update object)
//! - Position updates
//! - Message opcodes and builders

pub mod messages;
pub mod object;
pub mod position;
