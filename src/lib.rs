//! ACE World Object Library
//!
//! This library provides the world object core of the game server: how an
//! object's state is encoded into the messages clients use to render and
//! track it, and how inventories are changed safely under concurrent access.
//!
//! ## Modules
//!
//! - `config` - World configuration management
//! - `error` - Error types and result definitions
//! - `game` - World objects, attribute blocks, inventories and landblocks
//! - `net` - Packet buffer, message transport and sessions
//! - `protocol` - Object, position and message encoders

pub mod config;
pub mod error;
pub mod game;
pub mod net;
pub mod protocol;

// Re-export commonly used types
pub use config::WorldConfig;
pub use error::{ProtocolError, Result, WorldError};
pub use game::guid::ObjectGuid;
pub use game::world_object::WorldObject;
pub use protocol::messages::{GameMessage, GameMessageOpcode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
