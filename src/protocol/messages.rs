//! Outgoing game messages
//!
//! A [`GameMessage`] is an opcode plus a finished payload. Framing, fragment
//! headers and delivery belong to the transport.

use bytes::Bytes;
use tracing::trace;

use super::object::{validate_object, write_create_object, write_update_object};
use super::position::write_update_position;
use crate::error::ProtocolError;
use crate::game::world_object::WorldObject;
use crate::net::buffer::PacketBuffer;

/// Initial payload capacity for object descriptions
const OBJECT_PAYLOAD_CAPACITY: usize = 256;

/// Largest possible position update payload
const POSITION_PAYLOAD_CAPACITY: usize = 52;

/// Opcodes of the messages built here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum GameMessageOpcode {
    /// Full description of an object the client has not seen
    CreateObject = 0xF745,
    /// Position change of a known object
    UpdatePosition = 0xF748,
    /// Full description of a known object
    UpdateObject = 0xF7DB,
}

impl GameMessageOpcode {
    /// Get the raw opcode
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Convert from a raw opcode
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0xF745 => Some(Self::CreateObject),
            0xF748 => Some(Self::UpdatePosition),
            0xF7DB => Some(Self::UpdateObject),
            _ => None,
        }
    }

    /// Get a human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateObject => "CreateObject",
            Self::UpdatePosition => "UpdatePosition",
            Self::UpdateObject => "UpdateObject",
        }
    }
}

impl std::fmt::Display for GameMessageOpcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An outgoing game message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameMessage {
    /// Message opcode
    pub opcode: GameMessageOpcode,
    /// Encoded payload
    pub payload: Bytes,
}

impl GameMessage {
    /// Create a message from an opcode and payload
    pub fn new(opcode: GameMessageOpcode, payload: Bytes) -> Self {
        Self { opcode, payload }
    }

    /// Opcode followed by the payload
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = PacketBuffer::with_capacity(4 + self.payload.len());
        buf.write_u32(self.opcode.as_u32());
        buf.write_bytes(&self.payload);
        buf.freeze()
    }

    /// Total length of [`Self::to_bytes`]
    pub fn len(&self) -> usize {
        4 + self.payload.len()
    }

    /// Check if the payload is empty
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

fn finish(opcode: GameMessageOpcode, buf: PacketBuffer) -> GameMessage {
    trace!(opcode = %opcode, len = buf.len(), "Built game message");
    GameMessage::new(opcode, buf.freeze())
}

/// Build a create-object message
///
/// With `strict` set, the object's header flags are checked against its
/// populated fields first.
pub fn build_create_object(object: &WorldObject, strict: bool) -> Result<GameMessage, ProtocolError> {
    if strict {
        validate_object(object)?;
    }

    let mut buf = PacketBuffer::with_capacity(OBJECT_PAYLOAD_CAPACITY);
    write_create_object(object, &mut buf);
    Ok(finish(GameMessageOpcode::CreateObject, buf))
}

/// Build an update-object message
pub fn build_update_object(object: &WorldObject, strict: bool) -> Result<GameMessage, ProtocolError> {
    if strict {
        validate_object(object)?;
    }

    let mut buf = PacketBuffer::with_capacity(OBJECT_PAYLOAD_CAPACITY);
    write_update_object(object, &mut buf);
    Ok(finish(GameMessageOpcode::UpdateObject, buf))
}

/// Build a position update message
pub fn build_update_position(object: &WorldObject) -> GameMessage {
    let mut buf = PacketBuffer::with_capacity(POSITION_PAYLOAD_CAPACITY);
    write_update_position(object, &mut buf);
    finish(GameMessageOpcode::UpdatePosition, buf)
}
