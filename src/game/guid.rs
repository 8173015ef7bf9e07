//! Object identity
//!
//! Every world object carries a 32-bit guid. The top byte is reserved for the
//! guid category, which is how the server tells player-controlled objects
//! apart from everything else without consulting the object itself.

use serde::{Deserialize, Serialize};

/// Bit offset of the category byte within a guid
const CATEGORY_SHIFT: u32 = 24;

/// Mask for the per-category sequence part of a guid
const LOW_MASK: u32 = 0x00FF_FFFF;

/// Guid category, taken from the reserved top byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuidType {
    /// Player characters
    Player,
    /// Anything else the server spawns
    Other(u8),
}

impl GuidType {
    /// Category byte used for player guids
    pub const PLAYER: u8 = 0x50;

    /// Classify a category byte
    pub fn from_u8(value: u8) -> Self {
        if value == Self::PLAYER {
            Self::Player
        } else {
            Self::Other(value)
        }
    }

    /// Get the category byte
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Player => Self::PLAYER,
            Self::Other(value) => value,
        }
    }
}

/// Unique identifier of a world object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectGuid(u32);

impl ObjectGuid {
    /// Wrap a raw guid
    pub const fn new(full: u32) -> Self {
        Self(full)
    }

    /// Build a guid from a category and a per-category sequence number
    pub fn from_parts(guid_type: GuidType, low: u32) -> Self {
        Self(((guid_type.as_u8() as u32) << CATEGORY_SHIFT) | (low & LOW_MASK))
    }

    /// Get the raw 32-bit value
    #[inline]
    pub const fn full(self) -> u32 {
        self.0
    }

    /// Get the per-category sequence part
    #[inline]
    pub fn low(self) -> u32 {
        self.0 & LOW_MASK
    }

    /// Get the guid category
    #[inline]
    pub fn guid_type(self) -> GuidType {
        GuidType::from_u8((self.0 >> CATEGORY_SHIFT) as u8)
    }

    /// Check if this guid belongs to a player-controlled object
    #[inline]
    pub fn is_player(self) -> bool {
        self.guid_type() == GuidType::Player
    }
}

impl From<u32> for ObjectGuid {
    fn from(full: u32) -> Self {
        Self(full)
    }
}

impl std::fmt::Display for ObjectGuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}
