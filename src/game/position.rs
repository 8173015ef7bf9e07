//! World positions
//!
//! A position is a cell id (whose upper 16 bits name the landblock), a local
//! offset within that cell, and an orientation quaternion.

use serde::{Deserialize, Serialize};

use crate::net::buffer::PacketBuffer;

/// Wire size of a position without orientation
pub const POSITION_SIZE: usize = 16;

/// Wire size of a position with orientation
pub const POSITION_WITH_ORIENTATION_SIZE: usize = 32;

/// Cell identifier; the upper 16 bits are the landblock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandblockId(u32);

impl LandblockId {
    /// Wrap a raw cell id
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw cell id
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the landblock part (upper 16 bits)
    #[inline]
    pub fn landblock(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Landblock X coordinate
    #[inline]
    pub fn landblock_x(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Landblock Y coordinate
    #[inline]
    pub fn landblock_y(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Cell within the landblock (lower 16 bits)
    #[inline]
    pub fn cell(self) -> u16 {
        self.0 as u16
    }
}

impl std::fmt::Display for LandblockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Orientation quaternion
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Quaternion {
    /// No rotation
    pub const IDENTITY: Self = Self {
        w: 1.0,
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new quaternion
    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Rotation about the vertical axis by `heading` radians
    pub fn from_heading(heading: f32) -> Self {
        let half = heading / 2.0;
        Self::new(half.cos(), 0.0, 0.0, half.sin())
    }

    /// Heading (yaw) in radians; 0 faces +Y
    pub fn heading(&self) -> f32 {
        let w = self.w as f64;
        let z = self.z as f64;
        (2.0 * w * z).atan2(1.0 - 2.0 * z * z) as f32
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Position of an object in the world
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Cell the object is in
    pub cell: LandblockId,
    /// X offset within the landblock
    pub x: f32,
    /// Y offset within the landblock
    pub y: f32,
    /// Height
    pub z: f32,
    /// Facing
    #[serde(default)]
    pub rotation: Quaternion,
}

impl Position {
    /// Create a new position
    pub fn new(cell: u32, x: f32, y: f32, z: f32, rotation: Quaternion) -> Self {
        Self {
            cell: LandblockId::new(cell),
            x,
            y,
            z,
            rotation,
        }
    }

    /// Position `distance` units straight ahead of this one
    ///
    /// Only the yaw of the facing is kept, so the result stands upright
    /// regardless of any pitch or roll here.
    pub fn in_front_of(&self, distance: f32) -> Self {
        let heading = self.rotation.heading();
        let dx = -heading.sin() * distance;
        let dy = heading.cos() * distance;

        Self {
            cell: self.cell,
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
            rotation: Quaternion::new(self.rotation.w, 0.0, 0.0, self.rotation.z),
        }
    }

    /// Planar distance to another position in the same landblock
    pub fn distance_to(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Write cell and coordinates, plus the orientation if requested
    pub fn serialize(&self, buf: &mut PacketBuffer, include_orientation: bool) {
        buf.write_u32(self.cell.raw());
        buf.write_f32(self.x);
        buf.write_f32(self.y);
        buf.write_f32(self.z);

        if include_orientation {
            buf.write_f32(self.rotation.w);
            buf.write_f32(self.rotation.x);
            buf.write_f32(self.rotation.y);
            buf.write_f32(self.rotation.z);
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{:.2} {:.2} {:.2}]",
            self.cell, self.x, self.y, self.z
        )
    }
}
