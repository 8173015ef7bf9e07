//! Physics data block
//!
//! Owns the authoritative position of an object along with the sequence
//! stamps clients use to order physics updates. The description flags pick
//! which sections are serialized.

use serde::{Deserialize, Serialize};

use super::flags::PhysicsDescriptionFlags;
use super::guid::ObjectGuid;
use super::position::Position;
use crate::net::buffer::PacketBuffer;

/// An object attached to this one (wielded items, held torches, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildLink {
    pub guid: ObjectGuid,
    pub location_id: u32,
}

/// Per-object physics sequence stamps, written in this order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSequences {
    /// Bumped on every position change (the movement index)
    pub position: u16,
    pub movement: u16,
    pub state: u16,
    pub vector: u16,
    /// Bumped on every teleport (the teleport index)
    pub teleport: u16,
    pub server_control: u16,
    pub force_position: u16,
    pub visual_desc: u16,
    pub instance: u16,
}

impl PhysicsSequences {
    /// Number of stamps on the wire
    pub const COUNT: usize = 9;

    fn serialize(&self, buf: &mut PacketBuffer) {
        for stamp in [
            self.position,
            self.movement,
            self.state,
            self.vector,
            self.teleport,
            self.server_control,
            self.force_position,
            self.visual_desc,
            self.instance,
        ] {
            buf.write_u16(stamp);
        }
    }
}

/// Physical description of an object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsData {
    pub flags: PhysicsDescriptionFlags,
    pub state: u32,
    /// Raw movement buffer
    pub movement: Vec<u8>,
    pub autonomous_movement: bool,
    pub animation_frame: u32,
    pub position: Position,
    pub motion_table: u32,
    pub sound_table: u32,
    pub physics_script_table: u32,
    pub setup: u32,
    pub parent: Option<ChildLink>,
    pub children: Vec<ChildLink>,
    pub scale: f32,
    pub friction: f32,
    pub elasticity: f32,
    pub translucency: f32,
    pub velocity: [f32; 3],
    pub acceleration: [f32; 3],
    pub omega: [f32; 3],
    pub default_script: u32,
    pub default_script_intensity: f32,
    pub sequences: PhysicsSequences,
}

impl PhysicsData {
    /// Create an empty physics block
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the block
    pub fn serialize(&self, buf: &mut PacketBuffer) {
        let flags = self.flags;

        buf.write_u32(flags.bits());
        buf.write_u32(self.state);

        if flags.contains(PhysicsDescriptionFlags::MOVEMENT) {
            buf.write_u32(self.movement.len() as u32);
            buf.write_bytes(&self.movement);
            buf.write_u32(self.autonomous_movement as u32);
        } else if flags.contains(PhysicsDescriptionFlags::ANIMATION_FRAME) {
            buf.write_u32(self.animation_frame);
        }

        if flags.contains(PhysicsDescriptionFlags::POSITION) {
            self.position.serialize(buf, true);
        }
        if flags.contains(PhysicsDescriptionFlags::MTABLE) {
            buf.write_u32(self.motion_table);
        }
        if flags.contains(PhysicsDescriptionFlags::STABLE) {
            buf.write_u32(self.sound_table);
        }
        if flags.contains(PhysicsDescriptionFlags::PETABLE) {
            buf.write_u32(self.physics_script_table);
        }
        if flags.contains(PhysicsDescriptionFlags::CSETUP) {
            buf.write_u32(self.setup);
        }
        if flags.contains(PhysicsDescriptionFlags::PARENT) {
            let parent = self.parent.unwrap_or(ChildLink {
                guid: ObjectGuid::default(),
                location_id: 0,
            });
            buf.write_u32(parent.guid.full());
            buf.write_u32(parent.location_id);
        }
        if flags.contains(PhysicsDescriptionFlags::CHILDREN) {
            buf.write_u32(self.children.len() as u32);
            for child in &self.children {
                buf.write_u32(child.guid.full());
                buf.write_u32(child.location_id);
            }
        }
        if flags.contains(PhysicsDescriptionFlags::OBJ_SCALE) {
            buf.write_f32(self.scale);
        }
        if flags.contains(PhysicsDescriptionFlags::FRICTION) {
            buf.write_f32(self.friction);
        }
        if flags.contains(PhysicsDescriptionFlags::ELASTICITY) {
            buf.write_f32(self.elasticity);
        }
        if flags.contains(PhysicsDescriptionFlags::TRANSLUCENCY) {
            buf.write_f32(self.translucency);
        }
        if flags.contains(PhysicsDescriptionFlags::VELOCITY) {
            write_vector(buf, self.velocity);
        }
        if flags.contains(PhysicsDescriptionFlags::ACCELERATION) {
            write_vector(buf, self.acceleration);
        }
        if flags.contains(PhysicsDescriptionFlags::OMEGA) {
            write_vector(buf, self.omega);
        }
        if flags.contains(PhysicsDescriptionFlags::DEFAULT_SCRIPT) {
            buf.write_u32(self.default_script);
        }
        if flags.contains(PhysicsDescriptionFlags::DEFAULT_SCRIPT_INTENSITY) {
            buf.write_f32(self.default_script_intensity);
        }

        self.sequences.serialize(buf);
        buf.align();
    }
}

fn write_vector(buf: &mut PacketBuffer, vector: [f32; 3]) {
    for component in vector {
        buf.write_f32(component);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::position::Quaternion;

    #[test]
    fn test_minimal_physics_data() {
        let mut buf = PacketBuffer::new();
        PhysicsData::new().serialize(&mut buf);

        // flags + state + nine stamps = 26, aligned to 28
        assert_eq!(buf.len(), 28);
    }

    #[test]
    fn test_position_section() {
        let mut data = PhysicsData::new();
        data.flags = PhysicsDescriptionFlags::POSITION | PhysicsDescriptionFlags::CSETUP;
        data.position = Position::new(0xA9B4_0019, 84.0, 7.1, 94.0, Quaternion::IDENTITY);
        data.setup = 0x0200_0001;
        data.sequences.position = 3;
        data.sequences.teleport = 9;

        let mut buf = PacketBuffer::new();
        data.serialize(&mut buf);

        buf.reset();
        assert_eq!(buf.read_u32(), 0x8001);
        assert_eq!(buf.read_u32(), 0);
        assert_eq!(buf.read_u32(), 0xA9B4_0019);
        assert_eq!(buf.read_f32(), 84.0);
        assert_eq!(buf.read_f32(), 7.1);
        assert_eq!(buf.read_f32(), 94.0);
        assert_eq!(buf.read_f32(), 1.0);
        buf.skip(12);
        assert_eq!(buf.read_u32(), 0x0200_0001);
        assert_eq!(buf.read_u16(), 3);
        buf.skip(6);
        assert_eq!(buf.read_u16(), 9);
    }

    #[test]
    fn test_movement_wins_over_animation_frame() {
        let mut data = PhysicsData::new();
        data.flags = PhysicsDescriptionFlags::MOVEMENT | PhysicsDescriptionFlags::ANIMATION_FRAME;
        data.movement = vec![1, 2, 3, 4];
        data.animation_frame = 0xDEAD;

        let mut buf = PacketBuffer::new();
        data.serialize(&mut buf);

        // flags, state, len, 4 bytes, autonomous, stamps 18 = 38, aligned 40
        assert_eq!(buf.len(), 40);
    }

    #[test]
    fn test_children_section() {
        let mut data = PhysicsData::new();
        data.flags = PhysicsDescriptionFlags::CHILDREN;
        data.children.push(ChildLink {
            guid: ObjectGuid::new(0x8000_0001),
            location_id: 1,
        });

        let mut buf = PacketBuffer::new();
        data.serialize(&mut buf);

        buf.reset();
        buf.skip(8);
        assert_eq!(buf.read_u32(), 1);
        assert_eq!(buf.read_u32(), 0x8000_0001);
        assert_eq!(buf.read_u32(), 1);
    }
}
