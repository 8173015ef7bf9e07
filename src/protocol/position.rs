//! Position update encoder
//!
//! Layout: guid, suppression flags, position without orientation, the
//! orientation components the flags allow, an optional placement word, the
//! login count (players only) and two trailing words.

use crate::game::flags::UpdatePositionFlags;
use crate::game::guid::ObjectGuid;
use crate::game::position::Position;
use crate::game::world_object::WorldObject;
use crate::net::buffer::PacketBuffer;

/// Placement word written when the placement flag is set
pub const PLACEMENT_SENTINEL: u32 = 0x1234_5678;

/// Filler for the login count of non-player objects and the trailing words
pub const WORD_SENTINEL: u16 = 0x1234;

/// Write a position update from its parts
pub fn write_position_update(
    guid: ObjectGuid,
    flags: UpdatePositionFlags,
    position: &Position,
    total_logins: u16,
    buf: &mut PacketBuffer,
) {
    buf.write_u32(guid.full());
    buf.write_u32(flags.bits());
    position.serialize(buf, false);

    let rotation = position.rotation;
    if !flags.contains(UpdatePositionFlags::NO_QUATERNION_W) {
        buf.write_f32(rotation.w);
    }
    if !flags.contains(UpdatePositionFlags::NO_QUATERNION_X) {
        buf.write_f32(rotation.x);
    }
    if !flags.contains(UpdatePositionFlags::NO_QUATERNION_Y) {
        buf.write_f32(rotation.y);
    }
    if !flags.contains(UpdatePositionFlags::NO_QUATERNION_Z) {
        buf.write_f32(rotation.z);
    }

    // Velocity has a flag but no fields yet

    if flags.contains(UpdatePositionFlags::HAS_PLACEMENT) {
        buf.write_u32(PLACEMENT_SENTINEL);
    }

    if guid.is_player() {
        buf.write_u16(total_logins);
    } else {
        buf.write_u16(WORD_SENTINEL);
    }

    buf.write_u16(WORD_SENTINEL);
    buf.write_u16(WORD_SENTINEL);
}

/// Write the position update of `object` using its own suppression flags
pub fn write_update_position(object: &WorldObject, buf: &mut PacketBuffer) {
    write_position_update(
        object.guid(),
        object.update_position_flags(),
        &object.position(),
        object.total_logins(),
        buf,
    );
}
