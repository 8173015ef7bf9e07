//! Object description encoder
//!
//! Writes the payload shared by the create-object and update-object
//! messages:
//! - guid, model data and physics data
//! - the fixed weenie header (flags, name, class, icon, type, description)
//! - the secondary header flags when the description asks for them
//! - every flagged game data field, in canonical order
//!
//! The client reads the conditional fields positionally, so their order is
//! fixed by [`WEENIE_FIELDS`] and never by bit position.

use crate::error::ProtocolError;
use crate::game::flags::WeenieHeaderFlags;
use crate::game::game_data::GameData;
use crate::game::guid::ObjectGuid;
use crate::game::world_object::WorldObject;
use crate::net::buffer::{PacketBuffer, MAX_STRING16L_LEN};

/// One conditional field of the weenie header
pub struct WeenieField {
    /// Header bit that selects the field
    pub flag: WeenieHeaderFlags,
    /// Field name, used in validation errors
    pub name: &'static str,
    /// Whether the field has been given a value
    pub populated: fn(&GameData) -> bool,
    /// Write the field, or its default when unpopulated
    pub write: fn(&GameData, &mut PacketBuffer),
}

impl std::fmt::Debug for WeenieField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeenieField")
            .field("flag", &self.flag)
            .field("name", &self.name)
            .finish()
    }
}

macro_rules! weenie_field {
    ($flag:ident, $field:ident, $write:ident) => {
        WeenieField {
            flag: WeenieHeaderFlags::$flag,
            name: stringify!($field),
            populated: |data| data.$field.is_some(),
            write: |data, buf| buf.$write(data.$field.unwrap_or_default()),
        }
    };
}

macro_rules! guid_field {
    ($flag:ident, $field:ident) => {
        WeenieField {
            flag: WeenieHeaderFlags::$flag,
            name: stringify!($field),
            populated: |data| data.$field.is_some(),
            write: |data, buf| buf.write_u32(data.$field.map(ObjectGuid::full).unwrap_or_default()),
        }
    };
}

/// Conditional weenie header fields in the order the client reads them
///
/// House restrictions has a header bit but no entry here: it is never
/// written.
pub static WEENIE_FIELDS: [WeenieField; 31] = [
    WeenieField {
        flag: WeenieHeaderFlags::PLURAL_NAME,
        name: "plural_name",
        populated: |data| data.plural_name.is_some(),
        write: |data, buf| buf.write_string16l(data.plural_name.as_deref().unwrap_or_default()),
    },
    weenie_field!(ITEMS_CAPACITY, items_capacity, write_u8),
    weenie_field!(CONTAINERS_CAPACITY, containers_capacity, write_u8),
    weenie_field!(AMMO_TYPE, ammo_type, write_u16),
    weenie_field!(VALUE, value, write_u32),
    weenie_field!(USABLE, usable, write_u32),
    weenie_field!(USE_RADIUS, use_radius, write_f32),
    weenie_field!(TARGET_TYPE, target_type, write_u32),
    weenie_field!(UI_EFFECTS, ui_effects, write_u32),
    weenie_field!(COMBAT_USE, combat_use, write_u8),
    weenie_field!(STRUCTURE, structure, write_u16),
    weenie_field!(MAX_STRUCTURE, max_structure, write_u16),
    weenie_field!(STACK_SIZE, stack_size, write_u16),
    weenie_field!(MAX_STACK_SIZE, max_stack_size, write_u16),
    guid_field!(CONTAINER, container_id),
    guid_field!(WIELDER, wielder_id),
    weenie_field!(VALID_LOCATIONS, valid_locations, write_u32),
    weenie_field!(CURRENTLY_WIELDED_LOCATION, current_wielded_location, write_u32),
    weenie_field!(PRIORITY, priority, write_u32),
    weenie_field!(RADAR_BLIP_COLOR, radar_color, write_u8),
    weenie_field!(RADAR_BEHAVIOR, radar_behavior, write_u8),
    weenie_field!(PSCRIPT, script, write_u16),
    weenie_field!(WORKMANSHIP, workmanship, write_f32),
    weenie_field!(BURDEN, burden, write_u16),
    weenie_field!(SPELL, spell, write_u16),
    guid_field!(HOUSE_OWNER, house_owner_id),
    weenie_field!(HOOK_ITEM_TYPES, hook_item_types, write_u16),
    guid_field!(MONARCH, monarch_id),
    weenie_field!(HOOK_TYPE, hook_type, write_u16),
    weenie_field!(ICON_OVERLAY, icon_overlay, write_u16),
    weenie_field!(MATERIAL_TYPE, material_type, write_u32),
];

/// Header bits and names of the conditional fields, in emission order
pub fn weenie_field_order() -> impl Iterator<Item = (WeenieHeaderFlags, &'static str)> {
    WEENIE_FIELDS.iter().map(|field| (field.flag, field.name))
}

/// Write every conditional field selected by `flags`
pub fn write_weenie_fields(flags: WeenieHeaderFlags, data: &GameData, buf: &mut PacketBuffer) {
    for field in WEENIE_FIELDS.iter().filter(|field| flags.contains(field.flag)) {
        (field.write)(data, buf);
    }
}

/// Write the full object description of `object`
pub fn write_object_description(object: &WorldObject, buf: &mut PacketBuffer) {
    let flags = object.header_flags();

    buf.write_u32(object.guid().full());
    object.model_data.read().serialize(buf);
    object.physics_data.read().serialize(buf);

    let game = object.game_data.read();
    buf.write_u32(flags.weenie.bits());
    buf.write_string16l(&game.name);
    buf.write_u16(game.weenie_class_id);
    buf.write_u16(game.icon);
    buf.write_u32(object.item_type().bits());
    buf.write_u32(flags.description.bits());

    if flags.description.has_second_header() {
        buf.write_u32(flags.weenie2.bits());
    }

    write_weenie_fields(flags.weenie, &game, buf);
    buf.align();
}

/// Payload of a create-object message
pub fn write_create_object(object: &WorldObject, buf: &mut PacketBuffer) {
    write_object_description(object, buf);
}

/// Payload of an update-object message; identical to create-object
pub fn write_update_object(object: &WorldObject, buf: &mut PacketBuffer) {
    write_object_description(object, buf);
}

/// Check that an object's header flags match its populated fields
///
/// Reports every flagged field that was never given a value, and any string
/// that would be cut short on the wire.
pub fn validate_object(object: &WorldObject) -> Result<(), ProtocolError> {
    let flags = object.header_flags();
    let game = object.game_data.read();

    check_string_len("name", &game.name)?;
    if flags.weenie.contains(WeenieHeaderFlags::PLURAL_NAME) {
        if let Some(plural) = &game.plural_name {
            check_string_len("plural_name", plural)?;
        }
    }

    let missing: Vec<&'static str> = WEENIE_FIELDS
        .iter()
        .filter(|field| flags.weenie.contains(field.flag) && !(field.populated)(&game))
        .map(|field| field.name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ProtocolError::MissingFields { fields: missing })
    }
}

fn check_string_len(field: &'static str, value: &str) -> Result<(), ProtocolError> {
    let len = value.chars().count();
    if len > MAX_STRING16L_LEN {
        return Err(ProtocolError::StringTooLong {
            field,
            len,
            max: MAX_STRING16L_LEN,
        });
    }
    Ok(())
}
