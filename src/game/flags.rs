//! Header and description flags
//!
//! Bitmasks that select which optional fields appear in object and position
//! payloads. Bit values are fixed by the client; the order in which the
//! selected fields are emitted lives in the protocol encoders, not here.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Object description flags written in the object header
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ObjectDescriptionFlags: u32 {
        const OPENABLE = 0x0000_0001;
        const INSCRIBABLE = 0x0000_0002;
        const STUCK = 0x0000_0004;
        const PLAYER = 0x0000_0008;
        const ATTACKABLE = 0x0000_0010;
        const PLAYER_KILLER = 0x0000_0020;
        const HIDDEN_ADMIN = 0x0000_0040;
        const UI_HIDDEN = 0x0000_0080;
        const BOOK = 0x0000_0100;
        const VENDOR = 0x0000_0200;
        const PK_SWITCH = 0x0000_0400;
        const NPK_SWITCH = 0x0000_0800;
        const DOOR = 0x0000_1000;
        const CORPSE = 0x0000_2000;
        const LIFESTONE = 0x0000_4000;
        const FOOD = 0x0000_8000;
        const HEALER = 0x0001_0000;
        const LOCKPICK = 0x0002_0000;
        const PORTAL = 0x0004_0000;
        const ADMIN = 0x0010_0000;
        const FREE_PK_STATUS = 0x0020_0000;
        const IMMUNE_CELL_RESTRICTIONS = 0x0040_0000;
        const REQUIRES_PACK_SLOT = 0x0080_0000;
        const RETAINED = 0x0100_0000;
        const PK_LITE_STATUS = 0x0200_0000;
        /// The secondary weenie header follows the description flags
        const INCLUDES_SECOND_HEADER = 0x0400_0000;
        const BINDSTONE = 0x0800_0000;
        const VOLATILE_RARE = 0x1000_0000;
        const WIELD_ON_USE = 0x2000_0000;
        const WIELD_LEFT = 0x4000_0000;

        const _ = !0;
    }
}

bitflags! {
    /// Primary weenie header flags, one per optional game data field
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct WeenieHeaderFlags: u32 {
        const PLURAL_NAME = 0x0000_0001;
        const ITEMS_CAPACITY = 0x0000_0002;
        const CONTAINERS_CAPACITY = 0x0000_0004;
        const VALUE = 0x0000_0008;
        const USABLE = 0x0000_0010;
        const USE_RADIUS = 0x0000_0020;
        const MONARCH = 0x0000_0040;
        const UI_EFFECTS = 0x0000_0080;
        const AMMO_TYPE = 0x0000_0100;
        const COMBAT_USE = 0x0000_0200;
        const STRUCTURE = 0x0000_0400;
        const MAX_STRUCTURE = 0x0000_0800;
        const STACK_SIZE = 0x0000_1000;
        const MAX_STACK_SIZE = 0x0000_2000;
        const CONTAINER = 0x0000_4000;
        const WIELDER = 0x0000_8000;
        const VALID_LOCATIONS = 0x0001_0000;
        const CURRENTLY_WIELDED_LOCATION = 0x0002_0000;
        const PRIORITY = 0x0004_0000;
        const TARGET_TYPE = 0x0008_0000;
        const RADAR_BLIP_COLOR = 0x0010_0000;
        const BURDEN = 0x0020_0000;
        const SPELL = 0x0040_0000;
        const RADAR_BEHAVIOR = 0x0080_0000;
        const WORKMANSHIP = 0x0100_0000;
        const HOUSE_OWNER = 0x0200_0000;
        /// Never emitted
        const HOUSE_RESTRICTIONS = 0x0400_0000;
        const PSCRIPT = 0x0800_0000;
        const HOOK_TYPE = 0x1000_0000;
        const HOOK_ITEM_TYPES = 0x2000_0000;
        const ICON_OVERLAY = 0x4000_0000;
        const MATERIAL_TYPE = 0x8000_0000;
    }
}

bitflags! {
    /// Secondary weenie header flags
    ///
    /// All four slots are reserved: the client knows them but the server
    /// never writes their fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct WeenieHeaderFlags2: u32 {
        const ICON_UNDERLAY = 0x0000_0001;
        const COOLDOWN = 0x0000_0002;
        const COOLDOWN_DURATION = 0x0000_0004;
        const PET_OWNER = 0x0000_0008;

        const _ = !0;
    }
}

bitflags! {
    /// Physics description flags, selecting sections of the physics block
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PhysicsDescriptionFlags: u32 {
        const CSETUP = 0x0000_0001;
        const MTABLE = 0x0000_0002;
        const VELOCITY = 0x0000_0004;
        const ACCELERATION = 0x0000_0008;
        const OMEGA = 0x0000_0010;
        const PARENT = 0x0000_0020;
        const CHILDREN = 0x0000_0040;
        const OBJ_SCALE = 0x0000_0080;
        const FRICTION = 0x0000_0100;
        const ELASTICITY = 0x0000_0200;
        const TIMESTAMPS = 0x0000_0400;
        const STABLE = 0x0000_0800;
        const PETABLE = 0x0000_1000;
        const DEFAULT_SCRIPT = 0x0000_2000;
        const DEFAULT_SCRIPT_INTENSITY = 0x0000_4000;
        const POSITION = 0x0000_8000;
        const MOVEMENT = 0x0001_0000;
        const ANIMATION_FRAME = 0x0002_0000;
        const TRANSLUCENCY = 0x0004_0000;

        const _ = !0;
    }
}

bitflags! {
    /// Position update flags, mostly suppressing orientation components
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct UpdatePositionFlags: u32 {
        const HAS_VELOCITY = 0x0000_0001;
        const HAS_PLACEMENT = 0x0000_0002;
        const CONTACT = 0x0000_0004;
        const NO_QUATERNION_W = 0x0000_0008;
        const NO_QUATERNION_X = 0x0000_0010;
        const NO_QUATERNION_Y = 0x0000_0020;
        const NO_QUATERNION_Z = 0x0000_0040;

        const _ = !0;
    }
}

bitflags! {
    /// Coarse object category
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ItemType: u32 {
        const MELEE_WEAPON = 0x0000_0001;
        const ARMOR = 0x0000_0002;
        const CLOTHING = 0x0000_0004;
        const JEWELRY = 0x0000_0008;
        const CREATURE = 0x0000_0010;
        const FOOD = 0x0000_0020;
        const MONEY = 0x0000_0040;
        const MISC = 0x0000_0080;
        const MISSILE_WEAPON = 0x0000_0100;
        const CONTAINER = 0x0000_0200;
        const USELESS = 0x0000_0400;
        const GEM = 0x0000_0800;
        const SPELL_COMPONENTS = 0x0000_1000;
        const WRITABLE = 0x0000_2000;
        const KEY = 0x0000_4000;
        const CASTER = 0x0000_8000;
        const PORTAL = 0x0001_0000;
        const LOCKABLE = 0x0002_0000;
        const PROMISSORY_NOTE = 0x0004_0000;
        const MANA_STONE = 0x0008_0000;
        const SERVICE = 0x0010_0000;
        const MAGIC_WIELDABLE = 0x0020_0000;

        const _ = !0;
    }
}

impl UpdatePositionFlags {
    /// Flags used when an item is dropped to the ground: grounded, placed,
    /// and facing described by W and Z only
    pub const DROPPED: Self = Self::CONTACT
        .union(Self::HAS_PLACEMENT)
        .union(Self::NO_QUATERNION_X)
        .union(Self::NO_QUATERNION_Y);

    /// All four orientation suppress bits
    pub const NO_ORIENTATION: Self = Self::NO_QUATERNION_W
        .union(Self::NO_QUATERNION_X)
        .union(Self::NO_QUATERNION_Y)
        .union(Self::NO_QUATERNION_Z);
}

impl ObjectDescriptionFlags {
    /// Check if the secondary weenie header is present
    pub fn has_second_header(&self) -> bool {
        self.contains(Self::INCLUDES_SECOND_HEADER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropped_flags() {
        assert_eq!(UpdatePositionFlags::DROPPED.bits(), 0x36);
        assert!(!UpdatePositionFlags::DROPPED.contains(UpdatePositionFlags::NO_QUATERNION_W));
        assert!(!UpdatePositionFlags::DROPPED.contains(UpdatePositionFlags::NO_QUATERNION_Z));
    }

    #[test]
    fn test_no_orientation_flags() {
        assert_eq!(UpdatePositionFlags::NO_ORIENTATION.bits(), 0x78);
    }

    #[test]
    fn test_second_header() {
        let flags = ObjectDescriptionFlags::ATTACKABLE;
        assert!(!flags.has_second_header());

        let flags = flags | ObjectDescriptionFlags::INCLUDES_SECOND_HEADER;
        assert!(flags.has_second_header());
    }

    #[test]
    fn test_unknown_bits_are_retained() {
        let flags = ObjectDescriptionFlags::from_bits_retain(0x8000_0000);
        assert_eq!(flags.bits(), 0x8000_0000);
    }
}
