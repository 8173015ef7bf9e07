//! Object definitions
//!
//! Serializable description of a world object and its inventory, used to
//! build objects from TOML files.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::flags::ItemType;
use super::game_data::GameData;
use super::guid::ObjectGuid;
use super::model_data::ModelData;
use super::physics_data::PhysicsData;
use super::world_object::{ObjectFlags, WorldObject};

/// Everything needed to construct a world object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectDefinition {
    pub guid: ObjectGuid,
    pub item_type: ItemType,
    pub total_logins: u16,
    pub is_container: bool,
    pub flags: ObjectFlags,
    pub model: ModelData,
    pub physics: PhysicsData,
    pub game: GameData,
    /// Objects placed in the new object's inventory
    pub inventory: Vec<ObjectDefinition>,
}

impl ObjectDefinition {
    /// Parse a definition from TOML
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Construct the object, with its inventory filled in
    pub fn build(&self) -> Arc<WorldObject> {
        let object = WorldObject::with_data(
            self.guid,
            self.item_type,
            self.flags,
            self.model.clone(),
            self.physics.clone(),
            self.game.clone(),
        );
        object.set_total_logins(self.total_logins);
        object.set_is_container(self.is_container);

        for child in &self.inventory {
            object.add_to_inventory(child.build());
        }

        Arc::new(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::flags::{PhysicsDescriptionFlags, WeenieHeaderFlags};

    const BACKPACK: &str = r#"
guid = 1342177281
item_type = "CREATURE"
total_logins = 12

[flags]
weenie = "VALUE | BURDEN"

[physics]
flags = "POSITION"

[physics.position]
cell = 2847146009
x = 84.0
y = 7.1
z = 94.0

[game]
name = "Pathwarden"
weenie_class_id = 1
value = 0
burden = 0

[[inventory]]
guid = 2147483649
item_type = "MELEE_WEAPON"

[inventory.game]
name = "Dagger"
burden = 110
"#;

    #[test]
    fn test_build_from_toml() {
        let definition = ObjectDefinition::from_toml(BACKPACK).unwrap();
        let object = definition.build();

        assert_eq!(object.guid(), ObjectGuid::new(0x5000_0001));
        assert_eq!(object.item_type(), ItemType::CREATURE);
        assert_eq!(object.total_logins(), 12);
        assert_eq!(
            object.header_flags().weenie,
            WeenieHeaderFlags::VALUE | WeenieHeaderFlags::BURDEN
        );
        assert_eq!(object.physics_data.read().flags, PhysicsDescriptionFlags::POSITION);
        assert_eq!(object.position().cell.raw(), 0xA9B4_0019);
        assert_eq!(object.inventory_len(), 1);

        let dagger = object
            .get_inventory_item(ObjectGuid::new(0x8000_0001))
            .unwrap();
        assert_eq!(dagger.game_data.read().burden, Some(110));
    }
}
