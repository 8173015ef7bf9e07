//! Game data block
//!
//! Presentation attributes plus every optional field selected by the primary
//! weenie header flags. Optional fields stay `None` until a caller sets them;
//! the object encoder writes the type's default for a flagged field that was
//! never populated.

use serde::{Deserialize, Serialize};

use super::guid::ObjectGuid;

/// Descriptive game state of an object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameData {
    /// Display name
    pub name: String,
    /// Weenie class (template) id
    pub weenie_class_id: u16,
    /// Icon resource, low half only
    pub icon: u16,

    pub plural_name: Option<String>,
    pub items_capacity: Option<u8>,
    pub containers_capacity: Option<u8>,
    pub ammo_type: Option<u16>,
    pub value: Option<u32>,
    pub usable: Option<u32>,
    pub use_radius: Option<f32>,
    pub target_type: Option<u32>,
    pub ui_effects: Option<u32>,
    pub combat_use: Option<u8>,
    pub structure: Option<u16>,
    pub max_structure: Option<u16>,
    pub stack_size: Option<u16>,
    pub max_stack_size: Option<u16>,
    /// Object whose inventory holds this one
    pub container_id: Option<ObjectGuid>,
    pub wielder_id: Option<ObjectGuid>,
    pub valid_locations: Option<u32>,
    pub current_wielded_location: Option<u32>,
    pub priority: Option<u32>,
    pub radar_color: Option<u8>,
    pub radar_behavior: Option<u8>,
    pub script: Option<u16>,
    pub workmanship: Option<f32>,
    pub burden: Option<u16>,
    pub spell: Option<u16>,
    pub house_owner_id: Option<ObjectGuid>,
    pub hook_item_types: Option<u16>,
    pub monarch_id: Option<ObjectGuid>,
    pub hook_type: Option<u16>,
    pub icon_overlay: Option<u16>,
    pub material_type: Option<u32>,
}

impl GameData {
    /// Create game data with a name and template
    pub fn new(name: impl Into<String>, weenie_class_id: u16, icon: u16) -> Self {
        Self {
            name: name.into(),
            weenie_class_id,
            icon,
            ..Default::default()
        }
    }
}
