//! World objects
//!
//! A world object is anything the client can see: players, creatures, items
//! on the ground and items in packs. This module holds:
//! - Identity and header flags
//! - The model, physics and game data blocks
//! - Sequence counters
//! - The inventory container and the drop operation
//!
//! Objects are shared as `Arc<WorldObject>`. Each attribute block sits behind
//! its own lock; the inventory map has a separate mutex that serializes add,
//! remove, lookup and drop on one owner. When both are needed the inventory
//! lock is taken first, then the owner's blocks, then the child's blocks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::flags::{
    ItemType, ObjectDescriptionFlags, PhysicsDescriptionFlags, UpdatePositionFlags,
    WeenieHeaderFlags, WeenieHeaderFlags2,
};
use super::game_data::GameData;
use super::guid::ObjectGuid;
use super::landblock::WorldIndex;
use super::model_data::ModelData;
use super::physics_data::PhysicsData;
use super::position::Position;
use super::sequence::{SequenceManager, SequenceType};
use crate::net::transport::MessageTransport;
use crate::protocol::messages::build_update_position;

/// Distance in front of the owner at which dropped items land
pub const DROP_DISTANCE: f32 = 1.5;

/// Default radius within which an object hears nearby events
pub const DEFAULT_LISTENING_RADIUS: f32 = 5.0;

/// Header flags of an object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectFlags {
    /// Object description flags
    pub description: ObjectDescriptionFlags,
    /// Primary weenie header flags
    pub weenie: WeenieHeaderFlags,
    /// Secondary weenie header flags, written only with the second header bit
    pub weenie2: WeenieHeaderFlags2,
    /// Suppression flags for position updates
    pub update_position: UpdatePositionFlags,
}

/// An object in the world
#[derive(Debug)]
pub struct WorldObject {
    /// Unique identity
    guid: ObjectGuid,
    /// Coarse category
    item_type: ItemType,
    /// Header flags
    pub flags: RwLock<ObjectFlags>,
    /// Visual overrides
    pub model_data: RwLock<ModelData>,
    /// Physics description, including the position
    pub physics_data: RwLock<PhysicsData>,
    /// Game attributes
    pub game_data: RwLock<GameData>,
    /// Motion and control counters
    sequences: SequenceManager,
    /// Objects held by this one
    inventory: Mutex<HashMap<ObjectGuid, Arc<WorldObject>>>,
    /// Whether this object can hold other objects
    is_container: AtomicBool,
    /// Hearing range for nearby events
    pub listening_radius: RwLock<f32>,
    /// Tick of the last state change
    pub last_updated_ticks: RwLock<f64>,
    /// Login count, sent in position updates for players
    total_logins: AtomicU16,
}

impl WorldObject {
    /// Create an object with empty attribute blocks
    pub fn new(guid: ObjectGuid, item_type: ItemType) -> Self {
        Self {
            guid,
            item_type,
            flags: RwLock::new(ObjectFlags::default()),
            model_data: RwLock::new(ModelData::new()),
            physics_data: RwLock::new(PhysicsData::new()),
            game_data: RwLock::new(GameData::default()),
            sequences: SequenceManager::with_defaults(),
            inventory: Mutex::new(HashMap::new()),
            is_container: AtomicBool::new(false),
            listening_radius: RwLock::new(DEFAULT_LISTENING_RADIUS),
            last_updated_ticks: RwLock::new(0.0),
            total_logins: AtomicU16::new(0),
        }
    }

    /// Create an object with its attribute blocks filled in
    pub fn with_data(
        guid: ObjectGuid,
        item_type: ItemType,
        flags: ObjectFlags,
        model_data: ModelData,
        physics_data: PhysicsData,
        game_data: GameData,
    ) -> Self {
        let object = Self::new(guid, item_type);
        *object.flags.write() = flags;
        *object.model_data.write() = model_data;
        *object.physics_data.write() = physics_data;
        *object.game_data.write() = game_data;
        object
    }

    // ============ Identity ============

    /// Get the object's guid
    #[inline]
    pub fn guid(&self) -> ObjectGuid {
        self.guid
    }

    /// Get the object's category
    #[inline]
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Display name
    pub fn name(&self) -> String {
        self.game_data.read().name.clone()
    }

    // ============ Flags ============

    /// Snapshot of the header flags
    pub fn header_flags(&self) -> ObjectFlags {
        *self.flags.read()
    }

    /// Replace the object description flags
    pub fn set_description_flags(&self, flags: ObjectDescriptionFlags) {
        self.flags.write().description = flags;
    }

    /// Replace the primary weenie header flags
    pub fn set_weenie_flags(&self, flags: WeenieHeaderFlags) {
        self.flags.write().weenie = flags;
    }

    /// Replace the secondary weenie header flags
    pub fn set_weenie_flags2(&self, flags: WeenieHeaderFlags2) {
        self.flags.write().weenie2 = flags;
    }

    /// Get the position update suppression flags
    pub fn update_position_flags(&self) -> UpdatePositionFlags {
        self.flags.read().update_position
    }

    /// Replace the position update suppression flags
    pub fn set_update_position_flags(&self, flags: UpdatePositionFlags) {
        self.flags.write().update_position = flags;
    }

    // ============ Physics views ============

    /// Current position
    pub fn position(&self) -> Position {
        self.physics_data.read().position
    }

    /// Move the object
    pub fn set_position(&self, position: Position) {
        self.physics_data.write().position = position;
    }

    /// Position sequence stamp of the physics block
    pub fn movement_index(&self) -> u16 {
        self.physics_data.read().sequences.position
    }

    /// Set the position sequence stamp
    pub fn set_movement_index(&self, index: u16) {
        self.physics_data.write().sequences.position = index;
    }

    /// Teleport sequence stamp of the physics block
    pub fn teleport_index(&self) -> u16 {
        self.physics_data.read().sequences.teleport
    }

    /// Set the teleport sequence stamp
    pub fn set_teleport_index(&self, index: u16) {
        self.physics_data.write().sequences.teleport = index;
    }

    // ============ Sequences ============

    /// The object's sequence counters
    pub fn sequences(&self) -> &SequenceManager {
        &self.sequences
    }

    /// Advance a sequence counter
    pub fn next_sequence(&self, sequence_type: SequenceType) -> Option<u16> {
        self.sequences.next(sequence_type)
    }

    // ============ Misc state ============

    /// Check if the object can hold other objects
    pub fn is_container(&self) -> bool {
        self.is_container.load(Ordering::Acquire)
    }

    /// Mark the object as a container
    pub fn set_is_container(&self, value: bool) {
        self.is_container.store(value, Ordering::Release);
    }

    /// Hearing range for nearby events
    pub fn listening_radius(&self) -> f32 {
        *self.listening_radius.read()
    }

    /// Tick of the last state change
    pub fn last_updated_ticks(&self) -> f64 {
        *self.last_updated_ticks.read()
    }

    /// Record the tick of a state change
    pub fn set_last_updated_ticks(&self, ticks: f64) {
        *self.last_updated_ticks.write() = ticks;
    }

    /// Login count
    pub fn total_logins(&self) -> u16 {
        self.total_logins.load(Ordering::Acquire)
    }

    /// Set the login count
    pub fn set_total_logins(&self, count: u16) {
        self.total_logins.store(count, Ordering::Release);
    }

    // ============ Inventory ============

    /// Put an object into this one's inventory
    ///
    /// Adding an object that is already present leaves the inventory
    /// unchanged. An object cannot hold itself. Returns true if the object
    /// was inserted.
    pub fn add_to_inventory(&self, child: Arc<WorldObject>) -> bool {
        if child.guid == self.guid {
            debug!(guid = %self.guid, "Refusing to add object to its own inventory");
            return false;
        }

        let mut inventory = self.inventory.lock();
        let child_guid = child.guid;
        if inventory.contains_key(&child_guid) {
            trace!(owner = %self.guid, child = %child_guid, "Item already in inventory");
            return false;
        }

        inventory.insert(child_guid, child);
        debug!(
            owner = %self.guid,
            child = %child_guid,
            count = inventory.len(),
            "Item added to inventory"
        );
        true
    }

    /// Take an object out of the inventory, returning it if it was present
    pub fn remove_from_inventory(&self, guid: ObjectGuid) -> Option<Arc<WorldObject>> {
        let removed = self.inventory.lock().remove(&guid);
        if removed.is_some() {
            debug!(owner = %self.guid, child = %guid, "Item removed from inventory");
        }
        removed
    }

    /// Look up an object in the inventory
    pub fn get_inventory_item(&self, guid: ObjectGuid) -> Option<Arc<WorldObject>> {
        self.inventory.lock().get(&guid).cloned()
    }

    /// Check if an object is in the inventory
    pub fn inventory_contains(&self, guid: ObjectGuid) -> bool {
        self.inventory.lock().contains_key(&guid)
    }

    /// Number of objects in the inventory
    pub fn inventory_len(&self) -> usize {
        self.inventory.lock().len()
    }

    /// Guids of everything in the inventory, in no particular order
    pub fn inventory_guids(&self) -> Vec<ObjectGuid> {
        self.inventory.lock().keys().copied().collect()
    }

    /// Drop an inventory item onto the ground in front of this object
    ///
    /// The whole operation runs under the inventory lock: the item is
    /// placed, announced through `transport`, registered with `world` and
    /// finally removed from the inventory. Returns the dropped item, or
    /// `None` if it was not in the inventory.
    pub fn drop_item(
        &self,
        guid: ObjectGuid,
        transport: &dyn MessageTransport,
        world: &dyn WorldIndex,
    ) -> Option<Arc<WorldObject>> {
        let mut inventory = self.inventory.lock();

        let Some(child) = inventory.get(&guid).cloned() else {
            trace!(owner = %self.guid, child = %guid, "Drop of item not in inventory");
            return None;
        };

        // The owner's burden follows the dropped item's
        let child_burden = child.game_data.read().burden;
        self.game_data.write().burden = child_burden;

        let landing = self.position().in_front_of(DROP_DISTANCE);

        child.game_data.write().container_id = None;
        {
            let mut physics = child.physics_data.write();
            physics.position = landing;
            physics.flags = PhysicsDescriptionFlags::POSITION;
        }
        child.set_update_position_flags(UpdatePositionFlags::DROPPED);

        transport.send(child.guid, build_update_position(&child));
        world.register(Arc::clone(&child));

        inventory.remove(&guid);

        debug!(
            owner = %self.guid,
            child = %guid,
            position = %landing,
            "Item dropped"
        );

        Some(child)
    }
}
