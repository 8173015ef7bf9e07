//! Integration tests for inventories and object messages
//!
//! These tests verify the end-to-end behavior of:
//! - Dropping items through a real session and landblock registry
//! - Exactly-once drops under concurrent callers
//! - Object descriptions for a fully populated item
//! - Strict validation through the message builders

use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use pretty_assertions::assert_eq;

use ace_world::game::flags::{
    ItemType, ObjectDescriptionFlags, PhysicsDescriptionFlags, UpdatePositionFlags,
    WeenieHeaderFlags,
};
use ace_world::game::game_data::GameData;
use ace_world::game::landblock::{LandblockManager, WorldIndex};
use ace_world::game::position::{Position, Quaternion};
use ace_world::game::world_object::{WorldObject, DROP_DISTANCE};
use ace_world::net::buffer::PacketBuffer;
use ace_world::net::session::Session;
use ace_world::net::transport::MessageTransport;
use ace_world::protocol::messages::{build_create_object, build_update_position};
use ace_world::protocol::position::{PLACEMENT_SENTINEL, WORD_SENTINEL};
use ace_world::{GameMessage, GameMessageOpcode, ObjectGuid, ProtocolError};

/// Transport that records everything it is asked to send
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(ObjectGuid, GameMessage)>>,
}

impl MessageTransport for RecordingTransport {
    fn send(&self, guid: ObjectGuid, message: GameMessage) {
        self.sent.lock().push((guid, message));
    }
}

/// World index that records registrations
#[derive(Default)]
struct RecordingWorld {
    registered: Mutex<Vec<ObjectGuid>>,
}

impl WorldIndex for RecordingWorld {
    fn register(&self, object: Arc<WorldObject>) {
        self.registered.lock().push(object.guid());
    }
}

fn player() -> Arc<WorldObject> {
    let player = WorldObject::new(ObjectGuid::new(0x5000_0001), ItemType::CREATURE);
    player.set_position(Position::new(
        0xA9B4_0019,
        84.0,
        7.0,
        94.0,
        Quaternion::from_heading(0.0),
    ));
    player.set_total_logins(5);
    Arc::new(player)
}

fn item(low: u32, burden: u16) -> Arc<WorldObject> {
    let item = WorldObject::new(ObjectGuid::new(0x8000_0000 | low), ItemType::MISC);
    *item.game_data.write() = GameData {
        burden: Some(burden),
        ..GameData::new(format!("Item {}", low), 100, 0x1000)
    };
    Arc::new(item)
}

/// Dropping through a session queues the position update for the item
#[test]
fn test_drop_through_session() {
    let owner = player();
    let gem = item(7, 25);
    owner.add_to_inventory(Arc::clone(&gem));

    let (session, mut outbound_rx) = Session::channel(1, 8);
    let world = LandblockManager::new();

    let dropped = owner.drop_item(gem.guid(), &session, &world).expect("item dropped");
    assert_eq!(dropped.guid(), gem.guid());

    let outbound = outbound_rx.try_recv().expect("update queued");
    assert_eq!(outbound.guid, gem.guid());
    assert_eq!(outbound.message.opcode, GameMessageOpcode::UpdatePosition);
    assert!(outbound_rx.try_recv().is_err());

    let mut payload = PacketBuffer::from_bytes(&outbound.message.payload);
    assert_eq!(payload.read_u32(), gem.guid().full());
    assert_eq!(payload.read_u32(), UpdatePositionFlags::DROPPED.bits());
    assert_eq!(payload.read_u32(), 0xA9B4_0019);
    assert_eq!(payload.read_f32(), 84.0);
    assert_eq!(payload.read_f32(), 7.0 + DROP_DISTANCE);
    assert_eq!(payload.read_f32(), 94.0);
    // W and Z only
    assert_eq!(payload.read_f32(), 1.0);
    assert_eq!(payload.read_f32(), 0.0);
    assert_eq!(payload.read_u32(), PLACEMENT_SENTINEL);
    // the item is not a player
    assert_eq!(payload.read_u16(), WORD_SENTINEL);
    assert_eq!(payload.read_u16(), WORD_SENTINEL);
    assert_eq!(payload.read_u16(), WORD_SENTINEL);
    assert!(!payload.has_remaining());

    assert_eq!(world.landblock_of(gem.guid()), Some(0xA9B4));
    assert_eq!(owner.inventory_len(), 0);
    assert_eq!(owner.game_data.read().burden, Some(25));
}

/// A second drop of the same item is a no-op
#[test]
fn test_drop_is_exactly_once() {
    let owner = player();
    let gem = item(1, 10);
    owner.add_to_inventory(Arc::clone(&gem));

    let transport = RecordingTransport::default();
    let world = RecordingWorld::default();

    assert!(owner.drop_item(gem.guid(), &transport, &world).is_some());
    assert!(owner.drop_item(gem.guid(), &transport, &world).is_none());

    assert_eq!(transport.sent.lock().len(), 1);
    assert_eq!(world.registered.lock().as_slice(), &[gem.guid()]);
}

/// Racing drops of one item send and register it exactly once
#[test]
fn test_concurrent_drops_of_one_item() {
    let owner = player();
    let gem = item(1, 10);
    owner.add_to_inventory(Arc::clone(&gem));

    let transport = Arc::new(RecordingTransport::default());
    let world = Arc::new(RecordingWorld::default());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let owner = Arc::clone(&owner);
            let transport = Arc::clone(&transport);
            let world = Arc::clone(&world);
            let guid = gem.guid();
            thread::spawn(move || owner.drop_item(guid, &*transport, &*world).is_some())
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|dropped| *dropped)
        .count();

    assert_eq!(successes, 1);
    assert_eq!(transport.sent.lock().len(), 1);
    assert_eq!(world.registered.lock().len(), 1);
}

/// Dropping while other threads add keeps every added item
#[test]
fn test_drop_races_with_adds() {
    let owner = player();
    let first = item(1, 10);
    owner.add_to_inventory(Arc::clone(&first));

    let transport = Arc::new(RecordingTransport::default());
    let world = Arc::new(LandblockManager::new());

    let adder = {
        let owner = Arc::clone(&owner);
        thread::spawn(move || {
            for low in 2..=50 {
                owner.add_to_inventory(item(low, 1));
            }
        })
    };

    let dropper = {
        let owner = Arc::clone(&owner);
        let transport = Arc::clone(&transport);
        let world = Arc::clone(&world);
        let guid = first.guid();
        thread::spawn(move || owner.drop_item(guid, &*transport, &*world))
    };

    adder.join().unwrap();
    assert!(dropper.join().unwrap().is_some());

    assert_eq!(owner.inventory_len(), 49);
    assert!(!owner.inventory_contains(first.guid()));
    assert_eq!(world.count(), 1);
}

/// The update message from a drop matches a fresh position update
#[test]
fn test_drop_message_matches_builder() {
    let owner = player();
    let gem = item(3, 10);
    owner.add_to_inventory(Arc::clone(&gem));

    let transport = RecordingTransport::default();
    let world = LandblockManager::new();
    owner.drop_item(gem.guid(), &transport, &world);

    let sent = transport.sent.lock();
    assert_eq!(sent[0].1, build_update_position(&gem));
    assert_eq!(gem.physics_data.read().flags, PhysicsDescriptionFlags::POSITION);
}

/// Create-object payload for an item with several optional fields
#[test]
fn test_create_object_payload() {
    let sword = WorldObject::new(ObjectGuid::new(0x8000_0042), ItemType::MELEE_WEAPON);
    *sword.game_data.write() = GameData {
        plural_name: Some("Swords".to_string()),
        value: Some(500),
        burden: Some(300),
        container_id: Some(ObjectGuid::new(0x5000_0001)),
        material_type: Some(0x40),
        ..GameData::new("Sword", 0x0ABC, 0x1234)
    };
    sword.set_description_flags(ObjectDescriptionFlags::ATTACKABLE);
    sword.set_weenie_flags(
        WeenieHeaderFlags::PLURAL_NAME
            | WeenieHeaderFlags::VALUE
            | WeenieHeaderFlags::CONTAINER
            | WeenieHeaderFlags::BURDEN
            | WeenieHeaderFlags::MATERIAL_TYPE,
    );

    let message = build_create_object(&sword, true).expect("valid object");
    assert_eq!(message.opcode, GameMessageOpcode::CreateObject);

    let mut payload = PacketBuffer::from_bytes(&message.payload);
    assert_eq!(payload.read_u32(), 0x8000_0042);
    payload.skip(4 + 28);
    assert_eq!(payload.read_u32(), sword.header_flags().weenie.bits());
    assert_eq!(payload.read_string16l(), "Sword");
    assert_eq!(payload.read_u16(), 0x0ABC);
    assert_eq!(payload.read_u16(), 0x1234);
    assert_eq!(payload.read_u32(), ItemType::MELEE_WEAPON.bits());
    assert_eq!(payload.read_u32(), ObjectDescriptionFlags::ATTACKABLE.bits());
    assert_eq!(payload.read_string16l(), "Swords");
    assert_eq!(payload.read_u32(), 500);
    assert_eq!(payload.read_u32(), 0x5000_0001);
    assert_eq!(payload.read_u16(), 300);
    assert_eq!(payload.read_u32(), 0x40);
    // two bytes of padding after the burden
    assert_eq!(payload.remaining(), 2);
    assert_eq!(message.payload.len() % 4, 0);
}

/// Strict builders refuse objects with flagged but empty fields
#[test]
fn test_strict_builder_reports_fields() {
    let object = WorldObject::new(ObjectGuid::new(0x8000_0001), ItemType::MISC);
    object.set_weenie_flags(
        WeenieHeaderFlags::STACK_SIZE | WeenieHeaderFlags::MAX_STACK_SIZE | WeenieHeaderFlags::SPELL,
    );
    object.game_data.write().stack_size = Some(1);

    let err = build_create_object(&object, true).unwrap_err();
    assert_eq!(
        err,
        ProtocolError::MissingFields {
            fields: vec!["max_stack_size", "spell"]
        }
    );
}

/// Player position updates carry the login count
#[test]
fn test_player_position_update() {
    let owner = player();
    owner.set_update_position_flags(UpdatePositionFlags::NO_ORIENTATION);

    let message = build_update_position(&owner);
    let mut payload = PacketBuffer::from_bytes(&message.payload);
    payload.skip(4 + 4 + 16);
    assert_eq!(payload.read_u16(), 5);
    assert_eq!(payload.read_u16(), WORD_SENTINEL);
    assert_eq!(payload.read_u16(), WORD_SENTINEL);
}
