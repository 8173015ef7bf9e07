//! Landblock registry
//!
//! Tracks which objects are loose in the world and which landblock each one
//! is in. Dropped items are handed to a [`WorldIndex`] so they become
//! visible to the world.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, trace};

use super::guid::ObjectGuid;
use super::world_object::WorldObject;

/// Anything that can take ownership of objects placed in the world
pub trait WorldIndex: Send + Sync {
    /// Make an object discoverable in world space
    fn register(&self, object: Arc<WorldObject>);
}

struct Registration {
    object: Arc<WorldObject>,
    landblock: u16,
}

/// World index keyed by guid and by landblock
#[derive(Default)]
pub struct LandblockManager {
    /// Registered objects by guid
    objects: DashMap<ObjectGuid, Registration>,
    /// Guids in each landblock
    landblocks: DashMap<u16, HashSet<ObjectGuid>>,
    /// Total registrations since creation
    registrations: AtomicU64,
}

impl LandblockManager {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove an object from the world
    pub fn unregister(&self, guid: ObjectGuid) -> Option<Arc<WorldObject>> {
        let Entry::Occupied(entry) = self.objects.entry(guid) else {
            return None;
        };
        self.remove_from_landblock(entry.get().landblock, guid);
        let (_, registration) = entry.remove_entry();

        debug!(
            guid = %guid,
            landblock = registration.landblock,
            "Object unregistered"
        );

        Some(registration.object)
    }

    /// Look up a registered object
    pub fn get(&self, guid: ObjectGuid) -> Option<Arc<WorldObject>> {
        self.objects.get(&guid).map(|r| Arc::clone(&r.object))
    }

    /// Landblock an object was registered in
    pub fn landblock_of(&self, guid: ObjectGuid) -> Option<u16> {
        self.objects.get(&guid).map(|r| r.landblock)
    }

    /// All objects registered in a landblock
    pub fn objects_in_landblock(&self, landblock: u16) -> Vec<Arc<WorldObject>> {
        let guids: Vec<ObjectGuid> = match self.landblocks.get(&landblock) {
            Some(set) => set.iter().copied().collect(),
            None => return Vec::new(),
        };

        guids
            .into_iter()
            .filter_map(|guid| {
                self.objects
                    .get(&guid)
                    .filter(|r| r.landblock == landblock)
                    .map(|r| Arc::clone(&r.object))
            })
            .collect()
    }

    /// Number of registered objects
    pub fn count(&self) -> usize {
        self.objects.len()
    }

    /// Number of landblocks holding at least one object
    pub fn landblock_count(&self) -> usize {
        self.landblocks.len()
    }

    /// Total registrations since creation, re-registrations included
    pub fn total_registrations(&self) -> u64 {
        self.registrations.load(Ordering::Relaxed)
    }

    fn remove_from_landblock(&self, landblock: u16, guid: ObjectGuid) {
        let now_empty = match self.landblocks.get_mut(&landblock) {
            Some(mut set) => {
                set.remove(&guid);
                set.is_empty()
            }
            None => false,
        };

        if now_empty {
            self.landblocks.remove_if(&landblock, |_, set| set.is_empty());
        }
    }
}

impl WorldIndex for LandblockManager {
    fn register(&self, object: Arc<WorldObject>) {
        let guid = object.guid();
        let landblock = object.position().cell.landblock();

        // Landblock sets only change while the guid's entry is held
        match self.objects.entry(guid) {
            Entry::Occupied(mut entry) => {
                let previous = entry.get().landblock;
                if previous != landblock {
                    self.remove_from_landblock(previous, guid);
                    trace!(
                        guid = %guid,
                        from = previous,
                        to = landblock,
                        "Object moved between landblocks"
                    );
                }
                self.landblocks.entry(landblock).or_default().insert(guid);
                entry.insert(Registration { object, landblock });
            }
            Entry::Vacant(entry) => {
                self.landblocks.entry(landblock).or_default().insert(guid);
                entry.insert(Registration { object, landblock });
            }
        }

        self.registrations.fetch_add(1, Ordering::Relaxed);

        debug!(guid = %guid, landblock = landblock, "Object registered");
    }
}

impl std::fmt::Debug for LandblockManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LandblockManager")
            .field("objects", &self.objects.len())
            .field("landblocks", &self.landblocks.len())
            .finish()
    }
}
