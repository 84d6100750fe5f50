//! Dropped item entities with simple ballistic physics and pickup.
//!
//! Drops are transient: they are spawned by breaking or harvesting, fall onto the island
//! surface, and are merged into the player's inventory when the player walks close enough.

use crate::inventory::Inventory;
use glam::{IVec3, Vec3};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use voxfarm_core::ItemKind;

/// Height at which drops spawn above the mutable layer.
pub const DROP_SPAWN_Y: f32 = 2.4;
/// Resting height of a drop on top of the mutable layer.
pub const DROP_FLOOR_Y: f32 = 2.2;
/// Downward acceleration applied to drops.
pub const DROP_GRAVITY: f32 = 12.0;
/// Horizontal velocity damping per second.
pub const DROP_DAMPING: f32 = 1.5;
/// A drop closer than this to the player's feet is picked up.
pub const PICKUP_RADIUS: f32 = 1.4;

/// A dropped item entity in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedItem {
    /// Unique ID for this dropped item.
    pub id: u64,
    /// Type of item.
    pub item: ItemKind,
    /// Count/stack size.
    pub count: u32,
    /// World position.
    pub position: Vec3,
    /// Velocity in blocks per second.
    pub velocity: Vec3,
    /// Resting on the floor.
    pub on_ground: bool,
}

impl DroppedItem {
    /// Integrate one step of gravity, damping and floor contact.
    pub fn update(&mut self, dt: f32) {
        self.velocity.y -= DROP_GRAVITY * dt;
        let damping = (1.0 - DROP_DAMPING * dt).max(0.0);
        self.velocity.x *= damping;
        self.velocity.z *= damping;
        self.position += self.velocity * dt;

        if self.position.y <= DROP_FLOOR_Y {
            self.position.y = DROP_FLOOR_Y;
            self.velocity.y = 0.0;
            self.on_ground = true;
        }
    }

    /// Check if this item can be picked up by a player standing at `feet`.
    pub fn can_pickup(&self, feet: Vec3) -> bool {
        self.position.distance_squared(feet) < PICKUP_RADIUS * PICKUP_RADIUS
    }
}

/// Manages all dropped items in the world.
#[derive(Debug, Clone)]
pub struct ItemManager {
    items: BTreeMap<u64, DroppedItem>,
    next_id: u64,
    rng: StdRng,
}

impl ItemManager {
    /// Create a new empty item manager drawing scatter velocities from `rng`.
    pub fn new(rng: StdRng) -> Self {
        Self {
            items: BTreeMap::new(),
            next_id: 1,
            rng,
        }
    }

    /// Spawn a new dropped item with an explicit velocity. Returns its ID.
    pub fn spawn_item(&mut self, item: ItemKind, count: u32, position: Vec3, velocity: Vec3) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.items.insert(
            id,
            DroppedItem {
                id,
                item,
                count,
                position,
                velocity,
                on_ground: false,
            },
        );
        id
    }

    /// Spawn a drop above the center of `cell` with a random upward scatter.
    pub fn spawn_above_cell(&mut self, item: ItemKind, count: u32, cell: IVec3) -> u64 {
        let position = Vec3::new(cell.x as f32 + 0.5, DROP_SPAWN_Y, cell.z as f32 + 0.5);
        let velocity = Vec3::new(
            (self.rng.gen::<f32>() - 0.5) * 2.0,
            3.5 + self.rng.gen::<f32>() * 1.5,
            (self.rng.gen::<f32>() - 0.5) * 2.0,
        );
        self.spawn_item(item, count, position, velocity)
    }

    /// Update all items (physics).
    pub fn update(&mut self, dt: f32) {
        for item in self.items.values_mut() {
            item.update(dt);
        }
    }

    /// Move every drop near `feet` into `inventory`.
    ///
    /// Whatever the inventory cannot hold stays on the ground with the reduced count.
    /// Returns the (item, count) pairs actually picked up.
    pub fn pickup_into(&mut self, feet: Vec3, inventory: &mut Inventory) -> Vec<(ItemKind, u32)> {
        let mut picked_up = Vec::new();
        let mut to_remove = Vec::new();

        for (id, item) in self.items.iter_mut() {
            if !item.can_pickup(feet) {
                continue;
            }
            let remainder = inventory.add_item(item.item, item.count);
            let taken = item.count - remainder;
            if taken > 0 {
                picked_up.push((item.item, taken));
            }
            if remainder == 0 {
                to_remove.push(*id);
            } else {
                item.count = remainder;
            }
        }

        for id in to_remove {
            self.items.remove(&id);
        }

        picked_up
    }

    /// Get the number of active dropped items.
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Get a reference to a specific item by ID.
    pub fn get(&self, id: u64) -> Option<&DroppedItem> {
        self.items.get(&id)
    }

    /// Iterate over drops in spawn order.
    pub fn items(&self) -> impl Iterator<Item = &DroppedItem> {
        self.items.values()
    }
}
