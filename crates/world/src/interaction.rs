//! Interaction protocol: break/harvest and item use against a targeted cell.
//!
//! Use actions are planned by a pure function of (item, world, target) and then applied,
//! so every precondition is checked before anything mutates.

use crate::block::BlockKind;
use crate::farming::CropKind;
use crate::grid::{World, MUTABLE_Y};
use crate::inventory::Inventory;
use glam::{IVec3, Vec3};
use rand::Rng;
use tracing::debug;
use voxfarm_core::ItemKind;

/// Resolved aim hit supplied by the targeting collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Hit cell.
    pub cell: IVec3,
    /// Outward normal of the hit face.
    pub normal: Vec3,
    /// The hit is a crop rather than a block face.
    pub is_crop: bool,
}

impl Target {
    /// Block hit on a face.
    pub fn block(cell: IVec3, normal: Vec3) -> Self {
        Self {
            cell,
            normal,
            is_crop: false,
        }
    }

    /// Crop hit on the mutable layer at `(x, z)`.
    pub fn crop(x: i32, z: i32) -> Self {
        Self {
            cell: IVec3::new(x, MUTABLE_Y, z),
            normal: Vec3::Y,
            is_crop: true,
        }
    }

    /// Hit face normal snapped to the nearest integer per axis.
    pub fn snapped_normal(&self) -> IVec3 {
        self.normal.round().as_ivec3()
    }

    /// Cell adjacent to the hit face.
    pub fn placement_cell(&self) -> IVec3 {
        self.cell + self.snapped_normal()
    }
}

/// Result of the primary (break/harvest) action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryOutcome {
    /// Nothing changed.
    Nothing,
    /// A mature crop was harvested.
    Harvested {
        /// Crop cell.
        cell: IVec3,
        /// Harvested crop kind.
        crop: CropKind,
        /// Items produced.
        count: u32,
    },
    /// A block was broken and replaced by air.
    Broken {
        /// Broken cell.
        cell: IVec3,
        /// Block that was there.
        block: BlockKind,
    },
}

impl PrimaryOutcome {
    /// Item drop produced by this outcome: `(item, count, cell)`.
    pub fn drop(&self) -> Option<(ItemKind, u32, IVec3)> {
        match *self {
            PrimaryOutcome::Nothing => None,
            PrimaryOutcome::Harvested { cell, crop, count } => {
                Some((crop.harvest_item(), count, cell))
            }
            PrimaryOutcome::Broken { cell, block } => {
                block.drops_dirt().then_some((ItemKind::DirtItem, 1, cell))
            }
        }
    }
}

/// State change produced by using the selected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseEffect {
    /// Empty bucket becomes a water bucket; `drain` is the placed water removed, if any.
    FillBucket {
        /// Water cell drained (none when filling from the source).
        drain: Option<IVec3>,
    },
    /// Water bucket pours into `cell` and becomes empty.
    PourWater {
        /// Cell that receives water.
        cell: IVec3,
        /// The cell held a crop on farmland that must go first.
        clear_crop: bool,
    },
    /// Hoe tills a column into farmland.
    Till {
        /// Column X.
        x: i32,
        /// Column Z.
        z: i32,
    },
    /// Seeds plant a crop and consume one seed.
    Plant {
        /// Column X.
        x: i32,
        /// Column Z.
        z: i32,
        /// Crop planted.
        crop: CropKind,
    },
    /// A dirt item is placed into an empty cell.
    PlaceDirt {
        /// Cell that becomes dirt.
        cell: IVec3,
    },
}

/// Decide what using `item` on `target` would do, without mutating anything.
pub fn plan_use(item: ItemKind, world: &World, target: &Target) -> Option<UseEffect> {
    let cell = target.cell;
    match item {
        ItemKind::BucketEmpty => {
            if target.is_crop || cell.y != MUTABLE_Y {
                return None;
            }
            match world.get_block(cell.x, cell.y, cell.z) {
                BlockKind::WaterSource => Some(UseEffect::FillBucket { drain: None }),
                BlockKind::Water => Some(UseEffect::FillBucket { drain: Some(cell) }),
                _ => None,
            }
        }
        ItemKind::BucketWater => {
            let placement = target.placement_cell();
            let candidate = if placement.y == MUTABLE_Y {
                placement
            } else if cell.y == MUTABLE_Y {
                cell
            } else {
                return None;
            };
            if !world.in_bounds(candidate.x, candidate.z) {
                return None;
            }
            match world.get_block(candidate.x, candidate.y, candidate.z) {
                BlockKind::Air => Some(UseEffect::PourWater {
                    cell: candidate,
                    clear_crop: false,
                }),
                BlockKind::Dirt | BlockKind::Grass | BlockKind::Farmland if candidate == cell => {
                    Some(UseEffect::PourWater {
                        cell: candidate,
                        clear_crop: world.has_crop(candidate.x, candidate.z),
                    })
                }
                _ => None,
            }
        }
        ItemKind::HoeWood => {
            if target.is_crop || cell.y != MUTABLE_Y {
                return None;
            }
            world
                .get_block(cell.x, cell.y, cell.z)
                .can_till()
                .then_some(UseEffect::Till {
                    x: cell.x,
                    z: cell.z,
                })
        }
        ItemKind::SeedsWheat => {
            if target.is_crop || cell.y != MUTABLE_Y {
                return None;
            }
            let farmland = world.get_block(cell.x, cell.y, cell.z) == BlockKind::Farmland;
            (farmland && !world.has_crop(cell.x, cell.z)).then_some(UseEffect::Plant {
                x: cell.x,
                z: cell.z,
                crop: CropKind::Wheat,
            })
        }
        ItemKind::DirtItem => {
            let placement = target.placement_cell();
            let open = placement.y == MUTABLE_Y
                && world.in_bounds(placement.x, placement.z)
                && world.get_block(placement.x, placement.y, placement.z) == BlockKind::Air;
            open.then_some(UseEffect::PlaceDirt { cell: placement })
        }
        ItemKind::ShovelWood | ItemKind::Wheat => None,
    }
}

/// Apply a planned effect to the world and the selected inventory slot.
///
/// Returns false if the inventory could not pay for the effect; nothing changes then.
pub fn apply_use(effect: UseEffect, world: &mut World, inventory: &mut Inventory) -> bool {
    match effect {
        UseEffect::FillBucket { drain } => {
            if let Some(cell) = drain {
                world.set_block(cell.x, cell.y, cell.z, BlockKind::Air);
            }
            inventory.replace_selected(ItemKind::BucketWater, 1);
        }
        UseEffect::PourWater { cell, clear_crop } => {
            if clear_crop {
                world.clear_crop(cell.x, cell.z);
            }
            world.set_block(cell.x, cell.y, cell.z, BlockKind::Water);
            inventory.replace_selected(ItemKind::BucketEmpty, 1);
        }
        UseEffect::Till { x, z } => {
            world.set_block(x, MUTABLE_Y, z, BlockKind::Farmland);
            world.reset_column_timers(x, z);
        }
        UseEffect::Plant { x, z, crop } => {
            if !inventory.consume_selected(1) {
                return false;
            }
            world.plant_crop(x, z, crop);
        }
        UseEffect::PlaceDirt { cell } => {
            if !inventory.consume_selected(1) {
                return false;
            }
            world.set_block(cell.x, cell.y, cell.z, BlockKind::Dirt);
        }
    }
    true
}

/// Break or harvest the target. Harvest bonus rolls come from `rng`.
pub fn primary_action<R: Rng + ?Sized>(
    world: &mut World,
    target: Option<&Target>,
    rng: &mut R,
) -> PrimaryOutcome {
    let Some(target) = target else {
        return PrimaryOutcome::Nothing;
    };
    let cell = target.cell;

    let outcome = if target.is_crop {
        match world.crop(cell.x, cell.z).copied() {
            Some(crop) if crop.is_mature() => {
                world.clear_crop(cell.x, cell.z);
                let chance = world.rules().harvest_bonus_chance.clamp(0.0, 1.0);
                let bonus = rng.gen_bool(chance);
                PrimaryOutcome::Harvested {
                    cell,
                    crop: crop.kind,
                    count: if bonus { 2 } else { 1 },
                }
            }
            _ => PrimaryOutcome::Nothing,
        }
    } else {
        let block = world.get_block(cell.x, cell.y, cell.z);
        if cell.y != MUTABLE_Y || !block.is_breakable() {
            PrimaryOutcome::Nothing
        } else {
            world.clear_crop(cell.x, cell.z);
            world.set_block(cell.x, cell.y, cell.z, BlockKind::Air);
            PrimaryOutcome::Broken { cell, block }
        }
    };

    debug!(?cell, ?outcome, "primary action");
    outcome
}

/// Use the selected item on the target. Returns the effect applied, if any.
pub fn secondary_action(
    world: &mut World,
    inventory: &mut Inventory,
    target: Option<&Target>,
) -> Option<UseEffect> {
    let target = target?;
    let item = inventory.selected_item()?;
    let effect = plan_use(item, world, target)?;
    if !apply_use(effect, world, inventory) {
        return None;
    }
    debug!(%item, ?effect, "secondary action");
    Some(effect)
}
