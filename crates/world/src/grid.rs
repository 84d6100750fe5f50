//! Grid storage: the mutable top layer, per-column timers and crop slots.

use crate::block::BlockKind;
use crate::config::RulesConfig;
use crate::farming::{Crop, CropKind};
use crate::RNG_DOMAIN_RULES;
use glam::IVec3;
use rand::rngs::StdRng;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use voxfarm_core::scoped_rng;
use voxfarm_physics::VoxelSolidity;

/// Height of the only mutable layer.
pub const MUTABLE_Y: i32 = 1;
/// Height of the permanent subsoil layer.
pub const SUBSOIL_Y: i32 = 0;
/// Number of layers in the grid.
pub const WORLD_HEIGHT: i32 = 2;
/// Island edge length used by default.
pub const DEFAULT_WORLD_SIZE: u32 = 64;
/// Largest accepted island edge length.
pub const MAX_WORLD_SIZE: u32 = 1024;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    /// Dirty flags set whenever grid data changes.
    pub struct DirtyFlags: u8 {
        const BLOCKS = 0b0000_0001;
        const CROPS = 0b0000_0010;
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        DirtyFlags::empty()
    }
}

/// The island grid. Owns every block, timer and crop; other systems go through its API.
#[derive(Debug, Clone)]
pub struct World {
    pub(crate) size_x: i32,
    pub(crate) size_z: i32,
    pub(crate) top: Vec<BlockKind>,
    pub(crate) grass_regrow_at: Vec<Option<f64>>,
    pub(crate) farmland_revert_at: Vec<Option<f64>>,
    pub(crate) crops: Vec<Option<Crop>>,
    pub(crate) dirty: DirtyFlags,
    pub(crate) now: f64,
    pub(crate) rules: RulesConfig,
    pub(crate) rng: StdRng,
    water_source: Option<IVec3>,
}

impl World {
    /// Create an all-air island. Sizes are clamped into `1..=MAX_WORLD_SIZE`.
    ///
    /// Rules that fail [`RulesConfig::validate`] are replaced by the defaults.
    pub fn new(size_x: u32, size_z: u32, seed: u64, rules: RulesConfig) -> Self {
        let rules = match rules.validate() {
            Ok(()) => rules,
            Err(err) => {
                warn!("invalid world rules: {err}; using defaults");
                RulesConfig::default()
            }
        };
        let size_x = size_x.clamp(1, MAX_WORLD_SIZE) as i32;
        let size_z = size_z.clamp(1, MAX_WORLD_SIZE) as i32;
        let cells = (size_x * size_z) as usize;
        Self {
            size_x,
            size_z,
            top: vec![BlockKind::Air; cells],
            grass_regrow_at: vec![None; cells],
            farmland_revert_at: vec![None; cells],
            crops: vec![None; cells],
            dirty: DirtyFlags::BLOCKS | DirtyFlags::CROPS,
            now: 0.0,
            rules,
            rng: scoped_rng(seed, RNG_DOMAIN_RULES),
            water_source: None,
        }
    }

    /// Create and generate a flat grass island.
    pub fn flat_island(size_x: u32, size_z: u32, seed: u64, rules: RulesConfig) -> Self {
        let mut world = Self::new(size_x, size_z, seed, rules);
        world.generate_flat_island();
        world
    }

    /// Fill the top layer with grass, clear timers and crops, and place the water source
    /// at the middle of the `z = 0` edge.
    pub fn generate_flat_island(&mut self) {
        self.top.fill(BlockKind::Grass);
        self.grass_regrow_at.fill(None);
        self.farmland_revert_at.fill(None);
        self.crops.fill(None);

        let source = IVec3::new(self.size_x / 2, MUTABLE_Y, 0);
        if let Some(idx) = self.index(source.x, source.z) {
            self.top[idx] = BlockKind::WaterSource;
        }
        self.water_source = Some(source);
        self.dirty = DirtyFlags::BLOCKS | DirtyFlags::CROPS;
        debug!(size_x = self.size_x, size_z = self.size_z, ?source, "generated flat island");
    }

    /// Island extent on X.
    pub fn size_x(&self) -> i32 {
        self.size_x
    }

    /// Island extent on Z.
    pub fn size_z(&self) -> i32 {
        self.size_z
    }

    /// Position of the water source, if the island has been generated.
    pub fn water_source(&self) -> Option<IVec3> {
        self.water_source
    }

    /// Rule constants in use.
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    /// Time passed to the latest [`World::update`].
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Whether `(x, z)` is a column of the island.
    pub fn in_bounds(&self, x: i32, z: i32) -> bool {
        x >= 0 && z >= 0 && x < self.size_x && z < self.size_z
    }

    pub(crate) fn index(&self, x: i32, z: i32) -> Option<usize> {
        if self.in_bounds(x, z) {
            Some((z * self.size_x + x) as usize)
        } else {
            None
        }
    }

    /// Block at a cell. Out of bounds is air; `y = 0` is always subsoil.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockKind {
        let Some(idx) = self.index(x, z) else {
            return BlockKind::Air;
        };
        match y {
            SUBSOIL_Y => BlockKind::Subsoil,
            MUTABLE_Y => self.top[idx],
            _ => BlockKind::Air,
        }
    }

    /// Cell is occupied (used for targeting and placement). Water counts as occupied.
    pub fn is_solid_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).is_solid()
    }

    /// Cell blocks movement. Water does not.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        self.get_block(x, y, z).blocks_movement()
    }

    /// Write the mutable layer. Returns false (and changes nothing) outside the mutable
    /// layer, out of bounds, on the water source cell, or when writing a water source.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockKind) -> bool {
        if y != MUTABLE_Y || block == BlockKind::WaterSource {
            return false;
        }
        let Some(idx) = self.index(x, z) else {
            return false;
        };
        if self.top[idx] == BlockKind::WaterSource {
            return false;
        }

        self.top[idx] = block;
        self.dirty |= DirtyFlags::BLOCKS;

        if block == BlockKind::Dirt {
            let delay = self.rules.grass_regrow_secs.sample(&mut self.rng);
            self.grass_regrow_at[idx] = Some(self.now + delay);
        }
        if block != BlockKind::Farmland {
            self.farmland_revert_at[idx] = None;
        }
        true
    }

    /// Clear both column timers (used after tilling).
    pub fn reset_column_timers(&mut self, x: i32, z: i32) {
        if let Some(idx) = self.index(x, z) {
            self.grass_regrow_at[idx] = None;
            self.farmland_revert_at[idx] = None;
        }
    }

    /// Pending grass regrowth deadline for a column.
    pub fn grass_regrow_deadline(&self, x: i32, z: i32) -> Option<f64> {
        self.index(x, z).and_then(|idx| self.grass_regrow_at[idx])
    }

    /// Pending farmland revert deadline for a column.
    pub fn farmland_revert_deadline(&self, x: i32, z: i32) -> Option<f64> {
        self.index(x, z).and_then(|idx| self.farmland_revert_at[idx])
    }

    /// Whether a crop grows at `(x, z)`.
    pub fn has_crop(&self, x: i32, z: i32) -> bool {
        self.crop(x, z).is_some()
    }

    /// Crop at `(x, z)`.
    pub fn crop(&self, x: i32, z: i32) -> Option<&Crop> {
        self.index(x, z).and_then(|idx| self.crops[idx].as_ref())
    }

    /// Plant a crop at stage 0. Requires farmland and an empty crop slot.
    pub fn plant_crop(&mut self, x: i32, z: i32, kind: CropKind) -> bool {
        let Some(idx) = self.index(x, z) else {
            return false;
        };
        if self.top[idx] != BlockKind::Farmland || self.crops[idx].is_some() {
            return false;
        }
        let total = self.rules.crop_grow_secs.sample(&mut self.rng);
        self.crops[idx] = Some(Crop::new(kind, total, self.now));
        self.dirty |= DirtyFlags::CROPS;
        true
    }

    /// Remove the crop at `(x, z)`. Returns true if one was removed.
    pub fn clear_crop(&mut self, x: i32, z: i32) -> bool {
        let Some(idx) = self.index(x, z) else {
            return false;
        };
        if self.crops[idx].take().is_some() {
            self.dirty |= DirtyFlags::CROPS;
            true
        } else {
            false
        }
    }

    /// Read and reset the block dirty flag.
    pub fn consume_dirty_blocks(&mut self) -> bool {
        self.take_dirty(DirtyFlags::BLOCKS)
    }

    /// Read and reset the crop dirty flag.
    pub fn consume_dirty_crops(&mut self) -> bool {
        self.take_dirty(DirtyFlags::CROPS)
    }

    fn take_dirty(&mut self, flag: DirtyFlags) -> bool {
        let was = self.dirty.contains(flag);
        self.dirty.remove(flag);
        was
    }

    /// Count of each block kind on the mutable layer.
    pub fn block_census(&self) -> BTreeMap<BlockKind, usize> {
        let mut census = BTreeMap::new();
        for block in &self.top {
            *census.entry(*block).or_insert(0) += 1;
        }
        census
    }

    /// Number of planted crops.
    pub fn crop_count(&self) -> usize {
        self.crops.iter().flatten().count()
    }

    /// Number of fully grown crops.
    pub fn mature_crop_count(&self) -> usize {
        self.crops.iter().flatten().filter(|c| c.is_mature()).count()
    }

    /// Advance the mutation rules by `dt` seconds to absolute time `t`.
    ///
    /// `dt` is clamped to the configured per-tick maximum; a non-finite `dt` counts as zero
    /// and a non-finite `t` leaves the world time unchanged.
    pub fn update(&mut self, dt: f64, t: f64) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.rules.max_tick_secs)
        } else {
            0.0
        };
        let t = if t.is_finite() { t } else { self.now };
        self.now = t;
        self.apply_rules(dt, t);
    }
}

impl VoxelSolidity for World {
    fn blocks_movement(&self, x: i32, y: i32, z: i32) -> bool {
        self.is_solid(x, y, z)
    }
}
