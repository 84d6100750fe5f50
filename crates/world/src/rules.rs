//! Mutation rules: grass regrowth, farmland hydration/decay and crop growth.

use crate::block::BlockKind;
use crate::grid::{DirtyFlags, World, MUTABLE_Y};
use tracing::debug;

impl World {
    /// Any water or water source within the hydration radius of `(x, z)`.
    pub fn is_hydrated(&self, x: i32, z: i32) -> bool {
        let radius = self.rules.hydration_radius;
        let metric = self.rules.hydration_metric;
        let r = radius as i32;
        for dz in -r..=r {
            for dx in -r..=r {
                if !metric.within(dx, dz, radius) {
                    continue;
                }
                if self.get_block(x + dx, MUTABLE_Y, z + dz).is_water() {
                    return true;
                }
            }
        }
        false
    }

    /// One sweep over every column. Within a column the order is grass, farmland, crop,
    /// so a crop on reverting farmland is removed in the same sweep.
    pub(crate) fn apply_rules(&mut self, dt: f64, t: f64) {
        for z in 0..self.size_z {
            for x in 0..self.size_x {
                self.update_column(x, z, dt, t);
            }
        }
    }

    fn update_column(&mut self, x: i32, z: i32, dt: f64, t: f64) {
        let idx = (z * self.size_x + x) as usize;

        // Grass regrowth
        if self.top[idx] == BlockKind::Dirt {
            if let Some(deadline) = self.grass_regrow_at[idx] {
                if t >= deadline {
                    self.top[idx] = BlockKind::Grass;
                    self.grass_regrow_at[idx] = None;
                    self.dirty |= DirtyFlags::BLOCKS;
                }
            }
        } else {
            self.grass_regrow_at[idx] = None;
        }

        // Farmland hydration
        if self.top[idx] == BlockKind::Farmland {
            if self.is_hydrated(x, z) {
                self.farmland_revert_at[idx] = None;
            } else {
                match self.farmland_revert_at[idx] {
                    None => {
                        self.farmland_revert_at[idx] = Some(t + self.rules.farmland_revert_secs);
                    }
                    Some(deadline) if t >= deadline => {
                        self.top[idx] = BlockKind::Dirt;
                        self.farmland_revert_at[idx] = None;
                        if self.crops[idx].take().is_some() {
                            self.dirty |= DirtyFlags::CROPS;
                        }
                        let delay = self.rules.grass_regrow_secs.sample(&mut self.rng);
                        self.grass_regrow_at[idx] = Some(t + delay);
                        self.dirty |= DirtyFlags::BLOCKS;
                        debug!(x, z, t, "farmland dried out");
                    }
                    Some(_) => {}
                }
            }
        } else {
            self.farmland_revert_at[idx] = None;
        }

        // Crop growth
        if self.top[idx] != BlockKind::Farmland {
            if self.crops[idx].take().is_some() {
                self.dirty |= DirtyFlags::CROPS;
            }
        } else if let Some(crop) = self.crops[idx].as_mut() {
            if crop.advance(dt, t, self.rules.growth_model) {
                self.dirty |= DirtyFlags::CROPS;
            }
        }
    }
}
