//! Crops, hydration distance and growth bookkeeping.

use serde::{Deserialize, Serialize};
use voxfarm_core::ItemKind;

/// Type of crop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropKind {
    Wheat,
}

impl CropKind {
    /// Get the final growth stage for this crop
    pub fn max_stage(self) -> u8 {
        match self {
            CropKind::Wheat => 3,
        }
    }

    /// Item dropped when a fully grown crop is harvested
    pub fn harvest_item(self) -> ItemKind {
        match self {
            CropKind::Wheat => ItemKind::Wheat,
        }
    }
}

/// Distance metric used to decide whether water hydrates a farmland cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HydrationMetric {
    /// Diamond: `|dx| + |dz| <= r`.
    #[default]
    Manhattan,
    /// Square: `max(|dx|, |dz|) <= r`.
    Chebyshev,
}

impl HydrationMetric {
    /// Whether an offset of `(dx, dz)` lies within `radius`.
    pub fn within(self, dx: i32, dz: i32, radius: u32) -> bool {
        let (dx, dz) = (dx.unsigned_abs(), dz.unsigned_abs());
        match self {
            HydrationMetric::Manhattan => dx + dz <= radius,
            HydrationMetric::Chebyshev => dx.max(dz) <= radius,
        }
    }
}

/// How a crop's stage follows from elapsed time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthModel {
    /// `stage = min(max, floor(elapsed / total * (max + 1)))`.
    #[default]
    Proportional,
    /// One stage per `total / max` seconds, tracked as an absolute deadline.
    StageDeadline,
}

/// A crop planted on a farmland cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    /// Crop species.
    pub kind: CropKind,
    /// Growth stage, `0..=kind.max_stage()`.
    pub stage: u8,
    /// Seconds grown since planting.
    pub elapsed: f64,
    /// Seconds from planting to full growth, sampled once at planting.
    pub total_grow_time: f64,
    /// Absolute time of the next stage advance (stage deadline model).
    pub next_stage_at: f64,
}

impl Crop {
    /// Plant a new crop at stage 0.
    pub fn new(kind: CropKind, total_grow_time: f64, now: f64) -> Self {
        let stage_time = total_grow_time / f64::from(kind.max_stage());
        Self {
            kind,
            stage: 0,
            elapsed: 0.0,
            total_grow_time,
            next_stage_at: now + stage_time,
        }
    }

    /// Crop has reached its final stage.
    pub fn is_mature(&self) -> bool {
        self.stage >= self.kind.max_stage()
    }

    /// Grow by `dt` seconds at absolute time `now`. Returns true if the stage changed.
    pub fn advance(&mut self, dt: f64, now: f64, model: GrowthModel) -> bool {
        if self.is_mature() {
            return false;
        }
        self.elapsed += dt;
        let max_stage = self.kind.max_stage();
        let before = self.stage;

        match model {
            GrowthModel::Proportional => {
                let ratio = if self.total_grow_time > 0.0 {
                    self.elapsed / self.total_grow_time
                } else {
                    1.0
                };
                let target = (ratio * f64::from(max_stage + 1)).floor();
                let target = target.clamp(0.0, f64::from(max_stage)) as u8;
                self.stage = self.stage.max(target);
            }
            GrowthModel::StageDeadline => {
                let stage_time = self.total_grow_time / f64::from(max_stage);
                while self.stage < max_stage && now >= self.next_stage_at {
                    self.stage += 1;
                    self.next_stage_at += stage_time;
                }
            }
        }

        self.stage != before
    }
}
