//! Tuning values for the world mutation rules.

use crate::farming::{GrowthModel, HydrationMetric};
use crate::grid::MAX_WORLD_SIZE;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Inclusive range of seconds sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Lower bound in seconds.
    pub min: f64,
    /// Upper bound in seconds.
    pub max: f64,
}

impl TimeRange {
    /// Create a new range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Draw a uniform sample from `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    /// Whether `value` lies inside the range.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Errors reported by [`RulesConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RulesConfigError {
    #[error("hydration radius must be positive")]
    ZeroHydrationRadius,
    #[error("hydration radius {0} exceeds the largest island edge ({MAX_WORLD_SIZE})")]
    HydrationRadiusTooLarge(u32),
    #[error("{name} must be finite and positive (got {value})")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} range is empty: min {min} > max {max}")]
    EmptyRange {
        name: &'static str,
        min: f64,
        max: f64,
    },
    #[error("harvest bonus chance must be within [0, 1] (got {0})")]
    BonusChance(f64),
}

/// Rule constants for hydration, decay, regrowth and crop growth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Distance within which water hydrates farmland.
    pub hydration_radius: u32,
    /// Metric used for the hydration distance.
    pub hydration_metric: HydrationMetric,
    /// Seconds an unhydrated farmland cell survives before reverting to dirt.
    pub farmland_revert_secs: f64,
    /// Delay before bare dirt regrows grass.
    pub grass_regrow_secs: TimeRange,
    /// Total time for a crop to go from stage 0 to fully grown.
    pub crop_grow_secs: TimeRange,
    /// Stage bookkeeping used while crops grow.
    pub growth_model: GrowthModel,
    /// Probability that a harvest yields one extra item.
    pub harvest_bonus_chance: f64,
    /// Largest step a single tick may integrate.
    pub max_tick_secs: f64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            hydration_radius: 4,
            hydration_metric: HydrationMetric::Manhattan,
            farmland_revert_secs: 3.0,
            grass_regrow_secs: TimeRange::new(10.0, 20.0),
            crop_grow_secs: TimeRange::new(30.0, 60.0),
            growth_model: GrowthModel::Proportional,
            harvest_bonus_chance: 0.10,
            max_tick_secs: 0.05,
        }
    }
}

impl RulesConfig {
    /// Check that every value is usable by the rules engine.
    pub fn validate(&self) -> Result<(), RulesConfigError> {
        if self.hydration_radius == 0 {
            return Err(RulesConfigError::ZeroHydrationRadius);
        }
        if self.hydration_radius > MAX_WORLD_SIZE {
            return Err(RulesConfigError::HydrationRadiusTooLarge(self.hydration_radius));
        }
        for (name, value) in [
            ("farmland_revert_secs", self.farmland_revert_secs),
            ("max_tick_secs", self.max_tick_secs),
            ("grass_regrow_secs.min", self.grass_regrow_secs.min),
            ("crop_grow_secs.min", self.crop_grow_secs.min),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(RulesConfigError::NonPositive { name, value });
            }
        }
        for (name, range) in [
            ("grass_regrow_secs", self.grass_regrow_secs),
            ("crop_grow_secs", self.crop_grow_secs),
        ] {
            if !range.max.is_finite() || range.min > range.max {
                return Err(RulesConfigError::EmptyRange {
                    name,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        if !(0.0..=1.0).contains(&self.harvest_bonus_chance) {
            return Err(RulesConfigError::BonusChance(self.harvest_bonus_chance));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn defaults_are_valid() {
        let config = RulesConfig::default();
        assert_eq!(config.hydration_radius, 4);
        assert_eq!(config.farmland_revert_secs, 3.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_range() {
        let config = RulesConfig {
            crop_grow_secs: TimeRange::new(60.0, 30.0),
            ..RulesConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RulesConfigError::EmptyRange {
                name: "crop_grow_secs",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bad_scalars() {
        let zero_radius = RulesConfig {
            hydration_radius: 0,
            ..RulesConfig::default()
        };
        assert_eq!(
            zero_radius.validate(),
            Err(RulesConfigError::ZeroHydrationRadius)
        );

        let huge_radius = RulesConfig {
            hydration_radius: u32::MAX,
            ..RulesConfig::default()
        };
        assert_eq!(
            huge_radius.validate(),
            Err(RulesConfigError::HydrationRadiusTooLarge(u32::MAX))
        );
        let widest = RulesConfig {
            hydration_radius: MAX_WORLD_SIZE,
            ..RulesConfig::default()
        };
        assert!(widest.validate().is_ok());

        let negative = RulesConfig {
            farmland_revert_secs: -1.0,
            ..RulesConfig::default()
        };
        assert!(negative.validate().is_err());

        let chance = RulesConfig {
            harvest_bonus_chance: 1.5,
            ..RulesConfig::default()
        };
        assert_eq!(chance.validate(), Err(RulesConfigError::BonusChance(1.5)));
    }

    #[test]
    fn samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let range = TimeRange::new(10.0, 20.0);
        for _ in 0..1000 {
            assert!(range.contains(range.sample(&mut rng)));
        }
        assert_eq!(TimeRange::new(5.0, 5.0).sample(&mut rng), 5.0);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: RulesConfig =
            serde_json::from_str(r#"{"hydration_metric":"chebyshev"}"#).unwrap();
        assert_eq!(config.hydration_metric, HydrationMetric::Chebyshev);
        assert_eq!(config.hydration_radius, 4);
        assert_eq!(config.growth_model, GrowthModel::Proportional);
    }
}
