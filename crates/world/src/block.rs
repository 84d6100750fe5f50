//! Block kinds and their static properties

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The fixed block palette of the island.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// Empty cell.
    #[default]
    Air,
    /// Permanent bottom layer.
    Subsoil,
    /// Bare dirt; regrows into grass.
    Dirt,
    /// Grass-topped dirt.
    Grass,
    /// Tilled soil that holds crops while hydrated.
    Farmland,
    /// The infinite, indestructible water source.
    WaterSource,
    /// Placed water.
    Water,
}

/// Static properties of a block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockProperties {
    /// Occupies its cell for placement and targeting.
    pub solid: bool,
    /// Can be removed by the primary action.
    pub breakable: bool,
}

impl BlockKind {
    /// All block kinds in palette order.
    pub const ALL: [BlockKind; 7] = [
        BlockKind::Air,
        BlockKind::Subsoil,
        BlockKind::Dirt,
        BlockKind::Grass,
        BlockKind::Farmland,
        BlockKind::WaterSource,
        BlockKind::Water,
    ];

    /// Get the static properties for this block.
    ///
    /// Water is marked solid here; collision treats it as passable (see [`BlockKind::blocks_movement`]).
    pub fn properties(self) -> BlockProperties {
        match self {
            BlockKind::Air => BlockProperties {
                solid: false,
                breakable: false,
            },
            BlockKind::Subsoil | BlockKind::WaterSource => BlockProperties {
                solid: true,
                breakable: false,
            },
            BlockKind::Dirt | BlockKind::Grass | BlockKind::Farmland | BlockKind::Water => {
                BlockProperties {
                    solid: true,
                    breakable: true,
                }
            }
        }
    }

    /// Occupies its cell (placement/targeting sense).
    pub fn is_solid(self) -> bool {
        self.properties().solid
    }

    /// Can be broken by the primary action.
    pub fn is_breakable(self) -> bool {
        self.properties().breakable
    }

    /// Stops a moving body. Water is occupied but passable.
    pub fn blocks_movement(self) -> bool {
        self.is_solid() && self != BlockKind::Water
    }

    /// Counts as water for farmland hydration.
    pub fn is_water(self) -> bool {
        matches!(self, BlockKind::Water | BlockKind::WaterSource)
    }

    /// Breaking this block yields one dirt item.
    pub fn drops_dirt(self) -> bool {
        matches!(self, BlockKind::Grass | BlockKind::Dirt | BlockKind::Farmland)
    }

    /// Can be tilled into farmland.
    pub fn can_till(self) -> bool {
        matches!(self, BlockKind::Dirt | BlockKind::Grass)
    }

    /// Stable string key.
    pub fn key(self) -> &'static str {
        match self {
            BlockKind::Air => "air",
            BlockKind::Subsoil => "subsoil",
            BlockKind::Dirt => "dirt",
            BlockKind::Grass => "grass",
            BlockKind::Farmland => "farmland",
            BlockKind::WaterSource => "water_source",
            BlockKind::Water => "water",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when a block key does not name a known block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown block: {0}")]
pub struct BlockKindParseError(pub String);

impl FromStr for BlockKind {
    type Err = BlockKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        BlockKind::ALL
            .into_iter()
            .find(|kind| kind.key() == token)
            .ok_or_else(|| BlockKindParseError(s.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbreakable_blocks() {
        assert!(!BlockKind::Air.is_breakable());
        assert!(!BlockKind::Subsoil.is_breakable());
        assert!(!BlockKind::WaterSource.is_breakable());
        assert!(BlockKind::Water.is_breakable());
        assert!(BlockKind::Farmland.is_breakable());
    }

    #[test]
    fn water_is_occupied_but_passable() {
        assert!(BlockKind::Water.is_solid());
        assert!(!BlockKind::Water.blocks_movement());
        assert!(BlockKind::WaterSource.blocks_movement());
        assert!(!BlockKind::Air.blocks_movement());
    }

    #[test]
    fn dirt_like_blocks_drop_dirt() {
        assert!(BlockKind::Grass.drops_dirt());
        assert!(BlockKind::Dirt.drops_dirt());
        assert!(BlockKind::Farmland.drops_dirt());
        assert!(!BlockKind::Water.drops_dirt());
        assert!(!BlockKind::WaterSource.drops_dirt());
    }

    #[test]
    fn can_till() {
        assert!(BlockKind::Dirt.can_till());
        assert!(BlockKind::Grass.can_till());
        assert!(!BlockKind::Farmland.can_till());
        assert!(!BlockKind::Water.can_till());
    }

    #[test]
    fn keys_round_trip() {
        for kind in BlockKind::ALL {
            assert_eq!(kind.key().parse::<BlockKind>(), Ok(kind));
        }
        assert!("stone".parse::<BlockKind>().is_err());
    }
}
