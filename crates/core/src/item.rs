//! Item kinds - tools, buckets, and stackable materials

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum stack size for stackable materials.
pub const MATERIAL_STACK_SIZE: u32 = 64;

/// Maximum stack size for tools and buckets.
pub const TOOL_STACK_SIZE: u32 = 1;

/// Every item that can occupy an inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// Empty bucket; fills from water.
    BucketEmpty,
    /// Bucket holding one water block.
    BucketWater,
    /// Wooden hoe; tills dirt and grass into farmland.
    HoeWood,
    /// Wooden shovel. Breaking is handled by the primary action, so it has no use.
    ShovelWood,
    /// Wheat seeds; planted on farmland.
    SeedsWheat,
    /// Dirt block item; placed into empty cells.
    DirtItem,
    /// Harvested wheat.
    Wheat,
}

impl ItemKind {
    /// All item kinds in registry order.
    pub const ALL: [ItemKind; 7] = [
        ItemKind::BucketEmpty,
        ItemKind::BucketWater,
        ItemKind::HoeWood,
        ItemKind::ShovelWood,
        ItemKind::SeedsWheat,
        ItemKind::DirtItem,
        ItemKind::Wheat,
    ];

    /// Stable string key used by scripts and logs.
    pub fn key(self) -> &'static str {
        match self {
            ItemKind::BucketEmpty => "bucket_empty",
            ItemKind::BucketWater => "bucket_water",
            ItemKind::HoeWood => "hoe_wood",
            ItemKind::ShovelWood => "shovel_wood",
            ItemKind::SeedsWheat => "seeds_wheat",
            ItemKind::DirtItem => "dirt_item",
            ItemKind::Wheat => "wheat",
        }
    }

    /// Human-readable name shown on the hotbar.
    pub fn display_name(self) -> &'static str {
        match self {
            ItemKind::BucketEmpty => "Empty Bucket",
            ItemKind::BucketWater => "Water Bucket",
            ItemKind::HoeWood => "Wooden Hoe",
            ItemKind::ShovelWood => "Wooden Shovel",
            ItemKind::SeedsWheat => "Wheat Seeds",
            ItemKind::DirtItem => "Dirt",
            ItemKind::Wheat => "Wheat",
        }
    }

    /// Tools and buckets never stack.
    pub fn is_tool(self) -> bool {
        matches!(
            self,
            ItemKind::BucketEmpty | ItemKind::BucketWater | ItemKind::HoeWood | ItemKind::ShovelWood
        )
    }

    /// Get the maximum stack size for this item kind.
    pub fn max_stack_size(self) -> u32 {
        if self.is_tool() {
            TOOL_STACK_SIZE
        } else {
            MATERIAL_STACK_SIZE
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when an item key does not name a known item.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item: {0}")]
pub struct ItemKindParseError(pub String);

impl FromStr for ItemKind {
    type Err = ItemKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        let kind = match token.as_str() {
            "bucket_empty" | "bucket" | "empty_bucket" => ItemKind::BucketEmpty,
            "bucket_water" | "water_bucket" => ItemKind::BucketWater,
            "hoe_wood" | "hoe" => ItemKind::HoeWood,
            "shovel_wood" | "shovel" => ItemKind::ShovelWood,
            "seeds_wheat" | "seeds" => ItemKind::SeedsWheat,
            "dirt_item" | "dirt" => ItemKind::DirtItem,
            "wheat" => ItemKind::Wheat,
            _ => return Err(ItemKindParseError(s.trim().to_string())),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tools_do_not_stack() {
        assert_eq!(ItemKind::BucketEmpty.max_stack_size(), 1);
        assert_eq!(ItemKind::BucketWater.max_stack_size(), 1);
        assert_eq!(ItemKind::HoeWood.max_stack_size(), 1);
        assert_eq!(ItemKind::ShovelWood.max_stack_size(), 1);
    }

    #[test]
    fn materials_stack_to_64() {
        assert_eq!(ItemKind::SeedsWheat.max_stack_size(), 64);
        assert_eq!(ItemKind::DirtItem.max_stack_size(), 64);
        assert_eq!(ItemKind::Wheat.max_stack_size(), 64);
    }

    #[test]
    fn keys_parse_back() {
        for kind in ItemKind::ALL {
            assert_eq!(kind.key().parse::<ItemKind>(), Ok(kind));
        }
    }

    #[test]
    fn aliases_and_unknown_keys() {
        assert_eq!("Hoe".parse::<ItemKind>(), Ok(ItemKind::HoeWood));
        assert_eq!(" seeds ".parse::<ItemKind>(), Ok(ItemKind::SeedsWheat));
        let err = "diamond".parse::<ItemKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown item: diamond");
    }

    #[test]
    fn serde_uses_snake_case_keys() {
        let json = serde_json::to_string(&ItemKind::BucketWater).unwrap();
        assert_eq!(json, "\"bucket_water\"");
    }
}
