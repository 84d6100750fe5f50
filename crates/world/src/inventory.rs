//! Hotbar inventory: nine stack slots and a selected index.
//!
//! Counts never exceed the item's max stack size and a slot that reaches zero is cleared.

use serde::{Deserialize, Serialize};
use voxfarm_core::ItemKind;

/// Number of hotbar slots.
pub const HOTBAR_SIZE: usize = 9;

/// Represents a stack of items in an inventory slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Item kind.
    pub item: ItemKind,
    /// Number of items in this stack.
    pub count: u32,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(item: ItemKind, count: u32) -> Self {
        Self { item, count }
    }

    /// Get the maximum stack size for this item.
    pub fn max_stack_size(&self) -> u32 {
        self.item.max_stack_size()
    }

    /// Check if this stack is at max capacity.
    pub fn is_full(&self) -> bool {
        self.count >= self.max_stack_size()
    }

    /// Get remaining space in this stack.
    pub fn remaining_space(&self) -> u32 {
        self.max_stack_size().saturating_sub(self.count)
    }

    /// Try to add items to this stack, returning the amount that didn't fit.
    pub fn add(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.remaining_space());
        self.count += added;
        amount - added
    }
}

/// The player's hotbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: [Option<ItemStack>; HOTBAR_SIZE],
    selected: usize,
}

impl Inventory {
    /// Create an empty inventory with slot 0 selected.
    pub fn new() -> Self {
        Self {
            slots: [None; HOTBAR_SIZE],
            selected: 0,
        }
    }

    /// Spawn loadout: empty bucket, hoe, shovel, five wheat seeds.
    pub fn with_starting_loadout() -> Self {
        let mut inv = Self::new();
        inv.slots[0] = Some(ItemStack::new(ItemKind::BucketEmpty, 1));
        inv.slots[1] = Some(ItemStack::new(ItemKind::HoeWood, 1));
        inv.slots[2] = Some(ItemStack::new(ItemKind::ShovelWood, 1));
        inv.slots[3] = Some(ItemStack::new(ItemKind::SeedsWheat, 5));
        inv
    }

    /// All slots in order.
    pub fn slots(&self) -> &[Option<ItemStack>; HOTBAR_SIZE] {
        &self.slots
    }

    /// Get the stack in a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Index of the selected slot.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Stack in the selected slot.
    pub fn selected(&self) -> Option<&ItemStack> {
        self.slots[self.selected].as_ref()
    }

    /// Item kind in the selected slot.
    pub fn selected_item(&self) -> Option<ItemKind> {
        self.selected().map(|stack| stack.item)
    }

    /// Add items, topping up matching stacks first and then filling empty slots.
    /// Returns the count that did not fit.
    pub fn add_item(&mut self, item: ItemKind, count: u32) -> u32 {
        let mut remaining = count;

        // First pass: merge into existing stacks.
        for existing in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                return 0;
            }
            if existing.item == item && !existing.is_full() {
                remaining = existing.add(remaining);
            }
        }

        // Second pass: open new stacks in empty slots.
        let max = item.max_stack_size();
        for slot in &mut self.slots {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let placed = remaining.min(max);
                *slot = Some(ItemStack::new(item, placed));
                remaining -= placed;
            }
        }

        remaining
    }

    /// Remove `n` items from the selected slot. Fails without mutation if it holds fewer.
    pub fn consume_selected(&mut self, n: u32) -> bool {
        let Some(stack) = self.slots[self.selected].as_mut() else {
            return false;
        };
        if stack.count < n {
            return false;
        }
        stack.count -= n;
        if stack.count == 0 {
            self.slots[self.selected] = None;
        }
        true
    }

    /// Overwrite the selected slot. Counts are clamped to the max stack; zero empties it.
    pub fn replace_selected(&mut self, item: ItemKind, count: u32) {
        let count = count.min(item.max_stack_size());
        self.slots[self.selected] = if count == 0 {
            None
        } else {
            Some(ItemStack::new(item, count))
        };
    }

    /// Select a slot, wrapping modulo the hotbar size.
    pub fn select_slot(&mut self, index: usize) {
        self.selected = index % HOTBAR_SIZE;
    }

    /// Move the selection by `delta`, wrapping around the hotbar.
    pub fn scroll_slot(&mut self, delta: i32) {
        let size = HOTBAR_SIZE as i64;
        self.selected = (self.selected as i64 + i64::from(delta)).rem_euclid(size) as usize;
    }

    /// Count the total number of a specific item in the inventory.
    pub fn count_item(&self, item: ItemKind) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item == item)
            .map(|stack| stack.count)
            .sum()
    }

    /// Number of empty slots.
    pub fn empty_slots(&self) -> usize {
        self.slots.iter().filter(|s| s.is_none()).count()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_stack_overflow() {
        let mut stack = ItemStack::new(ItemKind::Wheat, 60);
        let remainder = stack.add(10);

        assert_eq!(remainder, 6); // Only 4 could fit
        assert_eq!(stack.count, 64);
        assert!(stack.is_full());
    }

    #[test]
    fn starting_loadout() {
        let inv = Inventory::with_starting_loadout();
        assert_eq!(inv.selected_item(), Some(ItemKind::BucketEmpty));
        assert_eq!(inv.get(1).map(|s| s.item), Some(ItemKind::HoeWood));
        assert_eq!(inv.get(2).map(|s| s.item), Some(ItemKind::ShovelWood));
        assert_eq!(inv.get(3), Some(&ItemStack::new(ItemKind::SeedsWheat, 5)));
        assert_eq!(inv.empty_slots(), 5);
    }

    #[test]
    fn add_tops_up_before_new_slots() {
        let mut inv = Inventory::new();
        inv.slots[4] = Some(ItemStack::new(ItemKind::Wheat, 60));

        assert_eq!(inv.add_item(ItemKind::Wheat, 10), 0);
        assert_eq!(inv.get(4).unwrap().count, 64);
        assert_eq!(inv.get(0).unwrap().count, 6);
    }

    #[test]
    fn tools_take_one_slot_each() {
        let mut inv = Inventory::new();
        assert_eq!(inv.add_item(ItemKind::HoeWood, 3), 0);
        assert_eq!(inv.count_item(ItemKind::HoeWood), 3);
        assert_eq!(inv.empty_slots(), 6);
    }

    #[test]
    fn full_inventory_returns_remainder() {
        let mut inv = Inventory::new();
        assert_eq!(inv.add_item(ItemKind::DirtItem, 64 * 9), 0);
        assert_eq!(inv.add_item(ItemKind::DirtItem, 5), 5);
        assert_eq!(inv.add_item(ItemKind::Wheat, 1), 1);
        assert!(inv.slots().iter().flatten().all(|s| s.count == 64));
    }

    #[test]
    fn consume_selected_is_all_or_nothing() {
        let mut inv = Inventory::with_starting_loadout();
        inv.select_slot(3);
        assert!(!inv.consume_selected(6));
        assert_eq!(inv.selected().unwrap().count, 5);
        assert!(inv.consume_selected(4));
        assert!(inv.consume_selected(1));
        assert!(inv.selected().is_none());
        assert!(!inv.consume_selected(1));
    }

    #[test]
    fn replace_selected_swaps_tools() {
        let mut inv = Inventory::with_starting_loadout();
        inv.replace_selected(ItemKind::BucketWater, 1);
        assert_eq!(inv.selected_item(), Some(ItemKind::BucketWater));
        inv.replace_selected(ItemKind::BucketEmpty, 7);
        assert_eq!(inv.selected().unwrap().count, 1);
        inv.replace_selected(ItemKind::Wheat, 0);
        assert!(inv.selected().is_none());
    }

    #[test]
    fn selection_wraps() {
        let mut inv = Inventory::new();
        inv.select_slot(10);
        assert_eq!(inv.selected_index(), 1);
        inv.scroll_slot(-1);
        assert_eq!(inv.selected_index(), 0);
        inv.scroll_slot(-1);
        assert_eq!(inv.selected_index(), 8);
        inv.scroll_slot(1);
        assert_eq!(inv.selected_index(), 0);
    }
}
