//! A playable farming session: world, player, hotbar and dropped items driven by one clock.

use crate::config::{RulesConfig, RulesConfigError};
use crate::drop_item::ItemManager;
use crate::grid::World;
use crate::interaction::{self, PrimaryOutcome, Target, UseEffect};
use crate::inventory::Inventory;
use crate::player::{MoveInput, Player};
use crate::time::SimClock;
use crate::{RNG_DOMAIN_DROPS, RNG_DOMAIN_LOOT};
use rand::rngs::StdRng;
use tracing::{debug, info};
use voxfarm_core::{scoped_rng, ItemKind, SimTick};

/// What happened during one [`FarmSession::tick`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Clamped delta that was simulated.
    pub dt: f64,
    /// Items moved from the ground into the hotbar.
    pub picked_up: Vec<(ItemKind, u32)>,
}

/// Owns every piece of simulation state and runs them in tick order:
/// world rules, then player kinematics, then dropped items.
#[derive(Debug, Clone)]
pub struct FarmSession {
    world: World,
    player: Player,
    inventory: Inventory,
    drops: ItemManager,
    clock: SimClock,
    loot_rng: StdRng,
    seed: u64,
}

impl FarmSession {
    /// Generate a flat island and spawn the player at its center with the starting loadout.
    pub fn new(
        size_x: u32,
        size_z: u32,
        seed: u64,
        rules: RulesConfig,
    ) -> Result<Self, RulesConfigError> {
        rules.validate()?;
        let clock = SimClock::new(rules.max_tick_secs);
        let world = World::flat_island(size_x, size_z, seed, rules);
        let player = Player::spawn_on(&world);
        info!(
            seed,
            size_x = world.size_x(),
            size_z = world.size_z(),
            "farm session created"
        );
        Ok(Self {
            world,
            player,
            inventory: Inventory::with_starting_loadout(),
            drops: ItemManager::new(scoped_rng(seed, RNG_DOMAIN_DROPS)),
            clock,
            loot_rng: scoped_rng(seed, RNG_DOMAIN_LOOT),
            seed,
        })
    }

    /// Advance one frame of `raw_dt` seconds with the given movement intent.
    pub fn tick(&mut self, raw_dt: f64, input: &MoveInput) -> TickReport {
        let dt = self.clock.advance(raw_dt);
        self.world.update(dt, self.clock.elapsed);
        self.player.step(&self.world, input, dt as f32);
        self.drops.update(dt as f32);
        let picked_up = self
            .drops
            .pickup_into(self.player.position, &mut self.inventory);
        if !picked_up.is_empty() {
            debug!(tick = self.clock.tick.0, ?picked_up, "picked up drops");
        }
        TickReport { dt, picked_up }
    }

    /// Break or harvest the target, spawning any resulting drop above its cell.
    pub fn primary_action(&mut self, target: Option<&Target>) -> PrimaryOutcome {
        let outcome = interaction::primary_action(&mut self.world, target, &mut self.loot_rng);
        if let Some((item, count, cell)) = outcome.drop() {
            self.drops.spawn_above_cell(item, count, cell);
        }
        outcome
    }

    /// Use the selected hotbar item on the target.
    pub fn secondary_action(&mut self, target: Option<&Target>) -> Option<UseEffect> {
        interaction::secondary_action(&mut self.world, &mut self.inventory, target)
    }

    /// Select a hotbar slot (wraps modulo 9).
    pub fn select_slot(&mut self, index: usize) {
        self.inventory.select_slot(index);
    }

    /// Scroll the hotbar selection.
    pub fn scroll_slot(&mut self, delta: i32) {
        self.inventory.scroll_slot(delta);
    }

    /// World seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Current tick.
    pub fn current_tick(&self) -> SimTick {
        self.clock.tick
    }

    /// Clock state.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The grid.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable grid access for tooling (scripted setup, dirty-flag polling).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The player body.
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player access.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The hotbar.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable hotbar access.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Dropped items on the ground.
    pub fn drops(&self) -> &ItemManager {
        &self.drops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use glam::{IVec3, Vec3};

    fn session() -> FarmSession {
        FarmSession::new(16, 16, 77, RulesConfig::default()).unwrap()
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let rules = RulesConfig {
            hydration_radius: 0,
            ..RulesConfig::default()
        };
        assert!(FarmSession::new(16, 16, 1, rules).is_err());
    }

    #[test]
    fn tick_clamps_and_counts() {
        let mut session = session();
        let report = session.tick(0.5, &MoveInput::default());
        assert_eq!(report.dt, 0.05);
        assert_eq!(session.current_tick(), SimTick(1));
        assert_eq!(session.world().now(), 0.05);
    }

    #[test]
    fn broken_block_drop_is_collected_by_nearby_player() {
        let mut session = session();
        // player stands at (8.5, 2, 8.5)
        let target = Target::block(IVec3::new(8, 1, 9), Vec3::Y);
        let outcome = session.primary_action(Some(&target));
        assert_eq!(
            outcome,
            PrimaryOutcome::Broken {
                cell: IVec3::new(8, 1, 9),
                block: BlockKind::Grass
            }
        );
        assert_eq!(session.drops().count(), 1);

        for _ in 0..40 {
            session.tick(0.05, &MoveInput::default());
        }
        assert_eq!(session.drops().count(), 0);
        assert_eq!(session.inventory().count_item(ItemKind::DirtItem), 1);
    }

    #[test]
    fn far_drops_stay_on_ground() {
        let mut session = session();
        session.primary_action(Some(&Target::block(IVec3::new(1, 1, 1), Vec3::Y)));
        for _ in 0..40 {
            session.tick(0.05, &MoveInput::default());
        }
        assert_eq!(session.drops().count(), 1);
        assert_eq!(session.inventory().count_item(ItemKind::DirtItem), 0);
    }

    #[test]
    fn selection_goes_through_hotbar() {
        let mut session = session();
        session.select_slot(3);
        assert_eq!(
            session.inventory().selected_item(),
            Some(ItemKind::SeedsWheat)
        );
        session.scroll_slot(-4);
        assert_eq!(session.inventory().selected_index(), 8);
    }
}
