//! World simulation core for the voxel farming sandbox.
//!
//! The grid is a fixed two-layer island: `y = 0` is permanent subsoil and `y = 1` is the
//! single mutable layer. Everything that changes over time (grass regrowth, farmland decay,
//! crop growth) lives in [`World`] and is advanced by [`World::update`].

mod block;
mod config;
mod drop_item;
mod farming;
mod grid;
mod interaction;
mod inventory;
mod player;
mod rules;
mod session;
mod time;

pub use block::*;
pub use config::*;
pub use drop_item::*;
pub use farming::*;
pub use grid::*;
pub use interaction::*;
pub use inventory::*;
pub use player::*;
pub use session::*;
pub use time::*;

/// RNG domain for the world rules stream (regrow delays, grow times).
pub const RNG_DOMAIN_RULES: u64 = 1;
/// RNG domain for dropped item scatter.
pub const RNG_DOMAIN_DROPS: u64 = 2;
/// RNG domain for harvest loot rolls.
pub const RNG_DOMAIN_LOOT: u64 = 3;
