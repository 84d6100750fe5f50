//! Player kinematics: wish-velocity steering, gravity, jumping and AABB collision.

use crate::grid::World;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use voxfarm_physics::{move_and_collide, BodyShape};

/// Collision shape of the player, anchored at the feet.
pub const PLAYER_SHAPE: BodyShape = BodyShape {
    half_width: 0.3,
    height: 1.8,
};
/// Downward acceleration.
pub const GRAVITY: f32 = 24.0;
/// Upward velocity applied by a jump.
pub const JUMP_VELOCITY: f32 = 8.5;
/// Horizontal target speed while walking.
pub const WALK_SPEED: f32 = 4.3;
/// Horizontal target speed while sprinting.
pub const SPRINT_SPEED: f32 = 6.2;
/// Steering rate toward the wish velocity.
pub const ACCELERATION: f32 = 40.0;
/// Fraction of steering available while airborne.
pub const AIR_CONTROL: f32 = 0.35;
/// Horizontal friction on the ground.
pub const FRICTION_GROUND: f32 = 12.0;
/// Horizontal friction in the air.
pub const FRICTION_AIR: f32 = 1.5;
/// Feet never sink below the top of the mutable layer.
pub const FLOOR_Y: f32 = 2.0;

/// Movement intent for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveInput {
    /// Forward (+) / backward (-) axis in `[-1, 1]`.
    pub forward: f32,
    /// Right (+) / left (-) axis in `[-1, 1]`.
    pub strafe: f32,
    /// Use sprint speed.
    pub sprint: bool,
    /// Jump if standing on the ground.
    pub jump: bool,
}

/// The player body.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Feet position.
    pub position: Vec3,
    /// Velocity in blocks per second.
    pub velocity: Vec3,
    /// Standing on something.
    pub on_ground: bool,
    /// Heading in radians; zero looks toward -Z.
    pub yaw: f32,
}

impl Player {
    /// Spawn standing at `feet`.
    pub fn new(feet: Vec3) -> Self {
        Self {
            position: feet,
            velocity: Vec3::ZERO,
            on_ground: false,
            yaw: 0.0,
        }
    }

    /// Spawn at the center of the island.
    pub fn spawn_on(world: &World) -> Self {
        Self::new(Vec3::new(
            (world.size_x() / 2) as f32 + 0.5,
            FLOOR_Y,
            (world.size_z() / 2) as f32 + 0.5,
        ))
    }

    /// Horizontal forward direction for the current yaw.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal right direction for the current yaw.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Target horizontal velocity for `input`.
    pub fn wish_velocity(&self, input: &MoveInput) -> Vec2 {
        let dir = self.forward() * input.forward + self.right() * input.strafe;
        let dir = Vec2::new(dir.x, dir.z).normalize_or_zero();
        let speed = if input.sprint {
            SPRINT_SPEED
        } else {
            WALK_SPEED
        };
        dir * speed
    }

    /// Integrate one tick of movement against the world.
    pub fn step(&mut self, world: &World, input: &MoveInput, dt: f32) {
        let wish = self.wish_velocity(input);

        let accel = if self.on_ground {
            ACCELERATION
        } else {
            ACCELERATION * AIR_CONTROL
        };
        let blend = (accel * dt).min(1.0);
        self.velocity.x += (wish.x - self.velocity.x) * blend;
        self.velocity.z += (wish.y - self.velocity.z) * blend;

        let friction = if self.on_ground {
            FRICTION_GROUND
        } else {
            FRICTION_AIR
        };
        let keep = (1.0 - friction * dt).max(0.0);
        self.velocity.x *= keep;
        self.velocity.z *= keep;

        self.velocity.y -= GRAVITY * dt;
        if self.on_ground && input.jump {
            self.velocity.y = JUMP_VELOCITY;
            self.on_ground = false;
        }

        let moved = move_and_collide(world, &PLAYER_SHAPE, self.position, self.velocity, dt);
        self.position = moved.position;
        self.velocity = moved.velocity;
        self.on_ground = moved.on_ground;

        if self.position.y < FLOOR_Y {
            self.position.y = FLOOR_Y;
            self.velocity.y = 0.0;
            self.on_ground = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use crate::config::RulesConfig;

    fn island() -> World {
        World::flat_island(16, 16, 1, RulesConfig::default())
    }

    fn settle(player: &mut Player, world: &World) {
        for _ in 0..10 {
            player.step(world, &MoveInput::default(), 0.05);
        }
    }

    #[test]
    fn spawns_at_center() {
        let world = island();
        let player = Player::spawn_on(&world);
        assert_eq!(player.position, Vec3::new(8.5, 2.0, 8.5));
    }

    #[test]
    fn standing_player_lands() {
        let world = island();
        let mut player = Player::spawn_on(&world);
        settle(&mut player, &world);
        assert!(player.on_ground);
        assert_eq!(player.position.y, FLOOR_Y);
    }

    #[test]
    fn walking_forward_moves_toward_negative_z() {
        let world = island();
        let mut player = Player::spawn_on(&world);
        settle(&mut player, &world);
        let input = MoveInput {
            forward: 1.0,
            ..MoveInput::default()
        };
        for _ in 0..10 {
            player.step(&world, &input, 0.05);
        }
        assert!(player.position.z < 8.5);
        assert!((player.position.x - 8.5).abs() < 1e-4);
    }

    #[test]
    fn sprint_is_faster_than_walk() {
        let world = island();
        let mut walker = Player::spawn_on(&world);
        let mut sprinter = Player::spawn_on(&world);
        settle(&mut walker, &world);
        settle(&mut sprinter, &world);
        let walk = MoveInput {
            strafe: 1.0,
            ..MoveInput::default()
        };
        let sprint = MoveInput {
            sprint: true,
            ..walk
        };
        for _ in 0..10 {
            walker.step(&world, &walk, 0.05);
            sprinter.step(&world, &sprint, 0.05);
        }
        assert!(sprinter.position.x > walker.position.x);
        assert!(walker.position.x > 8.5);
    }

    #[test]
    fn jump_leaves_the_ground_and_returns() {
        let world = island();
        let mut player = Player::spawn_on(&world);
        settle(&mut player, &world);
        let jump = MoveInput {
            jump: true,
            ..MoveInput::default()
        };
        player.step(&world, &jump, 0.05);
        assert!(!player.on_ground);
        assert!(player.position.y > FLOOR_Y);
        for _ in 0..40 {
            player.step(&world, &MoveInput::default(), 0.05);
        }
        assert!(player.on_ground);
        assert_eq!(player.position.y, FLOOR_Y);
    }

    #[test]
    fn floor_clamp_holds_over_holes_and_water() {
        let mut world = island();
        world.set_block(8, 1, 8, BlockKind::Air);
        world.set_block(9, 1, 8, BlockKind::Water);

        let mut player = Player::spawn_on(&world);
        settle(&mut player, &world);
        assert!(player.on_ground);
        assert_eq!(player.position.y, FLOOR_Y);

        player.position.x = 9.5;
        settle(&mut player, &world);
        assert!(player.on_ground);
        assert_eq!(player.position.y, FLOOR_Y);
    }
}
