#![warn(missing_docs)]
//! Physics primitives (AABB, voxel collisions, movement integration).

use glam::Vec3;

/// Read-only solidity query answered by a voxel grid.
pub trait VoxelSolidity {
    /// Whether the unit cell at `(x, y, z)` stops a moving body.
    fn blocks_movement(&self, x: i32, y: i32, z: i32) -> bool;
}

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (x, y, z).
    pub min: Vec3,
    /// Maximum corner (x, y, z).
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Self { min, max }
    }

    /// Box of a unit voxel cell.
    pub fn cell(x: i32, y: i32, z: i32) -> Self {
        let min = Vec3::new(x as f32, y as f32, z as f32);
        Self::new(min, min + Vec3::ONE)
    }

    /// Tests strict intersection with another AABB; touching faces do not count.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }
}

/// Collision shape of an upright body anchored at its feet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyShape {
    /// Half of the body width on X and Z.
    pub half_width: f32,
    /// Body height above the feet.
    pub height: f32,
}

impl BodyShape {
    /// Bounding box of the body standing with its feet at `feet`.
    pub fn aabb_at(&self, feet: Vec3) -> Aabb {
        Aabb::new(
            Vec3::new(feet.x - self.half_width, feet.y, feet.z - self.half_width),
            Vec3::new(
                feet.x + self.half_width,
                feet.y + self.height,
                feet.z + self.half_width,
            ),
        )
    }
}

/// Returns true if `aabb` overlaps any cell that blocks movement.
pub fn collides<W: VoxelSolidity + ?Sized>(world: &W, aabb: &Aabb) -> bool {
    let lo = aabb.min.floor().as_ivec3();
    let hi = aabb.max.floor().as_ivec3();

    for y in lo.y..=hi.y {
        for z in lo.z..=hi.z {
            for x in lo.x..=hi.x {
                if world.blocks_movement(x, y, z) && aabb.intersects(&Aabb::cell(x, y, z)) {
                    return true;
                }
            }
        }
    }
    false
}

/// Outcome of one movement step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Feet position after the step.
    pub position: Vec3,
    /// Velocity after collision response (blocked axes are zeroed).
    pub velocity: Vec3,
    /// Whether a downward move was stopped by the ground.
    pub on_ground: bool,
}

/// Integrate `velocity * dt` one axis at a time (X, then Z, then Y).
///
/// An axis whose move would overlap a blocking cell is reverted and its velocity zeroed.
pub fn move_and_collide<W: VoxelSolidity + ?Sized>(
    world: &W,
    shape: &BodyShape,
    position: Vec3,
    velocity: Vec3,
    dt: f32,
) -> MoveResult {
    let mut next = position;
    let mut vel = velocity;

    next.x += vel.x * dt;
    if collides(world, &shape.aabb_at(next)) {
        next.x = position.x;
        vel.x = 0.0;
    }

    next.z += vel.z * dt;
    if collides(world, &shape.aabb_at(next)) {
        next.z = position.z;
        vel.z = 0.0;
    }

    let mut on_ground = false;
    next.y += vel.y * dt;
    if collides(world, &shape.aabb_at(next)) {
        if vel.y < 0.0 {
            on_ground = true;
        }
        next.y = position.y;
        vel.y = 0.0;
    }

    MoveResult {
        position: next,
        velocity: vel,
        on_ground,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Solid floor at y <= 1 plus a single wall cell.
    struct Floor {
        wall: Option<(i32, i32, i32)>,
    }

    impl VoxelSolidity for Floor {
        fn blocks_movement(&self, x: i32, y: i32, z: i32) -> bool {
            y <= 1 || self.wall == Some((x, y, z))
        }
    }

    const SHAPE: BodyShape = BodyShape {
        half_width: 0.3,
        height: 1.8,
    };

    #[test]
    fn touching_faces_do_not_intersect() {
        let a = Aabb::cell(0, 0, 0);
        let b = Aabb::cell(1, 0, 0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Aabb::new(Vec3::splat(0.5), Vec3::splat(1.5))));
    }

    #[test]
    fn standing_on_floor_does_not_collide() {
        let world = Floor { wall: None };
        assert!(!collides(&world, &SHAPE.aabb_at(Vec3::new(5.5, 2.0, 5.5))));
        assert!(collides(&world, &SHAPE.aabb_at(Vec3::new(5.5, 1.9, 5.5))));
    }

    #[test]
    fn falling_body_lands() {
        let world = Floor { wall: None };
        let res = move_and_collide(
            &world,
            &SHAPE,
            Vec3::new(5.5, 2.0, 5.5),
            Vec3::new(0.0, -5.0, 0.0),
            0.05,
        );
        assert!(res.on_ground);
        assert_eq!(res.position.y, 2.0);
        assert_eq!(res.velocity.y, 0.0);
    }

    #[test]
    fn wall_blocks_only_its_axis() {
        let world = Floor {
            wall: Some((6, 2, 5)),
        };
        let start = Vec3::new(5.6, 2.0, 5.5);
        let res = move_and_collide(&world, &SHAPE, start, Vec3::new(4.0, 0.0, 2.0), 0.05);
        assert_eq!(res.position.x, start.x);
        assert_eq!(res.velocity.x, 0.0);
        assert!((res.position.z - 5.6).abs() < 1e-5);
        assert_eq!(res.velocity.z, 2.0);
    }
}
