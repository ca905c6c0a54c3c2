//! Integrates velocity and resolves wall collisions.
//!
//! Movement is resolved one axis at a time in Y, X, Z order. After moving
//! along an axis the entity's box is tested against every wall; an overlap
//! pushes the entity back out through the face on the side its center came
//! from, zeroes that velocity component and records the contact on the
//! collider. The ground plane at y = 0 acts as an implicit wall under every
//! collidable entity.
//!
//! Entities without a collider are integrated but never pushed.

use crate::components::{AxisContact, Collider};
use crate::entity::{Entity, Group};
use crate::math::{Aabb, Axis, Vec3};
use crate::world::World;

/// Axis resolution order.
pub const AXES: [Axis; 3] = [Axis::Y, Axis::X, Axis::Z];

/// Gap left between a pushed-out entity and the face it touched, so that
/// rounding never leaves it overlapping on the next axis.
const SKIN: f32 = 1e-4;

pub fn run(world: &mut World) {
    let delta = world.clock.delta;
    let walls: Vec<Aabb> = world
        .ids_in_group(Group::Wall)
        .iter()
        .filter_map(|id| world.entity(id).bounds())
        .collect();

    for id in world.awake_ids() {
        if let Some(entity) = world.entity_mut(&id) {
            step(entity, &walls, delta);
        }
    }
}

fn step(entity: &mut Entity, walls: &[Aabb], delta: f32) {
    let Entity {
        transform,
        velocity,
        collider,
        ..
    } = entity;
    let (Some(transform), Some(velocity)) = (transform.as_mut(), velocity.as_mut()) else {
        return;
    };
    if let Some(collider) = collider.as_mut() {
        collider.reset();
    }

    for axis in AXES {
        let before = transform.position.get(axis);
        transform
            .position
            .set(axis, before + velocity.get(axis) * delta);

        let Some(collider) = collider.as_mut() else {
            continue;
        };
        for wall in walls {
            let bounds = Aabb::from_center(transform.position, transform.scale);
            if !bounds.overlaps(wall) {
                continue;
            }
            let half = transform.scale.get(axis) / 2.0;
            let center = (wall.min.get(axis) + wall.max.get(axis)) / 2.0;
            let (pushed, contact) = if before < center {
                (wall.min.get(axis) - half - SKIN, AxisContact::Positive)
            } else {
                (wall.max.get(axis) + half + SKIN, AxisContact::Negative)
            };
            transform.position.set(axis, pushed);
            velocity.set(axis, 0.0);
            collider.set(axis, contact);
        }

        if axis == Axis::Y {
            land(&mut transform.position, velocity, transform.scale.y / 2.0, collider);
        }
    }
}

fn land(position: &mut Vec3, velocity: &mut Vec3, half_height: f32, collider: &mut Collider) {
    if position.y - half_height < 0.0 {
        position.y = half_height;
        velocity.y = velocity.y.max(0.0);
        collider.y = AxisContact::Negative;
    }
}
