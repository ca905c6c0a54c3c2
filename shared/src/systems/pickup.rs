//! Collects pickups that controlled entities walk into.
//!
//! Each controlled entity consumes at most one pickup per tick: the first
//! overlapping pickup in id order. It is destroyed even when none of its
//! effects applies to the collector.

use crate::components::{Jetpack, PickupEffect};
use crate::entity::{Entity, Group};
use crate::world::World;

pub fn run(world: &mut World) {
    let pickups: Vec<_> = world
        .ids_in_group(Group::Pickup)
        .into_iter()
        .filter_map(|id| {
            let pickup = world.entity(&id);
            Some((id, pickup.bounds()?, pickup.pickup?))
        })
        .collect();
    if pickups.is_empty() {
        return;
    }

    for id in world.awake_ids() {
        let collector = world.entity(&id);
        if collector.controller.is_none() {
            continue;
        }
        let Some(bounds) = collector.bounds() else {
            continue;
        };

        for (pickup_id, pickup_bounds, effect) in &pickups {
            if !world.contains(pickup_id) || !bounds.overlaps(pickup_bounds) {
                continue;
            }
            let Some(collector) = world.entity_mut(&id) else {
                break;
            };
            apply(collector, effect);
            world.remove_entity(pickup_id);
            break;
        }
    }
}

/// Applies the first effect that makes sense for `entity`: granting a
/// jetpack, then topping up reserve ammo, then raising health.
fn apply(entity: &mut Entity, effect: &PickupEffect) {
    if effect.jetpack && entity.jetpack.is_none() {
        entity.jetpack = Some(Jetpack::full());
        return;
    }
    if effect.ammo > 0 {
        if let Some(weapon) = entity.weapon.as_mut() {
            weapon.add_reserve(effect.ammo);
            return;
        }
    }
    if effect.hp > 0 {
        if let Some(health) = entity.health.as_mut() {
            health.max += effect.hp;
            health.hp += effect.hp;
        }
    }
}
