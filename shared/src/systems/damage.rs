//! Resolves projectile hits.
//!
//! A projectile overlapping any controlled entity other than its creator
//! marks its collider as hit and subtracts its damage from the target's
//! health. Targets at zero health are removed on the spot. A projectile
//! whose collider reports any contact, with a wall flag from last tick's
//! physics or a hit from this pass, is removed at the end of its scan.

use crate::entity::Group;
use crate::world::World;

pub fn run(world: &mut World) {
    let targets = world.ids_in_group(Group::Player);

    for bullet_id in world.ids_in_group(Group::Bullet) {
        let bullet = world.entity(&bullet_id);
        if bullet.asleep {
            continue;
        }
        let (Some(bounds), Some(damage)) = (bullet.bounds(), bullet.damage.clone()) else {
            continue;
        };

        let mut hit = false;
        for target_id in &targets {
            if *target_id == damage.creator {
                continue;
            }
            let Some(target) = world.entity_mut(target_id) else {
                continue;
            };
            if !target.bounds().is_some_and(|b| b.overlaps(&bounds)) {
                continue;
            }

            hit = true;
            if let Some(health) = target.health.as_mut() {
                health.hp -= damage.amount;
                if health.is_depleted() {
                    world.remove_entity(target_id);
                }
            }
        }

        let Some(bullet) = world.entity_mut(&bullet_id) else {
            continue;
        };
        let touching = match bullet.collider.as_mut() {
            Some(collider) => {
                collider.hit |= hit;
                collider.is_touching()
            }
            None => hit,
        };
        if touching {
            world.remove_entity(&bullet_id);
        }
    }
}
