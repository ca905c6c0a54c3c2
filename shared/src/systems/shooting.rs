use crate::action::Action;
use crate::dispatch::dispatch;
use crate::world::World;

/// Cools weapons down and fires one round for every entity holding shoot
/// with a ready weapon. The bullet itself is created by dispatching
/// `ShootBullet`, the same path a remote shot takes.
pub fn run(world: &mut World) {
    let delta = world.clock.delta;

    for id in world.awake_ids() {
        let Some(entity) = world.entity_mut(&id) else {
            continue;
        };
        let shooting = entity.controller.map(|c| c.inputs.shoot).unwrap_or(false);
        let Some(weapon) = entity.weapon.as_mut() else {
            continue;
        };

        weapon.firerate_timer = (weapon.firerate_timer - delta).max(0.0);
        if !shooting || !weapon.can_fire() {
            continue;
        }
        weapon.loaded_ammo -= 1;
        weapon.firerate_timer = weapon.kind.firerate;

        dispatch(world, &Action::ShootBullet { id });
    }
}
