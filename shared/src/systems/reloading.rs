use crate::world::World;

/// Starts and completes reloads.
///
/// A reload starts when the weapon is idle, there is reserve ammo, and
/// either reload is held or the magazine is empty. Starting consumes the
/// reload input. On completion the timer is zeroed before ammo moves, so a
/// weapon never reports reloading with a full transfer already applied.
pub fn run(world: &mut World) {
    let delta = world.clock.delta;

    for id in world.awake_ids() {
        let Some(entity) = world.entity_mut(&id) else {
            continue;
        };
        let Some(weapon) = entity.weapon.as_mut() else {
            continue;
        };

        if weapon.is_reloading() {
            weapon.reload_timer -= delta;
            if weapon.reload_timer <= 0.0 {
                weapon.reload_timer = 0.0;
                let amount = weapon.reload_amount();
                weapon.loaded_ammo += amount;
                weapon.reserved_ammo -= amount;
            }
            continue;
        }

        let requested = entity.controller.map(|c| c.inputs.reload).unwrap_or(false);
        if weapon.reserved_ammo == 0 || !(requested || weapon.loaded_ammo == 0) {
            continue;
        }

        if weapon.kind.reload_speed > 0.0 {
            weapon.reload_timer = weapon.kind.reload_speed;
        } else {
            let amount = weapon.reload_amount();
            weapon.loaded_ammo += amount;
            weapon.reserved_ammo -= amount;
        }
        if let Some(controller) = entity.controller.as_mut() {
            controller.inputs.reload = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, InputName};
    use crate::components::Weapon;
    use crate::dispatch::dispatch;
    use crate::entity::Entity;
    use crate::math::Vec3;

    fn world_with_weapon(loaded: u32, reserved: u32) -> World {
        let mut world = World::empty(0);
        let mut player = Entity::player(Vec3::new(0.0, 1.0, 0.0));
        let weapon = player.weapon.as_mut().unwrap();
        weapon.loaded_ammo = loaded;
        weapon.reserved_ammo = reserved;
        world.add_entity("p".into(), player);
        world.clock.delta = 16.0;
        world
    }

    fn weapon(world: &World) -> Weapon {
        world.entity(&"p".into()).weapon.clone().unwrap()
    }

    #[test]
    fn test_empty_magazine_auto_reloads() {
        let mut world = world_with_weapon(0, 30);
        run(&mut world);
        let w = weapon(&world);
        assert!(w.is_reloading());
        assert_eq!(w.reload_timer, w.kind.reload_speed);

        world.clock.delta = w.kind.reload_speed;
        run(&mut world);
        let w = weapon(&world);
        assert!(!w.is_reloading());
        assert_eq!(w.loaded_ammo, 30);
        assert_eq!(w.reserved_ammo, 0);
    }

    #[test]
    fn test_partial_reserve_transfer() {
        let mut world = world_with_weapon(20, 4);
        dispatch(&mut world, &Action::set_input("p", InputName::Reload, true));
        run(&mut world);
        assert!(!world.entity(&"p".into()).controller.unwrap().inputs.reload);

        world.clock.delta = 2000.0;
        run(&mut world);
        let w = weapon(&world);
        assert_eq!(w.loaded_ammo, 24);
        assert_eq!(w.reserved_ammo, 0);
        assert_eq!(w.reload_timer, 0.0);
    }

    #[test]
    fn test_no_reload_without_reserve() {
        let mut world = world_with_weapon(0, 0);
        dispatch(&mut world, &Action::set_input("p", InputName::Reload, true));
        run(&mut world);
        assert!(!weapon(&world).is_reloading());
    }

    #[test]
    fn test_full_magazine_waits_for_input() {
        let mut world = world_with_weapon(30, 60);
        run(&mut world);
        assert!(!weapon(&world).is_reloading());
    }

    #[test]
    fn test_reload_counts_down() {
        let mut world = world_with_weapon(0, 30);
        run(&mut world);
        run(&mut world);
        let w = weapon(&world);
        assert_eq!(w.reload_timer, w.kind.reload_speed - 16.0);
        assert_eq!(w.loaded_ammo, 0);
    }
}
