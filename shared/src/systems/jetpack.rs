use crate::world::World;

/// Fuel drains at twice this rate while jump is held and refills at it
/// otherwise, per millisecond.
const FUEL_RATE: f32 = 1.0;

pub fn run(world: &mut World) {
    let delta = world.clock.delta;

    for id in world.awake_ids() {
        let Some(entity) = world.entity_mut(&id) else {
            continue;
        };
        let thrusting = entity.controller.map(|c| c.inputs.jump).unwrap_or(false);
        let Some(jetpack) = entity.jetpack.as_mut() else {
            continue;
        };

        let change = if thrusting {
            -2.0 * FUEL_RATE * delta
        } else {
            FUEL_RATE * delta
        };
        jetpack.set_fuel(jetpack.fuel + change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{Action, InputName};
    use crate::components::Jetpack;
    use crate::dispatch::dispatch;
    use crate::entity::Entity;
    use crate::math::Vec3;
    use crate::{JETPACK_MAX_FUEL, JETPACK_MIN_FUEL};

    fn world_with_jetpack(fuel: f32) -> World {
        let mut world = World::empty(0);
        let mut player = Entity::player(Vec3::new(0.0, 1.0, 0.0));
        let mut jetpack = Jetpack::full();
        jetpack.fuel = fuel;
        player.jetpack = Some(jetpack);
        world.add_entity("p".into(), player);
        world
    }

    fn fuel(world: &World) -> f32 {
        world.entity(&"p".into()).jetpack.unwrap().fuel
    }

    #[test]
    fn test_drains_while_jumping() {
        let mut world = world_with_jetpack(1000.0);
        dispatch(&mut world, &Action::set_input("p", InputName::Jump, true));
        world.clock.delta = 16.0;
        run(&mut world);
        assert_eq!(fuel(&world), 1000.0 - 32.0);
    }

    #[test]
    fn test_refills_when_idle() {
        let mut world = world_with_jetpack(1000.0);
        world.clock.delta = 16.0;
        run(&mut world);
        assert_eq!(fuel(&world), 1016.0);
    }

    #[test]
    fn test_fuel_stays_in_bounds() {
        let mut world = world_with_jetpack(10.0);
        dispatch(&mut world, &Action::set_input("p", InputName::Jump, true));
        world.clock.delta = 16.0;
        for _ in 0..10 {
            run(&mut world);
            assert!(fuel(&world) >= JETPACK_MIN_FUEL);
        }
        assert_eq!(fuel(&world), JETPACK_MIN_FUEL);

        dispatch(&mut world, &Action::set_input("p", InputName::Jump, false));
        world.clock.delta = 1000.0;
        for _ in 0..5 {
            run(&mut world);
            assert!(fuel(&world) <= JETPACK_MAX_FUEL);
        }
        assert_eq!(fuel(&world), JETPACK_MAX_FUEL);
    }
}
