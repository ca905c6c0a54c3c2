use crate::world::World;
use crate::GRAVITY;

pub fn run(world: &mut World) {
    let delta = world.clock.delta;

    for id in world.awake_ids() {
        let Some(entity) = world.entity_mut(&id) else {
            continue;
        };
        if !entity.gravity {
            continue;
        }
        if let Some(velocity) = entity.velocity.as_mut() {
            velocity.y -= GRAVITY * delta;
        }
    }
}
