use crate::world::World;

/// Counts lifetimes down and removes whatever has run out.
pub fn run(world: &mut World) {
    let delta = world.clock.delta;

    for id in world.awake_ids() {
        let Some(decay) = world.entity_mut(&id).and_then(|e| e.decay.as_mut()) else {
            continue;
        };
        decay.ttl -= delta;
        if decay.ttl < 0.0 {
            world.remove_entity(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Decay;
    use crate::entity::Entity;

    fn decaying(ttl: f32) -> Entity {
        Entity {
            decay: Some(Decay { ttl }),
            ..Entity::default()
        }
    }

    #[test]
    fn test_decay_counts_down() {
        let mut world = World::empty(0);
        world.add_entity("d".into(), decaying(100.0));
        world.clock.delta = 40.0;
        run(&mut world);
        assert_eq!(world.entity(&"d".into()).decay.unwrap().ttl, 60.0);
    }

    #[test]
    fn test_removed_once_below_zero() {
        let mut world = World::empty(0);
        world.add_entity("exact".into(), decaying(40.0));
        world.add_entity("short".into(), decaying(39.0));
        world.clock.delta = 40.0;
        run(&mut world);
        assert!(world.contains(&"exact".into()));
        assert!(!world.contains(&"short".into()));
    }
}
