//! Advances the simulation clock.

use crate::world::World;

pub fn run(world: &mut World, now_ms: u64) {
    let elapsed = now_ms.saturating_sub(world.clock.start);
    let previous = world.clock.elapsed;
    world.clock.delta = elapsed.saturating_sub(previous) as f32;
    world.clock.elapsed = elapsed.max(previous);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_between_ticks() {
        let mut world = World::empty(1000);
        run(&mut world, 1016);
        assert_eq!(world.clock.elapsed, 16);
        assert_eq!(world.clock.delta, 16.0);
        run(&mut world, 1050);
        assert_eq!(world.clock.elapsed, 50);
        assert_eq!(world.clock.delta, 34.0);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut world = World::empty(1000);
        run(&mut world, 1100);
        run(&mut world, 1050);
        assert_eq!(world.clock.delta, 0.0);
        assert_eq!(world.clock.elapsed, 100);
        run(&mut world, 10);
        assert_eq!(world.clock.delta, 0.0);
    }
}
