//! Turns held inputs into velocity.
//!
//! Horizontal speed is fixed: any held direction key sets the planar
//! velocity to `speed` along the input direction rotated by the entity's
//! yaw, and releasing all of them stops the entity dead. Jump is
//! jetpack thrust while there is fuel, otherwise a single impulse from the
//! ground that consumes the input.

use crate::components::{Controller, Inputs};
use crate::world::World;
use crate::{JETPACK_ACCELERATION, JETPACK_MAX_SPEED, JUMP_VELOCITY};

pub fn run(world: &mut World) {
    let delta = world.clock.delta;

    for id in world.awake_ids() {
        let Some(entity) = world.entity_mut(&id) else {
            continue;
        };
        let (Some(controller), Some(velocity)) =
            (entity.controller.as_mut(), entity.velocity.as_mut())
        else {
            continue;
        };
        let yaw = entity.transform.as_ref().map(|t| t.yaw()).unwrap_or(0.0);

        match planar_direction(&controller.inputs) {
            Some((dx, dz)) => {
                let angle = dx.atan2(dz) + yaw;
                velocity.x = angle.sin() * controller.speed;
                velocity.z = angle.cos() * controller.speed;
            }
            None => {
                velocity.x = 0.0;
                velocity.z = 0.0;
            }
        }

        if !controller.inputs.jump {
            continue;
        }
        if entity.jetpack.is_some_and(|j| j.has_fuel()) {
            if velocity.y < JETPACK_MAX_SPEED {
                velocity.y =
                    (velocity.y + JETPACK_ACCELERATION * delta).min(JETPACK_MAX_SPEED);
            }
        } else if entity.collider.is_some_and(|c| c.on_ground()) {
            velocity.y = JUMP_VELOCITY;
            consume_jump(controller);
        }
    }
}

/// Local input direction with forward along -Z and right along +X, or
/// `None` when the keys cancel out or nothing is held.
fn planar_direction(inputs: &Inputs) -> Option<(f32, f32)> {
    let dx = axis(inputs.right, inputs.left);
    let dz = axis(inputs.back, inputs.forward);
    if dx == 0.0 && dz == 0.0 {
        None
    } else {
        Some((dx, dz))
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

fn consume_jump(controller: &mut Controller) {
    controller.inputs.jump = false;
}
