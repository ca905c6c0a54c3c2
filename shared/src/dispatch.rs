//! The reducer: every externally driven mutation of a [`World`] goes
//! through [`dispatch`]. It performs no I/O and never fails; an action whose
//! fields do not fit the World it lands on changes nothing.

use crate::action::{Action, InputName, PlayerSnapshot};
use crate::components::{Head, Jetpack, Transform};
use crate::entity::{Entity, EntityId};
use crate::math::Vec3;
use crate::world::World;
use crate::{BULLET_SPEED, MUZZLE_DISTANCE, RIFLE_DAMAGE};

pub fn dispatch(world: &mut World, action: &Action) {
    match action {
        Action::InitGame {
            player_ids,
            now_ms,
            level,
        } => {
            let level = level.clone().unwrap_or_else(|| world.level.clone());
            let camera = world.camera;
            *world = World::build(level, player_ids, *now_ms);
            world.camera = camera;
        }

        Action::SetScreenSize { width, height } => {
            if is_positive(*width) && is_positive(*height) {
                world.camera.width = *width;
                world.camera.height = *height;
                world.camera.aspect = width / height;
            }
        }

        Action::SetAspectRatio { aspect } => {
            if is_positive(*aspect) {
                world.camera.aspect = *aspect;
            }
        }

        Action::SetPlayerInput { id, input, value } => {
            let Some(name) = InputName::parse(input) else {
                return;
            };
            if let Some(controller) = world.entity_mut(id).and_then(|e| e.controller.as_mut()) {
                controller.inputs.set(name, *value);
            }
        }

        Action::SetPlayerAim { id, yaw, pitch } => {
            if !yaw.is_finite() || !pitch.is_finite() {
                return;
            }
            let Some(transform) = world.entity_mut(id).and_then(|e| e.transform.as_mut()) else {
                return;
            };
            if let Some(head) = transform.head.as_mut() {
                transform.rotation.y = *yaw;
                head.set_pitch(*pitch);
            }
        }

        Action::ShootBullet { id } => shoot_bullet(world, id),

        Action::PlayerJoin { id } => {
            if id.is_empty() {
                return;
            }
            if !world.player_ids.contains(id) {
                world.player_ids.push(id.clone());
            }
            if !world.contains(id) {
                let slot = world
                    .player_ids
                    .iter()
                    .position(|p| p == id)
                    .unwrap_or_default();
                let position = world.spawn_point(slot);
                world.add_entity(id.clone(), Entity::player(position));
            }
        }

        Action::PlayerLeave { id } => {
            world.player_ids.retain(|p| p != id);
            world.remove_entity(id);
        }

        Action::SpawnPlayer { id, position } => {
            if id.is_empty() || !position.is_finite() {
                return;
            }
            if !world.player_ids.contains(id) {
                world.player_ids.push(id.clone());
            }
            world.add_entity(id.clone(), Entity::player(*position));
        }

        Action::HitPlayer { id, amount } => {
            if *amount <= 0 {
                return;
            }
            let Some(health) = world.entity_mut(id).and_then(|e| e.health.as_mut()) else {
                return;
            };
            health.hp -= amount;
            if health.is_depleted() {
                world.remove_entity(id);
            }
        }

        Action::KillPlayer { id } => {
            if world.entity(id).controller.is_some() {
                world.remove_entity(id);
            }
        }

        Action::SyncPlayer { player } => apply_snapshot(world, player),

        Action::SyncGameState { players } => {
            for player in players {
                apply_snapshot(world, player);
            }
        }

        Action::ServerAction { action } | Action::ClientAction { action, .. } => {
            dispatch(world, action)
        }

        Action::Unknown { .. } => {}
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Spawns a projectile in front of the firer's eye, flying along its facing.
fn shoot_bullet(world: &mut World, id: &EntityId) {
    let shooter = world.entity(id);
    let Some(transform) = shooter.transform.as_ref() else {
        return;
    };
    let amount = shooter
        .weapon
        .as_ref()
        .map(|w| w.kind.damage)
        .unwrap_or(RIFLE_DAMAGE);

    let direction = transform.facing();
    let velocity = direction.scale(BULLET_SPEED);
    let position = transform.eye().add(&direction.scale(MUZZLE_DISTANCE));

    let bullet_id = world.allocate_id("bullet");
    world.add_entity(bullet_id, Entity::bullet(position, velocity, id.clone(), amount));
}

/// Overwrites a player's synced components wholesale, creating the player
/// when this peer has no body for it.
fn apply_snapshot(world: &mut World, snapshot: &PlayerSnapshot) {
    if snapshot.id.is_empty() || !snapshot.position.is_finite() {
        return;
    }
    if !world.player_ids.contains(&snapshot.id) {
        world.player_ids.push(snapshot.id.clone());
    }
    // A depleted snapshot means the body is already gone on the server.
    if snapshot.health.is_some_and(|h| h.is_depleted()) {
        if world.entity(&snapshot.id).controller.is_some() {
            world.remove_entity(&snapshot.id);
        }
        return;
    }
    if world.entity(&snapshot.id).controller.is_none() {
        world.add_entity(snapshot.id.clone(), Entity::player(snapshot.position));
    }
    let Some(entity) = world.entity_mut(&snapshot.id) else {
        return;
    };

    let transform = entity.transform.get_or_insert_with(|| {
        Transform::new(snapshot.position, crate::PLAYER_SIZE, Default::default())
    });
    transform.position = snapshot.position;
    if snapshot.rotation.is_finite() {
        transform.rotation = snapshot.rotation;
    }
    let head = transform
        .head
        .get_or_insert_with(|| Head::new(crate::HEAD_HEIGHT));
    if snapshot.pitch.is_finite() {
        head.set_pitch(snapshot.pitch);
    }

    entity.velocity = Some(if snapshot.velocity.is_finite() {
        snapshot.velocity
    } else {
        Vec3::ZERO
    });
    if let Some(controller) = entity.controller.as_mut() {
        controller.inputs = snapshot.inputs;
    }
    entity.health = snapshot.health;
    entity.weapon = snapshot.weapon.clone();
    entity.jetpack = snapshot.jetpack.map(|sent| {
        let mut jetpack = Jetpack::full();
        if sent.fuel.is_finite() {
            jetpack.set_fuel(sent.fuel);
        }
        jetpack
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Inputs;
    use crate::entity::Group;
    use crate::level::Level;
    use assert_approx_eq::assert_approx_eq;

    fn world_with_player(id: &str) -> World {
        let mut world = World::empty(0);
        world.add_entity(id.into(), Entity::player(Vec3::new(0.0, 1.0, 0.0)));
        world.player_ids.push(id.into());
        world
    }

    fn inputs_of(world: &World, id: &str) -> Inputs {
        world.entity(&id.into()).controller.unwrap().inputs
    }

    #[test]
    fn test_init_game_builds_level() {
        let mut world = World::empty(0);
        dispatch(
            &mut world,
            &Action::InitGame {
                player_ids: vec!["a".into(), "b".into()],
                now_ms: 500,
                level: Some(Level::arena()),
            },
        );
        assert_eq!(world.count_group(Group::Player), 2);
        assert_eq!(world.clock.start, 500);
        assert_eq!(world.clock.elapsed, 0);
    }

    #[test]
    fn test_init_game_keeps_camera_and_level() {
        let mut world = World::build(Level::new(vec![vec![1, 2]]), &[], 0);
        dispatch(
            &mut world,
            &Action::SetScreenSize {
                width: 1000.0,
                height: 500.0,
            },
        );
        dispatch(
            &mut world,
            &Action::InitGame {
                player_ids: vec!["a".into()],
                now_ms: 10,
                level: None,
            },
        );
        assert_eq!(world.camera.aspect, 2.0);
        assert_eq!(world.count_group(Group::Wall), 1);
        assert_eq!(world.count_group(Group::Player), 1);
    }

    #[test]
    fn test_screen_size_sets_aspect() {
        let mut world = World::empty(0);
        dispatch(
            &mut world,
            &Action::SetScreenSize {
                width: 1600.0,
                height: 900.0,
            },
        );
        assert_approx_eq!(world.camera.aspect, 16.0 / 9.0, 1e-6);
        assert!(world.entities.is_empty());
    }

    #[test]
    fn test_zero_screen_size_ignored() {
        let mut world = World::empty(0);
        let before = world.camera;
        dispatch(
            &mut world,
            &Action::SetScreenSize {
                width: 0.0,
                height: 900.0,
            },
        );
        dispatch(&mut world, &Action::SetAspectRatio { aspect: f32::NAN });
        assert_eq!(world.camera, before);
    }

    #[test]
    fn test_set_player_input_last_write_wins() {
        let mut world = world_with_player("p");
        dispatch(&mut world, &Action::set_input("p", InputName::Forward, true));
        dispatch(&mut world, &Action::set_input("p", InputName::Jump, true));
        dispatch(&mut world, &Action::set_input("p", InputName::Forward, false));

        let inputs = inputs_of(&world, "p");
        assert!(!inputs.forward);
        assert!(inputs.jump);
    }

    #[test]
    fn test_unknown_input_name_ignored() {
        let mut world = world_with_player("p");
        dispatch(
            &mut world,
            &Action::SetPlayerInput {
                id: "p".into(),
                input: "crouch".into(),
                value: true,
            },
        );
        assert_eq!(inputs_of(&world, "p"), Inputs::default());
    }

    #[test]
    fn test_input_for_missing_entity_is_noop() {
        let mut world = World::empty(0);
        dispatch(&mut world, &Action::set_input("ghost", InputName::Shoot, true));
        assert!(world.entities.is_empty());
    }

    #[test]
    fn test_set_player_aim() {
        let mut world = world_with_player("p");
        dispatch(
            &mut world,
            &Action::SetPlayerAim {
                id: "p".into(),
                yaw: 1.25,
                pitch: 0.5,
            },
        );
        let transform = world.entity(&"p".into()).transform.clone().unwrap();
        assert_eq!(transform.yaw(), 1.25);
        assert_eq!(transform.pitch(), 0.5);
    }

    #[test]
    fn test_set_player_aim_clamps_pitch() {
        let mut world = world_with_player("p");
        dispatch(
            &mut world,
            &Action::SetPlayerAim {
                id: "p".into(),
                yaw: 0.0,
                pitch: 10.0,
            },
        );
        let pitch = world.entity(&"p".into()).transform.as_ref().unwrap().pitch();
        assert_eq!(pitch, crate::PITCH_LIMIT);
    }

    #[test]
    fn test_set_player_aim_needs_head() {
        let mut world = World::empty(0);
        world.add_entity("w".into(), Entity::wall(Vec3::ZERO, Vec3::ONE));
        dispatch(
            &mut world,
            &Action::SetPlayerAim {
                id: "w".into(),
                yaw: 1.0,
                pitch: 0.0,
            },
        );
        assert_eq!(world.entity(&"w".into()).transform.as_ref().unwrap().yaw(), 0.0);
    }

    #[test]
    fn test_shoot_bullet_spawns_projectile() {
        let mut world = world_with_player("p");
        dispatch(&mut world, &Action::ShootBullet { id: "p".into() });

        let bullets = world.ids_in_group(Group::Bullet);
        assert_eq!(bullets.len(), 1);
        let bullet = world.entity(&bullets[0]);
        let damage = bullet.damage.as_ref().unwrap();
        assert_eq!(damage.creator.as_str(), "p");
        assert_eq!(damage.amount, crate::RIFLE_DAMAGE);

        let velocity = bullet.velocity.unwrap();
        assert_approx_eq!(velocity.z, -BULLET_SPEED, 1e-6);
        let position = bullet.transform.as_ref().unwrap().position;
        assert_approx_eq!(position.y, 1.0 + crate::HEAD_HEIGHT, 1e-6);
        assert_approx_eq!(position.z, -MUZZLE_DISTANCE, 1e-6);
    }

    #[test]
    fn test_shoot_from_missing_entity_is_noop() {
        let mut world = World::empty(0);
        dispatch(&mut world, &Action::ShootBullet { id: "ghost".into() });
        assert!(world.entities.is_empty());
    }

    #[test]
    fn test_join_and_leave() {
        let mut world = World::build(Level::arena(), &[], 0);
        dispatch(&mut world, &Action::PlayerJoin { id: "p1".into() });
        dispatch(&mut world, &Action::PlayerJoin { id: "p1".into() });
        assert_eq!(world.player_ids.len(), 1);
        assert_eq!(world.count_group(Group::Player), 1);
        let position = world.entity(&"p1".into()).transform.as_ref().unwrap().position;
        assert_eq!(position, world.spawn_points[0]);

        dispatch(&mut world, &Action::PlayerLeave { id: "p1".into() });
        assert!(world.player_ids.is_empty());
        assert_eq!(world.count_group(Group::Player), 0);
    }

    #[test]
    fn test_hit_player_kills_at_zero() {
        let mut world = world_with_player("p");
        dispatch(
            &mut world,
            &Action::HitPlayer {
                id: "p".into(),
                amount: 40,
            },
        );
        assert_eq!(world.entity(&"p".into()).health.unwrap().hp, 60);
        dispatch(
            &mut world,
            &Action::HitPlayer {
                id: "p".into(),
                amount: 60,
            },
        );
        assert!(!world.contains(&"p".into()));
        assert_eq!(world.player_ids.len(), 1);
    }

    #[test]
    fn test_non_positive_hit_is_ignored() {
        let mut world = world_with_player("p");
        for amount in [0, -25] {
            dispatch(
                &mut world,
                &Action::HitPlayer {
                    id: "p".into(),
                    amount,
                },
            );
        }
        assert_eq!(world.entity(&"p".into()).health.unwrap().hp, 100);
    }

    #[test]
    fn test_init_game_twice_gives_same_world() {
        let init = Action::InitGame {
            player_ids: vec!["a".into(), "b".into()],
            now_ms: 0,
            level: Some(Level::arena()),
        };
        let mut world = World::empty(0);
        dispatch(&mut world, &init);
        let walls = world.count_group(Group::Wall);
        let pickups = world.count_group(Group::Pickup);
        let players = world.count_group(Group::Player);

        dispatch(&mut world, &init);
        assert_eq!(world.count_group(Group::Wall), walls);
        assert_eq!(world.count_group(Group::Pickup), pickups);
        assert_eq!(world.count_group(Group::Player), players);
        assert_eq!(players, 2);
        assert!(walls > 0);
    }

    #[test]
    fn test_kill_player_only_removes_players() {
        let mut world = world_with_player("p");
        world.add_entity("w".into(), Entity::wall(Vec3::ZERO, Vec3::ONE));
        dispatch(&mut world, &Action::KillPlayer { id: "w".into() });
        dispatch(&mut world, &Action::KillPlayer { id: "p".into() });
        assert!(world.contains(&"w".into()));
        assert!(!world.contains(&"p".into()));
    }

    #[test]
    fn test_spawn_player_replaces_body() {
        let mut world = world_with_player("p");
        world.entity_mut(&"p".into()).unwrap().health.as_mut().unwrap().hp = 3;
        let position = Vec3::new(4.0, 1.0, 4.0);
        dispatch(
            &mut world,
            &Action::SpawnPlayer {
                id: "p".into(),
                position,
            },
        );
        let player = world.entity(&"p".into());
        assert_eq!(player.health.unwrap().hp, crate::PLAYER_MAX_HP);
        assert_eq!(player.transform.as_ref().unwrap().position, position);
    }

    #[test]
    fn test_sync_player_overwrites_components() {
        let mut world = world_with_player("p");
        let mut snapshot = world.snapshot_player(&"p".into()).unwrap();
        snapshot.position = Vec3::new(3.0, 1.0, -2.0);
        snapshot.inputs.forward = true;
        snapshot.health = Some(crate::components::Health { hp: 42, max: 100 });
        snapshot.pitch = 0.3;

        dispatch(&mut world, &Action::SyncPlayer { player: snapshot });

        let player = world.entity(&"p".into());
        assert_eq!(player.transform.as_ref().unwrap().position.x, 3.0);
        assert_eq!(player.transform.as_ref().unwrap().pitch(), 0.3);
        assert!(player.controller.unwrap().inputs.forward);
        assert_eq!(player.health.unwrap().hp, 42);
    }

    #[test]
    fn test_depleted_snapshot_removes_body() {
        let mut world = world_with_player("p");
        let mut snapshot = world.snapshot_player(&"p".into()).unwrap();
        snapshot.health = Some(crate::components::Health { hp: 0, max: 100 });

        dispatch(&mut world, &Action::SyncPlayer { player: snapshot.clone() });
        assert!(!world.contains(&"p".into()));

        dispatch(&mut world, &Action::SyncPlayer { player: snapshot });
        assert!(!world.contains(&"p".into()));
        assert_eq!(world.player_ids, vec![EntityId::from("p")]);
    }

    #[test]
    fn test_snapshot_values_are_sanitized() {
        let mut world = world_with_player("p");
        dispatch(
            &mut world,
            &Action::SetPlayerAim {
                id: "p".into(),
                yaw: 0.5,
                pitch: 0.1,
            },
        );
        let mut snapshot = world.snapshot_player(&"p".into()).unwrap();
        snapshot.rotation = Vec3::new(0.0, f32::NAN, 0.0);
        snapshot.pitch = f32::INFINITY;
        let mut jetpack = crate::components::Jetpack::full();
        jetpack.fuel = jetpack.max_fuel * 10.0;
        snapshot.jetpack = Some(jetpack);

        dispatch(&mut world, &Action::SyncPlayer { player: snapshot });

        let player = world.entity(&"p".into());
        let transform = player.transform.as_ref().unwrap();
        assert_approx_eq!(transform.yaw(), 0.5);
        assert_approx_eq!(transform.pitch(), 0.1);
        let jetpack = player.jetpack.unwrap();
        assert_approx_eq!(jetpack.fuel, jetpack.max_fuel);
    }

    #[test]
    fn test_sync_game_state_creates_missing_players() {
        let mut source = world_with_player("remote");
        source.entity_mut(&"remote".into()).unwrap().jetpack =
            Some(crate::components::Jetpack::full());
        let snapshots = source.snapshot_players();

        let mut world = World::empty(0);
        dispatch(&mut world, &Action::SyncGameState { players: snapshots });
        assert!(world.contains(&"remote".into()));
        assert_eq!(world.player_ids, vec![EntityId::from("remote")]);
        assert!(world.entity(&"remote".into()).jetpack.is_some());
    }

    #[test]
    fn test_envelopes_apply_inner_action() {
        let mut world = world_with_player("p");
        let action = Action::from_server(Action::for_client(
            "p".into(),
            Action::set_input("p", InputName::Reload, true),
        ));
        dispatch(&mut world, &action);
        assert!(inputs_of(&world, "p").reload);
    }

    #[test]
    fn test_unknown_action_leaves_state_unchanged() {
        let mut world = world_with_player("p");
        let before = world.entities.clone();
        dispatch(
            &mut world,
            &Action::Unknown {
                kind: "Emote".into(),
            },
        );
        assert_eq!(world.entities, before);
    }
}
