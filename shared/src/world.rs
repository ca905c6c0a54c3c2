use crate::action::PlayerSnapshot;
use crate::entity::{Entity, EntityId, Group, IdAllocator};
use crate::level::{Level, Tile};
use crate::math::Vec3;
use crate::{CAMERA_FAR, CAMERA_FOV, CAMERA_NEAR, TILE_SIZE, WALL_HEIGHT};
use std::collections::HashMap;

static NO_ENTITY: Entity = Entity::EMPTY;

/// Simulation clock in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Clock {
    /// Wall-clock time the World was built at.
    pub start: u64,
    /// Milliseconds since `start` as of the last tick.
    pub elapsed: u64,
    /// Milliseconds between the last two ticks.
    pub delta: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub width: f32,
    pub height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: CAMERA_FOV,
            aspect: 800.0 / 600.0,
            width: 800.0,
            height: 600.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

/// Render-only scene furniture. Never simulated.
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    FloorPlane { center: Vec3, size: f32 },
    DirectionalLight { direction: Vec3, intensity: f32 },
}

/// Owner of every entity plus the global simulation fields.
#[derive(Debug, Clone)]
pub struct World {
    pub entities: HashMap<EntityId, Entity>,
    pub clock: Clock,
    pub camera: Camera,
    pub player_ids: Vec<EntityId>,
    pub level: Level,
    /// Player spawn positions read from the level at build time.
    pub spawn_points: Vec<Vec3>,
    pub scene: Vec<Decoration>,
    ids: IdAllocator,
}

impl World {
    /// An empty World: no entities, no players.
    pub fn empty(now_ms: u64) -> Self {
        Self {
            entities: HashMap::new(),
            clock: Clock {
                start: now_ms,
                ..Clock::default()
            },
            camera: Camera::default(),
            player_ids: Vec::new(),
            level: Level::new(Vec::new()),
            spawn_points: Vec::new(),
            scene: Vec::new(),
            ids: IdAllocator::new(),
        }
    }

    /// Builds walls, pickups and players from `level`. Players are placed on
    /// spawn tiles in scan order; spawn tiles left over once every id has a
    /// body stay empty.
    pub fn build(level: Level, player_ids: &[EntityId], now_ms: u64) -> Self {
        let mut world = Self::empty(now_ms);

        for id in player_ids {
            if !id.is_empty() && !world.player_ids.contains(id) {
                world.player_ids.push(id.clone());
            }
        }

        world.spawn_points = level.spawn_points();
        let mut unplaced = world.player_ids.clone().into_iter();
        for (row, col, tile) in level.tiles() {
            let position = Level::placement(row, col, tile);
            match tile {
                Tile::Wall => {
                    let id = world.allocate_id("wall");
                    let size = Vec3::new(TILE_SIZE, WALL_HEIGHT, TILE_SIZE);
                    world.add_entity(id, Entity::wall(position, size));
                }
                Tile::PlayerSpawn => {
                    if let Some(id) = unplaced.next() {
                        world.add_entity(id, Entity::player(position));
                    }
                }
                Tile::JetpackPickup => {
                    let id = world.allocate_id("pickup");
                    world.add_entity(id, Entity::jetpack_pickup(position));
                }
                Tile::AmmoPickup => {
                    let id = world.allocate_id("pickup");
                    world.add_entity(id, Entity::ammo_pickup(position));
                }
                Tile::Empty => {}
            }
        }

        world.scene = scene_for(&level);
        world.level = level;
        world
    }

    pub fn allocate_id(&mut self, prefix: &str) -> EntityId {
        self.ids.allocate(prefix)
    }

    /// Inserts `entity` under `id`. A live entity already holding the id is
    /// deleted first.
    pub fn add_entity(&mut self, id: EntityId, entity: Entity) {
        self.remove_entity(&id);
        self.entities.insert(id, entity);
    }

    pub fn remove_entity(&mut self, id: &EntityId) -> Option<Entity> {
        self.entities.remove(id)
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Never fails: absent ids read as an entity with no components.
    pub fn entity(&self, id: &EntityId) -> &Entity {
        self.entities.get(id).unwrap_or(&NO_ENTITY)
    }

    pub fn entity_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Ids of every entity in `group`, sorted so passes visit entities in
    /// the same order on every peer.
    pub fn ids_in_group(&self, group: Group) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, entity)| entity.group() == group)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Ids of every entity that takes part in the tick, sorted.
    pub fn awake_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|(_, entity)| !entity.asleep)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn count_group(&self, group: Group) -> usize {
        self.entities.values().filter(|e| e.group() == group).count()
    }

    /// Spawn point for the `index`-th roster slot, wrapping around.
    pub fn spawn_point(&self, index: usize) -> Vec3 {
        if self.spawn_points.is_empty() {
            Vec3::new(0.0, crate::PLAYER_SIZE.y / 2.0, 0.0)
        } else {
            self.spawn_points[index % self.spawn_points.len()]
        }
    }

    pub fn snapshot_player(&self, id: &EntityId) -> Option<PlayerSnapshot> {
        let entity = self.entities.get(id)?;
        let transform = entity.transform.as_ref()?;
        entity.controller.as_ref()?;

        Some(PlayerSnapshot {
            id: id.clone(),
            position: transform.position,
            rotation: transform.rotation,
            pitch: transform.pitch(),
            velocity: entity.velocity.unwrap_or_default(),
            inputs: entity.controller.map(|c| c.inputs).unwrap_or_default(),
            health: entity.health,
            weapon: entity.weapon.clone(),
            jetpack: entity.jetpack,
        })
    }

    /// Snapshots of every rostered player that currently has a body.
    pub fn snapshot_players(&self) -> Vec<PlayerSnapshot> {
        self.player_ids
            .iter()
            .filter_map(|id| self.snapshot_player(id))
            .collect()
    }
}

fn scene_for(level: &Level) -> Vec<Decoration> {
    let extent = level.width().max(level.height()) as f32 * TILE_SIZE;
    vec![
        Decoration::FloorPlane {
            center: level.center(),
            size: extent,
        },
        Decoration::DirectionalLight {
            direction: Vec3::new(-1.0, -1.0, -1.0).normalize(),
            intensity: 0.8,
        },
        Decoration::DirectionalLight {
            direction: Vec3::new(1.0, -1.0, 0.5).normalize(),
            intensity: 0.5,
        },
        Decoration::DirectionalLight {
            direction: Vec3::new(0.0, -1.0, 1.0).normalize(),
            intensity: 0.3,
        },
    ]
}
