use crate::components::{
    Collider, Controller, Damage, Decay, Head, Health, Jetpack, PickupEffect, Renderable,
    Transform, Velocity, Weapon, WeaponType,
};
use crate::math::{Aabb, Vec3};
use crate::{
    AMMO_PICKUP_AMOUNT, BULLET_SIZE, BULLET_TTL, HEAD_HEIGHT, PICKUP_SIZE, PLAYER_MAX_HP,
    PLAYER_SIZE, PLAYER_SPEED, RIFLE_START_RESERVE,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque entity identifier, stable for the entity's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Issues `<prefix>-<n>` ids for one World. Counters never go backwards, so
/// an id is never handed out twice by the same allocator.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self, prefix: &str) -> EntityId {
        let id = EntityId(format!("{}-{}", prefix, self.next.max(1)));
        self.next = self.next.max(1) + 1;
        id
    }
}

/// Membership derived from the components an entity carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Player,
    Wall,
    Pickup,
    Bullet,
    Other,
}

/// A sparse bag of optional components.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    pub transform: Option<Transform>,
    pub velocity: Option<Velocity>,
    pub collider: Option<Collider>,
    pub controller: Option<Controller>,
    pub health: Option<Health>,
    pub damage: Option<Damage>,
    pub weapon: Option<Weapon>,
    pub jetpack: Option<Jetpack>,
    pub decay: Option<Decay>,
    pub pickup: Option<PickupEffect>,
    /// Pulled down by gravity each tick.
    pub gravity: bool,
    /// Skipped by every system as an actor.
    pub asleep: bool,
}

impl Entity {
    /// Stand-in returned for ids that are not in the World.
    pub const EMPTY: Entity = Entity {
        transform: None,
        velocity: None,
        collider: None,
        controller: None,
        health: None,
        damage: None,
        weapon: None,
        jetpack: None,
        decay: None,
        pickup: None,
        gravity: false,
        asleep: false,
    };

    pub fn group(&self) -> Group {
        if self.damage.is_some() {
            Group::Bullet
        } else if self.pickup.is_some() {
            Group::Pickup
        } else if self.controller.is_some() {
            Group::Player
        } else if self.collider.is_some() && self.velocity.is_none() {
            Group::Wall
        } else {
            Group::Other
        }
    }

    pub fn bounds(&self) -> Option<Aabb> {
        self.transform
            .as_ref()
            .map(|t| Aabb::from_center(t.position, t.scale))
    }

    pub fn player(position: Vec3) -> Self {
        let mut transform = Transform::new(position, PLAYER_SIZE, Renderable::new("player"));
        transform.head = Some(Head::new(HEAD_HEIGHT));

        Self {
            transform: Some(transform),
            velocity: Some(Vec3::ZERO),
            collider: Some(Collider::default()),
            controller: Some(Controller::new(PLAYER_SPEED)),
            health: Some(Health::new(PLAYER_MAX_HP)),
            weapon: Some(Weapon::new(WeaponType::rifle(), RIFLE_START_RESERVE)),
            gravity: true,
            ..Entity::default()
        }
    }

    pub fn wall(position: Vec3, size: Vec3) -> Self {
        Self {
            transform: Some(Transform::new(position, size, Renderable::new("wall"))),
            collider: Some(Collider::default()),
            asleep: true,
            ..Entity::default()
        }
    }

    pub fn jetpack_pickup(position: Vec3) -> Self {
        Self {
            transform: Some(Transform::new(
                position,
                Vec3::new(PICKUP_SIZE, PICKUP_SIZE, PICKUP_SIZE),
                Renderable::new("jetpack"),
            )),
            pickup: Some(PickupEffect {
                jetpack: true,
                ..PickupEffect::default()
            }),
            asleep: true,
            ..Entity::default()
        }
    }

    pub fn ammo_pickup(position: Vec3) -> Self {
        Self {
            transform: Some(Transform::new(
                position,
                Vec3::new(PICKUP_SIZE, PICKUP_SIZE, PICKUP_SIZE),
                Renderable::new("ammo"),
            )),
            pickup: Some(PickupEffect {
                ammo: AMMO_PICKUP_AMOUNT,
                ..PickupEffect::default()
            }),
            asleep: true,
            ..Entity::default()
        }
    }

    pub fn bullet(position: Vec3, velocity: Vec3, creator: EntityId, amount: i32) -> Self {
        Self {
            transform: Some(Transform::new(
                position,
                Vec3::new(BULLET_SIZE, BULLET_SIZE, BULLET_SIZE),
                Renderable::new("bullet"),
            )),
            velocity: Some(velocity),
            collider: Some(Collider::default()),
            damage: Some(Damage { creator, amount }),
            decay: Some(Decay { ttl: BULLET_TTL }),
            ..Entity::default()
        }
    }
}
