//! # Shared Simulation Core
//!
//! The deterministic game simulation run identically by the server and by
//! every predicting client. It has no I/O: state changes arrive as
//! [`Action`]s folded in by [`dispatch`], and time advances through
//! [`update`], which runs the fixed system pipeline once per tick.
//!
//! ## Module Organization
//!
//! - `action`: the closed set of messages the dispatcher understands
//! - `components` / `entity`: sparse component bags and derived groups
//! - `world`: the entity map, clock, camera, roster and scene decorations
//! - `dispatch`: the reducer
//! - `systems`: the ordered per-tick passes
//! - `sync`: which actions are predicted, forwarded, relayed or reconciled
//! - `protocol`: the UDP wire format
//!
//! Units: distances in world units, time in milliseconds, velocities in
//! units per millisecond.

pub mod action;
pub mod assets;
pub mod components;
pub mod dispatch;
pub mod entity;
pub mod level;
pub mod math;
pub mod protocol;
pub mod sync;
pub mod systems;
pub mod world;

pub use action::{Action, InputName, PlayerSnapshot};
pub use dispatch::dispatch;
pub use entity::{Entity, EntityId, Group};
pub use math::{Aabb, Axis, Vec3};
pub use protocol::{Packet, PROTOCOL_VERSION};
pub use systems::update;
pub use world::World;

pub const TILE_SIZE: f32 = 2.0;
pub const WALL_HEIGHT: f32 = 4.0;

pub const PLAYER_SIZE: Vec3 = Vec3::new(1.0, 2.0, 1.0);
pub const PLAYER_SPEED: f32 = 0.02;
pub const PLAYER_MAX_HP: i32 = 100;
/// Eye height above the player's center.
pub const HEAD_HEIGHT: f32 = 0.8;
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2;

/// Apex height of a standing jump.
pub const JUMP_HEIGHT: f32 = 2.0;
/// Milliseconds from take-off to apex.
pub const JUMP_TIME: f32 = 250.0;
pub const GRAVITY: f32 = 2.0 * JUMP_HEIGHT / (JUMP_TIME * JUMP_TIME);
pub const JUMP_VELOCITY: f32 = 2.0 * JUMP_HEIGHT / JUMP_TIME;

pub const JETPACK_MIN_FUEL: f32 = 0.0;
pub const JETPACK_MAX_FUEL: f32 = 2000.0;
pub const JETPACK_ACCELERATION: f32 = 2.0 * GRAVITY;
pub const JETPACK_MAX_SPEED: f32 = 0.6 * JUMP_VELOCITY;

pub const BULLET_SPEED: f32 = 0.1;
pub const BULLET_SIZE: f32 = 0.2;
pub const BULLET_TTL: f32 = 2000.0;
/// Distance in front of the eye a projectile appears at.
pub const MUZZLE_DISTANCE: f32 = 1.0;

pub const PICKUP_SIZE: f32 = 1.0;
pub const AMMO_PICKUP_AMOUNT: u32 = 30;

pub const RIFLE_MAX_LOADED: u32 = 30;
pub const RIFLE_MAX_RESERVED: u32 = 90;
pub const RIFLE_START_RESERVE: u32 = 60;
pub const RIFLE_FIRERATE: f32 = 100.0;
pub const RIFLE_RELOAD_SPEED: f32 = 1500.0;
pub const RIFLE_DAMAGE: i32 = 5;

pub const CAMERA_FOV: f32 = 1.3;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
