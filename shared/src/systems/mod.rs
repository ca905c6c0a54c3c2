//! The per-tick pipeline.
//!
//! Systems run in [`PIPELINE`] order, each to completion, once per tick.
//! The order is part of the simulation's contract: the jump logic in
//! `controller` reads the ground flag `physics` wrote on the previous tick,
//! and `damage` sees the wall contacts of the previous tick before
//! `physics` clears them.

pub mod controller;
pub mod damage;
pub mod decay;
pub mod gravity;
pub mod jetpack;
pub mod physics;
pub mod pickup;
pub mod reloading;
pub mod shooting;
pub mod time;

use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemId {
    Time,
    Decay,
    Gravity,
    Pickup,
    Jetpack,
    Damage,
    Controller,
    Shooting,
    Reloading,
    Physics,
}

pub const PIPELINE: [SystemId; 10] = [
    SystemId::Time,
    SystemId::Decay,
    SystemId::Gravity,
    SystemId::Pickup,
    SystemId::Jetpack,
    SystemId::Damage,
    SystemId::Controller,
    SystemId::Shooting,
    SystemId::Reloading,
    SystemId::Physics,
];

/// Advances `world` by one tick ending at wall-clock `now_ms`.
pub fn update(world: &mut World, now_ms: u64) {
    for system in PIPELINE {
        run_system(world, system, now_ms);
    }
}

pub fn run_system(world: &mut World, system: SystemId, now_ms: u64) {
    match system {
        SystemId::Time => time::run(world, now_ms),
        SystemId::Decay => decay::run(world),
        SystemId::Gravity => gravity::run(world),
        SystemId::Pickup => pickup::run(world),
        SystemId::Jetpack => jetpack::run(world),
        SystemId::Damage => damage::run(world),
        SystemId::Controller => controller::run(world),
        SystemId::Shooting => shooting::run(world),
        SystemId::Reloading => reloading::run(world),
        SystemId::Physics => physics::run(world),
    }
}
