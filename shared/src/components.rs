//! Component types an [`Entity`](crate::entity::Entity) may carry.
//!
//! Every component is plain data. Systems in [`crate::systems`] read and
//! write them; nothing here knows about other entities.

use crate::entity::EntityId;
use crate::math::{Axis, Vec3};
use crate::{
    JETPACK_MAX_FUEL, JETPACK_MIN_FUEL, PITCH_LIMIT, RIFLE_DAMAGE, RIFLE_FIRERATE,
    RIFLE_MAX_LOADED, RIFLE_MAX_RESERVED, RIFLE_RELOAD_SPEED,
};
use serde::{Deserialize, Serialize};

/// Handle to a mesh owned by the asset provider. The core only carries the
/// name; the renderer resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Renderable(pub String);

impl Renderable {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Pitchable sub-transform mounted on top of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Head {
    /// Offset above the body's center.
    pub height: f32,
    pub pitch: f32,
}

impl Head {
    pub fn new(height: f32) -> Self {
        Self { height, pitch: 0.0 }
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Center of the object's bounding box.
    pub position: Vec3,
    /// Euler angles; yaw lives in `rotation.y`.
    pub rotation: Vec3,
    /// Full extent along each axis.
    pub scale: Vec3,
    pub head: Option<Head>,
    pub renderable: Renderable,
}

impl Transform {
    pub fn new(position: Vec3, scale: Vec3, renderable: Renderable) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
            scale,
            head: None,
            renderable,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    pub fn pitch(&self) -> f32 {
        self.head.map(|h| h.pitch).unwrap_or(0.0)
    }

    /// World-space point the head sits at, or the body center when headless.
    pub fn eye(&self) -> Vec3 {
        let height = self.head.map(|h| h.height).unwrap_or(0.0);
        Vec3::new(self.position.x, self.position.y + height, self.position.z)
    }

    /// Unit vector along yaw and pitch. Zero yaw looks down -Z.
    pub fn facing(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw(), self.pitch());
        Vec3::new(
            -yaw.sin() * pitch.cos(),
            pitch.sin(),
            -yaw.cos() * pitch.cos(),
        )
    }
}

pub type Velocity = Vec3;

/// Contact state of one axis after the last physics pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisContact {
    #[default]
    None,
    /// Movement toward the negative direction is blocked. On Y this is
    /// ground contact.
    Negative,
    /// Movement toward the positive direction is blocked.
    Positive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Collider {
    pub x: AxisContact,
    pub y: AxisContact,
    pub z: AxisContact,
    /// Set by the damage system when a projectile strikes a player.
    pub hit: bool,
}

impl Collider {
    pub fn get(&self, axis: Axis) -> AxisContact {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, contact: AxisContact) {
        match axis {
            Axis::X => self.x = contact,
            Axis::Y => self.y = contact,
            Axis::Z => self.z = contact,
        }
    }

    pub fn reset(&mut self) {
        *self = Collider::default();
    }

    pub fn on_ground(&self) -> bool {
        self.y == AxisContact::Negative
    }

    pub fn is_touching(&self) -> bool {
        self.hit
            || self.x != AxisContact::None
            || self.y != AxisContact::None
            || self.z != AxisContact::None
    }
}

/// Named boolean inputs a controller understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputName {
    Forward,
    Left,
    Back,
    Right,
    Jump,
    Shoot,
    Reload,
}

impl InputName {
    pub const ALL: [InputName; 7] = [
        InputName::Forward,
        InputName::Left,
        InputName::Back,
        InputName::Right,
        InputName::Jump,
        InputName::Shoot,
        InputName::Reload,
    ];

    /// Parses a wire name. Unrecognized names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "forward" => Some(InputName::Forward),
            "left" => Some(InputName::Left),
            "back" => Some(InputName::Back),
            "right" => Some(InputName::Right),
            "jump" => Some(InputName::Jump),
            "shoot" => Some(InputName::Shoot),
            "reload" => Some(InputName::Reload),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputName::Forward => "forward",
            InputName::Left => "left",
            InputName::Back => "back",
            InputName::Right => "right",
            InputName::Jump => "jump",
            InputName::Shoot => "shoot",
            InputName::Reload => "reload",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Inputs {
    pub forward: bool,
    pub left: bool,
    pub back: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
    pub reload: bool,
}

impl Inputs {
    pub fn get(&self, name: InputName) -> bool {
        match name {
            InputName::Forward => self.forward,
            InputName::Left => self.left,
            InputName::Back => self.back,
            InputName::Right => self.right,
            InputName::Jump => self.jump,
            InputName::Shoot => self.shoot,
            InputName::Reload => self.reload,
        }
    }

    pub fn set(&mut self, name: InputName, value: bool) {
        match name {
            InputName::Forward => self.forward = value,
            InputName::Left => self.left = value,
            InputName::Back => self.back = value,
            InputName::Right => self.right = value,
            InputName::Jump => self.jump = value,
            InputName::Shoot => self.shoot = value,
            InputName::Reload => self.reload = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    /// Horizontal speed in units per millisecond.
    pub speed: f32,
    pub inputs: Inputs,
}

impl Controller {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            inputs: Inputs::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { hp: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.hp <= 0
    }
}

/// Carried by projectiles only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Damage {
    pub creator: EntityId,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponType {
    pub name: String,
    pub max_loaded: u32,
    pub max_reserved: u32,
    /// Milliseconds between shots.
    pub firerate: f32,
    /// Milliseconds a full reload takes.
    pub reload_speed: f32,
    /// Damage dealt by each projectile.
    pub damage: i32,
}

impl WeaponType {
    pub fn rifle() -> Self {
        Self {
            name: "rifle".to_string(),
            max_loaded: RIFLE_MAX_LOADED,
            max_reserved: RIFLE_MAX_RESERVED,
            firerate: RIFLE_FIRERATE,
            reload_speed: RIFLE_RELOAD_SPEED,
            damage: RIFLE_DAMAGE,
        }
    }
}

/// Weapon state. `Idle ⇄ Firing` is gated by `firerate_timer`; a weapon is
/// reloading exactly while `reload_timer > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub loaded_ammo: u32,
    pub reserved_ammo: u32,
    pub firerate_timer: f32,
    pub reload_timer: f32,
    pub kind: WeaponType,
}

impl Weapon {
    pub fn new(kind: WeaponType, reserved_ammo: u32) -> Self {
        Self {
            loaded_ammo: kind.max_loaded,
            reserved_ammo: reserved_ammo.min(kind.max_reserved),
            firerate_timer: 0.0,
            reload_timer: 0.0,
            kind,
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_timer > 0.0
    }

    pub fn can_fire(&self) -> bool {
        self.firerate_timer <= 0.0 && !self.is_reloading() && self.loaded_ammo > 0
    }

    /// Ammo a completed reload would move from reserve into the magazine.
    pub fn reload_amount(&self) -> u32 {
        self.kind
            .max_loaded
            .saturating_sub(self.loaded_ammo)
            .min(self.reserved_ammo)
    }

    pub fn add_reserve(&mut self, amount: u32) {
        self.reserved_ammo = self
            .reserved_ammo
            .saturating_add(amount)
            .min(self.kind.max_reserved);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Jetpack {
    pub fuel: f32,
    pub min_fuel: f32,
    pub max_fuel: f32,
}

impl Jetpack {
    pub fn full() -> Self {
        Self {
            fuel: JETPACK_MAX_FUEL,
            min_fuel: JETPACK_MIN_FUEL,
            max_fuel: JETPACK_MAX_FUEL,
        }
    }

    pub fn has_fuel(&self) -> bool {
        self.fuel > self.min_fuel && self.fuel > 0.0
    }

    pub fn set_fuel(&mut self, fuel: f32) {
        self.fuel = fuel.clamp(self.min_fuel, self.max_fuel);
    }
}

/// Remaining lifetime in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decay {
    pub ttl: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PickupEffect {
    pub jetpack: bool,
    pub ammo: u32,
    pub hp: i32,
}
