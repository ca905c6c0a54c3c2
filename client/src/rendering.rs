use crate::game::LinkStatus;
use macroquad::prelude::*;
use shared::world::Decoration;
use shared::{EntityId, Group, World};

/// What the HUD shows for the local player.
#[derive(Debug, Clone, PartialEq)]
pub struct HudStatus {
    pub player_id: EntityId,
    pub link: LinkStatus,
    pub hp: Option<(i32, i32)>,
    pub ammo: Option<(u32, u32)>,
    pub reloading: bool,
    pub fuel: Option<f32>,
    pub player_count: usize,
}

impl HudStatus {
    pub fn from_world(world: &World, player: &EntityId, link: &LinkStatus) -> Self {
        let me = world.entity(player);
        Self {
            player_id: player.clone(),
            link: link.clone(),
            hp: me.health.map(|h| (h.hp, h.max)),
            ammo: me.weapon.as_ref().map(|w| (w.loaded_ammo, w.reserved_ammo)),
            reloading: me.weapon.as_ref().is_some_and(|w| w.is_reloading()),
            fuel: me.jetpack.map(|j| j.fuel),
            player_count: world.player_ids.len(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let link = match &self.link {
            LinkStatus::Offline => "Offline".to_string(),
            LinkStatus::Connecting => "Connecting...".to_string(),
            LinkStatus::Online => format!("Online ({} players)", self.player_count),
            LinkStatus::Lost { reason } => format!("Connection lost: {}", reason),
        };

        let mut lines = vec![format!("{} | {}", self.player_id, link)];
        match self.hp {
            Some((hp, max)) => lines.push(format!("HP {}/{}", hp, max)),
            None => lines.push("Dead, waiting to respawn".to_string()),
        }
        if let Some((loaded, reserved)) = self.ammo {
            let suffix = if self.reloading { " (reloading)" } else { "" };
            lines.push(format!("Ammo {}/{}{}", loaded, reserved, suffix));
        }
        if let Some(fuel) = self.fuel {
            lines.push(format!("Fuel {:.0}", fuel));
        }
        lines
    }
}

fn gl(v: shared::Vec3) -> Vec3 {
    vec3(v.x, v.y, v.z)
}

fn pickup_color(mesh: &str) -> Color {
    match mesh {
        "jetpack" => Color::from_rgba(80, 160, 255, 255),
        "ammo" => Color::from_rgba(240, 200, 60, 255),
        _ => Color::from_rgba(120, 255, 120, 255),
    }
}

pub struct Renderer {
    width: f32,
    height: f32,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Renderer {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn render(&self, world: &World, local: &EntityId, hud: &HudStatus) {
        clear_background(Color::from_rgba(26, 26, 26, 255));

        let eye = world.entity(local).transform.as_ref().map(|t| (t.eye(), t.facing()));
        let (position, facing) = eye.unwrap_or_else(|| {
            let center = world.level.center();
            (
                shared::Vec3::new(center.x, 30.0, center.z + 20.0),
                shared::Vec3::new(0.0, -1.0, -0.6).normalize(),
            )
        });

        set_camera(&Camera3D {
            position: gl(position),
            target: gl(position.add(&facing)),
            up: vec3(0.0, 1.0, 0.0),
            fovy: world.camera.fov,
            aspect: Some(self.width / self.height),
            ..Default::default()
        });

        for decoration in &world.scene {
            if let Decoration::FloorPlane { center, size } = decoration {
                draw_plane(
                    gl(*center),
                    vec2(*size / 2.0, *size / 2.0),
                    None,
                    Color::from_rgba(50, 54, 60, 255),
                );
            }
        }

        let mut ids: Vec<&EntityId> = world.entities.keys().collect();
        ids.sort();
        for id in ids {
            if id == local {
                continue;
            }
            let entity = world.entity(id);
            let Some(transform) = &entity.transform else {
                continue;
            };
            let center = gl(transform.position);
            let size = gl(transform.scale);
            match entity.group() {
                Group::Wall => {
                    draw_cube(center, size, None, Color::from_rgba(110, 110, 120, 255));
                    draw_cube_wires(center, size, Color::from_rgba(30, 30, 30, 255));
                }
                Group::Player => {
                    draw_cube(center, size, None, Color::from_rgba(255, 68, 68, 255));
                }
                Group::Pickup => {
                    draw_cube(center, size, None, pickup_color(&transform.renderable.0));
                }
                Group::Bullet => {
                    draw_sphere(center, transform.scale.x / 2.0, None, YELLOW);
                }
                Group::Other => {}
            }
        }

        set_default_camera();
        self.draw_crosshair();
        self.draw_hud(hud);
    }

    fn draw_crosshair(&self) {
        let (cx, cy) = (self.width / 2.0, self.height / 2.0);
        draw_line(cx - 8.0, cy, cx + 8.0, cy, 2.0, WHITE);
        draw_line(cx, cy - 8.0, cx, cy + 8.0, 2.0, WHITE);
    }

    fn draw_hud(&self, hud: &HudStatus) {
        let color = match hud.link {
            LinkStatus::Online => GREEN,
            LinkStatus::Lost { .. } => RED,
            _ => LIGHTGRAY,
        };
        for (i, line) in hud.lines().iter().enumerate() {
            let y = 24.0 + i as f32 * 22.0;
            let line_color = if i == 0 { color } else { WHITE };
            draw_text(line, 12.0, y, 22.0, line_color);
        }
        draw_text(
            "WASD move, Space jump/jetpack, LMB shoot, R reload, Tab cursor, Esc quit",
            12.0,
            self.height - 12.0,
            18.0,
            GRAY,
        );
    }
}
