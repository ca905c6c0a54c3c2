use clap::Parser;
use client::config::{Args, ClientConfig};
use client::game::ClientGame;
use client::input::InputManager;
use client::network::NetworkClient;
use client::rendering::{HudStatus, Renderer};
use log::{error, info};
use macroquad::prelude::*;
use shared::Action;
use std::time::Instant;

fn window_conf() -> Conf {
    let config = ClientConfig::from(Args::parse());
    Conf {
        window_title: "Arena Shooter".to_string(),
        window_width: config.width as i32,
        window_height: config.height as i32,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ClientConfig::from(Args::parse());
    info!("Starting client...");
    info!("Controls: WASD to move, Space to jump, left mouse to shoot, R to reload");

    let started = Instant::now();
    let mut game = ClientGame::new(0);
    let mut input = InputManager::new();
    let mut renderer = Renderer::new(config.width, config.height);

    let mut network = match config.server_addr {
        Some(addr) => {
            info!("Connecting to: {}", addr);
            if config.fake_ping_ms > 0 {
                info!("Simulating {}ms latency", config.fake_ping_ms);
            }
            match NetworkClient::connect(addr, config.fake_ping_ms) {
                Ok(network) => {
                    game.connecting();
                    Some(network)
                }
                Err(e) => {
                    error!("Could not start networking, playing offline: {}", e);
                    None
                }
            }
        }
        None => {
            info!("Playing offline");
            None
        }
    };

    let mut screen = (0.0, 0.0);
    loop {
        let now_ms = started.elapsed().as_millis() as u64;

        if let Some(network) = network.as_mut() {
            for event in network.poll() {
                game.handle_event(event, now_ms);
            }
        }
        if game.take_world_replaced() {
            input.reset();
        }

        let size = (screen_width(), screen_height());
        if size != screen {
            screen = size;
            renderer.resize(size.0, size.1);
            game.apply_local(Action::SetScreenSize {
                width: size.0,
                height: size.1,
            });
        }

        let player = game.local_player().clone();
        let frame = input.update(&player, game.local_aim());
        if frame.quit {
            break;
        }
        if frame.toggle_cursor {
            input.set_cursor_grabbed(!input.cursor_grabbed());
        }
        for action in frame.actions {
            if let Some(packet) = game.apply_local(action) {
                if let Some(network) = network.as_ref() {
                    network.send(packet);
                }
            }
        }

        game.frame(now_ms);

        let hud = HudStatus::from_world(&game.world, &player, &game.status);
        renderer.render(&game.world, &player, &hud);

        next_frame().await;
    }

    if let Some(network) = network {
        network.shutdown();
    }
    info!("Client shut down");
}
