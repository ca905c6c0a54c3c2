//! Headless bot for poking a running server: connects, runs in circles
//! shooting, and logs what the server relays back.

use clap::Parser;
use log::{info, warn};
use shared::action::InputName;
use shared::protocol::MAX_PACKET_SIZE;
use shared::sync::ClientSession;
use shared::{update, Action, Packet, World, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::time::{interval, timeout};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Headless test client")]
struct Args {
    /// Server address to connect to
    #[clap(short, long, default_value = "127.0.0.1:8080")]
    server: SocketAddr,

    /// Seconds to stay connected
    #[clap(short, long, default_value = "10")]
    duration: u64,
}

async fn send(socket: &UdpSocket, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
    socket.send_to(&packet.encode()?, socket.peer_addr()?).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect(args.server).await?;
    info!("Bound to {}, connecting to {}", socket.local_addr()?, args.server);

    send(
        &socket,
        &Packet::Connect {
            client_version: PROTOCOL_VERSION,
        },
    )
    .await?;

    let mut buffer = vec![0u8; MAX_PACKET_SIZE];
    let len = timeout(Duration::from_secs(3), socket.recv(&mut buffer)).await??;
    let player_id = match Packet::decode(&buffer[..len])? {
        Packet::Welcome { player_id } => player_id,
        other => return Err(format!("expected Welcome, got {:?}", other).into()),
    };
    info!("Joined as {}", player_id);

    let started = Instant::now();
    let mut world = World::empty(0);
    let mut session = ClientSession::new(player_id.clone());
    let mut ticker = interval(Duration::from_millis(16));
    let mut yaw = 0.0f32;
    let mut relayed = 0usize;

    for input in [InputName::Forward, InputName::Shoot] {
        let action = Action::set_input(player_id.clone(), input, true);
        send(&socket, &Packet::dispatch(action)).await?;
    }

    while started.elapsed() < Duration::from_secs(args.duration) {
        tokio::select! {
            received = socket.recv(&mut buffer) => {
                match Packet::decode(&buffer[..received?]) {
                    Ok(Packet::Dispatch { action }) => {
                        let now = started.elapsed().as_millis() as u64;
                        if session.accept_remote(&mut world, action, now) {
                            relayed += 1;
                        }
                    }
                    Ok(Packet::Disconnected { reason }) => {
                        warn!("Disconnected: {}", reason);
                        return Ok(());
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Undecodable packet: {}", e),
                }
            }
            _ = ticker.tick() => {
                let now = started.elapsed().as_millis() as u64;
                update(&mut world, now);

                yaw += 0.02;
                let aim = Action::SetPlayerAim { id: player_id.clone(), yaw, pitch: 0.0 };
                if let Some(action) = session.dispatch_local(&mut world, aim) {
                    send(&socket, &Packet::dispatch(action)).await?;
                }
            }
        }
    }

    let me = world.entity(&player_id);
    info!(
        "Leaving after {} relayed actions, hp {:?}, ammo {:?}",
        relayed,
        me.health.map(|h| h.hp),
        me.weapon.as_ref().map(|w| (w.loaded_ammo, w.reserved_ammo))
    );
    send(&socket, &Packet::Disconnect).await?;
    Ok(())
}
