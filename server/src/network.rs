//! Server network layer: UDP plumbing around the authoritative World.

use crate::client_manager::ClientManager;
use crate::config::ServerConfig;
use log::{debug, error, info, warn};
use rand::seq::SliceRandom;
use shared::assets::{AssetProvider, BuiltinAssets};
use shared::protocol::MAX_PACKET_SIZE;
use shared::sync::ServerRelay;
use shared::{update, Action, EntityId, Packet, World, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval, MissedTickBehavior};

/// Messages sent from network tasks to main server loop
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived {
        packet: Packet,
        addr: SocketAddr,
    },
    ClientTimeout {
        client_id: u32,
        player_id: EntityId,
    },
    #[allow(dead_code)]
    Shutdown,
}

/// Messages sent from the main loop to the sender task
#[derive(Debug)]
pub enum GameMessage {
    SendPacket {
        packet: Packet,
        addr: SocketAddr,
    },
    BroadcastPacket {
        packet: Packet,
        exclude: Option<u32>,
    },
}

pub struct Server {
    socket: Arc<UdpSocket>,
    clients: Arc<RwLock<ClientManager>>,
    world: World,
    relay: ServerRelay,
    tick_duration: Duration,
    started: Instant,
    tick: u64,

    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    game_tx: mpsc::UnboundedSender<GameMessage>,
    game_rx: mpsc::UnboundedReceiver<GameMessage>,
}

/// Decodes one datagram.
pub fn decode_datagram(bytes: &[u8]) -> Result<Packet, bincode::Error> {
    Packet::decode(bytes)
}

impl Server {
    pub async fn new(config: &ServerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let level = BuiltinAssets
            .level(&config.level)
            .ok_or_else(|| format!("unknown level '{}'", config.level))?;

        let socket = Arc::new(UdpSocket::bind(&config.bind_addr).await?);
        info!("Server listening on {}", socket.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (game_tx, game_rx) = mpsc::unbounded_channel();

        let relay = ServerRelay::new(config.respawn_delay_ms, config.snapshot_interval)
            .with_spawn_picker(Box::new(|world: &World| {
                world
                    .spawn_points
                    .choose(&mut rand::thread_rng())
                    .copied()
                    .unwrap_or_else(|| world.spawn_point(0))
            }));

        Ok(Server {
            socket,
            clients: Arc::new(RwLock::new(ClientManager::new(
                config.max_clients,
                config.client_timeout,
            ))),
            world: World::build(level, &[], 0),
            relay,
            tick_duration: config.tick_duration,
            started: Instant::now(),
            tick: 0,
            server_tx,
            server_rx,
            game_tx,
            game_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Spawns task that continuously listens for incoming packets
    fn spawn_network_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = vec![0u8; MAX_PACKET_SIZE];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => match decode_datagram(&buffer[..len]) {
                        Ok(packet) => {
                            if let Err(e) =
                                server_tx.send(ServerMessage::PacketReceived { packet, addr })
                            {
                                error!("Failed to send packet to main loop: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Dropping undecodable packet from {}: {}", addr, e),
                    },
                    Err(e) => {
                        error!("Error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns task that drains the outgoing packet queue
    fn spawn_network_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let clients = Arc::clone(&self.clients);
        let mut game_rx = std::mem::replace(&mut self.game_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = game_rx.recv().await {
                match message {
                    GameMessage::SendPacket { packet, addr } => {
                        if let Err(e) = Self::send_packet_impl(&socket, &packet, addr).await {
                            error!("Failed to send packet to {}: {}", addr, e);
                        }
                    }
                    GameMessage::BroadcastPacket { packet, exclude } => {
                        let client_addrs = clients.read().await.get_client_addrs();
                        let data = match packet.encode() {
                            Ok(data) => data,
                            Err(e) => {
                                error!("Failed to encode broadcast: {}", e);
                                continue;
                            }
                        };

                        for (client_id, addr) in client_addrs {
                            if Some(client_id) == exclude {
                                continue;
                            }
                            if let Err(e) = socket.send_to(&data, addr).await {
                                error!("Failed to send to client {}: {}", client_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Spawns task that drops clients which have gone silent
    fn spawn_timeout_checker(&self) {
        let clients = Arc::clone(&self.clients);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));

            loop {
                interval.tick().await;

                let timed_out = clients.write().await.check_timeouts();

                for client in timed_out {
                    let message = ServerMessage::ClientTimeout {
                        client_id: client.id,
                        player_id: client.player_id,
                    };
                    if let Err(e) = server_tx.send(message) {
                        error!("Failed to send timeout message: {}", e);
                        return;
                    }
                }
            }
        });
    }

    async fn send_packet_impl(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let data = packet.encode()?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    fn send_packet(&self, packet: Packet, addr: SocketAddr) {
        if let Err(e) = self.game_tx.send(GameMessage::SendPacket { packet, addr }) {
            error!("Failed to queue packet for sending: {}", e);
        }
    }

    fn broadcast_action(&self, action: Action, exclude: Option<u32>) {
        let packet = Packet::dispatch(action);
        if let Err(e) = self
            .game_tx
            .send(GameMessage::BroadcastPacket { packet, exclude })
        {
            error!("Failed to queue broadcast packet: {}", e);
        }
    }

    fn remove_player(&mut self, player_id: &EntityId) {
        let leave = self.relay.leave(&mut self.world, player_id);
        self.broadcast_action(leave, None);
    }

    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        match packet {
            Packet::Connect { client_version } => {
                info!(
                    "Client connecting from {} (version: {})",
                    addr, client_version
                );
                if client_version != PROTOCOL_VERSION {
                    self.send_packet(
                        Packet::Disconnected {
                            reason: "Protocol version mismatch".to_string(),
                        },
                        addr,
                    );
                    return;
                }

                let existing = {
                    let mut clients = self.clients.write().await;
                    let existing_id = clients.find_client_by_addr(addr).map(|c| c.id);
                    existing_id.and_then(|id| clients.remove_client(&id))
                };
                if let Some(existing) = existing {
                    info!("Replacing client {} from {}", existing.id, addr);
                    self.remove_player(&existing.player_id);
                }

                let added = {
                    let mut clients = self.clients.write().await;
                    clients
                        .add_client(addr)
                        .map(|c| (c.id, c.player_id.clone()))
                };
                let Some((client_id, player_id)) = added else {
                    self.send_packet(
                        Packet::Disconnected {
                            reason: "Server full".to_string(),
                        },
                        addr,
                    );
                    return;
                };

                let now = self.now_ms();
                let (for_joiner, broadcast) = self.relay.join(&mut self.world, &player_id, now);
                self.send_packet(Packet::Welcome { player_id }, addr);
                for action in for_joiner {
                    self.send_packet(Packet::dispatch(action), addr);
                }
                self.broadcast_action(broadcast, Some(client_id));
            }

            Packet::Dispatch { action } => {
                let player_id = {
                    let mut clients = self.clients.write().await;
                    clients.touch(addr).map(|c| c.player_id.clone())
                };
                let Some(player_id) = player_id else {
                    warn!("Dispatch from unknown client at {}", addr);
                    return;
                };

                let relayed = self
                    .relay
                    .accept_from_client(&mut self.world, &player_id, action);
                if let Some(relayed) = relayed {
                    self.broadcast_action(relayed, None);
                }
            }

            Packet::Heartbeat => {
                let known = self.clients.write().await.touch(addr).is_some();
                if known {
                    self.send_packet(Packet::Heartbeat, addr);
                }
            }

            Packet::Disconnect => {
                let removed = {
                    let mut clients = self.clients.write().await;
                    let client_id = clients.find_client_by_addr(addr).map(|c| c.id);
                    client_id.and_then(|id| clients.remove_client(&id))
                };
                if let Some(client) = removed {
                    self.remove_player(&client.player_id);
                }
            }

            other => {
                warn!("Unexpected packet from client at {}: {:?}", addr, other);
            }
        }
    }

    /// Advances the World one tick and broadcasts what came of it.
    fn run_tick(&mut self) {
        let now = self.now_ms();
        update(&mut self.world, now);
        self.tick += 1;

        for action in self.relay.after_tick(&mut self.world, now) {
            self.broadcast_action(action, None);
        }

        if self.tick % 60 == 0 {
            debug!(
                "Tick {}: {} players, {} entities, delta {}ms",
                self.tick,
                self.world.player_ids.len(),
                self.world.entities.len(),
                self.world.clock.delta
            );
        }
    }

    /// Main server loop coordinating all operations
    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_network_receiver();
        self.spawn_network_sender();
        self.spawn_timeout_checker();

        let mut tick_interval = interval(self.tick_duration);
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!("Server started successfully");

        loop {
            tokio::select! {
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            self.handle_packet(packet, addr).await;
                        },
                        Some(ServerMessage::ClientTimeout { client_id, player_id }) => {
                            info!("Client {} timed out", client_id);
                            self.remove_player(&player_id);
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },

                _ = tick_interval.tick() => self.run_tick(),
            }
        }

        Ok(())
    }
}
