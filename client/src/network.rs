//! Client network layer.
//!
//! The socket lives on a background thread running its own current-thread
//! tokio runtime, so the render loop never blocks on I/O. The render loop
//! queues [`Packet`]s with [`NetworkClient::send`] and drains
//! [`NetworkEvent`]s with [`NetworkClient::poll`] once per frame.

use log::{debug, error, info, warn};
use shared::protocol::MAX_PACKET_SIZE;
use shared::{Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep};

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Silence after which the link is reported down.
pub const LINK_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkEvent {
    Packet(Packet),
    LinkUp,
    LinkDown { reason: String },
}

pub struct NetworkClient {
    outgoing: mpsc::UnboundedSender<Packet>,
    incoming: mpsc::UnboundedReceiver<NetworkEvent>,
    thread: Option<JoinHandle<()>>,
}

impl NetworkClient {
    /// Starts the network thread and sends `Connect` to `server`.
    pub fn connect(
        server: SocketAddr,
        fake_ping_ms: u64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let (outgoing, outgoing_rx) = mpsc::unbounded_channel();
        let (incoming_tx, incoming) = mpsc::unbounded_channel();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let thread = std::thread::Builder::new()
            .name("network".to_string())
            .spawn(move || {
                let events = incoming_tx.clone();
                if let Err(e) = runtime.block_on(run_link(server, fake_ping_ms, outgoing_rx, incoming_tx)) {
                    error!("Network thread stopped: {}", e);
                    let _ = events.send(NetworkEvent::LinkDown {
                        reason: e.to_string(),
                    });
                }
            })?;

        outgoing.send(Packet::Connect {
            client_version: PROTOCOL_VERSION,
        })?;

        Ok(Self {
            outgoing,
            incoming,
            thread: Some(thread),
        })
    }

    pub fn send(&self, packet: Packet) {
        if self.outgoing.send(packet).is_err() {
            debug!("Network thread gone, dropping packet");
        }
    }

    /// Every event that arrived since the last call.
    pub fn poll(&mut self) -> Vec<NetworkEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.incoming.try_recv() {
            events.push(event);
        }
        events
    }

    /// Sends `Disconnect` and waits for the network thread to finish.
    pub fn shutdown(mut self) {
        self.send(Packet::Disconnect);
        let (closed, _) = mpsc::unbounded_channel();
        drop(std::mem::replace(&mut self.outgoing, closed));
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Network thread panicked");
            }
        }
    }
}

async fn run_link(
    server: SocketAddr,
    fake_ping_ms: u64,
    mut outgoing: mpsc::UnboundedReceiver<Packet>,
    events: mpsc::UnboundedSender<NetworkEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let socket = Arc::new(UdpSocket::bind("0.0.0.0:0").await?);
    socket.connect(server).await?;
    info!("Network link {} -> {}", socket.local_addr()?, server);

    let delay = Duration::from_millis(fake_ping_ms / 2);
    let mut buffer = vec![0u8; MAX_PACKET_SIZE];
    let first_beat = tokio::time::Instant::now() + HEARTBEAT_INTERVAL;
    let mut heartbeat = interval_at(first_beat, HEARTBEAT_INTERVAL);
    let mut last_heard = Instant::now();
    let mut link_up = false;
    let mut reported_down = false;

    loop {
        tokio::select! {
            biased;

            packet = outgoing.recv() => {
                let Some(packet) = packet else {
                    break;
                };
                let data = packet.encode()?;
                let disconnecting = packet == Packet::Disconnect;
                if delay.is_zero() || disconnecting {
                    if let Err(e) = socket.send(&data).await {
                        warn!("Failed to send packet: {}", e);
                    }
                } else {
                    let socket = Arc::clone(&socket);
                    tokio::spawn(async move {
                        sleep(delay).await;
                        if let Err(e) = socket.send(&data).await {
                            warn!("Failed to send packet: {}", e);
                        }
                    });
                }
            }

            received = socket.recv(&mut buffer) => {
                let len = match received {
                    Ok(len) => len,
                    Err(e) => {
                        debug!("Receive failed: {}", e);
                        continue;
                    }
                };
                let packet = match Packet::decode(&buffer[..len]) {
                    Ok(packet) => packet,
                    Err(e) => {
                        warn!("Dropping undecodable packet: {}", e);
                        continue;
                    }
                };

                last_heard = Instant::now();
                if !link_up {
                    link_up = true;
                    reported_down = false;
                    let _ = events.send(NetworkEvent::LinkUp);
                }
                if delay.is_zero() {
                    let _ = events.send(NetworkEvent::Packet(packet));
                } else {
                    let events = events.clone();
                    tokio::spawn(async move {
                        sleep(delay).await;
                        let _ = events.send(NetworkEvent::Packet(packet));
                    });
                }
            }

            _ = heartbeat.tick() => {
                if !reported_down && last_heard.elapsed() > LINK_TIMEOUT {
                    let reason = if link_up {
                        "server stopped responding"
                    } else {
                        "no reply from server"
                    };
                    link_up = false;
                    reported_down = true;
                    let _ = events.send(NetworkEvent::LinkDown {
                        reason: reason.to_string(),
                    });
                }
                if let Err(e) = socket.send(&Packet::Heartbeat.encode()?).await {
                    debug!("Heartbeat failed: {}", e);
                }
            }
        }
    }

    Ok(())
}
