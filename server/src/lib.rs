//! # Game Server Library
//!
//! The authoritative server for the arena shooter. It owns the canonical
//! [`shared::World`], runs the same system pipeline the clients predict
//! with, validates what clients forward and relays accepted actions to
//! everyone.
//!
//! ## Core Responsibilities
//!
//! ### Authoritative Simulation
//! Every tick the server advances its World with [`shared::update`]. Deaths,
//! respawns and periodic full snapshots are decided here and broadcast as
//! ordinary actions, so clients apply them through the same dispatcher
//! they use for local input.
//!
//! ### Client Management
//! Handles the lifecycle of client connections:
//! - Connection establishment and player assignment (`p<n>`)
//! - Validation of forwarded actions: a client may only steer its own player
//! - Disconnection and timeout cleanup
//!
//! ## Architecture Design
//!
//! ### Single-Threaded Event Loop
//! All World mutation happens on one task. Socket reads, socket writes and
//! the timeout sweep run as separate tokio tasks that talk to the main loop
//! over unbounded channels, so the simulation never waits on I/O.
//!
//! ### UDP-Based Communication
//! One bincode-encoded [`shared::Packet`] per datagram. Lost relays are
//! repaired by the next `SyncGameState` snapshot.
//!
//! ## Module Organization
//!
//! - `config`: command line arguments and [`config::ServerConfig`]
//! - `client_manager`: the client roster, capacity and timeouts
//! - `network`: the [`network::Server`] with its tasks and main loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig {
//!         bind_addr: "127.0.0.1:8080".to_string(),
//!         ..ServerConfig::default()
//!     };
//!     let mut server = Server::new(&config).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod client_manager;
pub mod config;
pub mod network;
