//! # Game Client Library
//!
//! The first-person client for the arena shooter. It keeps its own copy of
//! the [`shared::World`], applies the local player's input immediately and
//! lets the server's relayed actions and snapshots correct it.
//!
//! ## Architecture Overview
//!
//! ### Client-Side Prediction
//! Input and aim actions go through the dispatcher locally the moment they
//! are produced, then travel to the server. The server's echo of our own
//! input is skipped so a prediction is never applied twice.
//!
//! ### Reconciliation by Snapshot
//! Every few ticks the server broadcasts a `SyncGameState` holding every
//! player. Applying it overwrites whatever the prediction drifted on.
//!
//! ### Offline First
//! The client boots a single-player World before any packet arrives. When
//! the link drops the game keeps running on the last World it had.
//!
//! ## Module Organization
//!
//! - `config`: command line arguments and [`config::ClientConfig`]
//! - `game`: [`game::ClientGame`], the World plus its server session
//! - `input`: [`input::InputManager`], devices to actions
//! - `network`: [`network::NetworkClient`], the socket thread
//! - `rendering`: the macroquad 3-D view and HUD
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::game::ClientGame;
//! use client::network::NetworkClient;
//!
//! let mut game = ClientGame::new(0);
//! let mut network = NetworkClient::connect("127.0.0.1:8080".parse().unwrap(), 0).unwrap();
//! game.connecting();
//!
//! for now_ms in (0..1000).step_by(16) {
//!     for event in network.poll() {
//!         game.handle_event(event, now_ms);
//!     }
//!     game.frame(now_ms);
//! }
//! network.shutdown();
//! ```

pub mod config;
pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
