//! Adapter - external control of a block-blast session over TCP
//!
//! External agents (bots, renderers, test harnesses) drive a session through a
//! line-delimited JSON protocol.
//!
//! # Protocol Overview
//!
//! 1. **Connection**: Client connects to the TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Server sends the game state after every change
//! 5. **Commanding**: The controller places pieces or restarts the game
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Handshake with client info and requested capabilities
//! - **command**: `place` a tray piece at a target cell, or `restart`
//! - **control**: Claim or release controller status
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with the assigned role and capabilities
//! - **observation**: Board, tray, score, high score and game-over flag
//! - **event**: `will_place` / `will_clear` with the affected cells and a settle hint
//! - **ack**: Command applied; place commands carry a round report
//! - **error**: Rejection with a stable code and a message
//!
//! # Architecture
//!
//! - [`server`]: tokio accept loop, per-client reader/writer tasks, controller bookkeeping
//! - [`runtime`]: [`Adapter`], a sync handle owning the runtime and the command queue
//! - [`host`]: [`GameHost`], the game-loop side that applies commands to a session
//! - [`protocol`]: message types, parsing and builders
//! - [`config`]: `BLOCK_BLAST_*` environment configuration

pub mod config;
pub mod host;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use block_blast_core as core;
pub use block_blast_engine as engine;
pub use block_blast_types as types;

pub use config::{GameConfig, ServerConfig, PROTOCOL_VERSION};
pub use host::GameHost;
pub use runtime::{Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
