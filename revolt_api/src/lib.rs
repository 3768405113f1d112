//! # Revolt API
//!
//! An asynchronous Rust client for the Revolt chat platform, covering the
//! surface a community bot needs: messages and reactions, direct messages,
//! server members and the event WebSocket. It uses `tokio` for the async
//! runtime, `reqwest` for HTTP and `tokio-tungstenite` for the socket.

pub mod api;
pub mod client;
pub mod error;
pub mod types;
pub mod util;
pub mod websocket;

pub use api::{AuthApi, MembersApi, MessagesApi, UsersApi};
pub use client::{parse_json_if_ok, Credentials, RevoltClient};
pub use error::RevoltError;
pub use websocket::{event_handler, ConnectionState, EventHandler};
