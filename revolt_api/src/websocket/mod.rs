pub mod connection;
pub mod event_handler;

pub use connection::ConnectionState;
pub use event_handler::*;
