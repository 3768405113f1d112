pub mod auth;
pub mod bulk_message_response;
pub mod channel;
pub mod error_types;
pub mod message;
pub mod user;
pub mod websocket;

// Re-export the main types commonly used
pub use auth::{DataLogin, ResponseLogin};
pub use bulk_message_response::BulkMessageResponse;
pub use channel::Channel;
pub use error_types::{Error as ApiError, ErrorKind};
pub use message::{DataBulkDelete, DataEditMessage, DataMessageSend, Message, ReplyIntent};
pub use user::{DataMemberEdit, Member, MemberCompositeKey, User};
pub use websocket::{ClientToServerEvent, ServerToClientEvent};
