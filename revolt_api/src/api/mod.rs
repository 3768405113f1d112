pub mod auth;
pub mod members;
pub mod messages;
pub mod users;

pub use auth::AuthApi;
pub use members::MembersApi;
pub use messages::{FetchMessagesOptions, MessagesApi};
pub use users::UsersApi;
