use serde::{Deserialize, Serialize};

/// The top-level error object with a location and a typed variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Error {
    #[serde(default)]
    pub location: String,
    #[serde(flatten)]
    pub kind: ErrorKind,
}

/// The error kinds this client reacts to; everything else collapses into
/// [`ErrorKind::Other`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "PascalCase")]
pub enum ErrorKind {
    UnknownUser,
    Blocked,
    BlockedByOther,
    UnknownChannel,
    UnknownMessage,
    CannotEditMessage,
    EmptyMessage,
    PayloadTooLarge,
    UnknownServer,
    InvalidRole,
    MissingPermission { permission: String },
    MissingUserPermission { permission: String },
    NotElevated,
    NotPrivileged,
    CannotGiveMissingPermissions,
    NotOwner,
    InvalidCredentials,
    InvalidSession,
    NotFound,
    NoEffect,
    FailedValidation { error: String },
    InternalError,
    #[serde(other)]
    Other,
}
