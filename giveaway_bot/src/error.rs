use thiserror::Error;

use crate::{gateway::GatewayError, giveaway::GiveawayId};

/// Errors raised by the giveaway engine and its command surface.
///
/// The `Display` text of the validation variants is what users see in chat.
#[derive(Debug, Error)]
pub enum GiveawayError {
    #[error("Invalid duration format. Please use s, m, h, or d.")]
    InvalidDurationFormat(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("giveaway {0} already exists")]
    DuplicateIdentifier(GiveawayId),

    #[error("giveaway {0} not found")]
    NotFound(GiveawayId),

    #[error("missing required role {role}")]
    MissingPermission { role: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl GiveawayError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        GiveawayError::InvalidArgument(msg.into())
    }
}
