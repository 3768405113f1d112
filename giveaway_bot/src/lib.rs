//! Timed, role-gated giveaways for a Revolt server.
//!
//! An organizer runs `!giveaway 1h 2 "Gift card" Sticker`; members react
//! with the entry emoji to take part; when the time is up winners are drawn
//! at random, announced, messaged and given the winner role.
//!
//! [`engine::GiveawayEngine`] drives each giveaway's lifecycle against the
//! [`gateway::ChatGateway`] trait; [`revolt_gateway::RevoltGateway`] is the
//! production implementation and [`handler::GiveawayHandler`] feeds it
//! events from the Revolt socket.

pub mod collector;
pub mod commands;
pub mod config;
pub mod countdown;
pub mod duration;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod giveaway;
pub mod handler;
pub mod registry;
pub mod revolt_gateway;
pub mod selector;

#[cfg(test)]
mod testing;

pub use config::{BotConfig, ConfigError, Settings};
pub use engine::{GiveawayEngine, StartRequest, StartedGiveaway};
pub use error::GiveawayError;
pub use gateway::{ChatGateway, GatewayError, MessageRef};
pub use giveaway::{Giveaway, GiveawayId, GiveawayStatus};
