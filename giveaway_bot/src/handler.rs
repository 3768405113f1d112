use std::sync::Arc;

use async_trait::async_trait;
use revolt_api::{
    event_handler::{MessageReactEvent, ReadyEvent},
    types::Message,
    EventHandler, RevoltClient,
};
use tracing::{debug, error, info};

use crate::{
    collector::ReactionEvent,
    commands::{CommandContext, CommandSurface},
    engine::GiveawayEngine,
    gateway::MessageRef,
};

/// Routes socket events into the giveaway engine.
#[derive(Clone)]
pub struct GiveawayHandler {
    engine: Arc<GiveawayEngine>,
    commands: Arc<CommandSurface>,
    self_id: String,
}

impl GiveawayHandler {
    pub fn new(engine: Arc<GiveawayEngine>, commands: Arc<CommandSurface>, self_id: impl Into<String>) -> Self {
        Self {
            engine,
            commands,
            self_id: self_id.into(),
        }
    }
}

#[async_trait]
impl EventHandler for GiveawayHandler {
    async fn on_error_event(&self, _client: &RevoltClient, error_id: &str) {
        error!(error = error_id, "socket reported an error");
    }

    async fn on_authenticated(&self, _client: &RevoltClient) {
        debug!("socket authenticated");
    }

    async fn on_ready(&self, _client: &RevoltClient, ready: &ReadyEvent) {
        info!(
            servers = ready.servers.len(),
            channels = ready.channels.len(),
            "connected and ready"
        );
    }

    async fn on_message(&self, _client: &RevoltClient, message: &Message) {
        if message.author == self.self_id {
            return;
        }
        let Some(content) = message.content.as_deref() else {
            return;
        };

        let ctx = CommandContext {
            channel: message.channel.clone(),
            author: message.author.clone(),
        };
        self.commands.dispatch(&ctx, content).await;
    }

    async fn on_message_react(&self, _client: &RevoltClient, react: &MessageReactEvent) {
        let event = ReactionEvent {
            message: MessageRef::new(react.channel_id.clone(), react.id.clone()),
            user: react.user_id.clone(),
            symbol: react.emoji_id.clone(),
        };
        self.engine.collect(&event).await;
    }
}
