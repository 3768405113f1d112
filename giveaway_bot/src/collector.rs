use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    config::Settings,
    error::GiveawayError,
    gateway::{ChatGateway, MessageRef},
    giveaway::GiveawayId,
    registry::Registry,
};

/// A "reaction added" notification from the chat platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    pub message: MessageRef,
    pub user: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotAGiveaway,
    WrongSymbol,
    OwnReaction,
    Ineligible,
    RoleLookupFailed,
    /// The giveaway was claimed while the event was being checked.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participation {
    Joined,
    AlreadyJoined,
    Ignored(IgnoreReason),
}

/// Turns reactions on giveaway announcements into entries.
pub struct ParticipationCollector {
    registry: Arc<Registry>,
    gateway: Arc<dyn ChatGateway>,
    settings: Arc<Settings>,
    self_id: String,
}

impl ParticipationCollector {
    pub fn new(
        registry: Arc<Registry>,
        gateway: Arc<dyn ChatGateway>,
        settings: Arc<Settings>,
        self_id: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            gateway,
            settings,
            self_id: self_id.into(),
        }
    }

    pub async fn handle(&self, event: &ReactionEvent) -> Participation {
        let outcome = self.evaluate(event).await;
        debug!(
            message = %event.message,
            user = %event.user,
            ?outcome,
            "reaction processed"
        );
        outcome
    }

    async fn evaluate(&self, event: &ReactionEvent) -> Participation {
        use IgnoreReason::*;

        let id = GiveawayId::from(&event.message);
        if !self.registry.is_active(&id).await {
            return Participation::Ignored(NotAGiveaway);
        }
        if event.symbol != self.settings.entry_emoji {
            return Participation::Ignored(WrongSymbol);
        }
        if event.user == self.self_id {
            return Participation::Ignored(OwnReaction);
        }

        let roles = match self.gateway.list_roles(&event.user).await {
            Ok(roles) => roles,
            Err(e) => {
                warn!(user = %event.user, error = %e, "role lookup failed; treating as ineligible");
                return Participation::Ignored(RoleLookupFailed);
            }
        };
        if !self.settings.may_participate(&roles) {
            return Participation::Ignored(Ineligible);
        }

        match self.registry.add_participant(&id, &event.user).await {
            Ok(true) => Participation::Joined,
            Ok(false) => Participation::AlreadyJoined,
            Err(GiveawayError::NotFound(_)) => Participation::Ignored(Closed),
            Err(e) => {
                warn!(giveaway = %id, error = %e, "unexpected registry error");
                Participation::Ignored(Closed)
            }
        }
    }
}
