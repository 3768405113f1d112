//! Giveaway lifecycle: announce, count down, collect entries, resolve.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    collector::{Participation, ParticipationCollector, ReactionEvent},
    config::Settings,
    countdown::Countdown,
    duration::format_duration,
    error::GiveawayError,
    gateway::{ChatGateway, MessageRef},
    giveaway::{Giveaway, GiveawayId},
    registry::Registry,
    selector::{Resolution, WinnerSelector},
};

#[derive(Debug, Clone)]
pub struct StartRequest {
    pub channel: String,
    pub duration: Duration,
    pub winner_count: usize,
    pub prizes: Vec<String>,
}

/// Handle to a started giveaway. The lifecycle keeps running if this is
/// dropped.
#[derive(Debug)]
pub struct StartedGiveaway {
    pub id: GiveawayId,
    pub announcement: MessageRef,
    pub lifecycle: JoinHandle<Option<Resolution>>,
}

pub fn announcement_text(duration: Duration, prizes: &[String], entry_emoji: &str) -> String {
    format!(
        "🎉 **Giveaway started!** 🎉\n**Prizes:** {}\n**Duration:** {}\nReact with {entry_emoji} to participate!\n\n🔔 **Hurry up! Don't miss your chance!** 🔔",
        prizes.join(", "),
        format_duration(duration)
    )
}

pub struct GiveawayEngine {
    registry: Arc<Registry>,
    gateway: Arc<dyn ChatGateway>,
    settings: Arc<Settings>,
    collector: ParticipationCollector,
    countdown: Countdown,
    selector: Arc<WinnerSelector>,
}

impl GiveawayEngine {
    pub fn new(gateway: Arc<dyn ChatGateway>, settings: Settings, self_id: impl Into<String>) -> Self {
        let settings = Arc::new(settings);
        let registry = Arc::new(Registry::new());
        let selector = WinnerSelector::new(registry.clone(), gateway.clone(), settings.clone());
        Self::assemble(registry, gateway, settings, selector, self_id.into())
    }

    /// Engine whose winner draws are reproducible.
    pub fn with_seed(
        gateway: Arc<dyn ChatGateway>,
        settings: Settings,
        self_id: impl Into<String>,
        seed: u64,
    ) -> Self {
        let settings = Arc::new(settings);
        let registry = Arc::new(Registry::new());
        let selector =
            WinnerSelector::with_seed(registry.clone(), gateway.clone(), settings.clone(), seed);
        Self::assemble(registry, gateway, settings, selector, self_id.into())
    }

    fn assemble(
        registry: Arc<Registry>,
        gateway: Arc<dyn ChatGateway>,
        settings: Arc<Settings>,
        selector: WinnerSelector,
        self_id: String,
    ) -> Self {
        Self {
            collector: ParticipationCollector::new(
                registry.clone(),
                gateway.clone(),
                settings.clone(),
                self_id,
            ),
            countdown: Countdown::new(gateway.clone(), settings.clone()),
            selector: Arc::new(selector),
            registry,
            gateway,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Announce a giveaway and detach its lifecycle task.
    ///
    /// Returns as soon as the announcement is registered. Nothing is sent
    /// or registered when validation fails.
    pub async fn start(&self, request: StartRequest) -> Result<StartedGiveaway, GiveawayError> {
        self.validate(&request)?;

        let StartRequest {
            channel,
            duration,
            winner_count,
            prizes,
        } = request;

        let text = announcement_text(duration, &prizes, &self.settings.entry_emoji);
        let announcement = self.gateway.send_message(&channel, &text).await?;

        if let Err(e) = self
            .gateway
            .add_reaction(&announcement, &self.settings.entry_emoji)
            .await
        {
            warn!(message = %announcement, error = %e, "failed to seed entry reaction");
        }

        let giveaway = Giveaway::new(announcement.clone(), duration, winner_count, prizes)?;
        let snapshot = giveaway.clone();
        let id = self.registry.create(giveaway).await.inspect_err(|e| {
            error!(message = %announcement, error = %e, "failed to register giveaway");
        })?;

        info!(
            giveaway = %id,
            channel = %channel,
            winners = winner_count,
            duration = %format_duration(duration),
            "giveaway started"
        );

        let countdown = self.countdown.clone();
        let selector = self.selector.clone();
        let lifecycle = tokio::spawn(async move {
            countdown.run(&snapshot).await;
            let resolution = selector.resolve(snapshot.id()).await;
            if let Some(resolution) = &resolution {
                countdown.finish(&resolution.giveaway).await;
            }
            resolution
        });

        Ok(StartedGiveaway {
            id,
            announcement,
            lifecycle,
        })
    }

    fn validate(&self, request: &StartRequest) -> Result<(), GiveawayError> {
        if request.winner_count == 0 {
            return Err(GiveawayError::invalid_argument(
                "Number of winners must be a positive number!",
            ));
        }
        if request.prizes.is_empty() {
            return Err(GiveawayError::invalid_argument(
                "Please provide at least one prize.",
            ));
        }
        if request.duration.is_zero() {
            return Err(GiveawayError::InvalidDurationFormat(
                format_duration(request.duration),
            ));
        }
        if request.duration > self.settings.max_duration {
            return Err(GiveawayError::invalid_argument(format!(
                "Giveaway duration cannot be longer than {}.",
                format_duration(self.settings.max_duration)
            )));
        }
        Ok(())
    }

    pub async fn collect(&self, event: &ReactionEvent) -> Participation {
        self.collector.handle(event).await
    }

    pub async fn list_active(&self) -> Vec<Giveaway> {
        self.registry.list_active().await
    }
}
