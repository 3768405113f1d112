use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, warn};

use crate::{
    config::Settings,
    gateway::{ChatGateway, GatewayError},
    giveaway::Giveaway,
};

pub fn progress_text(remaining_secs: u64, entry_emoji: &str) -> String {
    format!(
        "🎉 **Giveaway in progress!** 🎉\nRemaining time: {remaining_secs} seconds\nReact with {entry_emoji} to participate!"
    )
}

pub fn ended_text(giveaway: &Giveaway) -> String {
    format!(
        "🎉 **Giveaway ended!** 🎉\n**Prizes:** {}\nThanks to everyone who took part!",
        giveaway.prizes().join(", ")
    )
}

/// Rewrites a giveaway announcement with the remaining time until expiry.
#[derive(Clone)]
pub struct Countdown {
    gateway: Arc<dyn ChatGateway>,
    settings: Arc<Settings>,
}

impl Countdown {
    pub fn new(gateway: Arc<dyn ChatGateway>, settings: Arc<Settings>) -> Self {
        Self { gateway, settings }
    }

    /// Edit the announcement once per cadence and return at the deadline.
    ///
    /// Each edit is cut off at the deadline, and ticks missed while an edit
    /// was in flight are skipped, so expiry never moves. The shown value is
    /// read from the clock when the edit is sent.
    pub async fn run(&self, giveaway: &Giveaway) {
        let deadline = giveaway.deadline();
        let cadence = self.settings.countdown_interval;
        let announcement = giveaway.announcement();

        let mut tick = giveaway.started();
        let mut editing = true;
        while tick < deadline {
            let now = Instant::now().max(tick);
            let remaining = deadline.saturating_duration_since(now).as_secs();
            if editing {
                let text = progress_text(remaining, &self.settings.entry_emoji);
                match timeout_at(deadline, self.gateway.edit_message(announcement, &text)).await {
                    Ok(Ok(())) => debug!(giveaway = %giveaway.id(), remaining, "countdown updated"),
                    Ok(Err(GatewayError::NotFound(_))) => {
                        warn!(giveaway = %giveaway.id(), "announcement is gone; countdown edits stopped");
                        editing = false;
                    }
                    Ok(Err(e)) => warn!(giveaway = %giveaway.id(), error = %e, "countdown edit failed"),
                    Err(_) => warn!(giveaway = %giveaway.id(), "countdown edit still pending at expiry"),
                }
            }

            tick = next_tick(tick, cadence, deadline, Instant::now());
            sleep_until(tick).await;
        }
    }

    /// Final edit once winners have been drawn.
    pub async fn finish(&self, giveaway: &Giveaway) {
        if let Err(e) = self
            .gateway
            .edit_message(giveaway.announcement(), &ended_text(giveaway))
            .await
        {
            warn!(giveaway = %giveaway.id(), error = %e, "failed to mark announcement as ended");
        }
    }
}

/// First scheduled tick after `now`, capped at `deadline`.
fn next_tick(mut tick: Instant, cadence: Duration, deadline: Instant, now: Instant) -> Instant {
    loop {
        tick = match tick.checked_add(cadence) {
            Some(next) if next < deadline => next,
            _ => return deadline,
        };
        if tick > now {
            return tick;
        }
    }
}
