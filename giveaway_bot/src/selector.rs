//! Draws winners once a giveaway expires.

use std::sync::Arc;

use rand::{rngs::StdRng, seq::IndexedRandom, SeedableRng};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::{
    config::Settings,
    gateway::{mention, ChatGateway, GatewayError},
    giveaway::{Giveaway, GiveawayId, GiveawayStatus},
    registry::Registry,
};

pub const NO_PARTICIPANTS: &str = "No participants for this giveaway.";

pub fn winner_announcement(user: &str, prize: &str) -> String {
    format!(
        "🎉 **Congratulations {}!** 🎉\nYou won **{prize}**! 🎁",
        mention(user)
    )
}

pub fn winner_direct_message(prize: &str) -> String {
    format!("🎉 Congratulations! You won **{prize}** in our giveaway!")
}

/// What happened for one drawn winner. Each step is attempted regardless of
/// the others.
#[derive(Debug, Clone)]
pub struct WinnerOutcome {
    pub user: String,
    pub prize: String,
    pub announced: Result<(), GatewayError>,
    pub notified: Result<(), GatewayError>,
    pub role_granted: Result<(), GatewayError>,
}

#[derive(Debug, Clone)]
pub struct Resolution {
    /// The giveaway as it was claimed, now `Closed`.
    pub giveaway: Giveaway,
    /// Winners in draw order. Empty when nobody entered.
    pub winners: Vec<WinnerOutcome>,
}

pub struct WinnerSelector {
    registry: Arc<Registry>,
    gateway: Arc<dyn ChatGateway>,
    settings: Arc<Settings>,
    rng: Mutex<StdRng>,
}

impl WinnerSelector {
    pub fn new(registry: Arc<Registry>, gateway: Arc<dyn ChatGateway>, settings: Arc<Settings>) -> Self {
        Self::with_rng(registry, gateway, settings, StdRng::from_os_rng())
    }

    /// Deterministic draws for a given seed.
    pub fn with_seed(
        registry: Arc<Registry>,
        gateway: Arc<dyn ChatGateway>,
        settings: Arc<Settings>,
        seed: u64,
    ) -> Self {
        Self::with_rng(registry, gateway, settings, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        registry: Arc<Registry>,
        gateway: Arc<dyn ChatGateway>,
        settings: Arc<Settings>,
        rng: StdRng,
    ) -> Self {
        Self {
            registry,
            gateway,
            settings,
            rng: Mutex::new(rng),
        }
    }

    /// Claim the giveaway and resolve it. Returns `None` when somebody else
    /// already claimed it.
    pub async fn resolve(&self, id: &GiveawayId) -> Option<Resolution> {
        let mut giveaway = match self.registry.remove(id).await {
            Ok(g) => g,
            Err(e) => {
                error!(giveaway = %id, error = %e, "giveaway could not be claimed for resolution");
                return None;
            }
        };
        debug_assert_eq!(giveaway.status(), GiveawayStatus::Resolving);

        let channel = giveaway.announcement().channel.clone();
        let drawn = self.draw(&giveaway).await;

        if drawn.is_empty() {
            info!(giveaway = %id, "giveaway ended without participants");
            if let Err(e) = self.gateway.send_message(&channel, NO_PARTICIPANTS).await {
                warn!(giveaway = %id, error = %e, "failed to announce empty giveaway");
            }
        }

        let mut winners = Vec::with_capacity(drawn.len());
        for (position, user) in drawn.into_iter().enumerate() {
            let prize = giveaway
                .prize_for(position, &self.settings.placeholder_prize)
                .to_string();
            winners.push(self.reward(&giveaway, &channel, user, prize).await);
        }

        giveaway.set_status(GiveawayStatus::Closed);
        info!(giveaway = %id, winners = winners.len(), "giveaway resolved");
        Some(Resolution { giveaway, winners })
    }

    async fn draw(&self, giveaway: &Giveaway) -> Vec<String> {
        let pool: Vec<&String> = giveaway.participants().iter().collect();
        let count = giveaway.winner_count().min(pool.len());

        let mut rng = self.rng.lock().await;
        pool.choose_multiple(&mut *rng, count)
            .map(|user| (*user).clone())
            .collect()
    }

    async fn reward(&self, giveaway: &Giveaway, channel: &str, user: String, prize: String) -> WinnerOutcome {
        let id = giveaway.id();

        let announced = self
            .gateway
            .send_message(channel, &winner_announcement(&user, &prize))
            .await
            .map(|_| ());
        if let Err(e) = &announced {
            warn!(giveaway = %id, user = %user, error = %e, "failed to announce winner");
        }

        let notified = self
            .gateway
            .send_direct_message(&user, &winner_direct_message(&prize))
            .await;
        if let Err(e) = &notified {
            warn!(giveaway = %id, user = %user, error = %e, "could not DM winner");
        }

        let role_granted = self
            .gateway
            .assign_role(&user, &self.settings.winner_role)
            .await;
        if let Err(e) = &role_granted {
            warn!(giveaway = %id, user = %user, error = %e, "failed to grant winner role");
        }

        WinnerOutcome {
            user,
            prize,
            announced,
            notified,
            role_granted,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::time::Duration;

    use super::*;
    use crate::{gateway::MessageRef, testing::RecordingGateway};

    async fn seeded(
        gateway: &Arc<RecordingGateway>,
        winners: usize,
        prizes: &[&str],
        users: &[&str],
        seed: u64,
    ) -> (Arc<Registry>, WinnerSelector, GiveawayId) {
        let registry = Arc::new(Registry::new());
        let giveaway = Giveaway::new(
            MessageRef::new("chan", "announce"),
            Duration::from_secs(10),
            winners,
            prizes.iter().map(|p| p.to_string()).collect(),
        )
        .unwrap();
        let id = registry.create(giveaway).await.unwrap();
        for user in users {
            registry.add_participant(&id, user).await.unwrap();
        }

        let selector = WinnerSelector::with_seed(
            registry.clone(),
            gateway.clone(),
            Arc::new(Settings::default()),
            seed,
        );
        (registry, selector, id)
    }

    #[tokio::test]
    async fn resolves_exactly_once_under_concurrency() {
        let gateway = Arc::new(RecordingGateway::new());
        let (registry, selector, id) = seeded(&gateway, 1, &["X"], &["alice", "bob"], 7).await;

        let (a, b) = tokio::join!(selector.resolve(&id), selector.resolve(&id));

        assert_eq!(a.is_some() as u8 + b.is_some() as u8, 1);
        assert!(registry.list_active().await.is_empty());
        assert_eq!(gateway.granted().len(), 1);
    }

    #[tokio::test]
    async fn never_draws_more_winners_than_participants() {
        let gateway = Arc::new(RecordingGateway::new());
        let (_, selector, id) = seeded(&gateway, 5, &["X"], &["a", "b", "c"], 1).await;

        let resolution = selector.resolve(&id).await.unwrap();
        let users: HashSet<&str> = resolution.winners.iter().map(|w| w.user.as_str()).collect();
        assert_eq!(resolution.winners.len(), 3);
        assert_eq!(users, HashSet::from(["a", "b", "c"]));
        assert_eq!(resolution.giveaway.status(), GiveawayStatus::Closed);
    }

    #[tokio::test]
    async fn extra_winners_get_the_placeholder_prize() {
        let gateway = Arc::new(RecordingGateway::new());
        let (_, selector, id) = seeded(&gateway, 3, &["Nitro", "Sticker"], &["a", "b", "c"], 3).await;

        let resolution = selector.resolve(&id).await.unwrap();
        let prizes: Vec<&str> = resolution.winners.iter().map(|w| w.prize.as_str()).collect();
        assert_eq!(prizes, ["Nitro", "Sticker", "Mystery Prize"]);

        let third = &resolution.winners[2];
        assert!(gateway
            .sent_texts()
            .contains(&winner_announcement(&third.user, "Mystery Prize")));
    }

    #[tokio::test]
    async fn empty_pool_announces_and_grants_nothing() {
        let gateway = Arc::new(RecordingGateway::new());
        let (registry, selector, id) = seeded(&gateway, 2, &["X"], &[], 0).await;

        let resolution = selector.resolve(&id).await.unwrap();
        assert!(resolution.winners.is_empty());
        assert_eq!(gateway.sent_texts(), [NO_PARTICIPANTS]);
        assert!(gateway.granted().is_empty());
        assert!(!registry.is_active(&id).await);
    }

    #[tokio::test]
    async fn equal_seeds_draw_equal_winners() {
        let users = ["u1", "u2", "u3", "u4", "u5", "u6", "u7", "u8"];
        let mut draws = Vec::new();
        for _ in 0..2 {
            let gateway = Arc::new(RecordingGateway::new());
            let (_, selector, id) = seeded(&gateway, 3, &["X"], &users, 42).await;
            let resolution = selector.resolve(&id).await.unwrap();
            draws.push(
                resolution
                    .winners
                    .into_iter()
                    .map(|w| w.user)
                    .collect::<Vec<_>>(),
            );
        }
        assert_eq!(draws[0], draws[1]);
    }

    #[tokio::test]
    async fn blocked_dm_does_not_stop_the_role_grant() {
        let gateway = Arc::new(RecordingGateway::new().block_dms("alice"));
        let (_, selector, id) = seeded(&gateway, 1, &["X"], &["alice"], 0).await;

        let resolution = selector.resolve(&id).await.unwrap();
        let outcome = &resolution.winners[0];
        assert!(matches!(outcome.notified, Err(GatewayError::Blocked(_))));
        assert!(outcome.announced.is_ok());
        assert!(outcome.role_granted.is_ok());
        assert_eq!(gateway.granted(), [("alice".to_string(), "winner".to_string())]);
    }

    #[tokio::test]
    async fn failed_role_grant_is_isolated_per_winner() {
        let gateway = Arc::new(RecordingGateway::new().fail_role_grant("a"));
        let (_, selector, id) = seeded(&gateway, 2, &["X", "Y"], &["a", "b"], 9).await;

        let resolution = selector.resolve(&id).await.unwrap();
        for w in &resolution.winners {
            assert_eq!(w.role_granted.is_ok(), w.user == "b");
            assert!(w.notified.is_ok());
        }
        assert_eq!(gateway.granted(), [("b".to_string(), "winner".to_string())]);
        assert_eq!(gateway.direct_messages().len(), 2);
    }
}
