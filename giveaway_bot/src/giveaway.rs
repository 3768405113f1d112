use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::{error::GiveawayError, gateway::MessageRef};

/// Stable key of a giveaway: the id of its announcement message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GiveawayId(String);

impl GiveawayId {
    pub fn new(id: impl Into<String>) -> Self {
        GiveawayId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GiveawayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&MessageRef> for GiveawayId {
    fn from(message: &MessageRef) -> Self {
        GiveawayId(message.id.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GiveawayStatus {
    /// Accepting participants.
    Active,
    /// Claimed by the winner selector; no more entries.
    Resolving,
    /// Winners announced.
    Closed,
}

/// A timed, prize-bearing participation event tied to one announcement.
///
/// Duration, winner count and prizes are fixed at construction; only the
/// registry adds participants and moves the status forward.
#[derive(Debug, Clone)]
pub struct Giveaway {
    id: GiveawayId,
    announcement: MessageRef,
    duration: Duration,
    winner_count: usize,
    prizes: Vec<String>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    started: Instant,
    deadline: Instant,
    participants: BTreeSet<String>,
    status: GiveawayStatus,
}

impl Giveaway {
    pub fn new(
        announcement: MessageRef,
        duration: Duration,
        winner_count: usize,
        prizes: Vec<String>,
    ) -> Result<Self, GiveawayError> {
        if winner_count == 0 {
            return Err(GiveawayError::invalid_argument(
                "Number of winners must be a positive number!",
            ));
        }
        if prizes.is_empty() {
            return Err(GiveawayError::invalid_argument(
                "Please provide at least one prize.",
            ));
        }

        let too_long = || GiveawayError::invalid_argument("That giveaway duration is too long.");
        let start_time = Utc::now();
        let end_time = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|d| start_time.checked_add_signed(d))
            .ok_or_else(too_long)?;
        let started = Instant::now();
        let deadline = started.checked_add(duration).ok_or_else(too_long)?;

        Ok(Self {
            id: GiveawayId::from(&announcement),
            announcement,
            duration,
            winner_count,
            prizes,
            start_time,
            end_time,
            started,
            deadline,
            participants: BTreeSet::new(),
            status: GiveawayStatus::Active,
        })
    }

    pub fn id(&self) -> &GiveawayId {
        &self.id
    }

    pub fn announcement(&self) -> &MessageRef {
        &self.announcement
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn winner_count(&self) -> usize {
        self.winner_count
    }

    pub fn prizes(&self) -> &[String] {
        &self.prizes
    }

    /// Prize for the winner drawn at `position`, or `placeholder` once the
    /// prize list is exhausted.
    pub fn prize_for<'a>(&'a self, position: usize, placeholder: &'a str) -> &'a str {
        self.prizes
            .get(position)
            .map(String::as_str)
            .unwrap_or(placeholder)
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    /// Monotonic instant the countdown started from.
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Monotonic instant at which the giveaway expires.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn participants(&self) -> &BTreeSet<String> {
        &self.participants
    }

    pub fn status(&self) -> GiveawayStatus {
        self.status
    }

    /// Returns `false` when `user` was already entered.
    pub(crate) fn add_participant(&mut self, user: &str) -> bool {
        if self.participants.contains(user) {
            return false;
        }
        self.participants.insert(user.to_string())
    }

    pub(crate) fn set_status(&mut self, status: GiveawayStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(prizes: &[&str]) -> Giveaway {
        Giveaway::new(
            MessageRef::new("chan", "msg-1"),
            Duration::from_secs(60),
            2,
            prizes.iter().map(|p| p.to_string()).collect(),
        )
        .unwrap()
    }

    #[test]
    fn id_comes_from_the_announcement() {
        let g = sample(&["X"]);
        assert_eq!(g.id().as_str(), "msg-1");
        assert_eq!(g.status(), GiveawayStatus::Active);
    }

    #[tokio::test]
    async fn end_time_is_start_plus_duration() {
        let g = sample(&["X"]);
        assert_eq!(g.end_time() - g.start_time(), chrono::Duration::seconds(60));
        assert_eq!(g.deadline() - g.started(), Duration::from_secs(60));
    }

    #[test]
    fn prizes_fall_back_to_placeholder() {
        let g = sample(&["Nitro", "Sticker"]);
        assert_eq!(g.prize_for(0, "Mystery Prize"), "Nitro");
        assert_eq!(g.prize_for(1, "Mystery Prize"), "Sticker");
        assert_eq!(g.prize_for(2, "Mystery Prize"), "Mystery Prize");
    }

    #[test]
    fn participants_are_unique() {
        let mut g = sample(&["X"]);
        assert!(g.add_participant("alice"));
        assert!(!g.add_participant("alice"));
        assert_eq!(g.participants().len(), 1);
    }

    #[test]
    fn rejects_zero_winners_and_empty_prizes() {
        let zero = Giveaway::new(MessageRef::new("c", "m"), Duration::from_secs(1), 0, vec!["X".into()]);
        assert!(matches!(zero, Err(GiveawayError::InvalidArgument(_))));

        let empty = Giveaway::new(MessageRef::new("c", "m"), Duration::from_secs(1), 1, vec![]);
        assert!(matches!(empty, Err(GiveawayError::InvalidArgument(_))));
    }

    #[test]
    fn absurd_durations_are_rejected() {
        let result = Giveaway::new(
            MessageRef::new("c", "m"),
            Duration::from_secs(u64::MAX),
            1,
            vec!["X".into()],
        );
        assert!(matches!(result, Err(GiveawayError::InvalidArgument(_))));
    }
}
