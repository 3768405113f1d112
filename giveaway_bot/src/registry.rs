//! Process-wide store of running giveaways.

use std::collections::{HashMap, HashSet};

use tokio::sync::Mutex;

use crate::{
    error::GiveawayError,
    giveaway::{Giveaway, GiveawayId, GiveawayStatus},
};

#[derive(Debug, Default)]
struct Inner {
    active: HashMap<GiveawayId, Entry>,
    /// Ids that were claimed for resolution; never accepted again.
    closed: HashSet<GiveawayId>,
    next_seq: u64,
}

#[derive(Debug)]
struct Entry {
    seq: u64,
    giveaway: Giveaway,
}

/// Single source of truth for giveaway state. Every operation takes the
/// lock once and never awaits while holding it, so each one is atomic with
/// respect to the others.
#[derive(Debug, Default)]
pub struct Registry {
    inner: Mutex<Inner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, giveaway: Giveaway) -> Result<GiveawayId, GiveawayError> {
        let mut inner = self.inner.lock().await;
        let id = giveaway.id().clone();
        if inner.active.contains_key(&id) || inner.closed.contains(&id) {
            return Err(GiveawayError::DuplicateIdentifier(id));
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.active.insert(id.clone(), Entry { seq, giveaway });
        Ok(id)
    }

    /// Snapshot of an active giveaway.
    pub async fn get(&self, id: &GiveawayId) -> Result<Giveaway, GiveawayError> {
        let inner = self.inner.lock().await;
        inner
            .active
            .get(id)
            .map(|e| e.giveaway.clone())
            .ok_or_else(|| GiveawayError::NotFound(id.clone()))
    }

    pub async fn is_active(&self, id: &GiveawayId) -> bool {
        self.inner.lock().await.active.contains_key(id)
    }

    /// Enter `user` into an active giveaway. `Ok(false)` means they were
    /// already in.
    pub async fn add_participant(&self, id: &GiveawayId, user: &str) -> Result<bool, GiveawayError> {
        let mut inner = self.inner.lock().await;
        let entry = inner
            .active
            .get_mut(id)
            .ok_or_else(|| GiveawayError::NotFound(id.clone()))?;
        Ok(entry.giveaway.add_participant(user))
    }

    /// Atomically take a giveaway out of the registry. Whoever gets `Ok`
    /// owns its resolution; the returned value is marked `Resolving`.
    pub async fn remove(&self, id: &GiveawayId) -> Result<Giveaway, GiveawayError> {
        let mut inner = self.inner.lock().await;
        let Entry { mut giveaway, .. } = inner
            .active
            .remove(id)
            .ok_or_else(|| GiveawayError::NotFound(id.clone()))?;
        inner.closed.insert(id.clone());
        giveaway.set_status(GiveawayStatus::Resolving);
        Ok(giveaway)
    }

    /// Active giveaways in creation order.
    pub async fn list_active(&self) -> Vec<Giveaway> {
        let inner = self.inner.lock().await;
        let mut entries: Vec<&Entry> = inner.active.values().collect();
        entries.sort_by_key(|e| e.seq);
        entries.into_iter().map(|e| e.giveaway.clone()).collect()
    }
}
