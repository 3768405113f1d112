//! In-memory [`ChatGateway`] that records every call.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ulid::Ulid;

use crate::gateway::{ChatGateway, GatewayError, MessageRef};

#[derive(Debug, Default)]
struct State {
    sent: Vec<(String, String)>,
    edits: Vec<(MessageRef, String)>,
    deleted: Vec<MessageRef>,
    reactions: Vec<(MessageRef, String)>,
    direct: Vec<(String, String)>,
    granted: Vec<(String, String)>,
    purged: Vec<(String, usize)>,
    roles: HashMap<String, HashSet<String>>,
    blocked_dms: HashSet<String>,
    failing_roles: HashSet<String>,
    broken_roles_lookup: HashSet<String>,
    missing_messages: HashSet<String>,
    purge_count: usize,
    edit_delay: Option<Duration>,
}

#[derive(Debug, Default)]
pub struct RecordingGateway {
    state: Mutex<State>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roles(self, user: &str, roles: &[&str]) -> Self {
        self.state.lock().unwrap().roles.insert(
            user.to_string(),
            roles.iter().map(|r| r.to_string()).collect(),
        );
        self
    }

    pub fn block_dms(self, user: &str) -> Self {
        self.state.lock().unwrap().blocked_dms.insert(user.to_string());
        self
    }

    pub fn fail_role_grant(self, user: &str) -> Self {
        self.state.lock().unwrap().failing_roles.insert(user.to_string());
        self
    }

    pub fn break_role_lookup(self, user: &str) -> Self {
        self.state.lock().unwrap().broken_roles_lookup.insert(user.to_string());
        self
    }

    pub fn with_purge_count(self, count: usize) -> Self {
        self.state.lock().unwrap().purge_count = count;
        self
    }

    /// Record edits when they are sent but answer only after `delay`.
    pub fn with_edit_delay(self, delay: Duration) -> Self {
        self.state.lock().unwrap().edit_delay = Some(delay);
        self
    }

    /// Make edits of `message` fail as if it had been deleted.
    pub fn lose_message(&self, message: &MessageRef) {
        self.state.lock().unwrap().missing_messages.insert(message.id.clone());
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().sent.clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }

    pub fn edits(&self) -> Vec<(MessageRef, String)> {
        self.state.lock().unwrap().edits.clone()
    }

    pub fn deleted(&self) -> Vec<MessageRef> {
        self.state.lock().unwrap().deleted.clone()
    }

    pub fn reactions(&self) -> Vec<(MessageRef, String)> {
        self.state.lock().unwrap().reactions.clone()
    }

    pub fn direct_messages(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().direct.clone()
    }

    pub fn granted(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().granted.clone()
    }

    pub fn purged(&self) -> Vec<(String, usize)> {
        self.state.lock().unwrap().purged.clone()
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn send_message(&self, channel: &str, text: &str) -> Result<MessageRef, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.sent.push((channel.to_string(), text.to_string()));
        Ok(MessageRef::new(channel, Ulid::new().to_string()))
    }

    async fn edit_message(&self, message: &MessageRef, text: &str) -> Result<(), GatewayError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            if state.missing_messages.contains(&message.id) {
                return Err(GatewayError::NotFound(message.to_string()));
            }
            state.edits.push((message.clone(), text.to_string()));
            state.edit_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(())
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), GatewayError> {
        self.state.lock().unwrap().deleted.push(message.clone());
        Ok(())
    }

    async fn add_reaction(&self, message: &MessageRef, symbol: &str) -> Result<(), GatewayError> {
        self.state
            .lock()
            .unwrap()
            .reactions
            .push((message.clone(), symbol.to_string()));
        Ok(())
    }

    async fn send_direct_message(&self, user: &str, text: &str) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.blocked_dms.contains(user) {
            return Err(GatewayError::Blocked(user.to_string()));
        }
        state.direct.push((user.to_string(), text.to_string()));
        Ok(())
    }

    async fn assign_role(&self, user: &str, role: &str) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.failing_roles.contains(user) {
            return Err(GatewayError::Permission(role.to_string()));
        }
        state.granted.push((user.to_string(), role.to_string()));
        Ok(())
    }

    async fn list_roles(&self, user: &str) -> Result<HashSet<String>, GatewayError> {
        let state = self.state.lock().unwrap();
        if state.broken_roles_lookup.contains(user) {
            return Err(GatewayError::NotFound(user.to_string()));
        }
        Ok(state.roles.get(user).cloned().unwrap_or_default())
    }

    async fn purge_channel(&self, channel: &str, limit: usize) -> Result<usize, GatewayError> {
        let mut state = self.state.lock().unwrap();
        state.purged.push((channel.to_string(), limit));
        Ok(state.purge_count.min(limit))
    }
}
