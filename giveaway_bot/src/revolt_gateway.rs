use std::collections::HashSet;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use revolt_api::{
    api::FetchMessagesOptions, types::ErrorKind, MembersApi, MessagesApi, RevoltClient,
    RevoltError, UsersApi,
};
use tracing::{debug, warn};
use ulid::Ulid;

use crate::gateway::{ChatGateway, GatewayError, MessageRef};

/// Upper bound the Revolt API accepts for a single fetch or bulk delete.
const MAX_PURGE: usize = 100;

/// Bulk delete only accepts messages younger than a week. The hour of slack
/// covers clock skew and the time between fetch and delete.
const BULK_DELETE_MAX_AGE: Duration = Duration::from_secs(7 * 24 * 3600 - 3600);

/// [`ChatGateway`] backed by the Revolt REST API. Roles are read from and
/// granted on the members of one server.
#[derive(Clone)]
pub struct RevoltGateway {
    client: RevoltClient,
    server_id: String,
}

impl RevoltGateway {
    pub fn new(client: RevoltClient, server_id: impl Into<String>) -> Self {
        Self {
            client,
            server_id: server_id.into(),
        }
    }
}

/// Map a Revolt failure onto the gateway taxonomy. `fallback` wraps errors
/// that have no better match.
fn classify(err: RevoltError, fallback: fn(String) -> GatewayError) -> GatewayError {
    let detail = err.to_string();
    match err.api_kind() {
        Some(
            ErrorKind::NotFound
            | ErrorKind::UnknownUser
            | ErrorKind::UnknownChannel
            | ErrorKind::UnknownMessage
            | ErrorKind::UnknownServer
            | ErrorKind::InvalidRole,
        ) => GatewayError::NotFound(detail),
        Some(ErrorKind::Blocked | ErrorKind::BlockedByOther) => GatewayError::Blocked(detail),
        Some(
            ErrorKind::MissingPermission { .. }
            | ErrorKind::MissingUserPermission { .. }
            | ErrorKind::NotElevated
            | ErrorKind::NotPrivileged
            | ErrorKind::CannotGiveMissingPermissions
            | ErrorKind::NotOwner,
        ) => GatewayError::Permission(detail),
        _ => match err.status() {
            Some(404) => GatewayError::NotFound(detail),
            Some(403) => GatewayError::Permission(detail),
            _ => fallback(detail),
        },
    }
}

#[async_trait]
impl ChatGateway for RevoltGateway {
    async fn send_message(&self, channel: &str, text: &str) -> Result<MessageRef, GatewayError> {
        let message = self
            .client
            .send_message(channel, text, None)
            .await
            .map_err(|e| classify(e, GatewayError::Delivery))?;
        Ok(MessageRef::new(message.channel, message.id))
    }

    async fn edit_message(&self, message: &MessageRef, text: &str) -> Result<(), GatewayError> {
        self.client
            .edit_message(&message.channel, &message.id, text)
            .await
            .map(|_| ())
            .map_err(|e| classify(e, GatewayError::Edit))
    }

    async fn delete_message(&self, message: &MessageRef) -> Result<(), GatewayError> {
        self.client
            .delete_message(&message.channel, &message.id)
            .await
            .map_err(|e| classify(e, GatewayError::Delivery))
    }

    async fn add_reaction(&self, message: &MessageRef, symbol: &str) -> Result<(), GatewayError> {
        self.client
            .add_reaction(&message.channel, &message.id, symbol)
            .await
            .map_err(|e| classify(e, GatewayError::Delivery))
    }

    async fn send_direct_message(&self, user: &str, text: &str) -> Result<(), GatewayError> {
        let dm = self
            .client
            .open_dm(user)
            .await
            .map_err(|e| classify(e, GatewayError::Blocked))?;
        self.client
            .send_message(&dm.id, text, None)
            .await
            .map(|_| ())
            .map_err(|e| classify(e, GatewayError::Blocked))
    }

    async fn assign_role(&self, user: &str, role: &str) -> Result<(), GatewayError> {
        let added = self
            .client
            .add_member_role(&self.server_id, user, role)
            .await
            .map_err(|e| classify(e, GatewayError::Permission))?;
        if !added {
            debug!(user, role, "member already holds role");
        }
        Ok(())
    }

    async fn list_roles(&self, user: &str) -> Result<HashSet<String>, GatewayError> {
        let member = self
            .client
            .fetch_member(&self.server_id, user)
            .await
            .map_err(|e| classify(e, GatewayError::NotFound))?;
        Ok(member.roles.into_iter().collect())
    }

    async fn purge_channel(&self, channel: &str, limit: usize) -> Result<usize, GatewayError> {
        let limit = limit.clamp(1, MAX_PURGE);
        let opts = FetchMessagesOptions {
            limit: Some(limit as i64),
            sort: Some("Latest".to_string()),
            ..Default::default()
        };
        let ids: Vec<String> = self
            .client
            .fetch_messages(channel, Some(opts))
            .await
            .map_err(|e| classify(e, GatewayError::Delivery))?
            .into_messages()
            .into_iter()
            .map(|m| m.id)
            .collect();

        let (recent, old) = split_by_age(ids, SystemTime::now());
        let mut deleted = 0;
        let mut first_error = None;

        if !recent.is_empty() {
            let batch = recent.len();
            match self.client.bulk_delete_messages(channel, recent).await {
                Ok(()) => deleted += batch,
                Err(e) => {
                    warn!(channel, batch, error = %e, "bulk delete failed");
                    first_error.get_or_insert(classify(e, GatewayError::Delivery));
                }
            }
        }
        for id in old {
            match self.client.delete_message(channel, &id).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    debug!(channel, message = %id, error = %e, "single delete failed");
                    first_error.get_or_insert(classify(e, GatewayError::Delivery));
                }
            }
        }

        match first_error {
            Some(err) if deleted == 0 => Err(err),
            _ => Ok(deleted),
        }
    }
}

/// Partition message ids into those bulk delete accepts and those that must
/// be deleted one at a time. Ids that are not ULIDs count as old.
fn split_by_age(ids: Vec<String>, now: SystemTime) -> (Vec<String>, Vec<String>) {
    ids.into_iter().partition(|id| {
        Ulid::from_string(id).is_ok_and(|ulid| {
            now.duration_since(ulid.datetime())
                .map_or(true, |age| age < BULK_DELETE_MAX_AGE)
        })
    })
}

#[cfg(test)]
mod tests {
    use revolt_api::types::ApiError;

    use super::*;

    fn api(kind: ErrorKind) -> RevoltError {
        RevoltError::ApiError(ApiError {
            location: String::new(),
            kind,
        })
    }

    #[test]
    fn typed_kinds_win_over_fallback() {
        assert!(matches!(
            classify(api(ErrorKind::BlockedByOther), GatewayError::Delivery),
            GatewayError::Blocked(_)
        ));
        assert!(matches!(
            classify(
                api(ErrorKind::MissingPermission {
                    permission: "AssignRoles".into()
                }),
                GatewayError::Delivery
            ),
            GatewayError::Permission(_)
        ));
        assert!(matches!(
            classify(api(ErrorKind::UnknownMessage), GatewayError::Edit),
            GatewayError::NotFound(_)
        ));
    }

    #[test]
    fn status_codes_are_used_without_a_body() {
        let not_found = RevoltError::HttpStatus {
            code: 404,
            body: String::new(),
        };
        assert!(matches!(
            classify(not_found, GatewayError::Edit),
            GatewayError::NotFound(_)
        ));

        let forbidden = RevoltError::HttpStatus {
            code: 403,
            body: String::new(),
        };
        assert!(matches!(
            classify(forbidden, GatewayError::Delivery),
            GatewayError::Permission(_)
        ));
    }

    #[test]
    fn week_old_messages_are_kept_out_of_bulk_delete() {
        let now = SystemTime::now();
        let id_at = |ago: Duration| Ulid::from_datetime(now - ago).to_string();
        let fresh = id_at(Duration::from_secs(3600));
        let six_days = id_at(Duration::from_secs(6 * 24 * 3600));
        let stale = id_at(Duration::from_secs(8 * 24 * 3600));
        let edge = id_at(Duration::from_secs(7 * 24 * 3600 - 60));
        let ahead = Ulid::from_datetime(now + Duration::from_secs(5)).to_string();

        let (recent, old) = split_by_age(
            vec![
                fresh.clone(),
                stale.clone(),
                "not-a-ulid".to_string(),
                six_days.clone(),
                edge.clone(),
                ahead.clone(),
            ],
            now,
        );

        assert_eq!(recent, [fresh, six_days, ahead]);
        assert_eq!(old, [stale, "not-a-ulid".to_string(), edge]);
    }

    #[test]
    fn everything_else_uses_the_fallback() {
        assert!(matches!(
            classify(RevoltError::Other("boom".into()), GatewayError::Delivery),
            GatewayError::Delivery(_)
        ));
        assert!(matches!(
            classify(api(ErrorKind::InternalError), GatewayError::Edit),
            GatewayError::Edit(_)
        ));
    }
}
