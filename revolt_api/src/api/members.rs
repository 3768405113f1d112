use async_trait::async_trait;

use crate::{
    client::{parse_json_if_ok, RevoltClient},
    error::RevoltError,
    types::user::{DataMemberEdit, Member},
    util::build_url,
};

/// Server member endpoints.
#[async_trait]
pub trait MembersApi {
    async fn fetch_member(&self, server_id: &str, user_id: &str) -> Result<Member, RevoltError>;

    async fn edit_member(
        &self,
        server_id: &str,
        user_id: &str,
        edit: &DataMemberEdit,
    ) -> Result<Member, RevoltError>;

    /// Add `role_id` to the member's roles, keeping the ones they hold.
    /// Returns `false` when the member already had it.
    ///
    /// Revolt has no endpoint that adds a single role, so this reads the
    /// member and writes back the full list. A concurrent role change can
    /// land between the two and drop the new role; the result is checked
    /// and the read-modify-write repeated a bounded number of times.
    async fn add_member_role(
        &self,
        server_id: &str,
        user_id: &str,
        role_id: &str,
    ) -> Result<bool, RevoltError> {
        let mut written = false;
        for _ in 0..ROLE_GRANT_ATTEMPTS {
            let member = self.fetch_member(server_id, user_id).await?;
            let Some(roles) = with_role(member.roles, role_id) else {
                return Ok(written);
            };

            let edit = DataMemberEdit {
                roles: Some(roles),
                ..Default::default()
            };
            let updated = self.edit_member(server_id, user_id, &edit).await?;
            written = true;
            if updated.roles.iter().any(|r| r == role_id) {
                return Ok(true);
            }
        }
        Err(RevoltError::Other(format!(
            "role {role_id} kept being dropped from member {user_id}"
        )))
    }
}

const ROLE_GRANT_ATTEMPTS: usize = 3;

/// `roles` plus `role_id`, or `None` if it is already there.
fn with_role(mut roles: Vec<String>, role_id: &str) -> Option<Vec<String>> {
    if roles.iter().any(|r| r == role_id) {
        return None;
    }
    roles.push(role_id.to_string());
    Some(roles)
}

#[async_trait]
impl MembersApi for RevoltClient {
    async fn fetch_member(&self, server_id: &str, user_id: &str) -> Result<Member, RevoltError> {
        let url = build_url(&self.base_url, &["servers", server_id, "members", user_id])?;
        let resp = self.authed_get(url).await?;
        parse_json_if_ok(resp).await
    }

    async fn edit_member(
        &self,
        server_id: &str,
        user_id: &str,
        edit: &DataMemberEdit,
    ) -> Result<Member, RevoltError> {
        let url = build_url(&self.base_url, &["servers", server_id, "members", user_id])?;
        let resp = self.authed_patch(url, edit).await?;
        parse_json_if_ok(resp).await
    }
}
