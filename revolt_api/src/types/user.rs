use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)] // Use default values for missing fields
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub discriminator: String,
    pub display_name: Option<String>,
    pub badges: Option<u32>,
    pub flags: Option<u32>,
    pub privileged: bool,
    pub bot: Option<BotInformation>,
    pub online: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotInformation {
    pub owner: String,
}

/// A server Member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    #[serde(rename = "_id")]
    pub id: MemberCompositeKey,
    pub joined_at: Option<String>, // ISO8601
    pub nickname: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub timeout: Option<String>, // ISO8601
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCompositeKey {
    pub server: String,
    pub user: String,
}

/// Body of `PATCH /servers/{server}/members/{member}`.
///
/// `roles` replaces the member's full role list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataMemberEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
}
