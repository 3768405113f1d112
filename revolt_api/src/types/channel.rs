use serde::{Deserialize, Serialize};

/// A channel as returned by the API.
///
/// Only the fields shared by every channel type are typed; the variant name
/// is kept in `channel_type` (`DirectMessage`, `TextChannel`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    #[serde(rename = "_id")]
    pub id: String,
    pub channel_type: String,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub recipients: Option<Vec<String>>,
}
