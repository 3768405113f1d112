use serde::{Deserialize, Serialize};

/// Body of `POST /auth/session/login` for the email + password flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataLogin {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
}

/// Possibly returned after login:
/// 1) Success { _id, user_id, token, name }
/// 2) MFA { allowed_methods, ticket }
/// 3) Disabled { user_id }
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result")]
pub enum ResponseLogin {
    Success {
        #[serde(rename = "_id")]
        id: String,
        user_id: String,
        token: String,
        name: String,
    },
    #[serde(rename = "MFA")]
    MfaChallenge {
        ticket: String,
        allowed_methods: Vec<String>,
    },
    Disabled {
        user_id: String,
    },
}
