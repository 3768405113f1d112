//! JSON bot configuration.
//!
//! ```json
//! {
//!   "server": "01H...",
//!   "organizer_role": "01HADMIN",
//!   "participation_roles": ["01HMEMBER"],
//!   "winner_role": "01HWINNER"
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::duration::parse_duration;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    /// Server whose members receive the reward role.
    pub server: String,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Role id required to run commands. Also counts as eligible to enter.
    pub organizer_role: String,
    pub participation_roles: Vec<String>,
    pub winner_role: String,
    #[serde(default = "default_entry_emoji")]
    pub entry_emoji: String,
    #[serde(default = "default_countdown_interval")]
    pub countdown_interval_secs: u64,
    #[serde(default = "default_placeholder_prize")]
    pub placeholder_prize: String,
    /// Longest accepted giveaway, as a duration token.
    #[serde(default = "default_max_duration")]
    pub max_duration: String,
    pub api_url: Option<String>,
    pub ws_url: Option<String>,
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_entry_emoji() -> String {
    "🎉".to_string()
}

fn default_countdown_interval() -> u64 {
    10
}

fn default_placeholder_prize() -> String {
    "Mystery Prize".to_string()
}

fn default_max_duration() -> String {
    "30d".to_string()
}

impl BotConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: BotConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.server.trim().is_empty() {
            return invalid("'server' cannot be empty.");
        }
        if self.prefix.trim().is_empty() {
            return invalid("'prefix' cannot be empty.");
        }
        if self.organizer_role.trim().is_empty() || self.winner_role.trim().is_empty() {
            return invalid("'organizer_role' and 'winner_role' cannot be empty.");
        }
        if self.participation_roles.iter().any(|r| r.trim().is_empty()) {
            return invalid("'participation_roles' cannot contain empty role ids.");
        }
        if self.entry_emoji.is_empty() {
            return invalid("'entry_emoji' cannot be empty.");
        }
        if self.countdown_interval_secs == 0 {
            return invalid("'countdown_interval_secs' must be at least 1.");
        }
        if parse_duration(&self.max_duration).is_err() {
            return invalid("'max_duration' must be a duration such as 30d.");
        }
        Ok(())
    }

    /// Runtime view of the config. Call after [`BotConfig::validate`].
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let max_duration = parse_duration(&self.max_duration)
            .map_err(|_| ConfigError::Invalid("'max_duration' must be a duration such as 30d.".into()))?;

        Ok(Settings {
            prefix: self.prefix.clone(),
            organizer_role: self.organizer_role.clone(),
            participation_roles: self.participation_roles.iter().cloned().collect(),
            winner_role: self.winner_role.clone(),
            entry_emoji: self.entry_emoji.clone(),
            countdown_interval: Duration::from_secs(self.countdown_interval_secs),
            placeholder_prize: self.placeholder_prize.clone(),
            max_duration,
        })
    }
}

/// Settings shared by the engine components.
#[derive(Debug, Clone)]
pub struct Settings {
    pub prefix: String,
    pub organizer_role: String,
    pub participation_roles: HashSet<String>,
    pub winner_role: String,
    pub entry_emoji: String,
    pub countdown_interval: Duration,
    pub placeholder_prize: String,
    pub max_duration: Duration,
}

impl Settings {
    pub fn is_organizer(&self, roles: &HashSet<String>) -> bool {
        roles.contains(&self.organizer_role)
    }

    /// Holds at least one participation role, or the organizer role.
    pub fn may_participate(&self, roles: &HashSet<String>) -> bool {
        self.is_organizer(roles) || !self.participation_roles.is_disjoint(roles)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            organizer_role: "organizer".to_string(),
            participation_roles: HashSet::from(["member".to_string()]),
            winner_role: "winner".to_string(),
            entry_emoji: default_entry_emoji(),
            countdown_interval: Duration::from_secs(default_countdown_interval()),
            placeholder_prize: default_placeholder_prize(),
            max_duration: Duration::from_secs(30 * 86_400),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "server": "srv",
        "organizer_role": "admin",
        "participation_roles": ["member", "vip"],
        "winner_role": "winner"
    }"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = BotConfig::from_json(MINIMAL).unwrap();
        assert_eq!(config.prefix, "!");
        assert_eq!(config.entry_emoji, "🎉");
        assert_eq!(config.countdown_interval_secs, 10);
        assert_eq!(config.placeholder_prize, "Mystery Prize");

        let settings = config.settings().unwrap();
        assert_eq!(settings.max_duration, Duration::from_secs(30 * 86_400));
        assert_eq!(settings.countdown_interval, Duration::from_secs(10));
    }

    #[test]
    fn rejects_empty_role_ids() {
        let raw = MINIMAL.replace(r#"["member", "vip"]"#, r#"["member", " "]"#);
        assert!(matches!(BotConfig::from_json(&raw), Err(ConfigError::Invalid(_))));

        let raw = MINIMAL.replace(r#""winner_role": "winner""#, r#""winner_role": """#);
        assert!(matches!(BotConfig::from_json(&raw), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_zero_interval_and_bad_max_duration() {
        let raw = MINIMAL.replace('}', r#", "countdown_interval_secs": 0 }"#);
        assert!(matches!(BotConfig::from_json(&raw), Err(ConfigError::Invalid(_))));

        let raw = MINIMAL.replace('}', r#", "max_duration": "forever" }"#);
        assert!(matches!(BotConfig::from_json(&raw), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_fields_are_parse_errors() {
        assert!(matches!(
            BotConfig::from_json(r#"{ "server": "srv" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        assert!(matches!(
            BotConfig::from_file("/definitely/not/here.json"),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn eligibility_accepts_either_role_kind() {
        let settings = Settings::default();
        let roles = |r: &[&str]| r.iter().map(|s| s.to_string()).collect::<HashSet<_>>();

        assert!(settings.may_participate(&roles(&["member"])));
        assert!(settings.may_participate(&roles(&["organizer"])));
        assert!(!settings.may_participate(&roles(&["guest"])));
        assert!(!settings.may_participate(&roles(&[])));
        assert!(!settings.is_organizer(&roles(&["member"])));
    }
}
