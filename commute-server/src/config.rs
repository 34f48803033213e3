//! Process configuration.
//!
//! Values are resolved from the process environment first, then a local
//! `.env` file, then built-in defaults. An environment variable that is
//! already set is never overridden by the file.

use std::collections::HashMap;
use std::path::Path;

use uuid::Uuid;

/// Display timezone used when `TZ` is unset or invalid.
pub const DEFAULT_TZ: &str = "Asia/Tokyo";

/// Runtime configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Long-lived Cognito refresh token for the subscription worker.
    pub refresh_token: String,

    /// AWS region hosting the identity pools and the broker.
    pub region: String,

    /// Cognito user pool id.
    pub user_pool_id: String,

    /// Cognito user pool app client id.
    pub user_pool_client_id: String,

    /// Cognito identity pool id.
    pub identity_pool_id: String,

    /// IoT broker endpoint hostname.
    pub endpoint: String,

    /// MQTT topic carrying object-detection messages.
    pub message_topic: String,

    /// MQTT client id; randomised per process unless configured.
    pub client_id: String,

    /// Display timezone name.
    pub tz: String,
}

impl Config {
    /// Load configuration from the environment and `./.env`.
    pub fn load() -> Self {
        let file = dotenv_file(Path::new(".env"));
        Self::from_lookup(|key| std::env::var(key).ok().or_else(|| file.get(key).cloned()))
    }

    /// Build a config from an arbitrary key lookup.
    ///
    /// Factored out of [`Config::load`] so precedence and defaulting can be
    /// tested without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Self {
            refresh_token: get("REFRESH_TOKEN", ""),
            region: get("REGION", "ap-northeast-1"),
            user_pool_id: get("USER_POOL_ID", "ap-northeast-1_kRWuig6oV"),
            user_pool_client_id: get("USER_POOL_CLIENT_ID", "2jl8m0q968eudj7lubpdkuvq9v"),
            identity_pool_id: get(
                "IDENTITY_POOL_ID",
                "ap-northeast-1:7e24baf3-0e4b-4c3a-bacf-ca1e9b7f4650",
            ),
            endpoint: get("ENDPOINT", "ak6s01k4r928v-ats.iot.ap-northeast-1.amazonaws.com"),
            message_topic: get("MESSAGE_TOPIC", "object/lidar/vista-p90-3/person"),
            client_id: lookup("CLIENT_ID")
                .unwrap_or_else(|| format!("sample-{}", Uuid::new_v4())),
            tz: get("TZ", DEFAULT_TZ),
        }
    }
}

/// Read and parse a `.env` file, returning an empty map if it is absent
/// or unreadable.
pub fn dotenv_file(path: &Path) -> HashMap<String, String> {
    std::fs::read_to_string(path)
        .map(|contents| parse_dotenv(&contents))
        .unwrap_or_default()
}

/// Parse `KEY=VALUE` lines into a map.
///
/// Blank lines, `#` comments and lines without `=` are skipped. A layer of
/// surrounding quotes around the value is stripped. The first occurrence of
/// a key wins.
pub fn parse_dotenv(contents: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'');
        out.entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
    out
}
