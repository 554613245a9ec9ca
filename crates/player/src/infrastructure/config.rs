//! Backend location, sync timing and voice call settings.
//!
//! Both are read from the environment (after `.env` is loaded by the binary) and fall
//! back to defaults that match a locally running room server.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use rookline_domain::{PlayerId, RoomId};

/// Default room server base URL
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8001";

pub const BACKEND_URL_ENV: &str = "ROOKLINE_BACKEND_URL";
pub const MAX_RECONNECT_ATTEMPTS_ENV: &str = "ROOKLINE_MAX_RECONNECT_ATTEMPTS";
/// Comma-separated ICE server URLs; empty for host candidates only
pub const ICE_SERVERS_ENV: &str = "ROOKLINE_ICE_SERVERS";

pub const DEFAULT_ICE_SERVER: &str = "stun:stun.l.google.com:19302";
/// Upper bound on waiting for ICE gathering before a description is sent
pub const ICE_GATHER_TIMEOUT: Duration = Duration::from_secs(5);

/// Delay between a channel close and the next open attempt
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);
/// Poll interval used when the channel could not be opened at all
pub const POLL_INTERVAL_AFTER_OPEN_FAILURE: Duration = Duration::from_secs(3);
/// Poll interval used after an error on an established channel
pub const POLL_INTERVAL_AFTER_ERROR: Duration = Duration::from_secs(2);
/// How long an `invalid_move` advisory stays visible
pub const ADVISORY_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Unsupported backend URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Where the room server lives.
///
/// Holds the HTTP base and derives the push-channel base by scheme substitution
/// (`http` → `ws`, `https` → `wss`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    http_base: Url,
    ws_base: Url,
}

impl BackendConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url.trim()).map_err(|e| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let (http_scheme, ws_scheme) = match parsed.scheme() {
            "http" | "ws" => ("http", "ws"),
            "https" | "wss" => ("https", "wss"),
            other => return Err(ConfigError::UnsupportedScheme(other.to_string())),
        };

        let http_base = with_scheme(&parsed, http_scheme)?;
        let ws_base = with_scheme(&parsed, ws_scheme)?;
        Ok(Self { http_base, ws_base })
    }

    /// Read `ROOKLINE_BACKEND_URL`, defaulting to [`DEFAULT_BACKEND_URL`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            std::env::var(BACKEND_URL_ENV).unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        Self::new(&base_url)
    }

    pub fn http_base(&self) -> &Url {
        &self.http_base
    }

    /// `{http_base}/api/{segments...}`
    pub fn api_url<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, ConfigError> {
        append_segments(&self.http_base, ["api"].into_iter().chain(segments))
    }

    /// `{ws_base}/api/ws/{room_id}/{player_id}`
    pub fn channel_url(&self, room_id: &RoomId, player_id: &PlayerId) -> Result<Url, ConfigError> {
        append_segments(
            &self.ws_base,
            ["api", "ws", room_id.as_str(), player_id.as_str()],
        )
    }
}

fn with_scheme(url: &Url, scheme: &str) -> Result<Url, ConfigError> {
    let mut url = url.clone();
    url.set_scheme(scheme)
        .map_err(|_| ConfigError::UnsupportedScheme(scheme.to_string()))?;
    Ok(url)
}

fn append_segments<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
) -> Result<Url, ConfigError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ConfigError::InvalidUrl {
            url: base.to_string(),
            reason: "cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Timing knobs for the connection supervisor, fallback poller and advisories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub reconnect_delay: Duration,
    /// `None` retries for as long as the session is playing
    pub max_reconnect_attempts: Option<u32>,
    pub poll_interval_after_open_failure: Duration,
    pub poll_interval_after_error: Duration,
    pub advisory_ttl: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            reconnect_delay: RECONNECT_DELAY,
            max_reconnect_attempts: None,
            poll_interval_after_open_failure: POLL_INTERVAL_AFTER_OPEN_FAILURE,
            poll_interval_after_error: POLL_INTERVAL_AFTER_ERROR,
            advisory_ttl: ADVISORY_TTL,
        }
    }
}

impl SyncSettings {
    /// Defaults, with the reconnect cap taken from `ROOKLINE_MAX_RECONNECT_ATTEMPTS`
    /// when it is set to a number.
    pub fn from_env() -> Self {
        let max_reconnect_attempts = std::env::var(MAX_RECONNECT_ATTEMPTS_ENV)
            .ok()
            .and_then(|s| s.trim().parse().ok());
        Self {
            max_reconnect_attempts,
            ..Self::default()
        }
    }
}

/// Peer connection settings for voice calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSettings {
    pub ice_servers: Vec<String>,
    pub gather_timeout: Duration,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            ice_servers: vec![DEFAULT_ICE_SERVER.to_string()],
            gather_timeout: ICE_GATHER_TIMEOUT,
        }
    }
}

impl VoiceSettings {
    /// Defaults, with the ICE servers replaced by `ROOKLINE_ICE_SERVERS` when set.
    pub fn from_env() -> Self {
        match std::env::var(ICE_SERVERS_ENV) {
            Ok(list) => Self {
                ice_servers: parse_ice_servers(&list),
                ..Self::default()
            },
            Err(_) => Self::default(),
        }
    }
}

fn parse_ice_servers(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (RoomId, PlayerId) {
        (
            RoomId::parse("1a2b3c4d").expect("room id"),
            PlayerId::parse("p-1").expect("player id"),
        )
    }

    #[test]
    fn channel_url_swaps_scheme() {
        let (room, player) = ids();
        let config = BackendConfig::new("http://localhost:8001").expect("config");
        assert_eq!(
            config.channel_url(&room, &player).expect("url").as_str(),
            "ws://localhost:8001/api/ws/1a2b3c4d/p-1"
        );

        let secure = BackendConfig::new("https://chess.example.com/").expect("config");
        assert_eq!(
            secure.channel_url(&room, &player).expect("url").as_str(),
            "wss://chess.example.com/api/ws/1a2b3c4d/p-1"
        );
    }

    #[test]
    fn api_url_keeps_base_path_prefix() {
        let config = BackendConfig::new("http://host:9000/rookline/").expect("config");
        assert_eq!(
            config
                .api_url(["rooms", "abc", "board"])
                .expect("url")
                .as_str(),
            "http://host:9000/rookline/api/rooms/abc/board"
        );
    }

    #[test]
    fn rejects_non_http_schemes() {
        assert_eq!(
            BackendConfig::new("ftp://host"),
            Err(ConfigError::UnsupportedScheme("ftp".to_string()))
        );
        assert!(matches!(
            BackendConfig::new("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn default_sync_settings() {
        let settings = SyncSettings::default();
        assert_eq!(settings.reconnect_delay, Duration::from_secs(5));
        assert_eq!(settings.max_reconnect_attempts, None);
        assert_eq!(settings.poll_interval_after_open_failure, Duration::from_secs(3));
        assert_eq!(settings.poll_interval_after_error, Duration::from_secs(2));
        assert_eq!(settings.advisory_ttl, Duration::from_secs(3));
    }

    #[test]
    fn ice_server_list_is_split_and_trimmed() {
        assert_eq!(
            parse_ice_servers(" stun:a.example:3478 , turn:b.example ,"),
            vec!["stun:a.example:3478".to_string(), "turn:b.example".to_string()]
        );
        assert!(parse_ice_servers("").is_empty());
        assert_eq!(
            VoiceSettings::default().ice_servers,
            vec![DEFAULT_ICE_SERVER.to_string()]
        );
    }
}
