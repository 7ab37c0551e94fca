use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
struct RawSettings {
    #[serde(rename = "ANALYZER_ENDPOINT", default = "default_endpoint")]
    endpoint: String,
    #[serde(rename = "CLIENT_ID")]
    client_id: Option<String>,
    #[serde(rename = "MAX_COMMENTS", default = "default_max_comments")]
    max_comments: u32,
    #[serde(rename = "LOG_LEVEL", default = "default_log_level")]
    log_level: String,
    #[serde(rename = "REQUEST_TIMEOUT_SEC", default)]
    request_timeout_sec: u64,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub client_id: String,
    pub max_comments: u32,
    pub log_level: String,
    /// `None` leaves a hung request in `Loading` for as long as the transport takes.
    pub request_timeout: Option<Duration>,
}

impl Settings {
    pub fn from_env() -> Result<Self, envy::Error> {
        let raw: RawSettings = envy::from_env()?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawSettings) -> Self {
        let client_id = raw
            .client_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("client-{}", Uuid::new_v4()))
            .to_lowercase();

        let endpoint = raw.endpoint.trim().to_string();
        let endpoint = if endpoint.is_empty() { default_endpoint() } else { endpoint };

        Self {
            endpoint,
            client_id,
            max_comments: raw.max_comments.clamp(1, 500),
            log_level: raw.log_level.to_ascii_lowercase(),
            request_timeout: (raw.request_timeout_sec > 0)
                .then(|| Duration::from_secs(raw.request_timeout_sec)),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_raw(RawSettings {
            endpoint: default_endpoint(),
            client_id: None,
            max_comments: default_max_comments(),
            log_level: default_log_level(),
            request_timeout_sec: 0,
        })
    }
}

fn default_endpoint() -> String {
    "https://comment-section-summery-ai.onrender.com/comments".to_string()
}

fn default_max_comments() -> u32 {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawSettings {
        RawSettings {
            endpoint: default_endpoint(),
            client_id: None,
            max_comments: default_max_comments(),
            log_level: default_log_level(),
            request_timeout_sec: 0,
        }
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_comments, 50);
        assert_eq!(settings.log_level, "info");
        assert!(settings.request_timeout.is_none());
        assert!(settings.client_id.starts_with("client-"));
        assert!(settings.endpoint.ends_with("/comments"));
    }

    #[test]
    fn values_are_normalised() {
        let settings = Settings::from_raw(RawSettings {
            endpoint: "  ".to_string(),
            client_id: Some("Desk-01".to_string()),
            max_comments: 0,
            log_level: "DEBUG".to_string(),
            request_timeout_sec: 15,
        });
        assert_eq!(settings.endpoint, default_endpoint());
        assert_eq!(settings.client_id, "desk-01");
        assert_eq!(settings.max_comments, 1);
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.request_timeout, Some(Duration::from_secs(15)));

        let capped = Settings::from_raw(RawSettings {
            max_comments: 10_000,
            client_id: Some("   ".to_string()),
            ..raw()
        });
        assert_eq!(capped.max_comments, 500);
        assert!(capped.client_id.starts_with("client-"));
    }
}
