use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Endpoint of the appliance's local hub.
pub const DEFAULT_HUB_URL: &str = "ws://localhost:10000/SmartControlHub";

/// Connection settings for [`HubProvider`](crate::HubProvider).
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```rust,ignore
/// let config: HubConfig = serde_json::from_str(r#"{"url": "ws://10.0.0.5:10000/SmartControlHub"}"#)?;
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct HubConfig {
    /// WebSocket URL of the hub. Negotiation is skipped, so this points
    /// straight at the socket endpoint.
    pub url: String,
    /// Fixed delay between failed connection attempts.
    pub retry_delay_ms: u64,
    /// Interval between client pings while connected.
    pub keep_alive_ms: u64,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_HUB_URL.to_string(),
            retry_delay_ms: 5_000,
            keep_alive_ms: 15_000,
        }
    }
}

impl HubConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn keep_alive(&self) -> Duration {
        Duration::from_millis(self.keep_alive_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.url, "ws://localhost:10000/SmartControlHub");
        assert_eq!(config.retry_delay(), Duration::from_secs(5));
        assert_eq!(config.keep_alive(), Duration::from_secs(15));
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: HubConfig = serde_json::from_str(r#"{"url": "ws://10.0.0.5:10000/SmartControlHub"}"#).unwrap();
        assert_eq!(config.url, "ws://10.0.0.5:10000/SmartControlHub");
        assert_eq!(config.retry_delay_ms, 5_000);
    }

    #[test]
    fn test_with_url() {
        let config = HubConfig::default().with_url("ws://monitor.local/SmartControlHub");
        assert_eq!(config.url, "ws://monitor.local/SmartControlHub");
        assert_eq!(config.keep_alive_ms, 15_000);
    }
}
