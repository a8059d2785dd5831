//! Outbound notification sinks.
//!
//! Sinks are fire-and-forget: `send` never reports failure to the caller,
//! delivery problems are the sink's own concern and only show up in logs.

pub mod log;
pub mod webhook;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::config::NotificationConfig;

pub use self::log::LogNotifier;
pub use self::webhook::WebhookNotifier;

pub trait Notifier: Send + Sync {
    fn send(&self, payload: Value);
}

/// Pick the sink for the current configuration: webhook when a URL is set, log otherwise.
pub fn from_config(config: &NotificationConfig) -> anyhow::Result<Arc<dyn Notifier>> {
    match config.webhook_url.as_deref() {
        Some(url) => {
            let notifier = WebhookNotifier::new(url, Duration::from_secs(config.timeout_secs))?;
            Ok(Arc::new(notifier))
        }
        None => Ok(Arc::new(LogNotifier::new("log"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_webhook_url_is_rejected() {
        let config = NotificationConfig {
            webhook_url: Some("::not a url::".to_string()),
            timeout_secs: 1,
        };
        assert!(from_config(&config).is_err());
    }

    #[test]
    fn falls_back_to_log_sink() {
        let config = NotificationConfig {
            webhook_url: None,
            timeout_secs: 1,
        };
        let notifier = from_config(&config).unwrap();
        notifier.send(serde_json::json!({ "id": 1 }));
    }
}
