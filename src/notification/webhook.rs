use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::Notifier;

/// POSTs each payload as JSON to a fixed URL on a background task.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: url::Url,
}

impl WebhookNotifier {
    pub fn new(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let url = url::Url::parse(url)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }
}

impl Notifier for WebhookNotifier {
    fn send(&self, payload: Value) {
        let request = self.client.post(self.url.clone()).json(&payload);
        let url = self.url.clone();

        // Needs a running runtime; outside of one the notification is dropped.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(%url, "No async runtime, dropping webhook notification");
            return;
        };

        handle.spawn(async move {
            match request.send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!(%url, status = %resp.status(), "Webhook delivered");
                }
                Ok(resp) => warn!(%url, status = %resp.status(), "Webhook rejected notification"),
                Err(e) => warn!(%url, error = %e, "Webhook delivery failed"),
            }
        });
    }
}
