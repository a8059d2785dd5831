use serde_json::Value;
use tracing::info;

use super::Notifier;

/// Writes every notification to the log under a channel label.
pub struct LogNotifier {
    channel: &'static str,
}

impl LogNotifier {
    pub fn new(channel: &'static str) -> Self {
        Self { channel }
    }
}

impl Notifier for LogNotifier {
    fn send(&self, payload: Value) {
        info!(channel = self.channel, %payload, "Notification sent");
    }
}
