use anyhow::Result;
use tracing::info;

use crate::domain::ports::AlertNotifier;

/// Fallback notifier that writes the alert to the log instead of a chat.
/// Used when no Telegram credentials are configured.
pub struct ConsoleNotifier;

impl AlertNotifier for ConsoleNotifier {
    fn send(&self, message: &str) -> Result<()> {
        info!("ALERT\n{message}");
        Ok(())
    }
}
