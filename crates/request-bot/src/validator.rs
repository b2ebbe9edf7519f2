//! Ban request validation hook

use async_trait::async_trait;
use request_types::InboundMessage;
use tracing::info;

/// Receives every message posted to the ban request channel, unmodified.
#[async_trait]
pub trait ValidateBanRequest: Send + Sync {
    async fn validate(&self, message: &InboundMessage);
}

/// Records forwarded ban requests in the log and takes no action
pub struct LogOnlyValidator;

#[async_trait]
impl ValidateBanRequest for LogOnlyValidator {
    async fn validate(&self, message: &InboundMessage) {
        info!(
            "Ban request {} from {} ({}): {} attachment(s), {} mention(s)",
            message.id,
            message.author.tag,
            message.author.id,
            message.attachments.len(),
            message.mentions.len()
        );
    }
}
