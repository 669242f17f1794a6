use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::dispatch::{Connector, EventHandler, EventPayload};
use crate::error::Result;
use crate::models::{IncomingMessage, Reply};
use crate::moderation::ModerationFilter;
use crate::storage::ResponseStore;

// Runs moderation on every human message, then answers auto-response
// triggers in the messages that passed.
pub struct MessageCreated {
    filter: Arc<ModerationFilter>,
    store: Arc<ResponseStore>,
}

impl MessageCreated {
    pub fn new(filter: Arc<ModerationFilter>, store: Arc<ResponseStore>) -> Self {
        MessageCreated { filter, store }
    }

    // Returns true when the message was removed.
    async fn moderate(&self, message: &IncomingMessage, connector: &dyn Connector) -> Result<bool> {
        let violation = match self.filter.check(message) {
            Some(violation) => violation,
            None => return Ok(false),
        };

        info!(
            "Removing message {} by '{}': {}",
            message.id,
            message.author.name,
            violation.as_str()
        );
        if let Err(err) = connector.delete_message(message.channel_id, message.id).await {
            warn!("Can't delete message {}: {}", message.id, err);
        }

        let notice = violation.notice(&message.author);
        connector
            .send_message(message.channel_id, Reply::text(&notice))
            .await?;
        Ok(true)
    }
}

#[async_trait]
impl EventHandler for MessageCreated {
    async fn handle(&self, payload: &EventPayload, connector: &dyn Connector) -> Result<()> {
        let message = match payload {
            EventPayload::MessageCreated(message) => message,
            _ => return Ok(()),
        };

        if message.author.bot {
            return Ok(());
        }

        if self.moderate(message, connector).await? {
            return Ok(());
        }

        if let Some(response) = self.store.find_response(&message.content).await? {
            debug!("Auto-responding to message {}", message.id);
            connector
                .reply_to(message.channel_id, message.id, Reply::text(&response))
                .await?;
        }

        Ok(())
    }
}
