use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::commands::giveaway::GiveawayManager;
use crate::dispatch::{Connector, EventHandler, EventPayload};
use crate::error::Result;

pub struct ChannelDeleted {
    giveaways: Arc<GiveawayManager>,
}

impl ChannelDeleted {
    pub fn new(giveaways: Arc<GiveawayManager>) -> Self {
        ChannelDeleted { giveaways }
    }
}

#[async_trait]
impl EventHandler for ChannelDeleted {
    async fn handle(&self, payload: &EventPayload, _connector: &dyn Connector) -> Result<()> {
        if let EventPayload::ChannelDeleted { channel_id } = payload {
            let cancelled = self.giveaways.cancel_in_channel(*channel_id);
            if cancelled > 0 {
                info!(
                    "Cancelled {} giveaways in the deleted channel {}",
                    cancelled, channel_id
                );
            }
        }

        Ok(())
    }
}
