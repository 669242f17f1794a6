use async_trait::async_trait;
use tracing::{info, warn};

use crate::dispatch::{Connector, EventHandler, EventPayload};
use crate::error::Result;
use crate::models::Reply;

pub struct MemberJoined {
    // Overrides the channel lookup when set.
    channel_id: Option<u64>,
    auto_role_id: Option<u64>,
}

impl MemberJoined {
    pub fn new(channel_id: Option<u64>, auto_role_id: Option<u64>) -> Self {
        MemberJoined {
            channel_id,
            auto_role_id,
        }
    }
}

#[async_trait]
impl EventHandler for MemberJoined {
    async fn handle(&self, payload: &EventPayload, connector: &dyn Connector) -> Result<()> {
        let member = match payload {
            EventPayload::MemberJoined(member) => member,
            _ => return Ok(()),
        };
        info!("{} has joined the server.", member.user.name);

        if let Some(role_id) = self.auto_role_id {
            let result = connector
                .add_role(member.guild_id, member.user.id, role_id, "Auto Welcome Role")
                .await;
            if let Err(err) = result {
                warn!("Failed to give role to {}: {}", member.user.name, err);
            }
        }

        let channel_id = match self.channel_id {
            Some(channel_id) => Some(channel_id),
            None => connector.welcome_channel(member.guild_id).await?,
        };

        match channel_id {
            Some(channel_id) => {
                let greeting = format!(
                    "Welcome to the server, {}! We're glad to have you here.",
                    member.user.mention()
                );
                connector
                    .send_message(channel_id, Reply::text(&greeting))
                    .await?;
            }
            None => warn!("Could not find a channel to welcome {}.", member.user.name),
        }

        Ok(())
    }
}
