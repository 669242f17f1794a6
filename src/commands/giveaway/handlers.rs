use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::commands::giveaway::manager::GiveawayManager;
use crate::commands::giveaway::models::{
    ENTRY_EMOJI, Giveaway, GiveawayRequest, MAX_LISTED_GIVEAWAYS,
};
use crate::dispatch::{CommandHandler, InvocationContext};
use crate::error::Result;
use crate::models::Reply;

const NOT_FOUND: &str = "❌ Giveaway not found!";

// Giveaways are addressed by the id of their announcement message. Anything
// that isn't a valid id can't match a giveaway.
fn message_id(ctx: &InvocationContext) -> Result<Option<u64>> {
    let raw = ctx.arguments().string("message_id")?;
    Ok(raw.trim().parse::<u64>().ok())
}

async fn refuse(ctx: &InvocationContext, text: &str) -> Result<()> {
    ctx.reply(Reply::text(text).ephemeral()).await
}

pub struct StartGiveaway {
    manager: Arc<GiveawayManager>,
}

impl StartGiveaway {
    pub fn new(manager: Arc<GiveawayManager>) -> Self {
        StartGiveaway { manager }
    }
}

#[async_trait]
impl CommandHandler for StartGiveaway {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()> {
        let request = GiveawayRequest::from_arguments(ctx.arguments())?;
        if let Some(problem) = request.validate() {
            return refuse(ctx, &problem).await;
        }

        ctx.reply(Reply::text("Creating your giveaway...").ephemeral())
            .await?;

        let connector = ctx.connector();
        let announcement = self.manager.formatter().announcement(&request, ctx.user());
        let message_id = connector
            .send_message(ctx.channel_id(), Reply::embed(announcement))
            .await?;

        // Once announced, the giveaway is drawn no matter what happens next.
        let giveaway = Giveaway::new(ctx.user().clone(), &request, ctx.channel_id(), message_id);
        self.manager.schedule(giveaway, connector.clone());
        info!(
            "User '{}' started a giveaway for '{}'",
            ctx.user().name,
            request.prize
        );

        // Members can still add the reaction by themselves.
        if let Err(err) = connector
            .add_reaction(ctx.channel_id(), message_id, ENTRY_EMOJI)
            .await
        {
            warn!("Can't add the entry reaction to giveaway message {}: {}", message_id, err);
        }
        Ok(())
    }
}

pub struct EndGiveaway {
    manager: Arc<GiveawayManager>,
}

impl EndGiveaway {
    pub fn new(manager: Arc<GiveawayManager>) -> Self {
        EndGiveaway { manager }
    }
}

#[async_trait]
impl CommandHandler for EndGiveaway {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()> {
        let Some(message_id) = message_id(ctx)? else {
            return refuse(ctx, NOT_FOUND).await;
        };

        let Some(giveaway) = self.manager.find_pending(message_id) else {
            return match self.manager.find_ended(message_id) {
                Some(_) => refuse(ctx, "❌ This giveaway has already ended!").await,
                None => refuse(ctx, NOT_FOUND).await,
            };
        };

        if giveaway.host().id != ctx.user().id && !ctx.can_manage_messages() {
            return refuse(ctx, "❌ You don't have permission to end this giveaway!").await;
        }

        let connector = ctx.connector();
        match self.manager.end_early(&giveaway, connector.as_ref()).await? {
            Some(_) => {
                info!("User '{}' ended giveaway {}", ctx.user().name, giveaway.id());
                ctx.reply(Reply::text("✅ Giveaway ended successfully!").ephemeral())
                    .await
            }
            None => refuse(ctx, "❌ This giveaway has already ended!").await,
        }
    }
}

pub struct RerollGiveaway {
    manager: Arc<GiveawayManager>,
}

impl RerollGiveaway {
    pub fn new(manager: Arc<GiveawayManager>) -> Self {
        RerollGiveaway { manager }
    }
}

#[async_trait]
impl CommandHandler for RerollGiveaway {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()> {
        let Some(message_id) = message_id(ctx)? else {
            return refuse(ctx, NOT_FOUND).await;
        };

        if self.manager.find_pending(message_id).is_some() {
            return refuse(ctx, "❌ This giveaway hasn't ended yet!").await;
        }
        let Some(giveaway) = self.manager.find_ended(message_id) else {
            return refuse(ctx, NOT_FOUND).await;
        };

        let connector = ctx.connector();
        let winners = self.manager.reroll(&giveaway, connector.as_ref()).await?;
        if winners.is_empty() {
            return refuse(ctx, "❌ No valid participants found!").await;
        }

        let text = self.manager.formatter().reroll(giveaway.prize(), &winners);
        ctx.say(&text).await
    }
}

pub struct ListGiveaways {
    manager: Arc<GiveawayManager>,
}

impl ListGiveaways {
    pub fn new(manager: Arc<GiveawayManager>) -> Self {
        ListGiveaways { manager }
    }
}

#[async_trait]
impl CommandHandler for ListGiveaways {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()> {
        let giveaways = self.manager.get_giveaways();
        if giveaways.is_empty() {
            return refuse(ctx, "No active giveaways found!").await;
        }

        let shown = &giveaways[..giveaways.len().min(MAX_LISTED_GIVEAWAYS)];
        let embed = self.manager.formatter().listing(shown, giveaways.len());
        ctx.reply(Reply::embed(embed).ephemeral()).await
    }
}
