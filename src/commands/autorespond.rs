use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::dispatch::{CommandHandler, InvocationContext};
use crate::error::Result;
use crate::models::Reply;
use crate::storage::ResponseStore;

pub struct AddResponse {
    store: Arc<ResponseStore>,
}

impl AddResponse {
    pub fn new(store: Arc<ResponseStore>) -> Self {
        AddResponse { store }
    }
}

#[async_trait]
impl CommandHandler for AddResponse {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()> {
        let trigger = ctx.arguments().string("trigger")?.trim().to_lowercase();
        let response = ctx.arguments().string("response")?;

        if trigger.is_empty() {
            let reply = Reply::text("❌ The trigger must not be empty.").ephemeral();
            return ctx.reply(reply).await;
        }

        self.store.insert(&trigger, response).await?;
        info!(
            "User '{}' added an auto-response for '{}' in guild {:?}",
            ctx.user().name,
            trigger,
            ctx.guild_id()
        );
        ctx.say(&format!("✅ Response for \"{}\" added!", trigger)).await
    }
}

pub struct RemoveResponse {
    store: Arc<ResponseStore>,
}

impl RemoveResponse {
    pub fn new(store: Arc<ResponseStore>) -> Self {
        RemoveResponse { store }
    }
}

#[async_trait]
impl CommandHandler for RemoveResponse {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()> {
        let trigger = ctx.arguments().string("trigger")?.trim().to_lowercase();

        match self.store.remove(&trigger).await? {
            true => ctx.say(&format!("Removed trigger: **{}**", trigger)).await,
            false => ctx.reply(Reply::text("Trigger not found.").ephemeral()).await,
        }
    }
}
