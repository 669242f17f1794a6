use async_trait::async_trait;

use crate::dispatch::{CommandHandler, InvocationContext};
use crate::error::Result;

pub struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()> {
        ctx.say("Pong!").await
    }
}

pub struct Hello;

#[async_trait]
impl CommandHandler for Hello {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()> {
        ctx.say(&format!("Hello, {}!", ctx.user().mention())).await
    }
}

pub struct Echo;

#[async_trait]
impl CommandHandler for Echo {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()> {
        let input = ctx.arguments().string("input")?;
        ctx.say(&format!("You said: \"{}\"", input)).await
    }
}
