use async_trait::async_trait;

use crate::dispatch::{CommandHandler, InvocationContext};
use crate::error::Result;
use crate::models::{Embed, Reply};

pub struct SendEmbed;

// Any 24-bit RGB colour.
fn random_colour() -> u32 {
    rand::random::<u32>() & 0x00FF_FFFF
}

#[async_trait]
impl CommandHandler for SendEmbed {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()> {
        let arguments = ctx.arguments();
        let embed = Embed::new()
            .title(arguments.string("title")?)
            .description(arguments.string("desc")?)
            .colour(random_colour());

        ctx.reply(Reply::embed(embed)).await
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::embed::SendEmbed;
    use crate::dispatch::testing::invocation;
    use crate::dispatch::{ArgumentValue, Arguments, CommandHandler};

    #[tokio::test]
    async fn test_embed_uses_title_and_description() {
        let arguments = Arguments::new()
            .with("title", ArgumentValue::String("News".to_string()))
            .with("desc", ArgumentValue::String("Server maintenance".to_string()));
        let test = invocation("embed", arguments);

        SendEmbed.execute(&test.context).await.unwrap();

        let replies = test.responder.replies();
        assert_eq!(replies.len(), 1);
        let embed = replies[0].embed.clone().unwrap();
        assert_eq!(embed.title, Some("News".to_string()));
        assert_eq!(embed.description, Some("Server maintenance".to_string()));
        assert_eq!(embed.colour.unwrap() <= 0x00FF_FFFF, true);
    }
}
