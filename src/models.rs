use serenity::model::channel::Message as DiscordMessage;
use serenity::model::guild::Member as DiscordMember;
use serenity::model::user::User as DiscordUser;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub bot: bool,
}

impl User {
    pub fn new(id: u64, name: &str) -> Self {
        User {
            id,
            name: name.to_string(),
            bot: false,
        }
    }

    pub fn as_bot(mut self) -> Self {
        self.bot = true;
        self
    }

    // Returns the markup that pings the user in a message.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl From<&DiscordUser> for User {
    fn from(discord_user: &DiscordUser) -> Self {
        User {
            id: discord_user.id.get(),
            name: discord_user.name.clone(),
            bot: discord_user.bot,
        }
    }
}

#[readonly::make]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IncomingMessage {
    pub id: u64,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub author: User,
    pub content: String,
}

impl IncomingMessage {
    pub fn new(id: u64, channel_id: u64, author: User, content: &str) -> Self {
        IncomingMessage {
            id,
            channel_id,
            guild_id: None,
            author,
            content: content.to_string(),
        }
    }
}

impl From<&DiscordMessage> for IncomingMessage {
    fn from(message: &DiscordMessage) -> Self {
        IncomingMessage {
            id: message.id.get(),
            channel_id: message.channel_id.get(),
            guild_id: message.guild_id.map(|id| id.get()),
            author: User::from(&message.author),
            content: message.content.clone(),
        }
    }
}

#[readonly::make]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JoinedMember {
    pub guild_id: u64,
    pub user: User,
}

impl JoinedMember {
    pub fn new(guild_id: u64, user: User) -> Self {
        JoinedMember { guild_id, user }
    }
}

impl From<&DiscordMember> for JoinedMember {
    fn from(member: &DiscordMember) -> Self {
        JoinedMember {
            guild_id: member.guild_id.get(),
            user: User::from(&member.user),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

// Platform-neutral rich message. The connector turns it into whatever the
// platform renders.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub colour: Option<u32>,
    pub author: Option<String>,
    pub footer: Option<String>,
    pub fields: Vec<EmbedField>,
    pub timestamp: bool,
}

impl Embed {
    pub fn new() -> Self {
        Embed::default()
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn colour(mut self, colour: u32) -> Self {
        self.colour = Some(colour);
        self
    }

    pub fn author(mut self, author: &str) -> Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn footer(mut self, footer: &str) -> Self {
        self.footer = Some(footer.to_string());
        self
    }

    pub fn field(mut self, name: &str, value: &str, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.to_string(),
            value: value.to_string(),
            inline,
        });
        self
    }

    pub fn with_timestamp(mut self) -> Self {
        self.timestamp = true;
        self
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Reply {
    pub content: Option<String>,
    pub embed: Option<Embed>,
    // Only visible to the invoking user, where the platform supports it.
    pub ephemeral: bool,
}

impl Reply {
    pub fn text(content: &str) -> Self {
        Reply {
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Reply {
            embed: Some(embed),
            ..Default::default()
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Embed, Reply, User};

    #[test]
    fn test_mention_uses_user_id() {
        let user = User::new(42, "Test");
        assert_eq!(user.mention(), "<@42>");
    }

    #[test]
    fn test_ephemeral_text_reply() {
        let reply = Reply::text("hi").ephemeral();
        assert_eq!(reply.content, Some("hi".to_string()));
        assert_eq!(reply.embed, None);
        assert_eq!(reply.ephemeral, true);
    }

    #[test]
    fn test_embed_builder_keeps_field_order() {
        let embed = Embed::new()
            .title("Title")
            .field("first", "1", false)
            .field("second", "2", true);

        assert_eq!(embed.title, Some("Title".to_string()));
        assert_eq!(embed.fields.len(), 2);
        assert_eq!(embed.fields[0].name, "first");
        assert_eq!(embed.fields[1].inline, true);
    }
}
