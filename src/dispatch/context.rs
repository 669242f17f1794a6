use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Reply, User};

// Reply capability for one invocation. The first reply answers the
// invocation, every later one is sent as a follow-up.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn reply(&self, reply: Reply) -> Result<()>;

    // Checks whether at least one reply went out already.
    fn replied(&self) -> bool;
}

// Side effects that aren't replies to an invocation.
#[async_trait]
pub trait Connector: Send + Sync {
    // Posts a message into the channel and returns its id.
    async fn send_message(&self, channel_id: u64, reply: Reply) -> Result<u64>;

    // Posts a message that references an existing one.
    async fn reply_to(&self, channel_id: u64, message_id: u64, reply: Reply) -> Result<u64>;

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()>;

    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<()>;

    // Returns everyone who reacted to the message with the given emoji.
    async fn reaction_users(&self, channel_id: u64, message_id: u64, emoji: &str)
    -> Result<Vec<User>>;

    // Picks the channel for greeting new members, if the guild has one.
    async fn welcome_channel(&self, guild_id: u64) -> Result<Option<u64>>;

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64, reason: &str) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq)]
pub enum ArgumentValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
    User(u64),
    Channel(u64),
}

// Argument values in the order the platform delivered them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(String, ArgumentValue)>,
}

impl Arguments {
    pub fn new() -> Self {
        Arguments::default()
    }

    pub fn with(mut self, name: &str, value: ArgumentValue) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: &str, value: ArgumentValue) {
        self.values.push((name.to_string(), value));
    }

    pub fn get(&self, name: &str) -> Option<&ArgumentValue> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn string(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(ArgumentValue::String(value)) => Ok(value),
            Some(_) => Err(Error::InvalidArgument(name.to_string())),
            None => Err(Error::MissingArgument(name.to_string())),
        }
    }

    pub fn integer(&self, name: &str) -> Result<i64> {
        match self.get(name) {
            Some(ArgumentValue::Integer(value)) => Ok(*value),
            Some(_) => Err(Error::InvalidArgument(name.to_string())),
            None => Err(Error::MissingArgument(name.to_string())),
        }
    }

    // Like `integer`, but an absent argument isn't an error.
    pub fn optional_integer(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None => Ok(None),
            Some(_) => self.integer(name).map(Some),
        }
    }
}

pub struct InvocationContext {
    command: String,
    user: User,
    channel_id: u64,
    guild_id: Option<u64>,
    // Whether the invoking member may manage other members' messages
    can_manage_messages: bool,
    arguments: Arguments,
    responder: Arc<dyn Responder>,
    connector: Arc<dyn Connector>,
}

impl InvocationContext {
    pub fn new(
        command: &str,
        user: User,
        channel_id: u64,
        responder: Arc<dyn Responder>,
        connector: Arc<dyn Connector>,
    ) -> Self {
        InvocationContext {
            command: command.to_string(),
            user,
            channel_id,
            guild_id: None,
            can_manage_messages: false,
            arguments: Arguments::new(),
            responder,
            connector,
        }
    }

    pub fn with_guild(mut self, guild_id: Option<u64>) -> Self {
        self.guild_id = guild_id;
        self
    }

    pub fn with_manage_messages(mut self, allowed: bool) -> Self {
        self.can_manage_messages = allowed;
        self
    }

    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    pub fn guild_id(&self) -> Option<u64> {
        self.guild_id
    }

    pub fn can_manage_messages(&self) -> bool {
        self.can_manage_messages
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn responder(&self) -> Arc<dyn Responder> {
        self.responder.clone()
    }

    pub fn connector(&self) -> Arc<dyn Connector> {
        self.connector.clone()
    }

    pub async fn reply(&self, reply: Reply) -> Result<()> {
        self.responder.reply(reply).await
    }

    pub async fn say(&self, content: &str) -> Result<()> {
        self.responder.reply(Reply::text(content)).await
    }
}
