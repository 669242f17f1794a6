use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use serenity::{
    ApplicationId, ChannelId, ChannelType, Command as PlatformCommand, CommandDataOption,
    CommandDataOptionValue, CommandInteraction, CommandOptionType, CreateCommand,
    CreateCommandOption, CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter,
    CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, CreateMessage, FullEvent, GatewayIntents, GuildId, Http,
    Interaction, MessageId, Permissions, ReactionType, RoleId, Timestamp, UserId,
};
use tracing::{error, info, instrument};

use crate::config::Config;
use crate::dispatch::{
    ArgumentValue, Arguments, Command, CommandRegistry, Connector, Dispatcher, EventPayload,
    InvocationContext, ParameterKind, Responder,
};
use crate::error::{Error, Result};
use crate::models::{Embed, IncomingMessage, JoinedMember, Reply, User};

// Discord returns at most this many users per reaction page.
const REACTION_PAGE_SIZE: u8 = 100;

// User data, which is stored and accessible in all event invocations
pub struct UserData {
    dispatcher: Arc<Dispatcher>,
    connector: Arc<DiscordConnector>,
}

pub struct DiscordConnector {
    http: Arc<Http>,
}

impl DiscordConnector {
    pub fn new(http: Arc<Http>) -> Self {
        DiscordConnector { http }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChannelSummary {
    pub id: u64,
    pub name: String,
    pub is_text: bool,
    pub position: u16,
}

// Prefers the text channel named `general`, then the topmost text channel.
pub fn pick_welcome_channel(channels: &[ChannelSummary]) -> Option<u64> {
    let mut text_channels = channels
        .iter()
        .filter(|channel| channel.is_text)
        .collect::<Vec<&ChannelSummary>>();
    text_channels.sort_by_key(|channel| (channel.position, channel.id));

    text_channels
        .iter()
        .find(|channel| channel.name == "general")
        .or_else(|| text_channels.first())
        .map(|channel| channel.id)
}

fn create_embed(embed: Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = embed.title {
        builder = builder.title(title);
    }
    if let Some(description) = embed.description {
        builder = builder.description(description);
    }
    if let Some(colour) = embed.colour {
        builder = builder.colour(colour);
    }
    if let Some(author) = embed.author {
        builder = builder.author(CreateEmbedAuthor::new(author));
    }
    if let Some(footer) = embed.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer));
    }
    for field in embed.fields {
        builder = builder.field(field.name, field.value, field.inline);
    }
    if embed.timestamp {
        builder = builder.timestamp(Timestamp::now());
    }
    builder
}

fn create_message(reply: Reply) -> CreateMessage {
    let mut builder = CreateMessage::new();
    if let Some(content) = reply.content {
        builder = builder.content(content);
    }
    if let Some(embed) = reply.embed {
        builder = builder.embed(create_embed(embed));
    }
    builder
}

#[async_trait]
impl Connector for DiscordConnector {
    async fn send_message(&self, channel_id: u64, reply: Reply) -> Result<u64> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.http, create_message(reply))
            .await?;
        Ok(message.id.get())
    }

    async fn reply_to(&self, channel_id: u64, message_id: u64, reply: Reply) -> Result<u64> {
        let channel_id = ChannelId::new(channel_id);
        let builder =
            create_message(reply).reference_message((channel_id, MessageId::new(message_id)));
        let message = channel_id.send_message(&self.http, builder).await?;
        Ok(message.id.get())
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
        ChannelId::new(channel_id)
            .delete_message(&self.http, MessageId::new(message_id))
            .await?;
        Ok(())
    }

    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<()> {
        ChannelId::new(channel_id)
            .create_reaction(
                &self.http,
                MessageId::new(message_id),
                ReactionType::Unicode(emoji.to_string()),
            )
            .await?;
        Ok(())
    }

    async fn reaction_users(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<Vec<User>> {
        let channel_id = ChannelId::new(channel_id);
        let message_id = MessageId::new(message_id);
        let mut users = Vec::new();
        let mut after: Option<UserId> = None;

        loop {
            let page = channel_id
                .reaction_users(
                    &self.http,
                    message_id,
                    ReactionType::Unicode(emoji.to_string()),
                    Some(REACTION_PAGE_SIZE),
                    after,
                )
                .await?;

            let last_page = page.len() < REACTION_PAGE_SIZE as usize;
            after = page.last().map(|user| user.id);
            users.extend(page.iter().map(User::from));

            if last_page || after.is_none() {
                break;
            }
        }

        Ok(users)
    }

    async fn welcome_channel(&self, guild_id: u64) -> Result<Option<u64>> {
        let channels = GuildId::new(guild_id)
            .channels(&self.http)
            .await?
            .into_values()
            .map(|channel| ChannelSummary {
                id: channel.id.get(),
                name: channel.name.clone(),
                is_text: channel.kind == ChannelType::Text,
                position: channel.position,
            })
            .collect::<Vec<ChannelSummary>>();

        Ok(pick_welcome_channel(&channels))
    }

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64, reason: &str) -> Result<()> {
        self.http
            .add_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(reason),
            )
            .await?;
        Ok(())
    }
}

// Answers a slash command interaction: the first reply is the interaction
// response, the rest are follow-ups.
pub struct InteractionResponder {
    http: Arc<Http>,
    interaction: CommandInteraction,
    replied: AtomicBool,
}

impl InteractionResponder {
    pub fn new(http: Arc<Http>, interaction: CommandInteraction) -> Self {
        InteractionResponder {
            http,
            interaction,
            replied: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Responder for InteractionResponder {
    async fn reply(&self, reply: Reply) -> Result<()> {
        if self.replied.swap(true, Ordering::SeqCst) {
            let mut builder = CreateInteractionResponseFollowup::new().ephemeral(reply.ephemeral);
            if let Some(content) = reply.content {
                builder = builder.content(content);
            }
            if let Some(embed) = reply.embed {
                builder = builder.embed(create_embed(embed));
            }
            self.interaction.create_followup(&self.http, builder).await?;
            return Ok(());
        }

        let mut message = CreateInteractionResponseMessage::new().ephemeral(reply.ephemeral);
        if let Some(content) = reply.content {
            message = message.content(content);
        }
        if let Some(embed) = reply.embed {
            message = message.embed(create_embed(embed));
        }

        let result = self
            .interaction
            .create_response(&self.http, CreateInteractionResponse::Message(message))
            .await;
        if let Err(err) = result {
            // Nothing reached the user, so the next attempt is still the response.
            self.replied.store(false, Ordering::SeqCst);
            return Err(Error::from(err));
        }
        Ok(())
    }

    fn replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }
}

fn option_type(kind: ParameterKind) -> CommandOptionType {
    match kind {
        ParameterKind::String => CommandOptionType::String,
        ParameterKind::Integer => CommandOptionType::Integer,
        ParameterKind::Number => CommandOptionType::Number,
        ParameterKind::Boolean => CommandOptionType::Boolean,
        ParameterKind::User => CommandOptionType::User,
        ParameterKind::Channel => CommandOptionType::Channel,
    }
}

// Describes the command the way the platform expects it at registration.
pub fn create_command(command: &Command) -> CreateCommand {
    let mut builder = CreateCommand::new(command.name()).description(command.description());
    for parameter in command.parameters() {
        let option = CreateCommandOption::new(
            option_type(parameter.kind),
            &parameter.name,
            &parameter.description,
        )
        .required(parameter.required);
        builder = builder.add_option(option);
    }
    if command.is_admin_only() {
        builder = builder.default_member_permissions(Permissions::ADMINISTRATOR);
    }
    builder
}

// Replaces the whole remote command set with the registry's commands, so
// running it again is harmless.
pub async fn sync_commands(
    http: &Arc<Http>,
    registry: &CommandRegistry,
    guild_id: Option<u64>,
) -> Result<usize> {
    let commands = registry.list().map(create_command).collect::<Vec<CreateCommand>>();
    let count = commands.len();

    match guild_id {
        Some(guild_id) => {
            GuildId::new(guild_id).set_commands(http, commands).await?;
        }
        None => {
            PlatformCommand::set_global_commands(http, commands).await?;
        }
    }
    Ok(count)
}

fn arguments(options: &[CommandDataOption]) -> Arguments {
    let mut arguments = Arguments::new();
    for option in options {
        let value = match &option.value {
            CommandDataOptionValue::String(value) => ArgumentValue::String(value.clone()),
            CommandDataOptionValue::Integer(value) => ArgumentValue::Integer(*value),
            CommandDataOptionValue::Number(value) => ArgumentValue::Number(*value),
            CommandDataOptionValue::Boolean(value) => ArgumentValue::Boolean(*value),
            CommandDataOptionValue::User(id) => ArgumentValue::User(id.get()),
            CommandDataOptionValue::Channel(id) => ArgumentValue::Channel(id.get()),
            _ => continue,
        };
        arguments.push(&option.name, value);
    }
    arguments
}

// Permissions are only present for invocations inside a guild.
fn can_manage_messages(interaction: &CommandInteraction) -> bool {
    interaction
        .member
        .as_ref()
        .and_then(|member| member.permissions)
        .is_some_and(|permissions| permissions.manage_messages())
}

fn invocation_context(
    http: Arc<Http>,
    interaction: &CommandInteraction,
    connector: Arc<dyn Connector>,
) -> InvocationContext {
    let responder = Arc::new(InteractionResponder::new(http, interaction.clone()));
    InvocationContext::new(
        &interaction.data.name,
        User::from(&interaction.user),
        interaction.channel_id.get(),
        responder,
        connector,
    )
    .with_guild(interaction.guild_id.map(|id| id.get()))
    .with_manage_messages(can_manage_messages(interaction))
    .with_arguments(arguments(&interaction.data.options))
}

// Translates gateway events into dispatcher calls.
#[instrument(skip_all)]
async fn event_handler(
    ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, UserData, Error>,
    data: &UserData,
) -> Result<()> {
    let connector: Arc<dyn Connector> = data.connector.clone();

    let payload = match event {
        FullEvent::Ready { data_about_bot } => {
            info!("{} is connected!", data_about_bot.user.name);
            return Ok(());
        }
        FullEvent::InteractionCreate {
            interaction: Interaction::Command(command),
        } => {
            let context = invocation_context(ctx.http.clone(), command, connector);
            data.dispatcher
                .on_command_invoked(&command.data.name, context)
                .await;
            return Ok(());
        }
        FullEvent::Message { new_message } => {
            EventPayload::MessageCreated(IncomingMessage::from(new_message))
        }
        FullEvent::GuildMemberAddition { new_member } => {
            EventPayload::MemberJoined(JoinedMember::from(new_member))
        }
        FullEvent::ChannelDelete { channel, .. } => EventPayload::ChannelDeleted {
            channel_id: channel.id.get(),
        },
        _ => return Ok(()),
    };

    data.dispatcher
        .on_platform_event(payload.name(), payload, connector)
        .await;
    Ok(())
}

// Commands are served by the dispatcher, so poise never knows any of them.
async fn on_error(error: poise::FrameworkError<'_, UserData, Error>) {
    match error {
        poise::FrameworkError::UnknownInteraction { .. } => {}
        other => {
            if let Err(err) = poise::builtins::on_error(other).await {
                error!("Error while handling framework error: {}", err);
            }
        }
    }
}

// Connects to the gateway and serves events until the connection fails.
pub async fn run(config: Config, dispatcher: Arc<Dispatcher>) -> Result<()> {
    let guild_id = config.guild_id;

    let framework = poise::Framework::<UserData, Error>::builder()
        .options(poise::FrameworkOptions {
            commands: vec![],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, _framework| {
            Box::pin(async move {
                let published = sync_commands(&ctx.http, dispatcher.registry(), guild_id).await?;
                info!("Successfully reloaded {} application (/) commands.", published);

                Ok(UserData {
                    dispatcher,
                    connector: Arc::new(DiscordConnector::new(ctx.http.clone())),
                })
            })
        })
        .build();

    let intents = GatewayIntents::non_privileged()
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MEMBERS;
    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .application_id(ApplicationId::new(config.application_id))
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}
