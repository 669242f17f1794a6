pub mod channel;
pub mod message;
pub mod welcome;

use std::sync::Arc;

use crate::commands::giveaway::GiveawayManager;
use crate::config::Config;
use crate::dispatch::router::{CHANNEL_DELETE, GUILD_MEMBER_ADD, MESSAGE_CREATE};
use crate::dispatch::EventRouter;
use crate::error::Result;
use crate::events::channel::ChannelDeleted;
use crate::events::message::MessageCreated;
use crate::events::welcome::MemberJoined;
use crate::moderation::ModerationFilter;
use crate::storage::ResponseStore;

// Binds a handler to every gateway event the bot reacts to.
pub fn router(
    config: &Config,
    store: Arc<ResponseStore>,
    giveaways: Arc<GiveawayManager>,
) -> Result<EventRouter> {
    let filter = Arc::new(ModerationFilter::new(&config.moderation));

    let mut router = EventRouter::new();
    router.bind(MESSAGE_CREATE, MessageCreated::new(filter, store))?;
    router.bind(
        GUILD_MEMBER_ADD,
        MemberJoined::new(config.welcome_channel_id, config.auto_role_id),
    )?;
    router.bind(CHANNEL_DELETE, ChannelDeleted::new(giveaways))?;
    Ok(router)
}
