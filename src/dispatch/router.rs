use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::trace;

use crate::dispatch::context::Connector;
use crate::error::{Error, Result};
use crate::models::{IncomingMessage, JoinedMember};

pub const MESSAGE_CREATE: &str = "message_create";
pub const GUILD_MEMBER_ADD: &str = "guild_member_add";
pub const CHANNEL_DELETE: &str = "channel_delete";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EventPayload {
    MessageCreated(IncomingMessage),
    MemberJoined(JoinedMember),
    ChannelDeleted { channel_id: u64 },
}

impl EventPayload {
    // Returns the event name this payload is delivered under.
    pub fn name(&self) -> &'static str {
        match self {
            EventPayload::MessageCreated(_) => MESSAGE_CREATE,
            EventPayload::MemberJoined(_) => GUILD_MEMBER_ADD,
            EventPayload::ChannelDeleted { .. } => CHANNEL_DELETE,
        }
    }
}

#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, payload: &EventPayload, connector: &dyn Connector) -> Result<()>;
}

#[derive(Default)]
#[non_exhaustive]
pub struct EventRouter {
    bindings: HashMap<String, Arc<dyn EventHandler>>,
}

impl EventRouter {
    pub fn new() -> Self {
        EventRouter::default()
    }

    pub fn bind<H>(&mut self, event_name: &str, handler: H) -> Result<()>
    where
        H: EventHandler + 'static,
    {
        if self.bindings.contains_key(event_name) {
            return Err(Error::DuplicateBinding(event_name.to_string()));
        }

        self.bindings.insert(event_name.to_string(), Arc::new(handler));
        Ok(())
    }

    pub fn is_bound(&self, event_name: &str) -> bool {
        self.bindings.contains_key(event_name)
    }

    // Unbound events are ignored: the platform emits plenty of events the
    // bot has no interest in.
    pub async fn dispatch(
        &self,
        event_name: &str,
        payload: &EventPayload,
        connector: &dyn Connector,
    ) -> Result<()> {
        match self.bindings.get(event_name) {
            Some(handler) => handler.handle(payload, connector).await,
            None => {
                trace!("No handler bound for the '{}' event", event_name);
                Ok(())
            }
        }
    }
}
