// Recording doubles for the platform side of the dispatch core.
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::dispatch::context::{Arguments, Connector, InvocationContext, Responder};
use crate::error::{Error, Result};
use crate::models::{Reply, User};

pub const TEST_CHANNEL_ID: u64 = 100;
pub const TEST_GUILD_ID: u64 = 200;

#[derive(Default)]
pub struct RecordingResponder {
    replies: Mutex<Vec<Reply>>,
}

impl RecordingResponder {
    pub fn new() -> Self {
        RecordingResponder::default()
    }

    pub fn replies(&self) -> Vec<Reply> {
        self.replies.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.replies()
            .into_iter()
            .filter_map(|reply| reply.content)
            .collect()
    }
}

#[async_trait]
impl Responder for RecordingResponder {
    async fn reply(&self, reply: Reply) -> Result<()> {
        self.replies.lock().unwrap().push(reply);
        Ok(())
    }

    fn replied(&self) -> bool {
        !self.replies.lock().unwrap().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ConnectorCall {
    Send {
        channel_id: u64,
        reply: Reply,
    },
    ReplyTo {
        channel_id: u64,
        message_id: u64,
        reply: Reply,
    },
    Delete {
        channel_id: u64,
        message_id: u64,
    },
    React {
        channel_id: u64,
        message_id: u64,
        emoji: String,
    },
    AddRole {
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    },
}

pub struct RecordingConnector {
    calls: Mutex<Vec<ConnectorCall>>,
    reaction_users: Mutex<Vec<User>>,
    welcome_channel: Option<u64>,
    failing_roles: bool,
    failing_reactions: bool,
    next_message_id: AtomicU64,
}

impl RecordingConnector {
    pub fn new() -> Self {
        RecordingConnector {
            calls: Mutex::new(Vec::new()),
            reaction_users: Mutex::new(Vec::new()),
            welcome_channel: None,
            failing_roles: false,
            failing_reactions: false,
            next_message_id: AtomicU64::new(1000),
        }
    }

    pub fn with_reaction_users(self, users: Vec<User>) -> Self {
        *self.reaction_users.lock().unwrap() = users;
        self
    }

    pub fn with_welcome_channel(mut self, channel_id: u64) -> Self {
        self.welcome_channel = Some(channel_id);
        self
    }

    pub fn with_failing_roles(mut self) -> Self {
        self.failing_roles = true;
        self
    }

    pub fn with_failing_reactions(mut self) -> Self {
        self.failing_reactions = true;
        self
    }

    pub fn calls(&self) -> Vec<ConnectorCall> {
        self.calls.lock().unwrap().clone()
    }

    // Text of every message posted through the connector, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                ConnectorCall::Send { reply, .. } | ConnectorCall::ReplyTo { reply, .. } => {
                    reply.content
                }
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ConnectorCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    async fn send_message(&self, channel_id: u64, reply: Reply) -> Result<u64> {
        self.record(ConnectorCall::Send { channel_id, reply });
        Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn reply_to(&self, channel_id: u64, message_id: u64, reply: Reply) -> Result<u64> {
        self.record(ConnectorCall::ReplyTo {
            channel_id,
            message_id,
            reply,
        });
        Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<()> {
        self.record(ConnectorCall::Delete {
            channel_id,
            message_id,
        });
        Ok(())
    }

    async fn add_reaction(&self, channel_id: u64, message_id: u64, emoji: &str) -> Result<()> {
        if self.failing_reactions {
            return Err(Error::Connector("Missing Permissions".to_string()));
        }

        self.record(ConnectorCall::React {
            channel_id,
            message_id,
            emoji: emoji.to_string(),
        });
        Ok(())
    }

    async fn reaction_users(
        &self,
        _channel_id: u64,
        _message_id: u64,
        _emoji: &str,
    ) -> Result<Vec<User>> {
        Ok(self.reaction_users.lock().unwrap().clone())
    }

    async fn welcome_channel(&self, _guild_id: u64) -> Result<Option<u64>> {
        Ok(self.welcome_channel)
    }

    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64, _reason: &str) -> Result<()> {
        if self.failing_roles {
            return Err(Error::Connector("Missing Permissions".to_string()));
        }

        self.record(ConnectorCall::AddRole {
            guild_id,
            user_id,
            role_id,
        });
        Ok(())
    }
}

pub struct TestInvocation {
    pub context: InvocationContext,
    pub responder: Arc<RecordingResponder>,
    pub connector: Arc<RecordingConnector>,
}

pub fn invocation(command: &str, arguments: Arguments) -> TestInvocation {
    invocation_with(command, arguments, RecordingConnector::new())
}

pub fn invocation_with(
    command: &str,
    arguments: Arguments,
    connector: RecordingConnector,
) -> TestInvocation {
    invocation_by(command, arguments, User::new(1, "Tester"), Arc::new(connector))
}

// Invocation by a specific user, sharing the connector with other invocations.
pub fn invocation_by(
    command: &str,
    arguments: Arguments,
    user: User,
    connector: Arc<RecordingConnector>,
) -> TestInvocation {
    let responder = Arc::new(RecordingResponder::new());
    let context = InvocationContext::new(
        command,
        user,
        TEST_CHANNEL_ID,
        responder.clone(),
        connector.clone(),
    )
    .with_guild(Some(TEST_GUILD_ID))
    .with_arguments(arguments);

    TestInvocation {
        context,
        responder,
        connector,
    }
}
