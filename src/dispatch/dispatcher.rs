use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use crate::dispatch::context::{Connector, InvocationContext, Responder};
use crate::dispatch::registry::CommandRegistry;
use crate::dispatch::router::{EventPayload, EventRouter};
use crate::models::Reply;

pub const GENERIC_FAILURE: &str = "There was an error while executing this command!";
pub const SILENT_COMPLETION: &str = "Done.";

// Routes invocations and events to their handlers. Holds nothing that
// changes between invocations, so it can be shared across tasks as is.
#[non_exhaustive]
pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    router: Arc<EventRouter>,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, router: EventRouter) -> Self {
        Dispatcher {
            registry: Arc::new(registry),
            router: Arc::new(router),
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    // Runs the command once. Whatever happens, the invoking user ends up
    // with a terminal reply.
    #[instrument(skip(self, context))]
    pub async fn on_command_invoked(&self, name: &str, context: InvocationContext) {
        let responder = context.responder();

        let command = match self.registry.resolve(name) {
            Ok(command) => command,
            Err(err) => {
                debug!("Ignoring unknown command '{}'", name);
                send_terminal_reply(responder.as_ref(), Reply::text(&err.to_string()).ephemeral())
                    .await;
                return;
            }
        };

        info!(
            "Got command '{}' by user '{}'",
            context.command(),
            context.user().name
        );

        let handler = command.handler();
        let outcome = tokio::spawn(async move { handler.execute(&context).await }).await;

        let failure = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(err)) => Some(err.to_string()),
            Err(err) => Some(format!("the handler task was aborted: {}", err)),
        };

        match failure {
            Some(detail) => {
                error!("Command '{}' failed: {}", command.name(), detail);
                send_terminal_reply(responder.as_ref(), Reply::text(GENERIC_FAILURE).ephemeral())
                    .await;
            }
            None if !responder.replied() => {
                warn!("Command '{}' finished without replying", command.name());
                send_terminal_reply(responder.as_ref(), Reply::text(SILENT_COMPLETION).ephemeral())
                    .await;
            }
            None => {}
        }
    }

    // Delivers the event to its bound handler, if any. A failing handler is
    // logged and never affects later events.
    #[instrument(skip(self, payload, connector))]
    pub async fn on_platform_event(
        &self,
        event_name: &str,
        payload: EventPayload,
        connector: Arc<dyn Connector>,
    ) {
        if !self.router.is_bound(event_name) {
            return;
        }

        let router = self.router.clone();
        let name = event_name.to_string();
        let outcome =
            tokio::spawn(async move { router.dispatch(&name, &payload, connector.as_ref()).await })
                .await;

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!("Handler for the '{}' event failed: {}", event_name, err),
            Err(err) => error!(
                "Handler task for the '{}' event was aborted: {}",
                event_name, err
            ),
        }
    }
}

async fn send_terminal_reply(responder: &dyn Responder, reply: Reply) {
    if let Err(err) = responder.reply(reply).await {
        error!("Can't deliver the reply: {}", err);
    }
}
