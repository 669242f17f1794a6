// Platform-independent command and event dispatch.
pub mod context;
pub mod dispatcher;
pub mod registry;
pub mod router;

#[cfg(test)]
pub mod testing;

pub use crate::dispatch::context::{
    ArgumentValue, Arguments, Connector, InvocationContext, Responder,
};
pub use crate::dispatch::dispatcher::Dispatcher;
pub use crate::dispatch::registry::{
    Command, CommandBuilder, CommandHandler, CommandRegistry, Parameter, ParameterKind,
};
pub use crate::dispatch::router::{EventHandler, EventPayload, EventRouter};
