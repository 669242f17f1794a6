use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::context::InvocationContext;
use crate::error::{Error, Result};

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(&self, ctx: &InvocationContext) -> Result<()>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParameterKind {
    String,
    Integer,
    Number,
    Boolean,
    User,
    Channel,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
    pub required: bool,
    pub description: String,
}

impl Parameter {
    pub fn new(name: &str, kind: ParameterKind, description: &str) -> Self {
        Parameter {
            name: name.to_string(),
            kind,
            required: false,
            description: description.to_string(),
        }
    }

    pub fn string(name: &str, description: &str) -> Self {
        Parameter::new(name, ParameterKind::String, description)
    }

    pub fn integer(name: &str, description: &str) -> Self {
        Parameter::new(name, ParameterKind::Integer, description)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    parameters: Vec<Parameter>,
    admin_only: bool,
    handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn builder(name: &str) -> CommandBuilder {
        CommandBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    // Only members with administrator rights see the command by default.
    pub fn is_admin_only(&self) -> bool {
        self.admin_only
    }

    pub fn handler(&self) -> Arc<dyn CommandHandler> {
        self.handler.clone()
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("admin_only", &self.admin_only)
            .finish_non_exhaustive()
    }
}

// A command definition that hasn't been validated yet.
pub struct CommandBuilder {
    name: String,
    description: String,
    parameters: Vec<Parameter>,
    admin_only: bool,
    handler: Option<Arc<dyn CommandHandler>>,
}

impl CommandBuilder {
    pub fn new(name: &str) -> Self {
        CommandBuilder {
            name: name.to_string(),
            description: String::new(),
            parameters: Vec::new(),
            admin_only: false,
            handler: None,
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn admin_only(mut self) -> Self {
        self.admin_only = true;
        self
    }

    pub fn handler<H>(mut self, handler: H) -> Self
    where
        H: CommandHandler + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<Command> {
        let name = self.name.trim().to_lowercase();
        if name.is_empty() {
            let message = "a command must have a name".to_string();
            return Err(Error::InvalidDefinition(message));
        }
        if name.chars().any(char::is_whitespace) {
            let message = format!("the command name `{}` must not contain whitespace", name);
            return Err(Error::InvalidDefinition(message));
        }

        let handler = match self.handler {
            Some(handler) => handler,
            None => {
                let message = format!("the command `{}` has no handler", name);
                return Err(Error::InvalidDefinition(message));
            }
        };

        Ok(Command {
            name,
            description: self.description,
            parameters: self.parameters,
            admin_only: self.admin_only,
            handler,
        })
    }
}

#[derive(Debug, Default)]
#[non_exhaustive]
pub struct CommandRegistry {
    commands: Vec<Command>,
    // Lowercased command name -> position in `commands`
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        CommandRegistry::default()
    }

    // Builds a registry out of the definitions. Either every definition gets
    // registered or none of them.
    pub fn load<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = CommandBuilder>,
    {
        let commands = definitions
            .into_iter()
            .map(CommandBuilder::build)
            .collect::<Result<Vec<Command>>>()?;

        let mut registry = CommandRegistry::new();
        for command in commands {
            registry.register(command)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, command: Command) -> Result<()> {
        let key = command.name().to_lowercase();
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateName(key));
        }

        self.index.insert(key, self.commands.len());
        self.commands.push(command);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<&Command> {
        let key = name.trim().to_lowercase();
        match self.index.get(&key) {
            Some(position) => Ok(&self.commands[*position]),
            None => Err(Error::NotFound(key)),
        }
    }

    // Iterates over the commands in registration order. The iterator can be
    // cloned to walk the same sequence again.
    pub fn list(&self) -> impl ExactSizeIterator<Item = &Command> + Clone + '_ {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use crate::dispatch::context::InvocationContext;
    use crate::dispatch::registry::{
        Command, CommandBuilder, CommandHandler, CommandRegistry, Parameter, ParameterKind,
    };
    use crate::error::{Error, Result};

    struct Noop;

    #[async_trait]
    impl CommandHandler for Noop {
        async fn execute(&self, _ctx: &InvocationContext) -> Result<()> {
            Ok(())
        }
    }

    fn definition(name: &str) -> CommandBuilder {
        Command::builder(name).description("test command").handler(Noop)
    }

    #[test]
    fn test_register_and_resolve_unique_commands() {
        let mut registry = CommandRegistry::new();
        for name in ["ping", "echo", "hello"] {
            registry.register(definition(name).build().unwrap()).unwrap();
        }

        for name in ["ping", "echo", "hello"] {
            assert_eq!(registry.resolve(name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = CommandRegistry::load(vec![definition("Ping")]).unwrap();

        assert_eq!(registry.resolve("PING").unwrap().name(), "ping");
        assert_eq!(registry.resolve("ping").unwrap().name(), "ping");
    }

    #[test]
    fn test_duplicate_name_keeps_first_command() {
        let mut registry = CommandRegistry::new();
        let first = definition("ping").description("first").build().unwrap();
        let second = definition("PING").description("second").build().unwrap();

        registry.register(first).unwrap();
        let result = registry.register(second);

        assert_eq!(result.unwrap_err(), Error::DuplicateName("ping".to_string()));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.resolve("ping").unwrap().description(), "first");
    }

    #[test]
    fn test_resolve_unknown_command() {
        let registry = CommandRegistry::load(vec![definition("ping")]).unwrap();
        assert_eq!(
            registry.resolve("foo").unwrap_err(),
            Error::NotFound("foo".to_string())
        );
    }

    #[test]
    fn test_list_keeps_load_order_and_is_repeatable() {
        let names = ["giveaway", "ping", "echo", "addresponse"];
        let registry = CommandRegistry::load(names.iter().map(|name| definition(name))).unwrap();

        let listed = registry.list();
        assert_eq!(listed.len(), names.len());
        let first_pass = listed.clone().map(|c| c.name().to_string()).collect::<Vec<String>>();
        let second_pass = listed.map(|c| c.name().to_string()).collect::<Vec<String>>();

        assert_eq!(first_pass, names);
        assert_eq!(second_pass, first_pass);
        assert_eq!(registry.list().count(), names.len());
    }

    #[test]
    fn test_load_fails_on_missing_handler() {
        let result = CommandRegistry::load(vec![
            definition("ping"),
            Command::builder("echo").description("no handler"),
        ]);

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidDefinition("the command `echo` has no handler".to_string())
        );
    }

    #[test]
    fn test_load_fails_on_missing_name() {
        let result = CommandRegistry::load(vec![definition("ping"), definition("  ")]);

        assert_eq!(
            result.unwrap_err(),
            Error::InvalidDefinition("a command must have a name".to_string())
        );
    }

    #[test]
    fn test_load_fails_on_name_with_whitespace() {
        let result = CommandRegistry::load(vec![definition("add response")]);
        assert_eq!(result.is_err(), true);
    }

    #[test]
    fn test_load_fails_on_duplicates() {
        let result = CommandRegistry::load(vec![definition("ping"), definition("Ping")]);
        assert_eq!(result.unwrap_err(), Error::DuplicateName("ping".to_string()));
    }

    #[test]
    fn test_parameters_keep_declaration_order() {
        let command = definition("giveaway")
            .parameter(Parameter::integer("duration", "Duration in seconds").required())
            .parameter(Parameter::string("prize", "Prize").required())
            .parameter(Parameter::integer("winners", "Number of winners"))
            .build()
            .unwrap();

        let parameters = command.parameters();
        assert_eq!(parameters.len(), 3);
        assert_eq!(parameters[0].name, "duration");
        assert_eq!(parameters[0].kind, ParameterKind::Integer);
        assert_eq!(parameters[0].required, true);
        assert_eq!(parameters[2].required, false);
    }
}
