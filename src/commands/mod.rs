pub mod autorespond;
pub mod embed;
pub mod general;
pub mod giveaway;

use std::sync::Arc;

use crate::commands::autorespond::{AddResponse, RemoveResponse};
use crate::commands::embed::SendEmbed;
use crate::commands::general::{Echo, Hello, Ping};
use crate::commands::giveaway::{
    EndGiveaway, GiveawayManager, ListGiveaways, RerollGiveaway, StartGiveaway,
};
use crate::dispatch::{Command, CommandBuilder, Parameter};
use crate::storage::ResponseStore;

// Every slash command the bot serves, in the order they get published.
pub fn definitions(
    store: Arc<ResponseStore>,
    giveaways: Arc<GiveawayManager>,
) -> Vec<CommandBuilder> {
    vec![
        Command::builder("ping")
            .description("Replies with Pong!")
            .handler(Ping),
        Command::builder("hello")
            .description("Says hello to you!")
            .handler(Hello),
        Command::builder("echo")
            .description("Repeats your message.")
            .parameter(Parameter::string("input", "The message to echo back.").required())
            .handler(Echo),
        Command::builder("embed")
            .description("Send a custom embed")
            .parameter(Parameter::string("title", "Title").required())
            .parameter(Parameter::string("desc", "Description").required())
            .handler(SendEmbed),
        Command::builder("addresponse")
            .description("Add an auto-response")
            .parameter(Parameter::string("trigger", "Trigger word").required())
            .parameter(Parameter::string("response", "Bot reply").required())
            .admin_only()
            .handler(AddResponse::new(store.clone())),
        Command::builder("removeresponse")
            .description("Remove an auto-response")
            .parameter(Parameter::string("trigger", "Trigger word").required())
            .admin_only()
            .handler(RemoveResponse::new(store)),
        Command::builder("giveaway")
            .description("Start a giveaway")
            .parameter(Parameter::integer("duration", "Duration in seconds").required())
            .parameter(Parameter::string("prize", "Prize").required())
            .parameter(Parameter::integer("winners", "Number of winners (default: 1)"))
            .handler(StartGiveaway::new(giveaways.clone())),
        Command::builder("reroll")
            .description("Reroll a giveaway")
            .parameter(
                Parameter::string("message_id", "The message ID of the giveaway to reroll")
                    .required(),
            )
            .handler(RerollGiveaway::new(giveaways.clone())),
        Command::builder("end")
            .description("End a giveaway early")
            .parameter(
                Parameter::string("message_id", "The message ID of the giveaway to end").required(),
            )
            .handler(EndGiveaway::new(giveaways.clone())),
        Command::builder("giveaways")
            .description("List all active giveaways")
            .handler(ListGiveaways::new(giveaways)),
    ]
}
