use std::sync::Arc;

use crate::commands::giveaway::models::{Giveaway, GiveawayRequest};
use crate::models::{Embed, User};

pub trait GiveawayFormatter: Send + Sync {
    // Message that opens the giveaway and collects entries.
    fn announcement(&self, request: &GiveawayRequest, host: &User) -> Embed;
    // Message posted into the channel once the winners are drawn.
    fn results(&self, winners: &[User]) -> String;
    // Reply with the winners of a repeated draw.
    fn reroll(&self, prize: &str, winners: &[User]) -> String;
    // Overview of the pending giveaways. `total` counts the ones left out too.
    fn listing(&self, giveaways: &[Arc<Giveaway>], total: usize) -> Embed;
}
