pub mod formatters;
pub mod handlers;
pub mod manager;
pub mod models;
pub mod strategies;

pub use crate::commands::giveaway::handlers::{
    EndGiveaway, ListGiveaways, RerollGiveaway, StartGiveaway,
};
pub use crate::commands::giveaway::manager::GiveawayManager;
