pub mod base;
pub mod random;

pub use crate::commands::giveaway::strategies::base::{DrawOptions, DrawStrategy};
pub use crate::commands::giveaway::strategies::random::RandomDrawStrategy;
