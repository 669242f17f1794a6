use rand::seq::SliceRandom;

use crate::commands::giveaway::strategies::base::{DrawOptions, DrawStrategy};
use crate::models::User;

#[derive(Debug)]
pub struct RandomDrawStrategy;

impl RandomDrawStrategy {
    pub fn new() -> Self {
        RandomDrawStrategy {}
    }
}

impl DrawStrategy for RandomDrawStrategy {
    fn draw(&self, options: &DrawOptions) -> Vec<User> {
        let mut rng = rand::thread_rng();
        options
            .entrants()
            .choose_multiple(&mut rng, options.winners())
            .cloned()
            .collect()
    }
}
