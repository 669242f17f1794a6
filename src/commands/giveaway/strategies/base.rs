use crate::models::User;

pub struct DrawOptions<'a> {
    entrants: &'a [User],
    winners: usize,
}

impl<'a> DrawOptions<'a> {
    pub fn new(entrants: &'a [User], winners: usize) -> Self {
        DrawOptions { entrants, winners }
    }

    // Returns everyone eligible for the draw.
    pub fn entrants(&self) -> &'a [User] {
        self.entrants
    }

    // Returns how many winners the host asked for.
    pub fn winners(&self) -> usize {
        self.winners
    }
}

pub trait DrawStrategy: Send + Sync {
    // Picks at most `winners` distinct entrants.
    fn draw(&self, options: &DrawOptions) -> Vec<User>;
}
