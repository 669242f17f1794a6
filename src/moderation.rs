use std::collections::VecDeque;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::ModerationConfig;
use crate::models::{IncomingMessage, User};

lazy_static! {
    static ref LINK_REGEX: Regex = Regex::new(r"(?i)https?://").unwrap();
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Violation {
    Link,
    BannedWord,
    Spam,
}

impl Violation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Violation::Link => "Link",
            Violation::BannedWord => "BannedWord",
            Violation::Spam => "Spam",
        }
    }

    // Text posted in the channel after the offending message was removed.
    pub fn notice(&self, author: &User) -> String {
        match self {
            Violation::Link => format!("{}, links are not allowed.", author.mention()),
            Violation::BannedWord => format!("{}, that message was not allowed.", author.mention()),
            Violation::Spam => format!("{}, please stop spamming!", author.mention()),
        }
    }
}

pub struct ModerationFilter {
    banned_words: Vec<String>,
    block_links: bool,
    spam_threshold: usize,
    spam_window: Duration,
    // User id -> timestamps of the recent messages within the spam window
    activity: DashMap<u64, VecDeque<Instant>>,
}

impl ModerationFilter {
    pub fn new(config: &ModerationConfig) -> Self {
        ModerationFilter {
            banned_words: config
                .banned_words
                .iter()
                .map(|word| word.to_lowercase())
                .collect(),
            block_links: config.block_links,
            spam_threshold: config.spam_threshold,
            spam_window: config.spam_window,
            activity: DashMap::new(),
        }
    }

    // Plain substring containment after lowercasing, so a banned word also
    // matches inside longer words.
    pub fn contains_banned_word(&self, content: &str) -> bool {
        let content = content.to_lowercase();
        self.banned_words
            .iter()
            .any(|word| content.contains(word.as_str()))
    }

    pub fn contains_link(&self, content: &str) -> bool {
        self.block_links && LINK_REGEX.is_match(content)
    }

    pub fn check(&self, message: &IncomingMessage) -> Option<Violation> {
        self.check_at(message, Instant::now())
    }

    pub fn check_at(&self, message: &IncomingMessage, now: Instant) -> Option<Violation> {
        if self.contains_link(&message.content) {
            return Some(Violation::Link);
        }
        if self.contains_banned_word(&message.content) {
            return Some(Violation::BannedWord);
        }
        if self.is_spamming(message.author.id, now) {
            return Some(Violation::Spam);
        }

        None
    }

    fn is_spamming(&self, user_id: u64, now: Instant) -> bool {
        if self.spam_threshold == 0 {
            return false;
        }

        // Forget the authors who stayed quiet for a whole window.
        self.activity.retain(|_, recent| {
            recent
                .back()
                .is_some_and(|latest| now.duration_since(*latest) <= self.spam_window)
        });

        let mut recent = self.activity.entry(user_id).or_default();
        while let Some(oldest) = recent.front() {
            match now.duration_since(*oldest) > self.spam_window {
                true => recent.pop_front(),
                false => break,
            };
        }
        recent.push_back(now);
        recent.len() > self.spam_threshold
    }
}
