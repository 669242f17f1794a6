use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::commands::giveaway::formatters::{DefaultGiveawayFormatter, GiveawayFormatter};
use crate::commands::giveaway::models::{ENTRY_EMOJI, Giveaway};
use crate::commands::giveaway::strategies::{DrawOptions, DrawStrategy, RandomDrawStrategy};
use crate::dispatch::Connector;
use crate::error::Result;
use crate::models::{Reply, User};

// Ended giveaways kept around so that they can be rerolled.
pub const MAX_ENDED_GIVEAWAYS: usize = 100;

struct EndedGiveaway {
    giveaway: Arc<Giveaway>,
    // Position in the order giveaways ended, the oldest one is evicted first
    sequence: u64,
}

// Keeps track of the giveaways waiting for their draw, and of the recently
// ended ones. Whoever removes a giveaway from the pending table draws it, so
// each giveaway is drawn once.
#[non_exhaustive]
pub struct GiveawayManager {
    giveaways: DashMap<Uuid, Arc<Giveaway>>,
    // Announcement message id -> ended giveaway
    ended: DashMap<u64, EndedGiveaway>,
    ended_count: AtomicU64,
    strategy: Arc<dyn DrawStrategy>,
    formatter: Arc<dyn GiveawayFormatter>,
}

impl GiveawayManager {
    pub fn new() -> Self {
        GiveawayManager::with_strategy(RandomDrawStrategy::new())
    }

    pub fn with_strategy<S>(strategy: S) -> Self
    where
        S: DrawStrategy + 'static,
    {
        GiveawayManager {
            giveaways: DashMap::new(),
            ended: DashMap::new(),
            ended_count: AtomicU64::new(0),
            strategy: Arc::new(strategy),
            formatter: Arc::new(DefaultGiveawayFormatter::new()),
        }
    }

    pub fn formatter(&self) -> Arc<dyn GiveawayFormatter> {
        self.formatter.clone()
    }

    // Pending giveaways, the ones ending first come first.
    pub fn get_giveaways(&self) -> Vec<Arc<Giveaway>> {
        let mut giveaways = self
            .giveaways
            .iter()
            .map(|pair| pair.value().clone())
            .collect::<Vec<Arc<Giveaway>>>();
        giveaways.sort_by_key(|giveaway| (giveaway.ends_at(), giveaway.message_id()));
        giveaways
    }

    pub fn len(&self) -> usize {
        self.giveaways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.giveaways.is_empty()
    }

    pub fn find_pending(&self, message_id: u64) -> Option<Arc<Giveaway>> {
        self.giveaways
            .iter()
            .find(|pair| pair.value().message_id() == message_id)
            .map(|pair| pair.value().clone())
    }

    pub fn find_ended(&self, message_id: u64) -> Option<Arc<Giveaway>> {
        self.ended
            .get(&message_id)
            .map(|entry| entry.giveaway.clone())
    }

    // Spawns the timer for the giveaway. The draw happens once the duration
    // is over, unless the giveaway gets cancelled or ended early first.
    pub fn schedule(self: &Arc<Self>, giveaway: Giveaway, connector: Arc<dyn Connector>) -> JoinHandle<()> {
        let giveaway = Arc::new(giveaway);
        self.giveaways.insert(giveaway.id(), giveaway.clone());
        info!(
            "Scheduled giveaway {} by '{}' for '{}' in {:?}",
            giveaway.id(),
            giveaway.host().name,
            giveaway.prize(),
            giveaway.duration()
        );

        let manager = self.clone();
        tokio::spawn(async move {
            let token = giveaway.cancellation_token();
            tokio::select! {
                _ = token.cancelled() => {
                    info!("Timer of giveaway {} was stopped", giveaway.id());
                }
                _ = tokio::time::sleep(giveaway.duration()) => {
                    if manager.giveaways.remove(&giveaway.id()).is_some() {
                        if let Err(err) = manager.finish(&giveaway, connector.as_ref()).await {
                            error!("Can't finish giveaway {}: {}", giveaway.id(), err);
                        }
                    }
                }
            }
            manager.giveaways.remove(&giveaway.id());
        })
    }

    // Draws the giveaway right away. Returns `None` when it was no longer
    // pending, e.g. because its timer fired in the meantime.
    pub async fn end_early(
        &self,
        giveaway: &Arc<Giveaway>,
        connector: &dyn Connector,
    ) -> Result<Option<Vec<User>>> {
        if self.giveaways.remove(&giveaway.id()).is_none() {
            return Ok(None);
        }

        giveaway.cancel();
        info!("Giveaway {} is ended early", giveaway.id());
        self.finish(giveaway, connector).await.map(Some)
    }

    // Cancels every pending giveaway announced in the channel and forgets
    // the ended ones. Returns how many pending giveaways were cancelled.
    pub fn cancel_in_channel(&self, channel_id: u64) -> usize {
        let cancelled = self
            .giveaways
            .iter()
            .filter(|pair| pair.value().channel_id() == channel_id)
            .map(|pair| pair.value().clone())
            .collect::<Vec<Arc<Giveaway>>>();

        for giveaway in cancelled.iter() {
            giveaway.cancel();
        }
        self.ended
            .retain(|_, entry| entry.giveaway.channel_id() != channel_id);
        cancelled.len()
    }

    // Draws the winners among the non-bot users who reacted to the
    // announcement and posts the results.
    pub async fn finish(&self, giveaway: &Arc<Giveaway>, connector: &dyn Connector) -> Result<Vec<User>> {
        self.remember_ended(giveaway);

        let (entrants, winners) = self.draw(giveaway, connector).await?;
        let text = self.formatter.results(&winners);
        connector
            .send_message(giveaway.channel_id(), Reply::text(&text))
            .await?;

        info!(
            "Giveaway {} finished with {} entrants and {} winners",
            giveaway.id(),
            entrants,
            winners.len()
        );
        Ok(winners)
    }

    // Draws the winners of an ended giveaway again. Nothing gets posted.
    pub async fn reroll(&self, giveaway: &Giveaway, connector: &dyn Connector) -> Result<Vec<User>> {
        let (entrants, winners) = self.draw(giveaway, connector).await?;
        info!(
            "Giveaway {} rerolled with {} entrants and {} winners",
            giveaway.id(),
            entrants,
            winners.len()
        );
        Ok(winners)
    }

    // Returns the number of entrants along with the drawn winners.
    async fn draw(&self, giveaway: &Giveaway, connector: &dyn Connector) -> Result<(usize, Vec<User>)> {
        let reactions = connector
            .reaction_users(giveaway.channel_id(), giveaway.message_id(), ENTRY_EMOJI)
            .await?;

        let mut seen = HashSet::new();
        let entrants = reactions
            .into_iter()
            .filter(|user| !user.bot && seen.insert(user.id))
            .collect::<Vec<User>>();

        let winners = self
            .strategy
            .draw(&DrawOptions::new(&entrants, giveaway.winners()));
        Ok((entrants.len(), winners))
    }

    fn remember_ended(&self, giveaway: &Arc<Giveaway>) {
        self.ended.insert(
            giveaway.message_id(),
            EndedGiveaway {
                giveaway: giveaway.clone(),
                sequence: self.ended_count.fetch_add(1, Ordering::SeqCst),
            },
        );

        while self.ended.len() > MAX_ENDED_GIVEAWAYS {
            let oldest = self
                .ended
                .iter()
                .min_by_key(|entry| entry.value().sequence)
                .map(|entry| *entry.key());
            match oldest {
                Some(message_id) => self.ended.remove(&message_id),
                None => break,
            };
        }
    }
}
