use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::dispatch::Arguments;
use crate::error::Result;
use crate::models::User;

pub const ENTRY_EMOJI: &str = "🎉";
pub const DEFAULT_WINNERS: i64 = 1;
pub const MAX_WINNERS: i64 = 20;
// One week
pub const MAX_DURATION_SECS: i64 = 604_800;
pub const MAX_PRIZE_LENGTH: usize = 256;
// Embeds can't hold more fields than this without hitting platform limits.
pub const MAX_LISTED_GIVEAWAYS: usize = 10;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GiveawayRequest {
    pub prize: String,
    pub duration_secs: i64,
    pub winners: i64,
}

impl GiveawayRequest {
    pub fn from_arguments(arguments: &Arguments) -> Result<Self> {
        Ok(GiveawayRequest {
            prize: arguments.string("prize")?.trim().to_string(),
            duration_secs: arguments.integer("duration")?,
            winners: arguments
                .optional_integer("winners")?
                .unwrap_or(DEFAULT_WINNERS),
        })
    }

    // Returns a message for the host when the request can't be scheduled.
    pub fn validate(&self) -> Option<String> {
        if self.duration_secs < 1 || self.duration_secs > MAX_DURATION_SECS {
            return Some("❌ Duration must be between 1 second and 1 week!".to_string());
        }
        if self.winners < 1 || self.winners > MAX_WINNERS {
            return Some(format!(
                "❌ Number of winners must be between 1 and {}!",
                MAX_WINNERS
            ));
        }
        if self.prize.is_empty() {
            return Some("❌ The prize must not be empty!".to_string());
        }
        if self.prize.chars().count() > MAX_PRIZE_LENGTH {
            return Some(format!(
                "❌ Prize description too long! Maximum {} characters.",
                MAX_PRIZE_LENGTH
            ));
        }

        None
    }
}

#[derive(Debug)]
pub struct Giveaway {
    id: Uuid,
    // The member who started the giveaway.
    host: User,
    prize: String,
    winners: usize,
    duration: Duration,
    // Unix timestamp (seconds) of the scheduled draw
    ends_at: u64,
    // Where the announcement lives. Entrants are read from its reactions.
    channel_id: u64,
    message_id: u64,
    // Stops the pending draw, e.g. when the channel is gone.
    token: CancellationToken,
}

impl Giveaway {
    pub fn new(host: User, request: &GiveawayRequest, channel_id: u64, message_id: u64) -> Self {
        let duration = Duration::from_secs(request.duration_secs.max(0) as u64);
        let ends_at = (SystemTime::now() + duration)
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();

        Giveaway {
            id: Uuid::new_v4(),
            host,
            prize: request.prize.clone(),
            winners: request.winners.max(1) as usize,
            duration,
            ends_at,
            channel_id,
            message_id,
            token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn host(&self) -> &User {
        &self.host
    }

    pub fn prize(&self) -> &str {
        &self.prize
    }

    pub fn winners(&self) -> usize {
        self.winners
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn ends_at(&self) -> u64 {
        self.ends_at
    }

    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    pub fn message_id(&self) -> u64 {
        self.message_id
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::commands::giveaway::models::{Giveaway, GiveawayRequest};
    use crate::dispatch::{ArgumentValue, Arguments};
    use crate::error::Error;
    use crate::models::User;

    fn request(duration_secs: i64, winners: i64, prize: &str) -> GiveawayRequest {
        GiveawayRequest {
            prize: prize.to_string(),
            duration_secs,
            winners,
        }
    }

    #[test]
    fn test_request_defaults_to_one_winner() {
        let arguments = Arguments::new()
            .with("duration", ArgumentValue::Integer(60))
            .with("prize", ArgumentValue::String(" Nitro ".to_string()));

        let parsed = GiveawayRequest::from_arguments(&arguments).unwrap();
        assert_eq!(parsed, request(60, 1, "Nitro"));
    }

    #[test]
    fn test_request_requires_duration() {
        let arguments = Arguments::new().with("prize", ArgumentValue::String("Nitro".to_string()));
        assert_eq!(
            GiveawayRequest::from_arguments(&arguments).unwrap_err(),
            Error::MissingArgument("duration".to_string())
        );
    }

    #[test]
    fn test_valid_request() {
        assert_eq!(request(60, 3, "Nitro").validate(), None);
    }

    #[test]
    fn test_duration_bounds() {
        assert_eq!(request(0, 1, "Nitro").validate().is_some(), true);
        assert_eq!(request(604_801, 1, "Nitro").validate().is_some(), true);
        assert_eq!(request(604_800, 1, "Nitro").validate(), None);
    }

    #[test]
    fn test_winner_bounds() {
        assert_eq!(
            request(60, 21, "Nitro").validate(),
            Some("❌ Number of winners must be between 1 and 20!".to_string())
        );
        assert_eq!(request(60, 0, "Nitro").validate().is_some(), true);
    }

    #[test]
    fn test_prize_length() {
        let prize = "x".repeat(257);
        assert_eq!(
            request(60, 1, &prize).validate(),
            Some("❌ Prize description too long! Maximum 256 characters.".to_string())
        );
    }

    #[test]
    fn test_giveaway_cancellation() {
        let giveaway = Giveaway::new(User::new(1, "Host"), &request(30, 2, "Nitro"), 10, 20);

        assert_eq!(giveaway.duration(), Duration::from_secs(30));
        assert_eq!(giveaway.winners(), 2);
        assert_eq!(giveaway.ends_at() > 0, true);
        assert_eq!(giveaway.is_cancelled(), false);
        giveaway.cancel();
        assert_eq!(giveaway.is_cancelled(), true);
        assert_eq!(giveaway.cancellation_token().is_cancelled(), true);
    }
}
