use std::sync::Arc;

use crate::commands::giveaway::formatters::base::GiveawayFormatter;
use crate::commands::giveaway::models::{ENTRY_EMOJI, Giveaway, GiveawayRequest};
use crate::models::{Embed, User};

pub const GOLD: u32 = 0xF1C40F;
pub const GREEN: u32 = 0x00FF00;
const LISTED_PRIZE_LENGTH: usize = 50;

pub struct DefaultGiveawayFormatter;

impl DefaultGiveawayFormatter {
    pub fn new() -> Self {
        DefaultGiveawayFormatter {}
    }
}

fn plural(count: i64, noun: &str) -> String {
    match count == 1 {
        true => format!("{} {}", count, noun),
        false => format!("{} {}s", count, noun),
    }
}

fn mentions(users: &[User]) -> String {
    users
        .iter()
        .map(|user| user.mention())
        .collect::<Vec<String>>()
        .join(", ")
}

fn shorten(text: &str, limit: usize) -> String {
    match text.chars().count() > limit {
        true => format!("{}...", text.chars().take(limit).collect::<String>()),
        false => text.to_string(),
    }
}

impl GiveawayFormatter for DefaultGiveawayFormatter {
    fn announcement(&self, request: &GiveawayRequest, host: &User) -> Embed {
        let description = format!(
            "Prize: **{}**\nReact with {} to enter!\nEnds in **{}**.",
            request.prize,
            ENTRY_EMOJI,
            plural(request.duration_secs, "second"),
        );

        Embed::new()
            .title("🎉 Giveaway Started!")
            .description(&description)
            .colour(GOLD)
            .author(&format!("Hosted by {}", host.name))
            .field("👥 Winners", &plural(request.winners, "winner"), true)
            .with_timestamp()
    }

    fn results(&self, winners: &[User]) -> String {
        match winners.len() {
            0 => "❌ No valid entries.".to_string(),
            1 => format!("🎊 Winner is {}! Congrats!", mentions(winners)),
            _ => format!("🎊 Winners are {}! Congrats!", mentions(winners)),
        }
    }

    fn reroll(&self, prize: &str, winners: &[User]) -> String {
        match winners.len() {
            1 => format!("🎊 New winner of **{}** is {}! Congrats!", prize, mentions(winners)),
            _ => format!("🎊 New winners of **{}** are {}! Congrats!", prize, mentions(winners)),
        }
    }

    fn listing(&self, giveaways: &[Arc<Giveaway>], total: usize) -> Embed {
        let embed = giveaways.iter().fold(
            Embed::new().title("🎉 Active Giveaways").colour(GREEN),
            |embed, giveaway| {
                embed.field(
                    &format!("🏆 {}", shorten(giveaway.prize(), LISTED_PRIZE_LENGTH)),
                    &format!(
                        "Ends <t:{}:R>\nMessage ID: `{}`",
                        giveaway.ends_at(),
                        giveaway.message_id()
                    ),
                    false,
                )
            },
        );

        embed
            .footer(&format!(
                "Showing {} of {} active giveaways",
                giveaways.len(),
                total
            ))
            .with_timestamp()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::commands::giveaway::formatters::{DefaultGiveawayFormatter, GiveawayFormatter};
    use crate::commands::giveaway::models::{Giveaway, GiveawayRequest};
    use crate::models::User;

    #[test]
    fn test_announcement() {
        let formatter = DefaultGiveawayFormatter::new();
        let request = GiveawayRequest {
            prize: "Nitro".to_string(),
            duration_secs: 1,
            winners: 2,
        };

        let embed = formatter.announcement(&request, &User::new(1, "Host"));

        assert_eq!(embed.title, Some("🎉 Giveaway Started!".to_string()));
        assert_eq!(
            embed.description,
            Some("Prize: **Nitro**\nReact with 🎉 to enter!\nEnds in **1 second**.".to_string())
        );
        assert_eq!(embed.author, Some("Hosted by Host".to_string()));
        assert_eq!(embed.fields[0].value, "2 winners");
        assert_eq!(embed.timestamp, true);
    }

    #[test]
    fn test_results_without_winners() {
        let formatter = DefaultGiveawayFormatter::new();
        assert_eq!(formatter.results(&[]), "❌ No valid entries.");
    }

    #[test]
    fn test_results_with_single_winner() {
        let formatter = DefaultGiveawayFormatter::new();
        assert_eq!(
            formatter.results(&[User::new(5, "Winner")]),
            "🎊 Winner is <@5>! Congrats!"
        );
    }

    #[test]
    fn test_results_with_several_winners() {
        let formatter = DefaultGiveawayFormatter::new();
        let winners = vec![User::new(5, "A"), User::new(6, "B")];
        assert_eq!(
            formatter.results(&winners),
            "🎊 Winners are <@5>, <@6>! Congrats!"
        );
    }

    #[test]
    fn test_reroll_names_the_prize() {
        let formatter = DefaultGiveawayFormatter::new();
        assert_eq!(
            formatter.reroll("Nitro", &[User::new(5, "Winner")]),
            "🎊 New winner of **Nitro** is <@5>! Congrats!"
        );
    }

    #[test]
    fn test_listing_shortens_long_prizes() {
        let formatter = DefaultGiveawayFormatter::new();
        let request = GiveawayRequest {
            prize: "x".repeat(60),
            duration_secs: 60,
            winners: 1,
        };
        let giveaway = Arc::new(Giveaway::new(User::new(1, "Host"), &request, 10, 20));

        let embed = formatter.listing(&[giveaway.clone()], 12);

        assert_eq!(embed.fields.len(), 1);
        assert_eq!(embed.fields[0].name, format!("🏆 {}...", "x".repeat(50)));
        assert_eq!(
            embed.fields[0].value,
            format!("Ends <t:{}:R>\nMessage ID: `20`", giveaway.ends_at())
        );
        assert_eq!(embed.footer, Some("Showing 1 of 12 active giveaways".to_string()));
    }
}
