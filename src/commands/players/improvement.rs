use poise::CreateReply;
use serenity::all::CreateEmbed;
use tracing::error;

use crate::{BotContext, Error, botdb, scoresaber, util};
use crate::commands::guild_member_ids;
use crate::services::player_refresh::throttle;

const MAX_CHECKED_PLAYERS: usize = 50;
const SHOWN_PLAYERS: usize = 10;
const DAYS: usize = 7;

/// Global ranks gained over the last week. `history` is oldest first and ends with today's rank.
pub fn weekly_improvement(history: &[i32]) -> Option<i32> {
    if history.len() <= DAYS {
        return None;
    }

    let now = history[history.len() - 1];
    let then = history[history.len() - 1 - DAYS];
    if now <= 0 || then <= 0 {
        return None;
    }

    Some(then - now)
}

fn format_improvement(position: usize, name: &str, ranks: i32) -> String {
    let arrow = if ranks > 0 { "📈" } else if ranks < 0 { "📉" } else { "➖" };
    format!("{}. {} {} {:+} ranks", position, util::bold(name), arrow, ranks)
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Players",
    description_localized("en-US", "Shows who climbed the global leaderboard the most this week."),
    discard_spare_arguments
)]
pub async fn improvement(ctx: BotContext<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let db = botdb!(ctx);
    let scoresaber = scoresaber!(ctx);
    let members = guild_member_ids(ctx).await?;
    let players: Vec<_> = db.get_all_players().await?
        .into_iter()
        .filter(|o| members.contains(&o.discord_user_id))
        .take(MAX_CHECKED_PLAYERS)
        .collect();

    let mut results = Vec::new();
    for (i, player) in players.iter().enumerate() {
        throttle(i as u32 + 1).await;
        match scoresaber.get_player(&player.player_id).await {
            Ok(Some(remote)) => {
                if let Some(ranks) = weekly_improvement(&remote.rank_history()) {
                    results.push((remote.name.clone(), ranks));
                }
            }
            Ok(None) => {}
            Err(ex) => error!("Failed to fetch player {}: {}", player.player_id, ex)
        }
    }

    if results.is_empty() {
        ctx.say("No rank history available for the players on this server.").await?;
        return Ok(());
    }

    results.sort_by(|a, b| b.1.cmp(&a.1));
    let description = results.iter()
        .take(SHOWN_PLAYERS)
        .enumerate()
        .map(|(i, (name, ranks))| format_improvement(i + 1, name, *ranks))
        .collect::<Vec<_>>()
        .join("\n");

    ctx.send(CreateReply::default().embed(CreateEmbed::new()
        .title("Biggest improvements this week")
        .description(description)
    )).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn improvement_compares_against_a_week_ago() {
        let history = [900, 800, 700, 600, 500, 400, 300, 250];
        assert_eq!(weekly_improvement(&history), Some(650));

        let history = [100, 120, 130, 140, 150, 160, 170, 180, 190];
        assert_eq!(weekly_improvement(&history), Some(-70));
    }

    #[test]
    fn short_or_unranked_histories_are_skipped() {
        assert_eq!(weekly_improvement(&[5, 4, 3]), None);
        assert_eq!(weekly_improvement(&[0, 1, 1, 1, 1, 1, 1, 1]), None);
    }

    #[test]
    fn improvement_lines_show_direction() {
        assert_eq!(format_improvement(1, "Ann", 12), "1. **Ann** 📈 +12 ranks");
        assert_eq!(format_improvement(2, "Bob", -3), "2. **Bob** 📉 -3 ranks");
        assert_eq!(format_improvement(3, "Cy", 0), "3. **Cy** ➖ +0 ranks");
    }
}
