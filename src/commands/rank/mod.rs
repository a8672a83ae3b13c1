mod neighbors;

pub use neighbors::*;

use poise::CreateReply;
use serenity::all::CreateEmbed;

use crate::{BotContext, Error, scoresaber, util};
use crate::commands::command_player;
use crate::models::player::Player;

async fn send_rank(ctx: BotContext<'_>, player: Option<String>, kind: LeaderboardType) -> Result<(), Error> {
    ctx.defer().await?;
    let Some(stored) = command_player(ctx, player.as_deref()).await? else {
        return Ok(());
    };

    let scoresaber = scoresaber!(ctx);
    let player = match scoresaber.get_player(&stored.player_id).await? {
        Some(remote) => stored.refreshed(&remote),
        None => stored
    };

    if kind == LeaderboardType::Dach && !player.is_dach() {
        ctx.say("Your are not from Germany, Austria or Switzerland.").await?;
        return Ok(());
    }

    let (start_page, countries) = start_of(&player, kind);
    let window = find_entries_around_player(&*scoresaber, &player.player_id, countries.as_deref(), start_page, kind.size_limit()).await?;
    let Some(window) = window else {
        ctx.say("Could not extract ScoreSaber profiles. Maybe your rank is too low or there is another error.").await?;
        return Ok(());
    };

    let page = match kind {
        LeaderboardType::Global => util::page_from_rank(player.rank),
        LeaderboardType::Local => util::page_from_rank(player.country_rank),
        LeaderboardType::Dach => util::page_from_rank(window.player_index as i32 + 1)
    };

    ctx.send(CreateReply::default().embed(CreateEmbed::new()
        .title(util::underline(kind.title()))
        .url(util::leaderboard_url(page, countries.as_deref()))
        .description(format_window(&window, kind))
    )).await?;

    Ok(())
}

fn start_of(player: &Player, kind: LeaderboardType) -> (i32, Option<String>) {
    match kind {
        LeaderboardType::Global => (util::page_from_rank(player.rank - 2), None),
        LeaderboardType::Local => (util::page_from_rank(player.country_rank - 2), Some(player.country.to_lowercase())),
        LeaderboardType::Dach => (1, Some(DACH_COUNTRIES.to_string()))
    }
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Ranks",
    description_localized("en-US", "Shows the players around you on the global leaderboard.")
)]
pub async fn globalrank(
    ctx: BotContext<'_>,
    #[description = "A mentioned user, or nothing for yourself"] #[rest] player: Option<String>)
-> Result<(), Error> {
    send_rank(ctx, player, LeaderboardType::Global).await
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Ranks",
    description_localized("en-US", "Shows the players around you on your country's leaderboard.")
)]
pub async fn localrank(
    ctx: BotContext<'_>,
    #[description = "A mentioned user, or nothing for yourself"] #[rest] player: Option<String>)
-> Result<(), Error> {
    send_rank(ctx, player, LeaderboardType::Local).await
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Ranks",
    description_localized("en-US", "Shows the players around you in Germany, Austria and Switzerland.")
)]
pub async fn dachrank(
    ctx: BotContext<'_>,
    #[description = "A mentioned user, or nothing for yourself"] #[rest] player: Option<String>)
-> Result<(), Error> {
    send_rank(ctx, player, LeaderboardType::Dach).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serenity::model::id::UserId;

    fn player(rank: i32, country_rank: i32, country: &str) -> Player {
        Player {
            player_id: "1".to_string(),
            name: "someone".to_string(),
            discord_user_id: UserId::new(1),
            rank,
            country_rank,
            country: country.to_string(),
            pp: 100.0,
            custom_acc_grid_image: None
        }
    }

    #[test]
    fn scans_start_two_ranks_above_the_player() {
        assert_eq!(start_of(&player(52, 3, "US"), LeaderboardType::Global), (1, None));
        assert_eq!(start_of(&player(53, 3, "US"), LeaderboardType::Global), (2, None));
        assert_eq!(start_of(&player(53, 103, "US"), LeaderboardType::Local), (3, Some("us".to_string())));
        assert_eq!(start_of(&player(9000, 900, "DE"), LeaderboardType::Dach), (1, Some("de,at,ch".to_string())));
    }
}
