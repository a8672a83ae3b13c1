mod skills;

pub use skills::*;

use poise::CreateReply;
use serenity::all::CreateEmbed;
use tracing::error;

use crate::{BotContext, Error, botdb, quickchart, scoresaber};
use crate::commands::{command_player, guild_member_ids};
use crate::services::charts::{self, ChartRequest, RankSeries};
use crate::services::player_refresh::throttle;

pub const DEFAULT_CHART_PLAYERS: usize = 10;
pub const MAX_CHART_PLAYERS: usize = 10;

pub fn parse_chart_limit(argument: Option<&str>) -> Result<usize, String> {
    let Some(argument) = argument.map(str::trim).filter(|o| !o.is_empty()) else {
        return Ok(DEFAULT_CHART_PLAYERS);
    };

    match argument.parse::<usize>() {
        Ok(limit) if (1..=MAX_CHART_PLAYERS).contains(&limit) => Ok(limit),
        _ => Err(format!("The limit has to be a number between 1 and {MAX_CHART_PLAYERS}."))
    }
}

async fn send_chart(ctx: BotContext<'_>, request: ChartRequest) -> Result<(), Error> {
    let url = quickchart!(ctx).create(&request).await?;
    ctx.send(CreateReply::default().embed(CreateEmbed::new().image(url))).await?;
    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Charts",
    description_localized("en-US", "Draws a player's global rank history.")
)]
pub async fn chart(
    ctx: BotContext<'_>,
    #[description = "A mentioned user, or nothing for yourself"] #[rest] player: Option<String>)
-> Result<(), Error> {
    let Some(player) = command_player(ctx, player.as_deref()).await? else {
        return Ok(());
    };

    let scoresaber = scoresaber!(ctx);
    let Some(remote) = scoresaber.get_player(&player.player_id).await? else {
        ctx.say(format!("Could not find player \"{}\" on ScoreSaber.", player.name)).await?;
        return Ok(());
    };

    let series = [RankSeries { label: remote.name.clone(), ranks: remote.rank_history() }];
    send_chart(ctx, charts::rank_history_chart(&format!("Rank history of {}", remote.name), &series)).await
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Charts",
    description_localized("en-US", "Draws the rank histories of this server's best registered players.")
)]
pub async fn chartall(
    ctx: BotContext<'_>,
    #[description = "How many players to draw (1-10)"] limit: Option<String>)
-> Result<(), Error> {
    let limit = match parse_chart_limit(limit.as_deref()) {
        Ok(limit) => limit,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    ctx.defer().await?;
    let db = botdb!(ctx);
    let scoresaber = scoresaber!(ctx);
    let members = guild_member_ids(ctx).await?;
    let players: Vec<_> = db.get_all_players().await?
        .into_iter()
        .filter(|o| o.rank > 0 && members.contains(&o.discord_user_id))
        .take(limit)
        .collect();

    let mut series = Vec::new();
    for (i, player) in players.iter().enumerate() {
        throttle(i as u32 + 1).await;
        match scoresaber.get_player(&player.player_id).await {
            Ok(Some(remote)) => series.push(RankSeries { label: remote.name.clone(), ranks: remote.rank_history() }),
            Ok(None) => {}
            Err(ex) => error!("Failed to fetch player {}: {}", player.player_id, ex)
        }
    }

    if series.is_empty() {
        ctx.say("No registered players found on this server.").await?;
        return Ok(());
    }

    let title = ctx.guild().map(|o| format!("Rank histories on {}", o.name)).unwrap_or_else(|| "Rank histories".to_string());
    send_chart(ctx, charts::rank_history_chart(&title, &series)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_bounds() {
        assert_eq!(parse_chart_limit(None), Ok(10));
        assert_eq!(parse_chart_limit(Some(" ")), Ok(10));
        assert_eq!(parse_chart_limit(Some("3")), Ok(3));
        assert!(parse_chart_limit(Some("0")).is_err());
        assert!(parse_chart_limit(Some("11")).is_err());
        assert!(parse_chart_limit(Some("lots")).is_err());
    }
}
