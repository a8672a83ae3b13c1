use tracing::error;

use crate::{BotContext, Error, botconfig, botdb, util};
use crate::commands::command_player;
use super::claim_pp_role;

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Players",
    description_localized("en-US", "Link your ScoreSaber profile to your Discord account.")
)]
pub async fn register(
    ctx: BotContext<'_>,
    #[description = "Your ScoreSaber profile link"] #[rest] profile_url: Option<String>)
-> Result<(), Error> {
    let Some(profile_url) = profile_url.map(|o| o.trim().to_string()).filter(|o| util::is_url(o)) else {
        ctx.say("Please provide your ScoreSaber profile link, e.g. `ru register https://scoresaber.com/u/76561198000000000`.").await?;
        return Ok(());
    };

    let Some(player) = command_player(ctx, Some(&profile_url)).await? else {
        return Ok(());
    };

    let db = botdb!(ctx);
    if let Err(ex) = db.add_player(&player).await {
        error!("Failed to store player {}: {}", player.player_id, ex);
        ctx.say("Could not register you right now... try again later?").await?;
        return Ok(());
    }

    ctx.say(format!("{} registered successfully as {} (#{} globally, {}pp).",
                    util::flag(&player.country),
                    util::bold(&player.name),
                    player.rank,
                    util::decimal(player.pp))).await?;

    let config = botconfig!(ctx);
    if ctx.guild_id().map(|o| o.get()) == Some(config.home_guild_id) {
        claim_pp_role(ctx, &player).await?;
    }

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Players",
    description_localized("en-US", "Remove your ScoreSaber profile from the bot."),
    discard_spare_arguments
)]
pub async fn unregister(ctx: BotContext<'_>) -> Result<(), Error> {
    let db = botdb!(ctx);
    match db.delete_player_by_discord_id(ctx.author().id).await {
        Ok(true) => {
            ctx.say("You have been unregistered. 👋").await?;
        }
        Ok(false) => {
            ctx.say("You were not registered.").await?;
        }
        Err(ex) => {
            error!("Failed to delete player {}: {}", ctx.author().id, ex);
            ctx.say("Could not unregister you right now... try again later?").await?;
        }
    }

    Ok(())
}
