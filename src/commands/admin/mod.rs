mod stats;

pub use stats::*;

use serenity::all::{ActivityData, GuildId};
use tracing::{error, info};

use crate::{BotContext, Error, botdb};
use crate::commands::say_temporarily;
use crate::services::player_refresh::{self, RefreshContext};
use crate::services::roles;

#[poise::command(
    prefix_command,
    owners_only,
    hide_in_help,
    guild_only,
    category = "Admin",
    discard_spare_arguments
)]
pub async fn claimppall(ctx: BotContext<'_>) -> Result<(), Error> {
    let db = botdb!(ctx);
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };

    ctx.say("Updating pp roles of every registered member... 🕒").await?;
    let mut assigned = 0;
    for player in db.get_all_players().await? {
        let Ok(member) = guild_id.member(ctx, player.discord_user_id).await else {
            continue;
        };

        match roles::assign_pp_role(ctx.http(), guild_id, &member, player.pp).await {
            Ok(Some(_)) => assigned += 1,
            Ok(None) => {}
            Err(ex) => error!("Failed to assign pp role to {}: {}", player.name, ex)
        }
    }

    info!("Assigned pp roles to {} members", assigned);
    ctx.say(format!("Done! {assigned} members have a pp role now.")).await?;
    Ok(())
}

#[poise::command(
    prefix_command,
    owners_only,
    hide_in_help,
    category = "Admin",
    discard_spare_arguments
)]
pub async fn updateall(ctx: BotContext<'_>) -> Result<(), Error> {
    ctx.say("Refreshing every registered player... 🕒").await?;
    let refresh = RefreshContext::from_data(&ctx.serenity_context().data).await;
    let updated = player_refresh::refresh_all(ctx.http(), &refresh).await;
    ctx.say(format!("Done! Updated {updated} players.")).await?;
    Ok(())
}

#[poise::command(
    prefix_command,
    owners_only,
    hide_in_help,
    category = "Admin"
)]
pub async fn setstatus(
    ctx: BotContext<'_>,
    #[description = "What the bot is playing"] #[rest] status: String)
-> Result<(), Error> {
    ctx.serenity_context().set_activity(Some(ActivityData::playing(status.trim())));
    say_temporarily(ctx, "Status updated.", 10).await
}

#[poise::command(
    prefix_command,
    owners_only,
    hide_in_help,
    category = "Admin"
)]
pub async fn leave(
    ctx: BotContext<'_>,
    #[description = "Guild id"] guild_id: u64)
-> Result<(), Error> {
    let guild_id = GuildId::new(guild_id.max(1));
    let name = ctx.cache().guild(guild_id).map(|o| o.name.clone());
    let Some(name) = name else {
        ctx.say("Could not find guild.").await?;
        return Ok(());
    };

    guild_id.leave(ctx.http()).await?;
    ctx.say(format!("Left guild {name} successfully.")).await?;
    Ok(())
}
