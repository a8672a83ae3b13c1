mod register;
mod update;
mod grid_image;
mod improvement;

pub use register::*;
pub use update::*;
pub use grid_image::*;
pub use improvement::*;

use serenity::all::GuildId;
use tracing::error;

use crate::{BotContext, Error, botconfig};
use crate::models::player::Player;
use crate::services::roles;

pub const PROFILE_PLANNED: &str = "This feature is planned for the near future!";

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Players",
    description_localized("en-US", "Shows a player profile card. Not available yet.")
)]
pub async fn profile(ctx: BotContext<'_>) -> Result<(), Error> {
    ctx.say(PROFILE_PLANNED).await?;
    Ok(())
}

/// Gives the player's member the pp role they qualify for, on the community server only.
pub async fn claim_pp_role(ctx: BotContext<'_>, player: &Player) -> Result<(), Error> {
    let config = botconfig!(ctx);
    if ctx.guild_id().map(|o| o.get()) != Some(config.home_guild_id) {
        ctx.say("Roles can only be claimed on the community server.").await?;
        return Ok(());
    }

    let guild_id = GuildId::new(config.home_guild_id);
    let member = match guild_id.member(ctx, player.discord_user_id).await {
        Ok(member) => member,
        Err(ex) => {
            error!("Failed to fetch member {}: {}", player.discord_user_id, ex);
            ctx.say("Could not find you on this server.").await?;
            return Ok(());
        }
    };

    match roles::assign_pp_role(ctx.http(), guild_id, &member, player.pp).await {
        Ok(Some(role)) => {
            ctx.say(format!("<@{}> now has the {} role.", player.discord_user_id, role)).await?;
        }
        Ok(None) => {
            ctx.say("No pp role available for your pp yet. Keep playing! 💪").await?;
        }
        Err(ex) => {
            error!("Failed to assign pp role: {}", ex);
            ctx.say("We failed to update your roles; maybe we don't have permission?").await?;
        }
    }

    Ok(())
}
