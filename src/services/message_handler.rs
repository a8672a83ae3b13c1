use serenity::{
    all::{ChannelId, CreateMessage, GuildId, UnavailableGuild},
    client::Context,
    model::{guild::{Guild, Member}, user::User}
};
use tracing::error;

use crate::{db, shared, util};
use crate::models::config::Config;
use crate::services::discord_logger::{self, DiscordLogger};

pub const NEW_MEMBER_MESSAGE: &str = "Welcome to the server! 👋\n\
    To get your rank and pp roles, register yourself in the bot channel with `ru register <ScoreSaber URL>`.\n\
    Type `ru help` to see everything else I can do.";

pub async fn on_join(ctx: &Context, new_member: &Member) {
    if new_member.user.bot {
        return;
    }

    let config = shared!(ctx, Config);
    if new_member.guild_id.get() != config.home_guild_id {
        return;
    }

    if let Err(ex) = new_member.user.direct_message(&ctx.http, CreateMessage::new().content(NEW_MEMBER_MESSAGE)).await {
        error!("Failed to send welcome DM to {}: {}", new_member.user.id, ex);
    }

    if config.bot_channel_id != 0 {
        let content = format!("{} Be sure to register yourself here with {} to obtain your roles.",
                              util::bold(&format!("<@{}>, welcome!", new_member.user.id)),
                              util::underline("\"ru register <ScoreSaber URL>\""));

        if let Err(ex) = ChannelId::new(config.bot_channel_id).say(&ctx.http, content).await {
            error!("Failed to greet new member: {}", ex);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Membership {
    Member,
    Gone,
    Unknown
}

pub fn membership(lookup: &Result<(), serenity::Error>) -> Membership {
    match lookup {
        Ok(()) => Membership::Member,
        Err(ex) if util::is_not_found(ex) => Membership::Gone,
        Err(_) => Membership::Unknown
    }
}

// The record only goes away once Discord confirms we share no server with the user anymore.
pub fn should_delete(others: &[Membership]) -> bool {
    others.iter().all(|o| *o == Membership::Gone)
}

// The member cache is only partial, so every other guild is asked over HTTP.
async fn other_memberships(ctx: &Context, left: GuildId, user: &User) -> Vec<Membership> {
    let mut memberships = Vec::new();
    for guild_id in ctx.cache.guilds().into_iter().filter(|o| *o != left) {
        let lookup = guild_id.member(&ctx.http, user.id).await.map(|_| ());
        if let Err(ex) = &lookup {
            if !util::is_not_found(ex) {
                error!("Failed to look up {} in guild {}: {}", user.id, guild_id, ex);
            }
        }
        memberships.push(membership(&lookup));
    }

    memberships
}

pub async fn on_leave(ctx: &Context, guild_id: GuildId, user: &User) {
    let logger = shared!(ctx, DiscordLogger);
    let guild_name = guild_id.name(&ctx.cache).unwrap_or_else(|| guild_id.to_string());
    logger.log(&ctx.http, &format!("Member {} left guild {}", user.name, guild_name), discord_logger::USERS).await;

    if !should_delete(&other_memberships(ctx, guild_id, user).await) {
        return;
    }

    logger.log(&ctx.http, &format!("Deleting user if exists: {}", user.name), discord_logger::USERS).await;
    let db = db!(ctx);
    if let Err(ex) = db.delete_player_by_discord_id(user.id).await {
        error!("Failed to delete player {}: {}", user.id, ex);
    }
}

pub async fn on_guild_join(ctx: &Context, guild: &Guild, is_new: Option<bool>) {
    if is_new != Some(true) {
        return;
    }

    let logger = shared!(ctx, DiscordLogger);
    logger.log(&ctx.http, &util::code(&format!("Joined guild \"{}\"", guild.name)), discord_logger::GUILDS).await;
}

pub async fn on_guild_leave(ctx: &Context, incomplete: &UnavailableGuild, full: Option<&Guild>) {
    // An outage also shows up as a guild delete.
    if incomplete.unavailable {
        return;
    }

    let name = full.map(|o| o.name.clone()).unwrap_or_else(|| incomplete.id.to_string());
    let logger = shared!(ctx, DiscordLogger);
    logger.log(&ctx.http, &util::code(&format!("Left guild \"{name}\"")), discord_logger::GUILDS).await;
}
