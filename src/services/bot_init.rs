use serenity::{
    all::ActivityData,
    client::Context,
    model::{
        gateway::Ready
    }
};
use tracing::info;

use crate::shared;
use crate::services::discord_logger::{self, DiscordLogger};

pub const PLAYING: &str = "ru help | Beat Saber";

pub async fn ready(ctx: &Context, ready: &Ready) {
    info!("Logged in as {} in {} guilds", ready.user.name, ready.guilds.len());
    ctx.set_activity(Some(ActivityData::playing(PLAYING)));

    let logger = shared!(ctx, DiscordLogger);
    logger.log(&ctx.http, &format!("Ready! Logged in as {}.", ready.user.name), discord_logger::INFO).await;
}
