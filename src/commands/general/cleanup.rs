use serenity::all::GetMessages;

use crate::{BotContext, Error};
use crate::commands::say_temporarily;

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "General",
    description_localized("en-US", "Delete the latest message the bot sent in this channel.")
)]
pub async fn deletethat(ctx: BotContext<'_>) -> Result<(), Error> {
    let bot_id = ctx.framework().bot_id;
    let messages = ctx.channel_id().messages(ctx.http(), GetMessages::new().limit(100)).await?;

    // Newest first.
    match messages.into_iter().find(|o| o.author.id == bot_id) {
        Some(latest) => {
            latest.delete(ctx.http()).await?;
            say_temporarily(ctx, "Message deleted.", 4).await?;
        }
        None => {
            say_temporarily(ctx, "I could not find my latest message...", 4).await?;
        }
    }

    Ok(())
}
