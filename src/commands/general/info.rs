use crate::{BotContext, Error, util};

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "General",
    description_localized("en-US", "Get a link to invite this bot to your server.")
)]
pub async fn invite(ctx: BotContext<'_>) -> Result<(), Error> {
    let bot_id = ctx.framework().bot_id;
    let link = format!("https://discord.com/api/oauth2/authorize?client_id={bot_id}&permissions=0&scope=bot%20applications.commands");

    ctx.say(util::bold(&link)).await?;
    Ok(())
}
