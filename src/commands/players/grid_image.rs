use poise::CreateReply;
use serenity::all::CreateEmbed;
use tracing::error;

use crate::{BotContext, Error, botdb, util};

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Players",
    description_localized("en-US", "Set a custom accuracy grid image, or reset it by passing nothing.")
)]
pub async fn setgridimage(
    ctx: BotContext<'_>,
    #[description = "A .png, .jpg or .jpeg image URL"] image_url: Option<String>)
-> Result<(), Error> {
    let db = botdb!(ctx);
    let image_url = image_url.map(|o| o.trim().to_string()).filter(|o| !o.is_empty());

    if let Some(url) = image_url.as_deref() {
        if !util::is_image_url(url) {
            ctx.say("The given parameter is not an image URL. (Has to contain .png, .jpg or .jpeg)").await?;
            return Ok(());
        }
    }

    match db.set_grid_image(ctx.author().id, image_url.as_deref()).await {
        Ok(false) => {
            ctx.say("You are not registered yet. Try \"ru register <ScoreSaber URL>\".").await?;
        }
        Ok(true) => match image_url {
            Some(url) => {
                ctx.send(CreateReply::default().embed(CreateEmbed::new()
                    .title("Grid image updated!")
                    .image(url)
                )).await?;
            }
            None => {
                ctx.say("Your grid image has been reset.").await?;
            }
        },
        Err(ex) => {
            error!("Failed to set grid image for {}: {}", ctx.author().id, ex);
            ctx.say("Could not save your grid image right now... try again later?").await?;
        }
    }

    Ok(())
}
