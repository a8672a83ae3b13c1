use poise::CreateReply;
use rand::Rng;
use serde::Deserialize;
use serenity::all::{CreateEmbed, CreateEmbedFooter};
use tracing::error;

use crate::{BotContext, Error, shared};
use crate::services::discord_logger::{self, DiscordLogger};

pub const SEAL_COUNT: u32 = 83;
const MEME_URL: &str = "https://meme-api.com/gimme";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meme {
    pub title: String,
    pub url: String,
    pub post_link: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub nsfw: bool
}

pub fn seal_url(index: u32) -> String {
    format!("https://focabot.github.io/random-seal/seals/{index:04}.jpg")
}

// Mentions and role pings are defused by dropping their brackets.
pub fn sanitize_phrase(phrase: &str) -> String {
    phrase.chars().filter(|c| !matches!(c, '<' | '!' | '>')).collect()
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Fun",
    description_localized("en-US", "Ow, ow, ow! Sends a random seal.")
)]
pub async fn seal(ctx: BotContext<'_>) -> Result<(), Error> {
    let index = rand::thread_rng().gen_range(0..SEAL_COUNT);

    ctx.send(CreateReply::default().embed(CreateEmbed::new()
        .title(":seal: Ow, ow, ow! :seal:")
        .image(seal_url(index))
    )).await?;

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Fun",
    description_localized("en-US", "Sends a random meme from Reddit."),
    user_cooldown = "2"
)]
pub async fn randommeme(ctx: BotContext<'_>) -> Result<(), Error> {
    const MAX_ATTEMPTS: u8 = 3;

    for _ in 0..MAX_ATTEMPTS {
        match reqwest::get(MEME_URL).await {
            Ok(response) => match response.json::<Meme>().await {
                Ok(meme) if !meme.nsfw => {
                    ctx.send(CreateReply::default().embed(CreateEmbed::new()
                        .title(meme.title)
                        .url(meme.post_link)
                        .image(meme.url)
                        .footer(CreateEmbedFooter::new(format!("r/{}", meme.subreddit)))
                    )).await?;
                    return Ok(());
                }
                Ok(_) => continue,
                Err(ex) => error!("Meme API returned garbage: {}", ex)
            },
            Err(ex) => error!("Failed to reach the meme API: {}", ex)
        }
    }

    ctx.say("Could not find a meme right now... try again later?").await?;
    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Fun",
    description_localized("en-US", "Make the bot say something.")
)]
pub async fn say(
    ctx: BotContext<'_>,
    #[description = "What to say"] #[rest] phrase: Option<String>)
-> Result<(), Error> {
    let phrase = sanitize_phrase(phrase.as_deref().unwrap_or("🤡"));
    let phrase = if phrase.trim().is_empty() { "🤡".to_string() } else { phrase };

    let logger = shared!(ctx.serenity_context(), DiscordLogger);
    logger.log(ctx.http(), &format!("{} said: {}", ctx.author().name, phrase), discord_logger::INFO).await;

    match ctx {
        poise::Context::Prefix(prefix) => {
            if let Err(ex) = prefix.msg.delete(ctx.http()).await {
                error!("Could not delete message \"{}\" because of lacking permissions: {}", prefix.msg.content, ex);
            }
        }
        poise::Context::Application(_) => {
            ctx.send(CreateReply::default().content("Sent.").ephemeral(true)).await?;
        }
    }

    ctx.channel_id().say(ctx.http(), phrase).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_file_names_are_zero_padded() {
        assert_eq!(seal_url(7), "https://focabot.github.io/random-seal/seals/0007.jpg");
        assert_eq!(seal_url(82), "https://focabot.github.io/random-seal/seals/0082.jpg");
    }

    #[test]
    fn say_strips_mention_brackets() {
        assert_eq!(sanitize_phrase("hi <@!123> and <@&5>"), "hi @123 and @&5");
        assert_eq!(sanitize_phrase("plain"), "plain");
    }
}
