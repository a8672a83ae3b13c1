mod ranked;

pub use ranked::*;

use poise::CreateReply;
use serenity::all::CreateAttachment;
use tracing::{info, warn};

use crate::{BotContext, Error, beatsaver, botconfig, scoresaber};
use crate::models::playlist::Playlist;
use crate::services::beatsaver::is_valid_key;
use crate::services::scoresaber::LeaderboardFilter;

const MAX_QUALIFIED_PAGES: i32 = 20;

/// Title first, then any number of BeatSaver keys.
pub fn split_playlist_arguments(arguments: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = arguments.split_whitespace();
    let title = parts.next()?;
    let keys: Vec<&str> = parts.collect();
    if keys.is_empty() {
        return None;
    }

    Some((title, keys))
}

pub async fn send_playlist(ctx: BotContext<'_>, playlist: &Playlist, message: &str) -> Result<(), Error> {
    let attachment = CreateAttachment::bytes(playlist.to_bytes()?, playlist.file_name());
    ctx.send(CreateReply::default()
        .content(message)
        .attachment(attachment)
    ).await?;

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Playlists",
    description_localized("en-US", "Builds a playlist file from BeatSaver keys: a title followed by keys.")
)]
pub async fn playlist(
    ctx: BotContext<'_>,
    #[description = "Playlist title followed by BeatSaver keys"] #[rest] arguments: Option<String>)
-> Result<(), Error> {
    let Some((title, keys)) = arguments.as_deref().and_then(split_playlist_arguments) else {
        ctx.say("Please provide at least one key.").await?;
        return Ok(());
    };

    ctx.defer().await?;
    let config = botconfig!(ctx);
    let beatsaver = beatsaver!(ctx);
    let mut playlist = Playlist::new(title, &config.playlist_image);
    let mut missing = Vec::new();

    for key in keys {
        if !is_valid_key(key) {
            missing.push(key);
            continue;
        }

        match beatsaver.get_map_by_key(key).await {
            Ok(Some(map)) => {
                if !playlist.add_map(&map) {
                    missing.push(key);
                }
            }
            Ok(None) => missing.push(key),
            Err(ex) => {
                warn!("BeatSaver lookup for {} failed: {}", key, ex);
                missing.push(key);
            }
        }
    }

    if playlist.songs.is_empty() {
        ctx.say("None of the given keys could be found on BeatSaver.").await?;
        return Ok(());
    }

    let mut message = format!("Here is your playlist with {} songs.", playlist.songs.len());
    if !missing.is_empty() {
        message += &format!("\nCould not find: {}", missing.join(", "));
    }

    send_playlist(ctx, &playlist, &message).await
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Playlists",
    description_localized("en-US", "Builds a playlist of every map currently in qualification."),
    discard_spare_arguments
)]
pub async fn qualified(ctx: BotContext<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let config = botconfig!(ctx);
    let scoresaber = scoresaber!(ctx);

    let maps = scoresaber.get_all_leaderboards(LeaderboardFilter::Qualified, MAX_QUALIFIED_PAGES).await?;
    info!("Fetched {} qualified leaderboards", maps.len());
    if maps.is_empty() {
        ctx.say("There are no qualified maps right now.").await?;
        return Ok(());
    }

    let mut playlist = Playlist::new("Qualified", &config.playlist_image);
    for map in &maps {
        playlist.add_leaderboard(map);
    }

    send_playlist(ctx, &playlist, &format!("Currently qualified maps ({} difficulties).", maps.len())).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_comes_before_the_keys() {
        assert_eq!(split_playlist_arguments("Warmup 1a2b  3c4d"), Some(("Warmup", vec!["1a2b", "3c4d"])));
    }

    #[test]
    fn keys_are_required() {
        assert_eq!(split_playlist_arguments("OnlyATitle"), None);
        assert_eq!(split_playlist_arguments("   "), None);
    }
}
