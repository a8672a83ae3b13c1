mod general;
mod players;
mod rank;
mod scores;
mod playlists;
mod charts;
mod admin;

use std::collections::HashSet;
use std::time::Duration;
use poise::{CreateReply, FrameworkError, Prefix};
use regex::Regex;
use serenity::model::id::UserId;
use tracing::{error, info};

use crate::{BotContext, Error, botconfig, botdb, scoresaber, shared, util};
use crate::models::config::Config;
use crate::models::player::Player;
use crate::services::discord_logger::{self, DiscordLogger};
use crate::services::ranked_maps::RankedMaps;

pub fn prefix_regex(pref: &str) -> Result<Regex, Error> {
    Ok(Regex::new(&format!(r"(?i)^({}|bs)\s+", regex::escape(pref.trim())))?)
}

pub fn unknown_command_message(feature_request_url: &str) -> String {
    format!("Sorry, i don't speak wrong. 🤡  Try \"ru help\".\nIf you want to suggest something to the dev do it {}.", util::link("here", feature_request_url))
}

/// Sends a message that cleans itself up after a few seconds.
pub async fn say_temporarily(ctx: BotContext<'_>, content: impl Into<String>, seconds: u64) -> Result<(), Error> {
    let reply = ctx.say(content).await?;
    tokio::time::sleep(Duration::from_secs(seconds)).await;
    if let Err(ex) = reply.delete(ctx).await {
        error!("Failed to delete temporary message: {}", ex);
    }

    Ok(())
}

/// Resolves the player a command is about: a ScoreSaber link, a mentioned user, or the caller.
/// Tells the user when nobody could be found.
pub async fn command_player(ctx: BotContext<'_>, argument: Option<&str>) -> Result<Option<Player>, Error> {
    let last_argument = argument
        .and_then(|o| o.split_whitespace().last())
        .unwrap_or_default();

    if util::is_url(last_argument) {
        let Some(player_id) = util::scoresaber_id_from_url(last_argument) else {
            ctx.say("Player could not be found, invalid link!").await?;
            return Ok(None);
        };

        let scoresaber = scoresaber!(ctx);
        return match scoresaber.get_player(&player_id).await? {
            Some(remote) => Ok(Some(Player::from_scoresaber(&remote, ctx.author().id))),
            None => {
                ctx.say("Player could not be found!").await?;
                Ok(None)
            }
        };
    }

    let user_id = util::parse_user_mention(last_argument)
        .map(UserId::new)
        .unwrap_or_else(|| ctx.author().id);

    let db = botdb!(ctx);
    let player = db.get_player_by_discord_id(user_id).await?;
    if player.is_none() {
        ctx.say("Could not find player.").await?;
    }

    Ok(player)
}

/// Every member of the current guild, paged through the HTTP API so large servers are complete.
pub async fn guild_member_ids(ctx: BotContext<'_>) -> Result<HashSet<UserId>, Error> {
    let mut out = HashSet::new();
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(out);
    };

    let mut after: Option<UserId> = None;
    loop {
        let members = guild_id.members(ctx.http(), Some(1000), after).await?;
        let Some(last) = members.last().map(|o| o.user.id) else {
            break;
        };

        let count = members.len();
        out.extend(members.into_iter().map(|o| o.user.id));
        if count < 1000 {
            break;
        }
        after = Some(last);
    }

    Ok(out)
}

async fn log_command(ctx: BotContext<'_>) {
    let logger = shared!(ctx.serenity_context(), DiscordLogger);
    let guild = ctx.guild().map(|o| o.name.clone()).unwrap_or_else(|| "<direct message>".to_string());
    let requester = ctx.author_member().await
        .map(|o| o.display_name().to_string())
        .unwrap_or_else(|| ctx.author().name.clone());

    let content = util::code(&format!("Command: {}\nRequester: {}\nGuild: {}", ctx.invocation_string(), requester, guild));
    logger.log(ctx.http(), &content, discord_logger::INFO).await;
}

// The first command after startup pays for loading the ranked map list.
async fn fetch_ranked_maps_if_missing(ctx: BotContext<'_>) {
    let config = botconfig!(ctx);
    if config.disable_ranked_requests {
        return;
    }

    let cache = shared!(ctx.serenity_context(), RankedMaps);
    if cache.read().await.is_loaded() {
        return;
    }

    let mut ranked = cache.write().await;
    // Someone else may have loaded it while we waited for the lock.
    if ranked.is_loaded() {
        return;
    }

    if let Err(ex) = ctx.send(CreateReply::default().content("First command after startup, fetching ranked maps. Please wait... 🕒").ephemeral(true)).await {
        error!("Failed to send ranked maps notice: {}", ex);
    }

    let scoresaber = scoresaber!(ctx);
    match RankedMaps::fetch(&scoresaber).await {
        Ok(maps) => *ranked = maps,
        Err(ex) => error!("Failed to fetch ranked maps: {}", ex)
    }
}

async fn pre_command(ctx: BotContext<'_>) {
    info!("{} invoked {}", ctx.author().name, ctx.invocation_string());
    log_command(ctx).await;
    fetch_ranked_maps_if_missing(ctx).await;
}

async fn on_error(error: FrameworkError<'_, (), Error>) {
    match error {
        FrameworkError::UnknownCommand { ctx, msg, .. } => {
            let config = shared!(ctx, Config);
            if let Err(ex) = msg.channel_id.say(ctx, unknown_command_message(&config.feature_request_url)).await {
                error!("Failed to send unknown command message: {}", ex);
            }
        }
        FrameworkError::Command { error, ctx, .. } => {
            error!("Command {} failed: {}", ctx.command().qualified_name, error);
            if let Err(ex) = ctx.say("Something went wrong while running that command... try again later?").await {
                error!("Failed to send error message: {}", ex);
            }
        }
        other => {
            if let Err(ex) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", ex);
            }
        }
    }
}

pub async fn get_framework(pref: &str, owners: HashSet<UserId>) -> Result<poise::FrameworkOptions<(), Error>, Error> {
    Ok(poise::FrameworkOptions {
        commands: vec![
            general::help(),
            general::invite(),
            general::seal(),
            general::randommeme(),
            general::say(),
            general::deletethat(),
            players::register(),
            players::unregister(),
            players::update(),
            players::claimpp(),
            players::setgridimage(),
            players::improvement(),
            players::profile(),
            rank::globalrank(),
            rank::localrank(),
            rank::dachrank(),
            scores::recentsong(),
            scores::recentsongs(),
            scores::topsongs(),
            scores::topsong(),
            playlists::playlist(),
            playlists::qualified(),
            playlists::ranked(),
            charts::chart(),
            charts::chartall(),
            charts::stand(),
            charts::setskill(),
            admin::claimppall(),
            admin::updateall(),
            admin::stats(),
            admin::setstatus(),
            admin::leave()
        ],
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: None,
            additional_prefixes: vec![Prefix::Regex(prefix_regex(pref)?)],
            mention_as_prefix: false,
            case_insensitive_commands: true,
            ..Default::default()
        },
        pre_command: |ctx| Box::pin(pre_command(ctx)),
        on_error: |error| Box::pin(on_error(error)),
        owners,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_prefixes_match_case_insensitively() {
        let regex = prefix_regex("ru").unwrap();
        assert!(regex.is_match("ru register"));
        assert!(regex.is_match("RU help"));
        assert!(regex.is_match("bs  ranked 5"));
        assert!(!regex.is_match("rug help"));
        assert!(!regex.is_match("hey ru help"));
    }

    #[test]
    fn unknown_command_points_at_help() {
        let message = unknown_command_message("https://example.com/issues");
        assert!(message.contains("Try \"ru help\""));
        assert!(message.ends_with("[here](https://example.com/issues)."));
    }

    #[tokio::test]
    async fn every_command_is_registered() {
        let options = get_framework("ru", HashSet::new()).await.unwrap();
        let names: Vec<&str> = options.commands.iter().map(|o| o.name.as_str()).collect();

        for name in ["help", "register", "update", "profile", "globalrank", "recentsong", "topsongs", "topsong",
                     "playlist", "ranked", "chart", "stand", "claimppall", "leave"] {
            assert!(names.contains(&name), "{name} is not registered");
        }
        assert_eq!(names.len(), 32);
    }

    #[test]
    fn placeholder_commands_reply_with_hints() {
        assert!(scores::TOPSONG_HINT.contains("ru topsongs"));
        assert!(players::PROFILE_PLANNED.contains("planned"));
    }
}
