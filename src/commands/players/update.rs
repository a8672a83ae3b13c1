use serenity::model::id::UserId;
use tracing::error;

use crate::{BotContext, Error, botconfig, botdb, scoresaber, util};
use crate::models::player::Player;
use super::claim_pp_role;

/// Which stored record an update is about. Links are matched by ScoreSaber id, never bound to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateTarget {
    Profile(String),
    User(UserId),
    InvalidLink
}

pub fn update_target(argument: Option<&str>, caller: UserId) -> UpdateTarget {
    let last_argument = argument
        .and_then(|o| o.split_whitespace().last())
        .unwrap_or_default();

    if util::is_url(last_argument) {
        return match util::scoresaber_id_from_url(last_argument) {
            Some(player_id) => UpdateTarget::Profile(player_id),
            None => UpdateTarget::InvalidLink
        };
    }

    let user_id = util::parse_user_mention(last_argument)
        .map(UserId::new)
        .unwrap_or(caller);

    UpdateTarget::User(user_id)
}

async fn stored_player(ctx: BotContext<'_>, target: UpdateTarget) -> Result<Option<Player>, Error> {
    let db = botdb!(ctx);
    let (player, missing) = match target {
        UpdateTarget::InvalidLink => {
            ctx.say("Player could not be found, invalid link!").await?;
            return Ok(None);
        }
        UpdateTarget::Profile(player_id) => {
            let player = db.get_player_by_player_id(&player_id).await?;
            (player, format!("Could not find player \"{player_id}\"."))
        }
        UpdateTarget::User(user_id) => (db.get_player_by_discord_id(user_id).await?, "Could not find player.".to_string())
    };

    if player.is_none() {
        ctx.say(missing).await?;
    }

    Ok(player)
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Players",
    description_localized("en-US", "Refresh a registered player's data from ScoreSaber.")
)]
pub async fn update(
    ctx: BotContext<'_>,
    #[description = "A ScoreSaber link, a mentioned user, or nothing for yourself"] #[rest] player: Option<String>)
-> Result<(), Error> {
    let target = update_target(player.as_deref(), ctx.author().id);
    let Some(stored) = stored_player(ctx, target).await? else {
        return Ok(());
    };

    let scoresaber = scoresaber!(ctx);
    let Some(remote) = scoresaber.get_player(&stored.player_id).await? else {
        ctx.say(format!("Could not find player \"{}\" on ScoreSaber.", stored.name)).await?;
        return Ok(());
    };

    let fresh = stored.refreshed(&remote);
    let db = botdb!(ctx);
    match db.update_player(&fresh).await {
        Ok(true) => {
            ctx.say(format!("Player \"{}\" updated successfully.", fresh.name)).await?;
        }
        Ok(false) => {
            ctx.say(format!("Could not find player \"{}\".", fresh.name)).await?;
            return Ok(());
        }
        Err(ex) => {
            error!("Failed to update player {}: {}", fresh.player_id, ex);
            ctx.say("Could not update the player right now... try again later?").await?;
            return Ok(());
        }
    }

    let config = botconfig!(ctx);
    if ctx.guild_id().map(|o| o.get()) == Some(config.home_guild_id) {
        claim_pp_role(ctx, &fresh).await?;
    }

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Players",
    description_localized("en-US", "Claim the pp role matching your stored pp."),
    discard_spare_arguments
)]
pub async fn claimpp(ctx: BotContext<'_>) -> Result<(), Error> {
    let db = botdb!(ctx);
    match db.get_player_by_discord_id(ctx.author().id).await? {
        Some(player) => claim_pp_role(ctx, &player).await,
        None => {
            ctx.say("You are not registered yet. Try \"ru register <ScoreSaber URL>\".").await?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scoresaber_models::ScoreSaberPlayer;

    const CALLER: u64 = 42;

    #[test]
    fn links_target_the_stored_profile_not_the_caller() {
        let target = update_target(Some("https://scoresaber.com/u/999"), UserId::new(CALLER));
        assert_eq!(target, UpdateTarget::Profile("999".to_string()));
        assert_eq!(update_target(Some("https://example.com/u/999"), UserId::new(CALLER)), UpdateTarget::InvalidLink);
    }

    #[test]
    fn mentions_and_nothing_target_discord_users() {
        assert_eq!(update_target(Some("<@!7>"), UserId::new(CALLER)), UpdateTarget::User(UserId::new(7)));
        assert_eq!(update_target(None, UserId::new(CALLER)), UpdateTarget::User(UserId::new(CALLER)));
    }

    #[test]
    fn refreshing_keeps_owner_and_grid_image() {
        let stored = Player {
            player_id: "999".to_string(),
            name: "Old".to_string(),
            discord_user_id: UserId::new(7),
            rank: 500,
            country_rank: 20,
            country: "DE".to_string(),
            pp: 5000.0,
            custom_acc_grid_image: Some("https://i.imgur.com/grid.png".to_string())
        };
        let remote = ScoreSaberPlayer {
            id: "999".to_string(),
            name: "New".to_string(),
            profile_picture: None,
            country: "de".to_string(),
            pp: 5100.0,
            rank: 480,
            country_rank: 19,
            histories: String::new(),
            inactive: false
        };

        let fresh = stored.refreshed(&remote);
        assert_eq!(fresh.discord_user_id, UserId::new(7));
        assert_eq!(fresh.custom_acc_grid_image, stored.custom_acc_grid_image);
        assert_eq!(fresh.name, "New");
        assert_eq!(fresh.rank, 480);
    }
}
