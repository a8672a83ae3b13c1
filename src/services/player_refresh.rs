use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use chrono::Local;
use serenity::all::{ChannelId, CreateEmbed, CreateMessage, GuildId, Http};
use serenity::prelude::TypeMap;
use tokio::sync::RwLock;
use tokio::time;
use tracing::error;

use crate::Error;
use crate::models::config::Config;
use crate::models::player::Player;
use crate::models::scoresaber_models::ScoreSaberPlayer;
use crate::services::database::Database;
use crate::services::discord_logger::{self, DiscordLogger};
use crate::services::roles;
use crate::services::scoresaber::{ScoreSaber, REQUEST_DELAY};
use crate::util;

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(20 * 60);
pub const BATCH_SIZE: u32 = 20;
pub const BATCH_PAUSE: Duration = Duration::from_secs(60);

/// Everything a refresh pass needs, pulled out of the TypeMap once per pass.
pub struct RefreshContext {
    pub db: Arc<Database>,
    pub scoresaber: Arc<ScoreSaber>,
    pub config: Arc<Config>,
    pub logger: Arc<DiscordLogger>
}

impl RefreshContext {
    pub async fn from_data(data: &RwLock<TypeMap>) -> RefreshContext {
        let ctx_global = data.read().await;
        RefreshContext {
            db: ctx_global.get::<Database>().expect("Couldn't find database").clone(),
            scoresaber: ctx_global.get::<ScoreSaber>().expect("Couldn't find ScoreSaber client").clone(),
            config: ctx_global.get::<Config>().expect("Couldn't find config").clone(),
            logger: ctx_global.get::<DiscordLogger>().expect("Couldn't find logger").clone()
        }
    }
}

pub fn needs_update(stored_rank: i32, new_rank: i32) -> bool {
    new_rank != stored_rank && new_rank != 0
}

/// Sleeps between ScoreSaber calls: a short delay after each one and a long pause after every batch.
pub async fn throttle(fetch_counter: u32) {
    time::sleep(REQUEST_DELAY).await;

    if fetch_counter > 0 && fetch_counter % BATCH_SIZE == 0 {
        time::sleep(BATCH_PAUSE).await;
    }
}

pub async fn refresh_players(data: Arc<RwLock<TypeMap>>, http: Arc<Http>) {
    let mut interval = time::interval(REFRESH_INTERVAL);
    loop {
        interval.tick().await;
        let refresh = RefreshContext::from_data(&data).await;
        refresh_all(&http, &refresh).await;
    }
}

/// Where the refresh pass gets current ScoreSaber data from.
#[async_trait]
pub trait PlayerSource {
    async fn fetch_player(&self, player_id: &str) -> Result<Option<ScoreSaberPlayer>, Error>;
}

/// Where refreshed records are written back to.
#[async_trait]
pub trait PlayerStore {
    async fn store_player(&self, player: &Player) -> Result<bool, Error>;
}

#[async_trait]
impl PlayerSource for ScoreSaber {
    async fn fetch_player(&self, player_id: &str) -> Result<Option<ScoreSaberPlayer>, Error> {
        self.get_player(player_id).await
    }
}

#[async_trait]
impl PlayerStore for Database {
    async fn store_player(&self, player: &Player) -> Result<bool, Error> {
        self.update_player(player).await
    }
}

#[derive(Debug, Default)]
pub struct RefreshReport {
    // (stored, fresh) for every record that was written.
    pub updated: Vec<(Player, Player)>,
    // (player name, error) for every player that could not be refreshed.
    pub failures: Vec<(String, String)>
}

/// One throttled pass over `players`. A failing player never stops the pass.
pub async fn refresh_records<S, D>(source: &S, store: &D, players: Vec<Player>) -> RefreshReport
    where S: PlayerSource + Sync, D: PlayerStore + Sync {
    let mut report = RefreshReport::default();
    let mut fetch_counter = 0;

    for stored in players {
        match refresh_record(source, store, &stored).await {
            Ok(Some(fresh)) => report.updated.push((stored, fresh)),
            Ok(None) => {}
            Err(ex) => {
                error!("Failed to refresh {}: {}", stored.name, ex);
                report.failures.push((stored.name.clone(), ex.to_string()));
            }
        }

        fetch_counter += 1;
        throttle(fetch_counter).await;
    }

    report
}

async fn refresh_record<S, D>(source: &S, store: &D, stored: &Player) -> Result<Option<Player>, Error>
    where S: PlayerSource + Sync, D: PlayerStore + Sync {
    let Some(remote) = source.fetch_player(&stored.player_id).await? else {
        return Ok(None);
    };

    let fresh = stored.refreshed(&remote);
    if !needs_update(stored.rank, fresh.rank) {
        return Ok(None);
    }

    if !store.store_player(&fresh).await? {
        return Ok(None);
    }

    Ok(Some(fresh))
}

// Returns how many players had their record updated.
pub async fn refresh_all(http: &Http, refresh: &RefreshContext) -> u32 {
    refresh.logger.log(http, &format!("----- Starting User Refresh... [{}]", Local::now().format("%H:%M")), discord_logger::REFRESH).await;

    let players = match refresh.db.get_all_players().await {
        Ok(players) => players,
        Err(ex) => {
            error!("Failed to load stored players: {}", ex);
            refresh.logger.log(http, &format!("There was an exception in scheduled task: {ex}"), discord_logger::REFRESH).await;
            return 0;
        }
    };

    let report = refresh_records(&*refresh.scoresaber, &*refresh.db, players).await;
    for (name, ex) in &report.failures {
        refresh.logger.log(http, &format!("There was an exception refreshing \"{name}\": {ex}"), discord_logger::REFRESH).await;
    }

    if refresh.config.home_guild_id != 0 {
        for (stored, fresh) in &report.updated {
            if let Err(ex) = check_milestone(http, refresh, stored, fresh).await {
                error!("Failed to check milestone of {}: {}", fresh.name, ex);
                refresh.logger.log(http, &format!("There was an exception checking the milestone of \"{}\": {}", fresh.name, ex), discord_logger::REFRESH).await;
            }
        }
    }

    report.updated.len() as u32
}

async fn check_milestone(http: &Http, refresh: &RefreshContext, stored: &Player, fresh: &Player) -> Result<(), Error> {
    let guild_id = GuildId::new(refresh.config.home_guild_id);
    // Players who left the community server keep their record but get no roles.
    let member = match guild_id.member(http, fresh.discord_user_id).await {
        Ok(member) => member,
        Err(ex) if util::is_not_found(&ex) => return Ok(()),
        Err(ex) => return Err(ex.into())
    };

    let role_names = roles::member_role_names(http, guild_id, &member).await?;
    if !roles::is_new_milestone(fresh.rank, &role_names) {
        return Ok(());
    }

    let milestone = roles::milestone_for_rank(fresh.rank).unwrap_or_default();
    refresh.logger.log(http, &format!("Changed role: {} New Rank: {} - Old Rank: {}   (Top {})", fresh.name, fresh.rank, stored.rank, milestone), discord_logger::REFRESH).await;

    roles::assign_milestone_role(http, guild_id, &member, fresh.rank).await?;

    if refresh.config.bot_channel_id != 0 {
        ChannelId::new(refresh.config.bot_channel_id).send_message(http, CreateMessage::new().embed(milestone_embed(fresh, milestone))).await?;
    }

    Ok(())
}

pub fn milestone_embed(player: &Player, milestone: i32) -> CreateEmbed {
    CreateEmbed::new()
        .title(format!("🎉 New milestone: Top {milestone} 🎉"))
        .url(player.profile_url())
        .description(format!("<@{}> just reached {}!\n{} {} is now ranked {} globally with {}pp.",
                             player.discord_user_id,
                             util::bold(&format!("Top {milestone}")),
                             util::flag(&player.country),
                             util::link(&player.name, &player.profile_url()),
                             util::bold(&format!("#{}", player.rank)),
                             util::decimal(player.pp)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_real_rank_changes_are_stored() {
        assert!(needs_update(120, 110));
        assert!(needs_update(0, 5000));
        assert!(!needs_update(120, 120));
        // ScoreSaber reports inactive players as rank 0.
        assert!(!needs_update(120, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn throttle_pauses_after_every_batch() {
        let start = time::Instant::now();
        throttle(1).await;
        assert_eq!(start.elapsed(), REQUEST_DELAY);

        let start = time::Instant::now();
        throttle(BATCH_SIZE).await;
        assert_eq!(start.elapsed(), REQUEST_DELAY + BATCH_PAUSE);
    }

    struct FakeScoreSaber;

    #[async_trait]
    impl PlayerSource for FakeScoreSaber {
        async fn fetch_player(&self, player_id: &str) -> Result<Option<ScoreSaberPlayer>, Error> {
            let rank = match player_id {
                "broken" => return Err("ScoreSaber is down".into()),
                "gone" => return Ok(None),
                "inactive" => 0,
                "steady" => 300,
                _ => 90
            };

            Ok(Some(ScoreSaberPlayer {
                id: player_id.to_string(),
                name: format!("{player_id} (remote)"),
                profile_picture: None,
                country: "de".to_string(),
                pp: 1000.0,
                rank,
                country_rank: 1,
                histories: String::new(),
                inactive: rank == 0
            }))
        }
    }

    #[derive(Default)]
    struct FakeStore {
        written: std::sync::Mutex<Vec<Player>>
    }

    #[async_trait]
    impl PlayerStore for FakeStore {
        async fn store_player(&self, player: &Player) -> Result<bool, Error> {
            self.written.lock().unwrap().push(player.clone());
            Ok(true)
        }
    }

    fn stored(player_id: &str, discord_id: u64) -> Player {
        Player {
            player_id: player_id.to_string(),
            name: player_id.to_string(),
            discord_user_id: serenity::model::id::UserId::new(discord_id),
            rank: 300,
            country_rank: 2,
            country: "DE".to_string(),
            pp: 900.0,
            custom_acc_grid_image: Some(format!("https://i.imgur.com/{player_id}.png"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn one_bad_player_does_not_stop_the_pass() {
        let store = FakeStore::default();
        let players = vec![
            stored("broken", 1),
            stored("gone", 2),
            stored("inactive", 3),
            stored("steady", 4),
            stored("climber", 5)
        ];

        let start = time::Instant::now();
        let report = refresh_records(&FakeScoreSaber, &store, players).await;

        assert_eq!(report.updated.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "broken");

        let written = store.written.lock().unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].player_id, "climber");
        assert_eq!(written[0].rank, 90);
        assert_eq!(written[0].discord_user_id.get(), 5);
        assert_eq!(written[0].custom_acc_grid_image.as_deref(), Some("https://i.imgur.com/climber.png"));

        // Every player is throttled, including the ones that failed.
        assert_eq!(start.elapsed(), REQUEST_DELAY * 5);
    }

    #[tokio::test(start_paused = true)]
    async fn long_passes_pause_after_each_batch() {
        let store = FakeStore::default();
        let players: Vec<Player> = (0..BATCH_SIZE as u64 + 1).map(|i| stored("steady", i + 1)).collect();

        let start = time::Instant::now();
        let report = refresh_records(&FakeScoreSaber, &store, players).await;

        assert!(report.updated.is_empty());
        assert_eq!(start.elapsed(), REQUEST_DELAY * (BATCH_SIZE + 1) + BATCH_PAUSE);
    }
}
