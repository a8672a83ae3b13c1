mod models;
mod commands;
mod services;
mod util;

use std::collections::HashSet;
use std::env;
use std::error;
use std::sync::Arc;
use commands::get_framework;
use models::config::Config;
use services::{*, beatsaver::BeatSaver, charts::QuickChart, database::Database, discord_logger::DiscordLogger, ranked_maps::RankedMaps, scoresaber::ScoreSaber};
use serenity::{
    async_trait,
    client::{Context, EventHandler},
    model::{gateway::{GatewayIntents, Ready}, guild::{Guild, Member, UnavailableGuild}, id::{GuildId, UserId}, user::User},
    http::Http
};
use tokio::sync::RwLock;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;

type Error = Box<dyn error::Error + Send + Sync>;
type BotContext<'a> = poise::Context<'a, (), Error>;

struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: Option<bool>) {
        message_handler::on_guild_join(&ctx, &guild, is_new).await;
    }

    async fn guild_delete(&self, ctx: Context, incomplete: UnavailableGuild, full: Option<Guild>) {
        message_handler::on_guild_leave(&ctx, &incomplete, full.as_ref()).await;
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        message_handler::on_join(&ctx, &new_member).await;
    }

    async fn guild_member_removal(&self, ctx: Context, guild_id: GuildId, user: User, _member: Option<Member>) {
        message_handler::on_leave(&ctx, guild_id, &user).await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        bot_init::ready(&ctx, &ready).await;
    }
}

// The guard has to outlive main, or the file writer stops flushing.
fn init_logger() -> std::io::Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::hourly("logs", "beatbot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing::subscriber::set_global_default(
        fmt::Subscriber::builder()
            .with_target(true)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_span_events(fmt::format::FmtSpan::CLOSE)
            .with_ansi(true)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
            .with(fmt::Layer::default().with_writer(non_blocking))
    ).map_err(|ex| std::io::Error::new(std::io::ErrorKind::Other, ex))?;

    const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");
    info!("Initializing BeatBot v{}", VERSION.unwrap_or("<unknown>"));
    info!("Reading from {}", env::current_dir()?.display());

    Ok(guard)
}

async fn fetch_owners(token: &str) -> Result<HashSet<UserId>, Error> {
    let http = Http::new(token);
    let info = http.get_current_application_info().await?;

    let mut owners = HashSet::new();
    if let Some(team) = info.team {
        owners.insert(team.owner_user_id);
    } else if let Some(owner) = info.owner {
        owners.insert(owner.id);
    }

    Ok(owners)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _guard = match init_logger() {
        Ok(guard) => Some(guard),
        Err(ex) => {
            eprintln!("Failed to initialize logger: {ex}");
            None
        }
    };

    let config = Config::load("config.json")?;
    let owners = fetch_owners(&config.token).await?;
    let framework_options = get_framework(&config.cmd_prefix, owners).await?;

    let database = Database::new(
        &config.sql_server_ip,
        config.sql_server_port,
        &config.sql_server_username,
        &config.sql_server_password,
        &config.sql_server_database
    ).await?;
    let scoresaber = ScoreSaber::new()?;
    let beatsaver = BeatSaver::new()?;
    let quickchart = QuickChart::new()?;
    let logger = DiscordLogger::new(config.log_guild_id);

    let framework = poise::Framework::builder()
        .options(framework_options)
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} application commands", framework.options().commands.len());

                tokio::spawn(player_refresh::refresh_players(ctx.data.clone(), ctx.http.clone()));
                Ok(())
            })
        })
        .build();

    let intents = GatewayIntents::non_privileged() | GatewayIntents::GUILD_MEMBERS | GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::Client::builder(&config.token, intents)
        .framework(framework)
        .event_handler(Handler)
        .await?;

    {
        let mut data = client.data.write().await;
        data.insert::<Database>(Arc::new(database));
        data.insert::<ScoreSaber>(Arc::new(scoresaber));
        data.insert::<BeatSaver>(Arc::new(beatsaver));
        data.insert::<QuickChart>(Arc::new(quickchart));
        data.insert::<DiscordLogger>(Arc::new(logger));
        data.insert::<RankedMaps>(Arc::new(RwLock::new(RankedMaps::default())));
        data.insert::<Config>(Arc::new(config));
    }

    if let Err(ex) = client.start().await {
        error!("Client error: {}", ex);
        return Err(ex.into());
    }

    Ok(())
}
