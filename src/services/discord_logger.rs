use std::collections::HashMap;
use std::sync::Arc;
use serenity::all::{ChannelId, GuildId, Http};
use serenity::prelude::TypeMapKey;
use tokio::sync::RwLock;
use tracing::{error, info};

pub const INFO: &str = "info";
pub const USERS: &str = "users";
pub const GUILDS: &str = "guilds";
pub const REFRESH: &str = "refresh";

/// Mirrors operational messages into named text channels of a private log server.
pub struct DiscordLogger {
    guild: Option<GuildId>,
    channels: RwLock<HashMap<String, ChannelId>>
}

impl TypeMapKey for DiscordLogger {
    type Value = Arc<DiscordLogger>;
}

impl DiscordLogger {
    pub fn new(guild: Option<u64>) -> DiscordLogger {
        DiscordLogger {
            guild: guild.filter(|o| *o != 0).map(GuildId::new),
            channels: RwLock::new(HashMap::new())
        }
    }

    async fn channel(&self, http: &Http, name: &str) -> Option<ChannelId> {
        if let Some(channel) = self.channels.read().await.get(name) {
            return Some(*channel);
        }

        let guild = self.guild?;
        match guild.channels(http).await {
            Ok(channels) => {
                let found = channels.values()
                    .find(|o| o.name.eq_ignore_ascii_case(name))
                    .map(|o| o.id);

                if let Some(channel) = found {
                    self.channels.write().await.insert(name.to_string(), channel);
                }

                found
            }
            Err(ex) => {
                error!("Failed to list channels of the log server: {}", ex);
                None
            }
        }
    }

    pub async fn log(&self, http: &Http, message: &str, channel_name: &str) {
        info!("[{}] {}", channel_name, message);

        if let Some(channel) = self.channel(http, channel_name).await {
            let content: String = message.chars().take(1900).collect();
            if let Err(ex) = channel.say(http, content).await {
                error!("Failed to send log message to #{}: {}", channel_name, ex);
            }
        }
    }
}
