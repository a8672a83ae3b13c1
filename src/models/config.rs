use std::{env, fs};
use serde::Deserialize;
use serenity::prelude::TypeMapKey;

use crate::Error;

fn default_prefix() -> String {
    "ru".to_string()
}

fn default_sql_port() -> u16 {
    1433
}

fn default_database() -> String {
    "BeatBot".to_string()
}

fn default_feature_request_url() -> String {
    "https://github.com/beatbot-rs/beatbot/issues".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_prefix")]
    pub cmd_prefix: String,
    pub sql_server_ip: String,
    #[serde(default = "default_sql_port")]
    pub sql_server_port: u16,
    pub sql_server_username: String,
    pub sql_server_password: String,
    #[serde(default = "default_database")]
    pub sql_server_database: String,
    // The community server; role handling and welcome messages only happen here.
    #[serde(default)]
    pub home_guild_id: u64,
    #[serde(default)]
    pub bot_channel_id: u64,
    pub log_guild_id: Option<u64>,
    // Base64 data URI embedded into generated playlists.
    #[serde(default)]
    pub playlist_image: String,
    #[serde(default = "default_feature_request_url")]
    pub feature_request_url: String,
    #[serde(default)]
    pub disable_ranked_requests: bool
}

impl TypeMapKey for Config {
    type Value = std::sync::Arc<Config>;
}

impl Config {
    pub fn load(path: &str) -> Result<Config, Error> {
        let config_json = fs::read_to_string(path)?;
        let mut config = Config::from_json(&config_json)?;
        config.apply_env(|key| env::var(key).ok());

        if config.token.is_empty() {
            return Err("No bot token was given, set it in config.json or BOT_TOKEN.".into());
        }

        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Config, Error> {
        Ok(serde_json::from_str(json)?)
    }

    // Environment variables win over config.json.
    pub fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, var: F) {
        if let Some(token) = var("BOT_TOKEN").filter(|o| !o.is_empty()) {
            self.token = token;
        }

        if let Some(channel_id) = var("CHANNEL_ID").and_then(|o| o.parse::<u64>().ok()) {
            self.bot_channel_id = channel_id;
        }

        if let Some(flag) = var("DISABLE_RANKED_REQUESTS") {
            self.disable_ranked_requests = !matches!(flag.to_lowercase().as_str(), "" | "0" | "false" | "no");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "token": "abc",
        "sql_server_ip": "localhost",
        "sql_server_username": "sa",
        "sql_server_password": "hunter2"
    }"#;

    #[test]
    fn defaults_are_filled_in() {
        let config = Config::from_json(MINIMAL).unwrap();
        assert_eq!(config.cmd_prefix, "ru");
        assert_eq!(config.sql_server_port, 1433);
        assert_eq!(config.sql_server_database, "BeatBot");
        assert!(config.log_guild_id.is_none());
        assert!(!config.disable_ranked_requests);
    }

    #[test]
    fn environment_overrides_file() {
        let mut config = Config::from_json(MINIMAL).unwrap();
        config.apply_env(|key| match key {
            "BOT_TOKEN" => Some("from-env".to_string()),
            "CHANNEL_ID" => Some("1234".to_string()),
            "DISABLE_RANKED_REQUESTS" => Some("true".to_string()),
            _ => None
        });

        assert_eq!(config.token, "from-env");
        assert_eq!(config.bot_channel_id, 1234);
        assert!(config.disable_ranked_requests);
    }

    #[test]
    fn false_like_flags_do_not_disable() {
        let mut config = Config::from_json(MINIMAL).unwrap();
        config.apply_env(|key| if key == "DISABLE_RANKED_REQUESTS" { Some("0".to_string()) } else { None });
        assert!(!config.disable_ranked_requests);
        assert_eq!(config.token, "abc");
    }
}
