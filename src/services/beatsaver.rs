use std::sync::Arc;
use std::time::Duration;
use reqwest::{Client, StatusCode};
use serenity::prelude::TypeMapKey;
use tracing::debug;

use crate::Error;
use crate::models::beatsaver_models::BeatSaverMap;

pub const API_URL: &str = "https://api.beatsaver.com";

pub struct BeatSaver {
    client: Client
}

impl TypeMapKey for BeatSaver {
    type Value = Arc<BeatSaver>;
}

pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.len() <= 8 && key.chars().all(|c| c.is_ascii_hexdigit())
}

impl BeatSaver {
    pub fn new() -> Result<BeatSaver, Error> {
        let client = Client::builder()
            .user_agent(concat!("beatbot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(BeatSaver { client })
    }

    async fn get_map(&self, url: String) -> Result<Option<BeatSaverMap>, Error> {
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(response.error_for_status()?.json::<BeatSaverMap>().await?))
    }

    pub async fn get_map_by_key(&self, key: &str) -> Result<Option<BeatSaverMap>, Error> {
        if !is_valid_key(key) {
            return Ok(None);
        }

        self.get_map(format!("{API_URL}/maps/id/{}", key.to_lowercase())).await
    }

    pub async fn get_map_by_hash(&self, hash: &str) -> Result<Option<BeatSaverMap>, Error> {
        self.get_map(format!("{API_URL}/maps/hash/{}", hash.to_lowercase())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_short_hex() {
        assert!(is_valid_key("1a2b"));
        assert!(is_valid_key("25f"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("xyz"));
        assert!(!is_valid_key("123456789"));
    }
}
