use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serenity::prelude::TypeMapKey;
use tracing::debug;

use crate::Error;
use crate::models::scoresaber_models::*;

pub const API_URL: &str = "https://scoresaber.com/api";
pub const USER_PRE_URL: &str = "https://scoresaber.com/u/";
// ScoreSaber gets grumpy past ~10 requests a second.
pub const REQUEST_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSort {
    Recent,
    Top
}

impl ScoreSort {
    fn as_query(&self) -> &'static str {
        match self {
            ScoreSort::Recent => "recent",
            ScoreSort::Top => "top"
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardFilter {
    Ranked,
    Qualified
}

/// Anything that can hand out pages of the player rankings.
#[async_trait]
pub trait LeaderboardPages {
    async fn players_page(&self, page: i32, countries: Option<&str>) -> Result<Vec<ScoreSaberPlayer>, Error>;
}

pub struct ScoreSaber {
    client: Client,
    base_url: String
}

impl TypeMapKey for ScoreSaber {
    type Value = Arc<ScoreSaber>;
}

impl ScoreSaber {
    pub fn new() -> Result<ScoreSaber, Error> {
        let client = Client::builder()
            .user_agent(concat!("beatbot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(ScoreSaber { client, base_url: API_URL.to_string() })
    }

    // A 404 means "no such thing" for every endpoint we use.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<Option<T>, Error> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        Ok(Some(response.error_for_status()?.json::<T>().await?))
    }

    pub async fn get_player(&self, player_id: &str) -> Result<Option<ScoreSaberPlayer>, Error> {
        if player_id.is_empty() || !player_id.chars().all(|c| c.is_ascii_digit()) {
            return Ok(None);
        }

        self.get_json(&format!("/player/{player_id}/full"), &[]).await
    }

    pub async fn get_scores(&self, player_id: &str, sort: ScoreSort, page: i32, limit: i32) -> Result<Vec<PlayerScore>, Error> {
        let query = [
            ("sort", sort.as_query().to_string()),
            ("page", page.max(1).to_string()),
            ("limit", limit.to_string())
        ];

        let scores: Option<PlayerScoreCollection> = self.get_json(&format!("/player/{player_id}/scores"), &query).await?;
        Ok(scores.map(|o| o.player_scores).unwrap_or_default())
    }

    pub async fn get_leaderboards(&self, filter: LeaderboardFilter, page: i32) -> Result<Option<LeaderboardCollection>, Error> {
        let mut query = vec![("page", page.max(1).to_string())];
        match filter {
            LeaderboardFilter::Ranked => {
                query.push(("ranked", "true".to_string()));
                // Category 1 sorts by ranked date.
                query.push(("category", "1".to_string()));
                query.push(("sort", "0".to_string()));
            }
            LeaderboardFilter::Qualified => query.push(("qualified", "true".to_string()))
        }

        self.get_json("/leaderboards", &query).await
    }

    // Walks every page of a leaderboard listing; `max_pages` bounds runaway pagination.
    pub async fn get_all_leaderboards(&self, filter: LeaderboardFilter, max_pages: i32) -> Result<Vec<LeaderboardInfo>, Error> {
        let mut out = Vec::new();

        for page in 1..=max_pages {
            let Some(collection) = self.get_leaderboards(filter, page).await? else { break };
            if collection.leaderboards.is_empty() {
                break;
            }

            out.extend(collection.leaderboards);

            let fetched = collection.metadata.page * collection.metadata.items_per_page;
            if fetched >= collection.metadata.total {
                break;
            }

            tokio::time::sleep(REQUEST_DELAY).await;
        }

        Ok(out)
    }
}

#[async_trait]
impl LeaderboardPages for ScoreSaber {
    async fn players_page(&self, page: i32, countries: Option<&str>) -> Result<Vec<ScoreSaberPlayer>, Error> {
        let mut query = vec![("page", page.max(1).to_string())];
        if let Some(countries) = countries {
            query.push(("countries", countries.to_string()));
        }

        let players: Option<PlayerCollection> = self.get_json("/players", &query).await?;
        Ok(players.map(|o| o.players).unwrap_or_default())
    }
}
