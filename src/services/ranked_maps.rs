use std::sync::Arc;
use serenity::prelude::TypeMapKey;
use tokio::sync::RwLock;
use tracing::info;

use crate::Error;
use crate::models::scoresaber_models::LeaderboardInfo;
use crate::services::scoresaber::{LeaderboardFilter, ScoreSaber};

const MAX_RANKED_PAGES: i32 = 600;

#[derive(Debug, Default)]
pub struct RankedMaps {
    maps: Option<Vec<LeaderboardInfo>>
}

impl TypeMapKey for RankedMaps {
    type Value = Arc<RwLock<RankedMaps>>;
}

impl RankedMaps {
    pub fn from_maps(mut maps: Vec<LeaderboardInfo>) -> RankedMaps {
        maps.retain(|o| o.ranked);
        // Newest first, undated maps last.
        maps.sort_by(|a, b| b.ranked_date.cmp(&a.ranked_date));
        RankedMaps { maps: Some(maps) }
    }

    pub async fn fetch(scoresaber: &ScoreSaber) -> Result<RankedMaps, Error> {
        let maps = scoresaber.get_all_leaderboards(LeaderboardFilter::Ranked, MAX_RANKED_PAGES).await?;
        info!("Fetched {} ranked leaderboards", maps.len());
        Ok(RankedMaps::from_maps(maps))
    }

    pub fn is_loaded(&self) -> bool {
        self.maps.is_some()
    }

    pub fn len(&self) -> usize {
        self.maps.as_ref().map(|o| o.len()).unwrap_or_default()
    }

    fn all(&self) -> &[LeaderboardInfo] {
        self.maps.as_deref().unwrap_or_default()
    }

    pub fn stars_for(&self, leaderboard_id: i64) -> Option<f64> {
        self.all().iter()
            .find(|o| o.id == leaderboard_id)
            .map(|o| o.stars)
    }

    pub fn most_recent(&self, count: usize) -> Vec<&LeaderboardInfo> {
        self.all().iter().take(count).collect()
    }

    pub fn in_star_range(&self, min: f64, max: f64) -> Vec<&LeaderboardInfo> {
        self.all().iter()
            .filter(|o| o.stars >= min && o.stars <= max)
            .collect()
    }
}
