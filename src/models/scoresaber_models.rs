use chrono::{DateTime, Utc};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSaberPlayer {
    pub id: String,
    pub name: String,
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub pp: f64,
    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub country_rank: i32,
    // Comma-separated daily global ranks, oldest first.
    #[serde(default)]
    pub histories: String,
    #[serde(default)]
    pub inactive: bool
}

impl ScoreSaberPlayer {
    pub fn rank_history(&self) -> Vec<i32> {
        let mut history: Vec<i32> = self.histories.split(',')
            .filter_map(|o| o.trim().parse::<i32>().ok())
            .collect();

        if self.rank > 0 {
            history.push(self.rank);
        }

        history
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub total: i64,
    pub page: i64,
    pub items_per_page: i64
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerCollection {
    pub players: Vec<ScoreSaberPlayer>,
    pub metadata: Metadata
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub rank: i32,
    pub base_score: i64,
    pub modified_score: i64,
    pub pp: f64,
    pub weight: f64,
    pub time_set: String,
    #[serde(default)]
    pub full_combo: bool,
    #[serde(default)]
    pub missed_notes: i32,
    #[serde(default)]
    pub bad_cuts: i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum Difficulty {
    Easy = 1,
    Normal = 3,
    Hard = 5,
    Expert = 7,
    ExpertPlus = 9
}

impl Difficulty {
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
            Difficulty::ExpertPlus => "Expert+"
        }
    }

    // Names as the in-game playlist loader expects them.
    pub fn playlist_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
            Difficulty::ExpertPlus => "expertPlus"
        }
    }

    pub fn from_raw_name(name: &str) -> Option<Difficulty> {
        match name.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            "expert" => Some(Difficulty::Expert),
            "expertplus" => Some(Difficulty::ExpertPlus),
            _ => None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyInfo {
    pub difficulty: i32,
    #[serde(default)]
    pub game_mode: String,
    // Looks like "_ExpertPlus_SoloStandard".
    #[serde(default)]
    pub difficulty_raw: String
}

impl DifficultyInfo {
    pub fn difficulty(&self) -> Option<Difficulty> {
        Difficulty::from_i32(self.difficulty)
    }

    pub fn characteristic(&self) -> String {
        let mode = self.difficulty_raw.split('_')
            .filter(|o| !o.is_empty())
            .nth(1)
            .unwrap_or(&self.game_mode);

        let characteristic = mode.strip_prefix("Solo").unwrap_or(mode);
        if characteristic.is_empty() {
            "Standard".to_string()
        } else {
            characteristic.to_string()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardInfo {
    pub id: i64,
    pub song_hash: String,
    pub song_name: String,
    #[serde(default)]
    pub song_sub_name: String,
    #[serde(default)]
    pub song_author_name: String,
    #[serde(default)]
    pub level_author_name: String,
    pub difficulty: DifficultyInfo,
    #[serde(default)]
    pub max_score: i64,
    #[serde(default)]
    pub ranked: bool,
    #[serde(default)]
    pub qualified: bool,
    #[serde(default)]
    pub stars: f64,
    #[serde(default)]
    pub cover_image: String,
    pub ranked_date: Option<DateTime<Utc>>
}

impl LeaderboardInfo {
    pub fn full_song_name(&self) -> String {
        if self.song_sub_name.trim().is_empty() {
            self.song_name.clone()
        } else {
            format!("{} {}", self.song_name, self.song_sub_name)
        }
    }

    pub fn difficulty_name(&self) -> &'static str {
        self.difficulty.difficulty()
            .map(|o| o.display_name())
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaderboardCollection {
    pub leaderboards: Vec<LeaderboardInfo>,
    pub metadata: Metadata
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerScore {
    pub score: Score,
    pub leaderboard: LeaderboardInfo
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScoreCollection {
    pub player_scores: Vec<PlayerScore>,
    pub metadata: Metadata
}

impl PlayerScore {
    pub fn accuracy(&self) -> Option<f64> {
        if self.score.modified_score != 0 && self.leaderboard.max_score > 0 {
            return Some(self.score.modified_score as f64 / self.leaderboard.max_score as f64);
        }

        None
    }

    pub fn accuracy_string(&self) -> String {
        match self.accuracy() {
            Some(acc) if acc.is_finite() => format!("{:.2}%", acc * 100.0),
            _ => String::new()
        }
    }

    pub fn pp_string(&self) -> String {
        format!("{:.2}PP", self.score.pp)
    }

    pub fn weighted_pp_string(&self) -> String {
        format!("({:.2}PP)", self.score.pp * self.score.weight)
    }

    pub fn time_set(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.score.time_set)
            .ok()
            .map(|o| o.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_json() -> &'static str {
        r#"{
            "score": {
                "rank": 12,
                "baseScore": 900000,
                "modifiedScore": 950000,
                "pp": 312.456,
                "weight": 0.5,
                "timeSet": "2026-10-16T10:00:00.000Z",
                "fullCombo": true
            },
            "leaderboard": {
                "id": 42,
                "songHash": "ABCDEF",
                "songName": "Ghost",
                "songSubName": "(Camellia Remix)",
                "songAuthorName": "Someone",
                "levelAuthorName": "Mapper",
                "difficulty": { "difficulty": 9, "gameMode": "SoloStandard", "difficultyRaw": "_ExpertPlus_SoloStandard" },
                "maxScore": 1000000,
                "ranked": true,
                "stars": 11.2,
                "coverImage": "https://cdn.scoresaber.com/covers/ABCDEF.png",
                "rankedDate": "2026-01-02T03:04:05.000Z"
            }
        }"#
    }

    #[test]
    fn score_formatting() {
        let score: PlayerScore = serde_json::from_str(score_json()).unwrap();
        assert_eq!(score.accuracy_string(), "95.00%");
        assert_eq!(score.pp_string(), "312.46PP");
        assert_eq!(score.weighted_pp_string(), "(156.23PP)");
        assert_eq!(score.leaderboard.full_song_name(), "Ghost (Camellia Remix)");
        assert_eq!(score.leaderboard.difficulty_name(), "Expert+");
        assert!(score.time_set().is_some());
    }

    #[test]
    fn unknown_max_score_has_no_accuracy() {
        let mut score: PlayerScore = serde_json::from_str(score_json()).unwrap();
        score.leaderboard.max_score = 0;
        assert_eq!(score.accuracy(), None);
        assert_eq!(score.accuracy_string(), "");
    }

    #[test]
    fn characteristic_comes_from_raw_difficulty() {
        let info = DifficultyInfo { difficulty: 7, game_mode: "SoloStandard".to_string(), difficulty_raw: "_Expert_SoloOneSaber".to_string() };
        assert_eq!(info.characteristic(), "OneSaber");
        assert_eq!(info.difficulty(), Some(Difficulty::Expert));

        let bare = DifficultyInfo { difficulty: 2, game_mode: "SoloStandard".to_string(), difficulty_raw: String::new() };
        assert_eq!(bare.characteristic(), "Standard");
        assert_eq!(bare.difficulty(), None);
    }

    #[test]
    fn rank_history_appends_current_rank() {
        let player = ScoreSaberPlayer {
            id: "1".to_string(),
            name: "a".to_string(),
            profile_picture: None,
            country: "DE".to_string(),
            pp: 1.0,
            rank: 90,
            country_rank: 3,
            histories: "120,110,,100".to_string(),
            inactive: false
        };
        assert_eq!(player.rank_history(), vec![120, 110, 100, 90]);
    }
}
