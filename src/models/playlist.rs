use serde::{Deserialize, Serialize};

use crate::models::beatsaver_models::BeatSaverMap;
use crate::models::scoresaber_models::LeaderboardInfo;

pub const PLAYLIST_AUTHOR: &str = "BeatBot";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDifficulty {
    pub characteristic: String,
    pub name: String
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSong {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub hash: String,
    pub song_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub difficulties: Vec<PlaylistDifficulty>
}

/// A `.bplist` playlist, as read by the in-game playlist loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub playlist_title: String,
    pub playlist_author: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub image: String,
    pub songs: Vec<PlaylistSong>
}

impl Playlist {
    pub fn new(title: &str, image: &str) -> Playlist {
        Playlist {
            playlist_title: title.to_string(),
            playlist_author: PLAYLIST_AUTHOR.to_string(),
            image: image.to_string(),
            songs: Vec::new()
        }
    }

    pub fn add_map(&mut self, map: &BeatSaverMap) -> bool {
        match map.latest_version() {
            Some(version) => {
                self.push_song(Some(map.id.clone()), &version.hash, &map.name, None);
                true
            }
            None => false
        }
    }

    // One entry per hash; ranked difficulties of the same map are merged.
    pub fn add_leaderboard(&mut self, leaderboard: &LeaderboardInfo) {
        let difficulty = leaderboard.difficulty.difficulty().map(|o| PlaylistDifficulty {
            characteristic: leaderboard.difficulty.characteristic(),
            name: o.playlist_name().to_string()
        });

        self.push_song(None, &leaderboard.song_hash, &leaderboard.full_song_name(), difficulty);
    }

    fn push_song(&mut self, key: Option<String>, hash: &str, song_name: &str, difficulty: Option<PlaylistDifficulty>) {
        let hash = hash.to_uppercase();

        if let Some(existing) = self.songs.iter_mut().find(|o| o.hash == hash) {
            if let Some(difficulty) = difficulty {
                if !existing.difficulties.contains(&difficulty) {
                    existing.difficulties.push(difficulty);
                }
            }
            return;
        }

        self.songs.push(PlaylistSong {
            key,
            hash,
            song_name: song_name.to_string(),
            difficulties: difficulty.into_iter().collect()
        });
    }

    pub fn file_name(&self) -> String {
        let safe: String = self.playlist_title.chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();

        if safe.is_empty() {
            "playlist.bplist".to_string()
        } else {
            format!("{safe}.bplist")
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scoresaber_models::DifficultyInfo;

    fn leaderboard(hash: &str, difficulty: i32, raw: &str) -> LeaderboardInfo {
        LeaderboardInfo {
            id: 1,
            song_hash: hash.to_string(),
            song_name: "Song".to_string(),
            song_sub_name: String::new(),
            song_author_name: String::new(),
            level_author_name: String::new(),
            difficulty: DifficultyInfo { difficulty, game_mode: "SoloStandard".to_string(), difficulty_raw: raw.to_string() },
            max_score: 0,
            ranked: true,
            qualified: false,
            stars: 5.0,
            cover_image: String::new(),
            ranked_date: None
        }
    }

    #[test]
    fn difficulties_of_one_map_are_merged() {
        let mut playlist = Playlist::new("Ranked", "");
        playlist.add_leaderboard(&leaderboard("abc", 9, "_ExpertPlus_SoloStandard"));
        playlist.add_leaderboard(&leaderboard("ABC", 7, "_Expert_SoloStandard"));
        playlist.add_leaderboard(&leaderboard("abc", 7, "_Expert_SoloStandard"));
        playlist.add_leaderboard(&leaderboard("def", 5, "_Hard_SoloStandard"));

        assert_eq!(playlist.songs.len(), 2);
        assert_eq!(playlist.songs[0].hash, "ABC");
        assert_eq!(playlist.songs[0].difficulties, vec![
            PlaylistDifficulty { characteristic: "Standard".to_string(), name: "expertPlus".to_string() },
            PlaylistDifficulty { characteristic: "Standard".to_string(), name: "expert".to_string() }
        ]);
    }

    #[test]
    fn serialized_playlist_uses_loader_field_names() {
        let mut playlist = Playlist::new("My List!", "");
        playlist.add_leaderboard(&leaderboard("abc", 9, "_ExpertPlus_SoloStandard"));
        let json: serde_json::Value = serde_json::from_slice(&playlist.to_bytes().unwrap()).unwrap();

        assert_eq!(json["playlistTitle"], "My List!");
        assert_eq!(json["playlistAuthor"], PLAYLIST_AUTHOR);
        assert!(json.get("image").is_none());
        assert_eq!(json["songs"][0]["songName"], "Song");
        assert!(json["songs"][0].get("key").is_none());
        assert_eq!(playlist.file_name(), "My_List_.bplist");
    }
}
