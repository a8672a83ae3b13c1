use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMetadata {
    #[serde(default)]
    pub song_name: String,
    #[serde(default)]
    pub song_sub_name: String,
    #[serde(default)]
    pub song_author_name: String,
    #[serde(default)]
    pub level_author_name: String,
    #[serde(default)]
    pub bpm: f64,
    #[serde(default)]
    pub duration: i64
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapVersion {
    pub hash: String,
    #[serde(default)]
    pub state: String,
    #[serde(rename = "coverURL", default)]
    pub cover_url: String,
    #[serde(rename = "downloadURL", default)]
    pub download_url: String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeatSaverMap {
    // The short hex "key" people pass around.
    pub id: String,
    pub name: String,
    pub metadata: MapMetadata,
    #[serde(default)]
    pub versions: Vec<MapVersion>
}

impl BeatSaverMap {
    pub fn latest_version(&self) -> Option<&MapVersion> {
        self.versions.iter()
            .find(|o| o.state == "Published")
            .or_else(|| self.versions.first())
    }

    pub fn page_url(&self) -> String {
        format!("https://beatsaver.com/maps/{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_version_is_preferred() {
        let map: BeatSaverMap = serde_json::from_str(r#"{
            "id": "1a2b",
            "name": "Some Map",
            "metadata": { "songName": "Song", "songAuthorName": "Artist", "levelAuthorName": "Mapper", "bpm": 180.0, "duration": 200 },
            "versions": [
                { "hash": "draft", "state": "Uploaded", "coverURL": "", "downloadURL": "" },
                { "hash": "live", "state": "Published", "coverURL": "https://cdn/cover.jpg", "downloadURL": "https://cdn/map.zip" }
            ]
        }"#).unwrap();

        assert_eq!(map.latest_version().map(|o| o.hash.as_str()), Some("live"));
        assert_eq!(map.page_url(), "https://beatsaver.com/maps/1a2b");
    }
}
