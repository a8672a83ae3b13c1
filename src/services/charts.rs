use std::sync::Arc;
use std::time::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use serenity::prelude::TypeMapKey;
use tracing::debug;

use crate::Error;
use crate::models::player::{Skill, Skills};

pub const QUICKCHART_URL: &str = "https://quickchart.io";
// Discord refuses embed image URLs past this length.
pub const MAX_EMBED_URL_LEN: usize = 2048;

const COLORS: [&str; 10] = ["#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#42d4f4", "#f032e6", "#bfef45", "#fabed4", "#469990"];

pub struct RankSeries {
    pub label: String,
    pub ranks: Vec<i32>
}

/// Body of a QuickChart `/chart/create` call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRequest {
    pub chart: Value,
    pub width: u32,
    pub height: u32,
    pub background_color: String
}

impl ChartRequest {
    fn new(chart: Value, width: u32, height: u32) -> ChartRequest {
        ChartRequest { chart, width, height, background_color: "white".to_string() }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatedChart {
    #[serde(default)]
    pub success: bool,
    pub url: Option<String>
}

/// The short render URL QuickChart hands back, checked against Discord's embed limit.
pub fn embed_url(created: CreatedChart) -> Result<String, Error> {
    let url = match created.url {
        Some(url) if created.success && !url.is_empty() => url,
        _ => return Err("QuickChart did not create the chart".into())
    };

    if url.len() > MAX_EMBED_URL_LEN {
        return Err(format!("Chart URL is {} characters long", url.len()).into());
    }

    Ok(url)
}

pub struct QuickChart {
    client: Client,
    base_url: String
}

impl TypeMapKey for QuickChart {
    type Value = Arc<QuickChart>;
}

impl QuickChart {
    pub fn new() -> Result<QuickChart, Error> {
        let client = Client::builder()
            .user_agent(concat!("beatbot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(QuickChart { client, base_url: QUICKCHART_URL.to_string() })
    }

    /// Stores the chart on QuickChart and returns a short URL that renders it.
    pub async fn create(&self, request: &ChartRequest) -> Result<String, Error> {
        let url = format!("{}/chart/create", self.base_url);
        debug!("POST {}", url);

        let created = self.client.post(&url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<CreatedChart>()
            .await?;

        embed_url(created)
    }
}

/// Line chart of daily ranks; lower is better, so the axis is flipped.
pub fn rank_history_chart(title: &str, series: &[RankSeries]) -> ChartRequest {
    let days = series.iter().map(|o| o.ranks.len()).max().unwrap_or_default();
    let labels: Vec<String> = (0..days)
        .map(|o| {
            let ago = days - o - 1;
            if ago == 0 { "Today".to_string() } else { format!("-{ago}d") }
        })
        .collect();

    let datasets: Vec<Value> = series.iter()
        .enumerate()
        .map(|(index, o)| {
            // Right-align shorter histories so "Today" lines up.
            let mut data: Vec<Value> = vec![Value::Null; days - o.ranks.len()];
            data.extend(o.ranks.iter().map(|r| json!(r)));
            let color = COLORS[index % COLORS.len()];

            json!({
                "label": o.label,
                "data": data,
                "fill": false,
                "borderColor": color,
                "backgroundColor": color,
                "pointRadius": 0
            })
        })
        .collect();

    let config = json!({
        "type": "line",
        "data": { "labels": labels, "datasets": datasets },
        "options": {
            "title": { "display": true, "text": title },
            "scales": { "yAxes": [{ "ticks": { "reverse": true } }] }
        }
    });

    ChartRequest::new(config, 800, 400)
}

pub fn skills_radar_chart(name: &str, skills: &Skills) -> ChartRequest {
    let labels: Vec<&str> = Skill::ALL.iter().map(|o| o.name()).collect();
    let values: Vec<i32> = Skill::ALL.iter().map(|o| skills.get(*o)).collect();

    let config = json!({
        "type": "radar",
        "data": {
            "labels": labels,
            "datasets": [{
                "label": name,
                "data": values,
                "backgroundColor": "rgba(67, 99, 216, 0.3)",
                "borderColor": "#4363d8"
            }]
        },
        "options": {
            "legend": { "display": false },
            "title": { "display": true, "text": format!("{name}'s Stand") },
            "scale": { "ticks": { "min": 0, "max": Skill::MAX_VALUE, "stepSize": 2 } }
        }
    });

    ChartRequest::new(config, 500, 500)
}
