use chrono::Utc;
use poise::CreateReply;
use serenity::all::{CreateEmbed, CreateEmbedFooter};
use tracing::warn;

use crate::{BotContext, Error, beatsaver, scoresaber, shared, util};
use crate::commands::command_player;
use crate::models::player::Player;
use crate::models::scoresaber_models::PlayerScore;
use crate::services::ranked_maps::RankedMaps;
use crate::services::scoresaber::ScoreSort;
use super::{leaderboard_page_url, parse_index};

pub fn score_fields(score: &PlayerScore, stars: Option<f64>) -> Vec<(String, String, bool)> {
    let mut fields = vec![
        ("Difficulty".to_string(), score.leaderboard.difficulty_name().to_string(), true),
        ("Rank".to_string(), format!("#{}", score.score.rank), true)
    ];

    let accuracy = score.accuracy_string();
    if !accuracy.is_empty() {
        fields.push(("Accuracy".to_string(), accuracy, true));
    }

    if score.leaderboard.ranked || score.score.pp > 0.0 {
        fields.push(("PP".to_string(), format!("{} {}", score.pp_string(), score.weighted_pp_string()), true));
    }

    if let Some(stars) = stars.filter(|o| *o > 0.0) {
        fields.push(("Stars".to_string(), format!("{}⭐", util::decimal(stars)), true));
    }

    fields
}

fn score_embed(player: &Player, score: &PlayerScore, stars: Option<f64>, map_url: Option<String>) -> CreateEmbed {
    let leaderboard = &score.leaderboard;
    let mut description = format!("by {}, mapped by {}", leaderboard.song_author_name, leaderboard.level_author_name);
    if let Some(url) = map_url {
        description += &format!("\n{}", util::link("BeatSaver", &url));
    }

    let mut embed = CreateEmbed::new()
        .title(leaderboard.full_song_name())
        .url(leaderboard_page_url(leaderboard.id))
        .description(description)
        .fields(score_fields(score, stars));

    if !leaderboard.cover_image.is_empty() {
        embed = embed.thumbnail(&leaderboard.cover_image);
    }

    if let Some(grid) = &player.custom_acc_grid_image {
        embed = embed.image(grid);
    }

    let when = score.time_set()
        .map(|o| util::relative_time(o, Utc::now()))
        .unwrap_or_default();
    embed.footer(CreateEmbedFooter::new(format!("{} • {}", player.name, when)))
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Scores",
    description_localized("en-US", "Shows one of the most recent plays, 1 being the newest.")
)]
pub async fn recentsong(
    ctx: BotContext<'_>,
    #[description = "Which recent play (1 = newest), and/or a mentioned user"] #[rest] arguments: Option<String>)
-> Result<(), Error> {
    let index = match parse_index(arguments.as_deref()) {
        Ok(index) => index,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    let Some(player) = command_player(ctx, arguments.as_deref()).await? else {
        return Ok(());
    };

    let scoresaber = scoresaber!(ctx);
    let scores = scoresaber.get_scores(&player.player_id, ScoreSort::Recent, index, 1).await?;
    let Some(score) = scores.first() else {
        ctx.say(format!("Could not find a recent song #{} for {}.", index, player.name)).await?;
        return Ok(());
    };

    let cache = shared!(ctx.serenity_context(), RankedMaps);
    let stars = cache.read().await
        .stars_for(score.leaderboard.id)
        .or(Some(score.leaderboard.stars));

    let beatsaver = beatsaver!(ctx);
    let map_url = match beatsaver.get_map_by_hash(&score.leaderboard.song_hash).await {
        Ok(map) => map.map(|o| o.page_url()),
        Err(ex) => {
            warn!("BeatSaver lookup for {} failed: {}", score.leaderboard.song_hash, ex);
            None
        }
    };

    ctx.send(CreateReply::default().embed(score_embed(&player, score, stars, map_url))).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(pp: f64, ranked: bool) -> PlayerScore {
        serde_json::from_value(serde_json::json!({
            "score": {
                "rank": 12, "baseScore": 900000, "modifiedScore": 900000, "pp": pp, "weight": 0.5,
                "timeSet": "2023-01-01T10:00:00.000Z"
            },
            "leaderboard": {
                "id": 55, "songHash": "ABC", "songName": "Song", "songSubName": "", "songAuthorName": "Artist",
                "levelAuthorName": "Mapper", "difficulty": { "difficulty": 9, "difficultyRaw": "_ExpertPlus_SoloStandard" },
                "maxScore": 1000000, "ranked": ranked, "stars": 7.5, "coverImage": "", "rankedDate": null
            }
        })).unwrap()
    }

    #[test]
    fn ranked_scores_show_pp_and_stars() {
        let fields = score_fields(&score(300.0, true), Some(7.5));
        let names: Vec<&str> = fields.iter().map(|o| o.0.as_str()).collect();
        assert_eq!(names, vec!["Difficulty", "Rank", "Accuracy", "PP", "Stars"]);
        assert_eq!(fields[2].1, "90.00%");
        assert_eq!(fields[3].1, "300.00PP (150.00PP)");
        assert_eq!(fields[4].1, "7.50⭐");
    }

    #[test]
    fn unranked_scores_hide_pp() {
        let fields = score_fields(&score(0.0, false), None);
        assert!(fields.iter().all(|o| o.0 != "PP" && o.0 != "Stars"));
    }
}
