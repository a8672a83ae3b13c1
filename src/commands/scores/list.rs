use poise::CreateReply;
use serenity::all::{CreateEmbed, CreateEmbedFooter};

use crate::{BotContext, Error, scoresaber, util};
use crate::commands::command_player;
use crate::models::scoresaber_models::PlayerScore;
use crate::services::scoresaber::ScoreSort;
use super::parse_index;

pub const SCORES_PER_PAGE: i32 = 8;

pub fn score_line(position: i32, score: &PlayerScore) -> String {
    let leaderboard = &score.leaderboard;
    let mut line = format!("{}. {} ({})", position, util::bold(&leaderboard.full_song_name()), leaderboard.difficulty_name());

    let mut details = vec![format!("#{}", score.score.rank)];
    let accuracy = score.accuracy_string();
    if !accuracy.is_empty() {
        details.push(accuracy);
    }
    if score.score.pp > 0.0 {
        details.push(format!("{} {}", score.pp_string(), score.weighted_pp_string()));
    }

    line += "\n";
    line += &details.join(" | ");
    line
}

async fn send_scores(ctx: BotContext<'_>, arguments: Option<String>, sort: ScoreSort) -> Result<(), Error> {
    let page = match parse_index(arguments.as_deref()) {
        Ok(page) => page,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    let Some(player) = command_player(ctx, arguments.as_deref()).await? else {
        return Ok(());
    };

    let scoresaber = scoresaber!(ctx);
    let scores = scoresaber.get_scores(&player.player_id, sort, page, SCORES_PER_PAGE).await?;
    if scores.is_empty() {
        ctx.say(format!("No scores found on page {page}.")).await?;
        return Ok(());
    }

    let first = (page - 1) * SCORES_PER_PAGE + 1;
    let description = scores.iter()
        .enumerate()
        .map(|(i, o)| score_line(first + i as i32, o))
        .collect::<Vec<_>>()
        .join("\n\n");

    let title = match sort {
        ScoreSort::Recent => format!("Recent songs of {}", player.name),
        ScoreSort::Top => format!("Top songs of {}", player.name)
    };

    ctx.send(CreateReply::default().embed(CreateEmbed::new()
        .title(title)
        .url(player.profile_url())
        .description(description)
        .footer(CreateEmbedFooter::new(format!("Page {page}")))
    )).await?;

    Ok(())
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Scores",
    description_localized("en-US", "Lists recent plays, eight per page.")
)]
pub async fn recentsongs(
    ctx: BotContext<'_>,
    #[description = "Page number, and/or a mentioned user"] #[rest] arguments: Option<String>)
-> Result<(), Error> {
    send_scores(ctx, arguments, ScoreSort::Recent).await
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Scores",
    description_localized("en-US", "Lists the plays worth the most pp, eight per page.")
)]
pub async fn topsongs(
    ctx: BotContext<'_>,
    #[description = "Page number, and/or a mentioned user"] #[rest] arguments: Option<String>)
-> Result<(), Error> {
    send_scores(ctx, arguments, ScoreSort::Top).await
}

pub const TOPSONG_HINT: &str = "Try \"ru topsongs\" to see your top plays! ✨";

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Scores",
    description_localized("en-US", "Points at topsongs.")
)]
pub async fn topsong(ctx: BotContext<'_>) -> Result<(), Error> {
    ctx.say(TOPSONG_HINT).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_include_rank_accuracy_and_pp() {
        let score: PlayerScore = serde_json::from_value(serde_json::json!({
            "score": {
                "rank": 3, "baseScore": 450, "modifiedScore": 450, "pp": 100.0, "weight": 1.0,
                "timeSet": "2023-01-01T10:00:00.000Z"
            },
            "leaderboard": {
                "id": 1, "songHash": "A", "songName": "Song", "songSubName": "Remix",
                "difficulty": { "difficulty": 7, "difficultyRaw": "_Expert_SoloStandard" },
                "maxScore": 500, "ranked": true, "stars": 5.0, "coverImage": "", "rankedDate": null
            }
        })).unwrap();

        assert_eq!(score_line(9, &score), "9. **Song Remix** (Expert)\n#3 | 90.00% | 100.00PP (100.00PP)");
    }
}
