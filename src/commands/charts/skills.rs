use tracing::error;

use crate::{BotContext, Error, botdb};
use crate::commands::command_player;
use crate::models::player::Skill;
use crate::services::charts;
use super::send_chart;

pub fn parse_skill_value(value: &str) -> Result<i32, String> {
    match value.trim().parse::<i32>() {
        Ok(value) if (0..=Skill::MAX_VALUE).contains(&value) => Ok(value),
        _ => Err(format!("The value has to be a whole number between 0 and {}.", Skill::MAX_VALUE))
    }
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Charts",
    description_localized("en-US", "Shows a player's self-rated skills as a radar chart.")
)]
pub async fn stand(
    ctx: BotContext<'_>,
    #[description = "A mentioned user, or nothing for yourself"] #[rest] player: Option<String>)
-> Result<(), Error> {
    let Some(player) = command_player(ctx, player.as_deref()).await? else {
        return Ok(());
    };

    let db = botdb!(ctx);
    let skills = db.get_skills(player.discord_user_id).await?;
    if skills.is_empty() {
        ctx.say("No skill has been set yet. Try \"ru help\".").await?;
        return Ok(());
    }

    send_chart(ctx, charts::skills_radar_chart(&player.name, &skills)).await
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Charts",
    description_localized("en-US", "Rates one of your skills from 0 to 10 (accuracy, speed, stamina, tech, reading).")
)]
pub async fn setskill(
    ctx: BotContext<'_>,
    #[description = "accuracy, speed, stamina, tech or reading"] skill: String,
    #[description = "A value from 0 to 10"] value: String)
-> Result<(), Error> {
    let skill = match skill.parse::<Skill>() {
        Ok(skill) => skill,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    let value = match parse_skill_value(&value) {
        Ok(value) => value,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    let db = botdb!(ctx);
    if db.get_player_by_discord_id(ctx.author().id).await?.is_none() {
        ctx.say("You are not registered yet. Try \"ru register <ScoreSaber URL>\".").await?;
        return Ok(());
    }

    if let Err(ex) = db.set_skill(ctx.author().id, skill, value).await {
        error!("Failed to store skill for {}: {}", ctx.author().id, ex);
        ctx.say("Could not save your skill right now... try again later?").await?;
        return Ok(());
    }

    ctx.say(format!("{} set to {}/{}.", skill, value, Skill::MAX_VALUE)).await?;
    Ok(())
}
