use std::fmt;
use std::str::FromStr;
use num_derive::{FromPrimitive, ToPrimitive};
use serenity::model::id::UserId;

use crate::models::scoresaber_models::ScoreSaberPlayer;

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub player_id: String,
    pub name: String,
    pub discord_user_id: UserId,
    pub rank: i32,
    pub country_rank: i32,
    pub country: String,
    pub pp: f64,
    pub custom_acc_grid_image: Option<String>
}

impl Player {
    pub fn from_scoresaber(player: &ScoreSaberPlayer, discord_user_id: UserId) -> Player {
        Player {
            player_id: player.id.clone(),
            name: player.name.clone(),
            discord_user_id,
            rank: player.rank,
            country_rank: player.country_rank,
            country: player.country.to_uppercase(),
            pp: player.pp,
            custom_acc_grid_image: None
        }
    }

    // Fresh ScoreSaber data, but keep what only we know about.
    pub fn refreshed(&self, player: &ScoreSaberPlayer) -> Player {
        let mut out = Player::from_scoresaber(player, self.discord_user_id);
        out.custom_acc_grid_image = self.custom_acc_grid_image.clone();
        out
    }

    pub fn profile_url(&self) -> String {
        format!("{}{}", crate::services::scoresaber::USER_PRE_URL, self.player_id)
    }

    pub fn is_dach(&self) -> bool {
        matches!(self.country.to_lowercase().as_str(), "de" | "at" | "ch")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Skill {
    Accuracy = 1,
    Speed = 2,
    Stamina = 3,
    Tech = 4,
    Reading = 5
}

impl Skill {
    pub const ALL: [Skill; 5] = [Skill::Accuracy, Skill::Speed, Skill::Stamina, Skill::Tech, Skill::Reading];
    pub const MAX_VALUE: i32 = 10;

    pub fn name(&self) -> &'static str {
        match self {
            Skill::Accuracy => "Accuracy",
            Skill::Speed => "Speed",
            Skill::Stamina => "Stamina",
            Skill::Tech => "Tech",
            Skill::Reading => "Reading"
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Skill {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "acc" | "accuracy" => Ok(Skill::Accuracy),
            "speed" => Ok(Skill::Speed),
            "stamina" => Ok(Skill::Stamina),
            "tech" => Ok(Skill::Tech),
            "reading" | "vision" => Ok(Skill::Reading),
            other => Err(format!("\"{other}\" is not a skill. Try one of: accuracy, speed, stamina, tech, reading."))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skills {
    pub discord_user_id: u64,
    pub ratings: Vec<(Skill, i32)>
}

impl Skills {
    pub fn get(&self, skill: Skill) -> i32 {
        self.ratings.iter()
            .find(|(s, _)| *s == skill)
            .map(|(_, value)| *value)
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
