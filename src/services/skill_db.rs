use num_traits::{FromPrimitive, ToPrimitive};
use serenity::model::id::UserId;

use crate::Error;
use crate::models::player::{Skill, Skills};
use crate::services::database::{Database, to_decimal};

impl Database {
    pub async fn get_skills(&self, user_id: UserId) -> Result<Skills, Error> {
        let mut conn = self.pool.get().await?;
        let discord_id = to_decimal(user_id.get());
        let res = conn.query(
            "SELECT skill_id, value FROM [BeatSaber].[Skill] WHERE discord_user_id = @P1 ORDER BY skill_id;",
            &[&discord_id])
            .await?
            .into_first_result()
            .await?;

        let ratings = res.into_iter()
            .filter_map(|row| {
                let skill = row.get::<i32, _>(0).and_then(Skill::from_i32)?;
                let value: i32 = row.get(1).unwrap_or_default();
                Some((skill, value))
            })
            .collect();

        Ok(Skills { discord_user_id: user_id.get(), ratings })
    }

    pub async fn set_skill(&self, user_id: UserId, skill: Skill, value: i32) -> Result<(), Error> {
        let mut conn = self.pool.get().await?;
        let discord_id = to_decimal(user_id.get());
        let skill_id = skill.to_i32().ok_or("Invalid skill id")?;
        conn.execute(
            "UPDATE [BeatSaber].[Skill] SET value = @P3 WHERE discord_user_id = @P1 AND skill_id = @P2;
             IF @@ROWCOUNT = 0
                 INSERT INTO [BeatSaber].[Skill] (discord_user_id, skill_id, value) VALUES (@P1, @P2, @P3);",
            &[&discord_id, &skill_id, &value])
            .await?;

        Ok(())
    }
}
