use serenity::model::id::UserId;
use tiberius::Row;

use crate::Error;
use crate::models::player::Player;
use crate::services::database::{Database, from_decimal, to_decimal};

const PLAYER_COLUMNS: &str = "player_id, name, discord_user_id, rank, country_rank, country, pp, custom_acc_grid_image";

// ScoreSaber data only; the grid image belongs to set_grid_image.
const UPDATE_PLAYER: &str = "UPDATE [BeatSaber].[Player] SET player_id = @P2, name = @P3, rank = @P4, country_rank = @P5, country = @P6, pp = @P7 WHERE discord_user_id = @P1;";

fn read_player(row: &Row) -> Player {
    let player_id: Option<&str> = row.get(0);
    let name: Option<&str> = row.get(1);
    let country: Option<&str> = row.get(5);
    let grid_image: Option<&str> = row.get(7);

    Player {
        player_id: player_id.unwrap_or_default().to_string(),
        name: name.unwrap_or_default().to_string(),
        discord_user_id: UserId::new(from_decimal(row.get(2)).max(1)),
        rank: row.get(3).unwrap_or_default(),
        country_rank: row.get(4).unwrap_or_default(),
        country: country.unwrap_or_default().to_string(),
        pp: row.get(6).unwrap_or_default(),
        custom_acc_grid_image: grid_image.map(|o| o.to_string())
    }
}

impl Database {
    // Registering again replaces the old record of that Discord user.
    pub async fn add_player(&self, player: &Player) -> Result<(), Error> {
        let mut conn = self.pool.get().await?;
        let discord_id = to_decimal(player.discord_user_id.get());
        conn.execute(
            "UPDATE [BeatSaber].[Player] SET player_id = @P2, name = @P3, rank = @P4, country_rank = @P5, country = @P6, pp = @P7 WHERE discord_user_id = @P1;
             IF @@ROWCOUNT = 0
                 INSERT INTO [BeatSaber].[Player] (discord_user_id, player_id, name, rank, country_rank, country, pp) VALUES (@P1, @P2, @P3, @P4, @P5, @P6, @P7);",
            &[&discord_id, &player.player_id, &player.name, &player.rank, &player.country_rank, &player.country, &player.pp])
            .await?;

        Ok(())
    }

    pub async fn update_player(&self, player: &Player) -> Result<bool, Error> {
        let mut conn = self.pool.get().await?;
        let discord_id = to_decimal(player.discord_user_id.get());
        let res = conn.execute(
            UPDATE_PLAYER,
            &[&discord_id, &player.player_id, &player.name, &player.rank, &player.country_rank, &player.country, &player.pp])
            .await?;

        Ok(res.total() > 0)
    }

    pub async fn get_player_by_discord_id(&self, user_id: UserId) -> Result<Option<Player>, Error> {
        let mut conn = self.pool.get().await?;
        let discord_id = to_decimal(user_id.get());
        let res = conn.query(
            format!("SELECT {PLAYER_COLUMNS} FROM [BeatSaber].[Player] WHERE discord_user_id = @P1;"),
            &[&discord_id])
            .await?
            .into_row()
            .await?;

        Ok(res.map(|row| read_player(&row)))
    }

    pub async fn get_player_by_player_id(&self, player_id: &str) -> Result<Option<Player>, Error> {
        let mut conn = self.pool.get().await?;
        let res = conn.query(
            format!("SELECT {PLAYER_COLUMNS} FROM [BeatSaber].[Player] WHERE player_id = @P1;"),
            &[&player_id])
            .await?
            .into_row()
            .await?;

        Ok(res.map(|row| read_player(&row)))
    }

    pub async fn get_all_players(&self) -> Result<Vec<Player>, Error> {
        let mut conn = self.pool.get().await?;
        let res = conn.query(
            format!("SELECT {PLAYER_COLUMNS} FROM [BeatSaber].[Player] ORDER BY CASE WHEN rank = 0 THEN 1 ELSE 0 END, rank;"),
            &[])
            .await?
            .into_first_result()
            .await?;

        Ok(res.iter().map(read_player).collect())
    }

    pub async fn delete_player_by_discord_id(&self, user_id: UserId) -> Result<bool, Error> {
        let mut conn = self.pool.get().await?;
        let discord_id = to_decimal(user_id.get());
        let res = conn.execute(
            "DELETE FROM [BeatSaber].[Skill] WHERE discord_user_id = @P1; DELETE FROM [BeatSaber].[Player] WHERE discord_user_id = @P1;",
            &[&discord_id])
            .await?;

        Ok(res.rows_affected().last().copied().unwrap_or_default() > 0)
    }

    pub async fn set_grid_image(&self, user_id: UserId, url: Option<&str>) -> Result<bool, Error> {
        let mut conn = self.pool.get().await?;
        let discord_id = to_decimal(user_id.get());
        let res = conn.execute(
            "UPDATE [BeatSaber].[Player] SET custom_acc_grid_image = @P2 WHERE discord_user_id = @P1;",
            &[&discord_id, &url])
            .await?;

        Ok(res.total() > 0)
    }

    pub async fn count_players(&self) -> Result<i32, Error> {
        let mut conn = self.pool.get().await?;
        let res = conn.query("SELECT COUNT(*) FROM [BeatSaber].[Player];", &[])
            .await?
            .into_row()
            .await?;

        Ok(res.and_then(|row| row.get::<i32, _>(0)).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_never_touch_the_grid_image() {
        assert!(!UPDATE_PLAYER.contains("custom_acc_grid_image"));
        assert!(UPDATE_PLAYER.contains("WHERE discord_user_id = @P1"));
        assert!(UPDATE_PLAYER.contains("@P7"));
        assert!(!UPDATE_PLAYER.contains("@P8"));
    }
}
