pub mod bot_init;
pub mod database;
pub mod player_db;
pub mod skill_db;
pub mod message_handler;
pub mod discord_logger;
pub mod scoresaber;
pub mod beatsaver;
pub mod ranked_maps;
pub mod roles;
pub mod charts;
pub mod player_refresh;
