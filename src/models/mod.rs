pub mod macros;
pub mod config;
pub mod player;
pub mod scoresaber_models;
pub mod beatsaver_models;
pub mod playlist;
