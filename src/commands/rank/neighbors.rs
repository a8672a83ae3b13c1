use tracing::debug;

use crate::Error;
use crate::models::scoresaber_models::ScoreSaberPlayer;
use crate::services::scoresaber::{LeaderboardPages, USER_PRE_URL};
use crate::util;

pub const DACH_COUNTRIES: &str = "de,at,ch";
const NEIGHBOURS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderboardType {
    Global,
    Local,
    Dach
}

impl LeaderboardType {
    pub fn title(&self) -> &'static str {
        match self {
            LeaderboardType::Global => "Global leaderboard",
            LeaderboardType::Local => "Local leaderboard",
            LeaderboardType::Dach => "Leaderboard for Germany, Austria & Switzerland"
        }
    }

    pub fn size_limit(&self) -> usize {
        match self {
            LeaderboardType::Global | LeaderboardType::Local => 200,
            LeaderboardType::Dach => 10000
        }
    }
}

/// A slice of the rankings with the requested player somewhere in it.
#[derive(Debug, Clone)]
pub struct LeaderboardWindow {
    pub entries: Vec<ScoreSaberPlayer>,
    pub player_index: usize
}

impl LeaderboardWindow {
    pub fn player(&self) -> &ScoreSaberPlayer {
        &self.entries[self.player_index]
    }

    /// Up to two entries on either side of the player, plus the player.
    pub fn around_player(&self) -> &[ScoreSaberPlayer] {
        let start = self.player_index.saturating_sub(NEIGHBOURS);
        let end = (self.player_index + NEIGHBOURS + 1).min(self.entries.len());
        &self.entries[start..end]
    }
}

/// Walks the rankings from `start_page` until the player shows up with two entries after them,
/// a page comes back empty, or `size_limit` entries have been collected.
pub async fn find_entries_around_player<S: LeaderboardPages + Sync>(source: &S, player_id: &str, countries: Option<&str>, start_page: i32, size_limit: usize) -> Result<Option<LeaderboardWindow>, Error> {
    let mut entries: Vec<ScoreSaberPlayer> = Vec::new();
    let mut page = start_page.max(1);

    loop {
        let players = source.players_page(page, countries).await?;
        debug!("Fetched rankings page {} ({} entries)", page, players.len());
        if players.is_empty() {
            break;
        }

        entries.extend(players);
        if let Some(index) = entries.iter().position(|o| o.id == player_id) {
            if index + NEIGHBOURS < entries.len() {
                break;
            }
        }

        if entries.len() >= size_limit {
            break;
        }
        page += 1;
    }

    Ok(entries.iter()
        .position(|o| o.id == player_id)
        .map(|player_index| LeaderboardWindow { entries, player_index }))
}

pub fn entry_rank(entry: &ScoreSaberPlayer, index: usize, kind: LeaderboardType) -> i32 {
    match kind {
        LeaderboardType::Global => entry.rank,
        LeaderboardType::Local => entry.country_rank,
        LeaderboardType::Dach => index as i32 + 1
    }
}

/// One block of the neighbour list. `own_pp` is `None` for the requesting player's own entry.
pub fn format_entry(entry: &ScoreSaberPlayer, rank: i32, own_pp: Option<f64>, kind: LeaderboardType) -> String {
    let country = entry.country.to_uppercase();
    let mut out = format!("#{rank}");
    if kind == LeaderboardType::Local {
        out += &format!(" in {} {}\n", country, util::flag(&country));
    } else {
        out += &format!("\nFrom {} {}\n", country, util::flag(&country));
    }

    let name = util::link(&entry.name, &format!("{}{}", USER_PRE_URL, entry.id));
    match own_pp {
        Some(own_pp) => {
            out += &util::bold(&name);
            out += "\n";
            out += &util::format_pp_difference(entry.pp, own_pp);
        }
        None => {
            out += &util::bold(&format!("{name} (You)"));
            out += &format!("\nYour PP: {}pp", util::decimal(entry.pp));
        }
    }

    out + "\n" + util::SEPARATOR + "\n"
}

pub fn format_window(window: &LeaderboardWindow, kind: LeaderboardType) -> String {
    let own_pp = window.player().pp;
    let start = window.player_index.saturating_sub(NEIGHBOURS);

    let mut out = format!("{}\n", util::SEPARATOR);
    for (offset, entry) in window.around_player().iter().enumerate() {
        let index = start + offset;
        let rank = entry_rank(entry, index, kind);
        let pp = if index == window.player_index { None } else { Some(own_pp) };
        out += &format_entry(entry, rank, pp, kind);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FakeRankings {
        players: Vec<ScoreSaberPlayer>,
        requested: Mutex<Vec<i32>>
    }

    impl FakeRankings {
        fn with_players(count: usize) -> FakeRankings {
            let players = (1..=count)
                .map(|i| ScoreSaberPlayer {
                    id: i.to_string(),
                    name: format!("player{i}"),
                    profile_picture: None,
                    country: if i % 2 == 0 { "de".to_string() } else { "at".to_string() },
                    pp: 20000.0 - i as f64 * 10.0,
                    rank: i as i32,
                    country_rank: (i as i32 + 1) / 2,
                    histories: String::new(),
                    inactive: false
                })
                .collect();

            FakeRankings { players, requested: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl LeaderboardPages for FakeRankings {
        async fn players_page(&self, page: i32, _countries: Option<&str>) -> Result<Vec<ScoreSaberPlayer>, Error> {
            self.requested.lock().unwrap().push(page);
            let start = (page as usize - 1) * 50;
            Ok(self.players.iter().skip(start).take(50).cloned().collect())
        }
    }

    #[tokio::test]
    async fn finds_player_with_two_entries_after() {
        let rankings = FakeRankings::with_players(200);
        let window = find_entries_around_player(&rankings, "75", None, util::page_from_rank(73), 200)
            .await.unwrap().unwrap();

        assert_eq!(window.player().id, "75");
        assert_eq!(*rankings.requested.lock().unwrap(), vec![2]);
        let ids: Vec<&str> = window.around_player().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["73", "74", "75", "76", "77"]);
    }

    #[tokio::test]
    async fn fetches_the_next_page_when_player_is_at_the_end() {
        let rankings = FakeRankings::with_players(200);
        let window = find_entries_around_player(&rankings, "50", None, util::page_from_rank(48), 200)
            .await.unwrap().unwrap();

        assert_eq!(*rankings.requested.lock().unwrap(), vec![1, 2]);
        assert_eq!(window.around_player().len(), 5);
    }

    #[tokio::test]
    async fn last_player_has_no_entries_below() {
        let rankings = FakeRankings::with_players(60);
        let window = find_entries_around_player(&rankings, "60", None, 2, 200)
            .await.unwrap().unwrap();

        assert_eq!(*rankings.requested.lock().unwrap(), vec![2, 3]);
        let ids: Vec<&str> = window.around_player().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["58", "59", "60"]);
    }

    #[tokio::test]
    async fn first_player_has_no_entries_above() {
        let rankings = FakeRankings::with_players(100);
        let window = find_entries_around_player(&rankings, "1", None, 1, 200)
            .await.unwrap().unwrap();

        let ids: Vec<&str> = window.around_player().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn stops_at_the_size_limit() {
        let rankings = FakeRankings::with_players(1000);
        let window = find_entries_around_player(&rankings, "900", None, 1, 200).await.unwrap();

        assert!(window.is_none());
        assert_eq!(*rankings.requested.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn dach_rank_is_position_in_the_list() {
        let rankings = FakeRankings::with_players(3);
        let entry = &rankings.players[2];
        assert_eq!(entry_rank(entry, 2, LeaderboardType::Dach), 3);
        assert_eq!(entry_rank(entry, 2, LeaderboardType::Global), 3);
        assert_eq!(entry_rank(entry, 2, LeaderboardType::Local), 2);
    }

    #[test]
    fn entries_show_country_and_pp_difference() {
        let rankings = FakeRankings::with_players(2);
        let entry = &rankings.players[1];

        let local = format_entry(entry, 1, Some(19990.0), LeaderboardType::Local);
        assert!(local.starts_with("#1 in DE :flag_de:\n"));
        assert!(local.contains("**[player2](https://scoresaber.com/u/2)**\n"));
        assert!(local.contains("10.00pp less than you."));

        let own = format_entry(entry, 2, None, LeaderboardType::Global);
        assert!(own.starts_with("#2\nFrom DE :flag_de:\n"));
        assert!(own.contains("(You)**"));
        assert!(own.contains("Your PP: 19980.00pp"));
    }

    #[test]
    fn window_marks_only_the_player() {
        let rankings = FakeRankings::with_players(5);
        let window = LeaderboardWindow { entries: rankings.players.clone(), player_index: 2 };
        let message = format_window(&window, LeaderboardType::Global);

        assert_eq!(message.matches("(You)").count(), 1);
        assert_eq!(message.matches("more than you.").count(), 2);
        assert_eq!(message.matches("less than you.").count(), 2);
        assert!(message.starts_with(util::SEPARATOR));
    }
}
