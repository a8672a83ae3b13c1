mod recent;
mod list;

pub use recent::*;
pub use list::*;

pub const MAX_SCORE_INDEX: i32 = 100;

/// The first numeric argument, if any. Mentions and links are left for player lookup.
pub fn parse_index(argument: Option<&str>) -> Result<i32, String> {
    let Some(first) = argument.and_then(|o| o.split_whitespace().next()) else {
        return Ok(1);
    };

    if !first.chars().all(|c| c.is_ascii_digit() || c == '-') {
        return Ok(1);
    }

    match first.parse::<i32>() {
        Ok(index) if (1..=MAX_SCORE_INDEX).contains(&index) => Ok(index),
        _ => Err(format!("The index has to be a number between 1 and {MAX_SCORE_INDEX}."))
    }
}

pub fn leaderboard_page_url(leaderboard_id: i64) -> String {
    format!("https://scoresaber.com/leaderboard/{leaderboard_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_defaults_to_the_first_score() {
        assert_eq!(parse_index(None), Ok(1));
        assert_eq!(parse_index(Some("<@1234>")), Ok(1));
        assert_eq!(parse_index(Some("https://scoresaber.com/u/1")), Ok(1));
    }

    #[test]
    fn index_is_read_before_the_mention() {
        assert_eq!(parse_index(Some("4 <@1234>")), Ok(4));
        assert_eq!(parse_index(Some("100")), Ok(100));
    }

    #[test]
    fn index_out_of_range_is_rejected() {
        assert!(parse_index(Some("0")).is_err());
        assert!(parse_index(Some("-3")).is_err());
        assert!(parse_index(Some("101")).is_err());
        assert!(parse_index(Some("99999999999")).is_err());
    }
}
