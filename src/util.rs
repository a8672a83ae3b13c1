use chrono::{DateTime, Utc};
use regex::Regex;
use poise::serenity_prelude::http::StatusCode;
use std::sync::OnceLock;

pub const SEPARATOR: &str = "**------------------------------------**";
pub const LEADERBOARD_PAGE_SIZE: i32 = 50;
pub const PLAYER_LEADERBOARDS_URL: &str = "https://scoresaber.com/rankings?page=";

pub fn bold(text: &str) -> String {
    format!("**{text}**")
}

pub fn underline(text: &str) -> String {
    format!("__{text}__")
}

pub fn link(text: &str, url: &str) -> String {
    format!("[{text}]({url})")
}

pub fn code(text: &str) -> String {
    format!("```\n{text}\n```")
}

pub fn decimal(value: f64) -> String {
    format!("{value:.2}")
}

/// Leaderboard pages hold 50 players; ranks at or below zero map to the first page.
pub fn page_from_rank(rank: i32) -> i32 {
    if rank <= 0 {
        return 1;
    }

    let mut page = rank / LEADERBOARD_PAGE_SIZE;
    if rank % LEADERBOARD_PAGE_SIZE != 0 {
        page += 1;
    }

    page
}

pub fn format_pp_difference(other_pp: f64, own_pp: f64) -> String {
    let diff = other_pp - own_pp;
    if diff > 0.0 {
        format!("{}pp more than you.", decimal(diff))
    } else {
        format!("{}pp less than you.", decimal(-diff))
    }
}

pub fn leaderboard_url(page: i32, country_codes: Option<&str>) -> String {
    let mut url = format!("{PLAYER_LEADERBOARDS_URL}{page}");
    if let Some(codes) = country_codes {
        url += &format!("&countries={codes}");
    }

    url
}

pub fn flag(country: &str) -> String {
    format!(":flag_{}:", country.to_lowercase())
}

fn scoresaber_id_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"scoresaber\.com/u/(\d+)").expect("invalid ScoreSaber id regex"))
}

pub fn scoresaber_id_from_url(url: &str) -> Option<String> {
    scoresaber_id_regex()
        .captures(url)
        .and_then(|o| o.get(1))
        .map(|o| o.as_str().to_string())
}

pub fn is_url(text: &str) -> bool {
    reqwest::Url::parse(text)
        .map(|o| matches!(o.scheme(), "http" | "https") && o.host_str().is_some())
        .unwrap_or(false)
}

pub fn is_image_url(text: &str) -> bool {
    let lower = text.to_lowercase();
    is_url(text) && [".jpeg", ".jpg", ".png"].iter().any(|o| lower.contains(o))
}

// Accepts <@123>, <@!123> or a bare id.
pub fn parse_user_mention(text: &str) -> Option<u64> {
    if !text.contains('@') {
        return None;
    }

    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().ok().filter(|o| *o != 0)
}

pub fn parse_decimal(text: &str) -> Option<f64> {
    text.trim().replace(',', ".").parse::<f64>().ok().filter(|o| o.is_finite())
}

pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 0 {
        return "just now".to_string();
    }

    let units = [
        (60 * 60 * 24 * 365, "year"),
        (60 * 60 * 24 * 30, "month"),
        (60 * 60 * 24 * 7, "week"),
        (60 * 60 * 24, "day"),
        (60 * 60, "hour"),
        (60, "minute")
    ];

    for (size, name) in units {
        let amount = seconds / size;
        if amount >= 1 {
            let plural = if amount == 1 { "" } else { "s" };
            return format!("{amount} {name}{plural} ago");
        }
    }

    "moments ago".to_string()
}

/// True when Discord answered 404, e.g. for a member who is no longer in the guild.
pub fn is_not_found(error: &serenity::Error) -> bool {
    match error {
        serenity::Error::Http(ex) => ex.status_code() == Some(StatusCode::NOT_FOUND),
        _ => false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn page_from_rank_boundaries() {
        assert_eq!(page_from_rank(-5), 1);
        assert_eq!(page_from_rank(0), 1);
        assert_eq!(page_from_rank(1), 1);
        assert_eq!(page_from_rank(50), 1);
        assert_eq!(page_from_rank(51), 2);
        assert_eq!(page_from_rank(100), 2);
        assert_eq!(page_from_rank(101), 3);
    }

    #[test]
    fn pp_difference_wording() {
        assert_eq!(format_pp_difference(110.5, 100.0), "10.50pp more than you.");
        assert_eq!(format_pp_difference(90.0, 100.25), "10.25pp less than you.");
        assert_eq!(format_pp_difference(100.0, 100.0), "0.00pp less than you.");
    }

    #[test]
    fn leaderboard_urls() {
        assert_eq!(leaderboard_url(3, None), "https://scoresaber.com/rankings?page=3");
        assert_eq!(leaderboard_url(1, Some("de,at,ch")), "https://scoresaber.com/rankings?page=1&countries=de,at,ch");
    }

    #[test]
    fn scoresaber_ids_come_from_profile_links() {
        assert_eq!(scoresaber_id_from_url("https://scoresaber.com/u/76561198000000000?page=2").as_deref(), Some("76561198000000000"));
        assert_eq!(scoresaber_id_from_url("https://scoresaber.com/leaderboard/1234"), None);
    }

    #[test]
    fn image_urls_need_an_image_extension() {
        assert!(is_image_url("https://i.imgur.com/grid.PNG"));
        assert!(is_image_url("https://cdn.example.com/a.jpeg?size=2"));
        assert!(!is_image_url("https://example.com/grid.gif"));
        assert!(!is_image_url("grid.png"));
    }

    #[test]
    fn mentions_are_parsed() {
        assert_eq!(parse_user_mention("<@!1234>"), Some(1234));
        assert_eq!(parse_user_mention("<@1234>"), Some(1234));
        assert_eq!(parse_user_mention("1234"), None);
        assert_eq!(parse_user_mention("@everyone"), None);
    }

    #[test]
    fn decimals_accept_commas() {
        assert_eq!(parse_decimal("7,5"), Some(7.5));
        assert_eq!(parse_decimal(" 9 "), Some(9.0));
        assert_eq!(parse_decimal("nine"), None);
        assert_eq!(parse_decimal("NaN"), None);
    }

    #[test]
    fn relative_times() {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::seconds(20), now), "moments ago");
        assert_eq!(relative_time(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(relative_time(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(relative_time(now - Duration::days(15), now), "2 weeks ago");
        assert_eq!(relative_time(now + Duration::hours(1), now), "just now");
    }

    #[test]
    fn only_http_404s_count_as_not_found() {
        assert!(!is_not_found(&serenity::Error::Other("gateway closed")));
        assert!(!is_not_found(&serenity::Error::Url("https://discord.com".to_string())));
    }
}
