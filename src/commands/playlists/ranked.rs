use crate::{BotContext, Error, botconfig, shared, util};
use crate::models::playlist::Playlist;
use crate::services::ranked_maps::RankedMaps;
use super::send_playlist;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankedRequest {
    MostRecent(usize),
    StarRange(f64, f64)
}

pub fn parse_ranked_arguments(arguments: Option<&str>) -> Result<RankedRequest, &'static str> {
    let values: Vec<&str> = arguments.unwrap_or_default().split_whitespace().collect();
    match values.as_slice() {
        [] => Err("Please provide at least one parameter."),
        [count] => count.parse::<usize>()
            .map(RankedRequest::MostRecent)
            .map_err(|_| "The entered value has to be an integer."),
        [min, max] => {
            let (Some(min), Some(max)) = (util::parse_decimal(min), util::parse_decimal(max)) else {
                return Err("At least one of the entered values is not a number.");
            };

            if max < min {
                return Err("The min value has to be smaller than the max value.");
            }

            Ok(RankedRequest::StarRange(min, max))
        }
        _ => Err("Invalid number of parameters.")
    }
}

pub fn playlist_title(request: RankedRequest) -> String {
    match request {
        RankedRequest::MostRecent(count) => format!("Recently ranked {count}"),
        RankedRequest::StarRange(min, max) => format!("Ranked {min}-{max} stars")
    }
}

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "Playlists",
    description_localized("en-US", "Ranked maps playlist: the n newest ranked maps, or every map between two star values.")
)]
pub async fn ranked(
    ctx: BotContext<'_>,
    #[description = "A count, or a min and max star value"] #[rest] arguments: Option<String>)
-> Result<(), Error> {
    let request = match parse_ranked_arguments(arguments.as_deref()) {
        Ok(request) => request,
        Err(message) => {
            ctx.say(message).await?;
            return Ok(());
        }
    };

    let cache = shared!(ctx.serenity_context(), RankedMaps);
    let ranked = cache.read().await;
    if !ranked.is_loaded() {
        ctx.say("Ranked maps are not available right now, try again later.").await?;
        return Ok(());
    }

    let maps = match request {
        RankedRequest::MostRecent(count) => ranked.most_recent(count),
        RankedRequest::StarRange(min, max) => ranked.in_star_range(min, max)
    };

    if maps.is_empty() {
        ctx.say("No ranked maps match that request.").await?;
        return Ok(());
    }

    let config = botconfig!(ctx);
    let mut playlist = Playlist::new(&playlist_title(request), &config.playlist_image);
    for map in &maps {
        playlist.add_leaderboard(map);
    }

    let message = format!("{} ranked difficulties across {} songs.", maps.len(), playlist.songs.len());
    send_playlist(ctx, &playlist, &message).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_is_a_count() {
        assert_eq!(parse_ranked_arguments(Some("25")), Ok(RankedRequest::MostRecent(25)));
        assert_eq!(parse_ranked_arguments(Some("2.5")), Err("The entered value has to be an integer."));
    }

    #[test]
    fn two_values_are_a_star_range() {
        assert_eq!(parse_ranked_arguments(Some("7,5 9")), Ok(RankedRequest::StarRange(7.5, 9.0)));
        assert_eq!(parse_ranked_arguments(Some("8 8")), Ok(RankedRequest::StarRange(8.0, 8.0)));
        assert_eq!(parse_ranked_arguments(Some("9 7")), Err("The min value has to be smaller than the max value."));
        assert_eq!(parse_ranked_arguments(Some("a 7")), Err("At least one of the entered values is not a number."));
    }

    #[test]
    fn other_shapes_are_rejected() {
        assert_eq!(parse_ranked_arguments(None), Err("Please provide at least one parameter."));
        assert_eq!(parse_ranked_arguments(Some("1 2 3")), Err("Invalid number of parameters."));
    }

    #[test]
    fn titles_describe_the_request() {
        assert_eq!(playlist_title(RankedRequest::MostRecent(10)), "Recently ranked 10");
        assert_eq!(playlist_title(RankedRequest::StarRange(7.5, 9.0)), "Ranked 7.5-9 stars");
    }
}
