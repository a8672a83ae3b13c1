use poise::CreateReply;
use serenity::all::CreateEmbed;
use sysinfo::{ProcessExt, System, SystemExt};

use crate::{BotContext, Error, botdb, shared};
use crate::services::ranked_maps::RankedMaps;

fn megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
}

fn process_memory() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut sys = System::new();
    sys.refresh_process(pid);
    sys.process(pid).map(|o| o.memory())
}

#[poise::command(
    prefix_command,
    owners_only,
    hide_in_help,
    category = "Admin",
    discard_spare_arguments
)]
pub async fn stats(ctx: BotContext<'_>) -> Result<(), Error> {
    let db = botdb!(ctx);
    let players = db.count_players().await?;
    let guilds = ctx.cache().guild_count();
    let members: u64 = ctx.cache().guilds().into_iter()
        .filter_map(|o| ctx.cache().guild(o).map(|g| g.member_count))
        .sum();
    let ranked = shared!(ctx.serenity_context(), RankedMaps).read().await.len();

    let mut sys = System::new();
    sys.refresh_memory();
    let memory = process_memory().map(megabytes).unwrap_or_else(|| "<unknown>".to_string());

    ctx.send(CreateReply::default().embed(CreateEmbed::new()
        .title("Stats")
        .field("Version", env!("CARGO_PKG_VERSION"), true)
        .field("Guilds", guilds.to_string(), true)
        .field("Members", members.to_string(), true)
        .field("Registered players", players.to_string(), true)
        .field("Cached ranked maps", ranked.to_string(), true)
        .field("Bot memory", memory, true)
        .field("System memory", format!("{} / {}", megabytes(sys.used_memory()), megabytes(sys.total_memory())), true)
    )).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_is_shown_in_megabytes() {
        assert_eq!(megabytes(0), "0.0 MB");
        assert_eq!(megabytes(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
    }
}
