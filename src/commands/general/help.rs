use poise::{Command, CreateReply};
use serenity::all::CreateEmbed;

use crate::{BotContext, Error};

#[poise::command(
    prefix_command,
    slash_command,
    guild_only,
    category = "General",
    description_localized("en-US", "Display the list of commands available, as well as their descriptions.")
)]
pub async fn help(
    ctx: BotContext<'_>,
    #[description = "The command requested for help"]
    #[autocomplete = "poise::builtins::autocomplete_command"]
    #[rest] command: Option<String>
) -> Result<(), Error> {
    match command {
        Some(command) => help_single_command(ctx, &command).await,
        None => help_all_commands(ctx).await
    }
}

fn command_description(cmd: &Command<(), Error>) -> String {
    cmd.help_text.clone()
        .or_else(|| cmd.description.clone())
        .or_else(|| cmd.description_localizations.get("en-US").cloned())
        .unwrap_or_else(|| "No help available".to_string())
}

async fn help_single_command(ctx: BotContext<'_>, command_name: &str) -> Result<(), Error> {
    let command_name = command_name.trim();
    let command = ctx.framework().options().commands.iter().find(|command| {
        command.name.eq_ignore_ascii_case(command_name) || command.aliases.iter().any(|o| o.eq_ignore_ascii_case(command_name))
    });

    let reply = if let Some(command) = command {
        format!("`ru {}`: {}", command.name, command_description(command))
    } else {
        format!("No such command `{command_name}`")
    };

    ctx.say(reply).await?;
    Ok(())
}

struct CategoryHelp {
    name: String,
    commands: Vec<String>
}

fn group_by_category(commands: &[Command<(), Error>]) -> Vec<CategoryHelp> {
    let mut categories: Vec<CategoryHelp> = Vec::new();

    for cmd in commands {
        if cmd.hide_in_help {
            continue;
        }

        let name = cmd.category.clone().unwrap_or_else(|| "Other".to_string());
        let line = format!("`ru {}` - {}", cmd.name, command_description(cmd));

        match categories.iter_mut().find(|o| o.name == name) {
            Some(category) => category.commands.push(line),
            None => categories.push(CategoryHelp { name, commands: vec![line] })
        }
    }

    categories
}

/// Code for printing an overview of all commands (e.g. `ru help`)
async fn help_all_commands(ctx: BotContext<'_>) -> Result<(), Error> {
    let categories = group_by_category(&ctx.framework().options().commands);

    let mut embed = CreateEmbed::new()
        .title("🔨 Bot commands 🔨")
        .description("Every command also works with `bs` instead of `ru`, and as a slash command. You can fetch help for a specific command by passing its name as a parameter.");

    for category in categories {
        embed = embed.field(category.name, category.commands.join("\n"), false);
    }

    ctx.send(CreateReply::default().embed(embed)).await?;

    Ok(())
}
