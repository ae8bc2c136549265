use chrono::DateTime;
use colored::Colorize;
use prettytable::{format, Table};
use serde::Serialize;

use crate::config::Config;
use crate::conversation::ConversationSummary;
use crate::error::{ChatListError, Result};
use crate::screen::ChatListScreen;
use crate::source::create_source;

const MAX_SUBTITLE_CHARS: usize = 40;

/// Handle `chatlist list`
pub async fn run_list(config: &Config, query: Option<String>, json: bool) -> Result<()> {
    let mut screen = mount(config).await?;
    if let Some(query) = query {
        screen.set_search_query(query);
    }

    let visible = screen.visible_list();
    if json {
        println!("{}", to_json(&visible)?);
    } else if visible.is_empty() {
        println!("{}", "No conversations found.".yellow());
    } else {
        println!("\nConversations:");
        render_table(&visible).printstd();
        println!();
        println!(
            "Use {} to open a conversation.",
            "chatlist open <ID>".cyan()
        );
        println!();
    }

    screen.shutdown();
    Ok(())
}

/// Handle `chatlist open`
pub async fn run_open(
    config: &Config,
    handle: String,
    query: Option<String>,
    json: bool,
) -> Result<()> {
    let mut screen = mount(config).await?;
    if let Some(query) = query {
        screen.set_search_query(query);
    }
    screen.select(handle.clone());

    match screen.selected() {
        Some(summary) if json => println!("{}", to_json(summary)?),
        Some(summary) => {
            println!("\n{} {}", "Chat with".bold(), summary.display_name.bold());
            println!("  ID:            {}", summary.id.cyan());
            println!("  Kind:          {}", summary.kind);
            println!("  Last message:  {}", summary.subtitle);
            println!(
                "  Last activity: {}",
                format_last_activity(summary.last_activity)
            );
            println!();
        }
        None if json => println!("null"),
        None => println!("{}", format!("Conversation {} not found.", handle).yellow()),
    }

    screen.shutdown();
    Ok(())
}

/// Build the screen and wait for its first load
///
/// A failed load is reported but never aborts the command.
async fn mount(config: &Config) -> Result<ChatListScreen> {
    let source = create_source(&config.source)?;
    let mut screen = ChatListScreen::new(source, &config.list);
    screen.refresh().await;

    if let Some(error) = screen.model().last_error() {
        eprintln!(
            "{}",
            format!("Could not load conversations: {}", error).yellow()
        );
    }

    Ok(screen)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value).map_err(ChatListError::from)?)
}

/// Table of summaries in list order
pub fn render_table(summaries: &[&ConversationSummary]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Name".bold(),
        "Kind".bold(),
        "Last Message".bold(),
        "Last Activity".bold()
    ]);

    for summary in summaries {
        table.add_row(prettytable::row![
            summary.id.cyan(),
            summary.display_name,
            summary.kind,
            truncate(&summary.subtitle, MAX_SUBTITLE_CHARS),
            format_last_activity(summary.last_activity)
        ]);
    }

    table
}

/// `YYYY-MM-DD HH:MM` in UTC, or `-` when unknown
pub fn format_last_activity(timestamp: Option<i64>) -> String {
    timestamp
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
