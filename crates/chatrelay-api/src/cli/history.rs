//! `chatrelay history` and `chatrelay list` output.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chatrelay_types::turn::TurnRecord;

use crate::state::AppState;

const PREVIEW_CHARS: usize = 60;

/// Print the newest `limit` turns, oldest first.
pub async fn show_history(state: &AppState, limit: usize, json: bool) -> Result<()> {
    let turns = state.orchestrator.recent_turns(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }

    if turns.is_empty() {
        print_empty();
        return Ok(());
    }

    let total = state.orchestrator.count_turns().await?;

    println!();
    println!(
        "  {} Showing {} of {} turn{}",
        style("i").blue().bold(),
        turns.len(),
        total,
        if total == 1 { "" } else { "s" }
    );
    println!();
    for turn in &turns {
        println!(
            "  {} {}",
            style(turn.timestamp.format("%Y-%m-%d %H:%M:%S")).dim(),
            style("user").cyan().bold()
        );
        println!("    {}", turn.prompt);
        println!("  {}", style("assistant").green().bold());
        println!("    {}", turn.generated_text);
        println!();
    }

    Ok(())
}

/// Print every stored turn as a table.
pub async fn list_turns(state: &AppState, json: bool) -> Result<()> {
    let turns = state.orchestrator.list_turns().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }

    if turns.is_empty() {
        print_empty();
        return Ok(());
    }

    println!();
    println!("{}", turns_table(&turns));
    println!();
    println!(
        "  {} turn{}",
        style(turns.len()).bold(),
        if turns.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn print_empty() {
    println!();
    println!(
        "  {} No turns stored yet. Start the server with: {}",
        style("i").blue().bold(),
        style("chatrelay serve").yellow()
    );
    println!();
}

fn turns_table(turns: &[TurnRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Timestamp").fg(Color::White),
        Cell::new("Prompt").fg(Color::White),
        Cell::new("Response").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for turn in turns {
        table.add_row(vec![
            Cell::new(turn.timestamp.format("%Y-%m-%d %H:%M:%S")).fg(Color::DarkGrey),
            Cell::new(preview(&turn.prompt)),
            Cell::new(preview(&turn.generated_text)),
            Cell::new(turn.id).fg(Color::DarkGrey),
        ]);
    }

    table
}

/// Single-line preview, cut on a char boundary.
fn preview(text: &str) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}
