//! Message history listing.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use geochat_types::message::MessageRecord;

use crate::state::AppState;

/// Longest message body shown in a table cell.
const BODY_PREVIEW_CHARS: usize = 60;

/// Show the most recent `limit` messages, oldest first.
///
/// # Examples
///
/// ```bash
/// geochat history
/// geochat history --limit 10 --json
/// ```
pub async fn show_history(state: &AppState, limit: i64, json: bool) -> Result<()> {
    let records = state.store.list_recent(limit.max(0)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!(
            "  {} No messages yet. Start chatting with: {}",
            style("i").blue().bold(),
            style("geochat chat").yellow()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", build_table(&records));
    println!();
    Ok(())
}

fn build_table(records: &[MessageRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Sent").fg(Color::White),
        Cell::new("Author").fg(Color::White),
        Cell::new("Message").fg(Color::White),
    ]);

    for record in records {
        table.add_row(vec![
            Cell::new(record.created_at().format("%Y-%m-%d %H:%M:%S").to_string())
                .fg(Color::DarkGrey),
            Cell::new(record.author()).fg(Color::Cyan),
            Cell::new(preview(record.body(), BODY_PREVIEW_CHARS)),
        ]);
    }

    table
}

/// Truncate to `max` characters, marking the cut with `...`.
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_keeps_short_text() {
        assert_eq!(preview("hello", 10), "hello");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "ééééééééééé";
        let cut = preview(text, 8);
        assert_eq!(cut, "ééééé...");
        assert_eq!(cut.chars().count(), 8);
    }

    #[test]
    fn test_table_has_row_per_record() {
        let records = vec![
            MessageRecord::new("Alice", "hi"),
            MessageRecord::new("Test User", "Simulated Message"),
        ];
        let table = build_table(&records);
        assert_eq!(table.row_iter().count(), 2);
        let rendered = table.to_string();
        assert!(rendered.contains("Alice"));
        assert!(rendered.contains("Simulated Message"));
    }
}
