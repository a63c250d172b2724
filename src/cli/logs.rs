use anyhow::Result;
use console::style;

use crate::core::ailog::symptoms::count_symptoms;
use crate::core::ailog::{AiLogEntry, GroupResolution, TurnGroup, aggregate};
use crate::core::api::BackendClient;
use crate::core::api::types::AiLogRecord;
use crate::core::terminal::{print_info, print_status, print_step};

use super::{parse_api_url, parse_string_flag, parse_u64_flag};

pub async fn run_logs_command(args: &[String]) -> Result<()> {
    let client = BackendClient::new(&parse_api_url(args));
    let limit = parse_u64_flag(args, "--limit").unwrap_or(100) as usize;
    let game_id = parse_string_flag(args, "--game");

    let page = client.list_ai_logs(limit, game_id.as_deref()).await?;
    if page.logs.is_empty() {
        print_info("No AI logs recorded yet");
        return Ok(());
    }

    let record_count = page.logs.len();
    let tallies = count_symptoms(&page.logs);
    let entries = aggregate(page.logs);

    print_step(&format!(
        "{} entries from {} records",
        entries.len(),
        record_count
    ));
    for entry in &entries {
        match entry {
            AiLogEntry::Turn(group) => print_turn_group(group),
            AiLogEntry::Single(record) => print_single(record),
        }
    }

    let flagged: Vec<_> = tallies.into_iter().filter(|tally| tally.count > 0).collect();
    if !flagged.is_empty() {
        println!();
        print_step("Symptoms");
        for tally in flagged {
            print_status(tally.label, &tally.count.to_string());
        }
    }
    Ok(())
}

fn print_turn_group(group: &TurnGroup) {
    let badge = match group.resolution() {
        GroupResolution::Resolved => style("resolved").green(),
        GroupResolution::Partial => style("partial").yellow(),
        GroupResolution::FellBack => style("fell back").red(),
    };
    println!(
        "  {}  {} turn {} / {}  {} record(s)  [{}]",
        style(group.created_at()).dim(),
        style(&group.game_id).cyan(),
        group.turn_number,
        group.actor_id,
        group.records.len(),
        badge
    );
    if let Some(reason) = &group.fallback_reason {
        println!("      {} {}", style("fallback:").red(), reason);
    }
    if let Some(summary) = group.plan_summary() {
        println!("      {}", style(preview(summary, 70)).dim());
    }
}

fn print_single(record: &AiLogRecord) {
    println!(
        "  {}  {}  [{}]",
        style(record.created_at.as_str()).dim(),
        style(&record.id).cyan(),
        style("raw").dim()
    );
    if let Some(text) = record.response.as_deref().or(record.prompt.as_deref()) {
        println!("      {}", style(preview(text, 70)).dim());
    }
}

/// One display line: newlines flattened, long text cut at a char boundary.
fn preview(text: &str, max_chars: usize) -> String {
    let flattened: String = text
        .chars()
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    if flattened.chars().count() <= max_chars {
        return flattened;
    }
    let cut: String = flattened.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
