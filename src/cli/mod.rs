mod cards;
mod doctor;
mod lobby;
mod logs;
mod sim;

use std::time::Duration;

use anyhow::Result;
use console::style;

use crate::core::terminal::{self, print_error};
use crate::core::watch::WatchConfig;

pub(crate) const DEFAULT_API_URL: &str = "http://127.0.0.1:8787";

fn print_help() {
    terminal::print_banner();

    print_section(
        "Simulations",
        &[
            ("sim start", "Launch an AI-vs-AI simulation run"),
            ("sim watch <run_id>", "Follow a run until it ends"),
            ("sim status <run_id>", "One-shot status check"),
            ("sim results <run_id>", "Fetch run results as JSON"),
            ("sim list", "Recent simulation runs"),
        ],
    );
    print_section(
        "Games",
        &[
            ("lobby wait <code>", "Wait for a lobby to become ready"),
            ("lobby status <code>", "One-shot lobby check"),
            ("logs", "Aggregated AI decision logs"),
            ("cards list", "Browse the card catalog"),
            ("cards show <name>", "Look up one card by name"),
        ],
    );
    print_section("Diagnostics", &[("doctor", "Check backend connectivity")]);

    println!(
        "\n {} {} <command> [flags]",
        style("Usage:").bold(),
        style("ggltcg").green()
    );
    println!(
        " {} --api-url <url>  --interval-ms <n>  --max-errors <n>  --limit <n>  --game <id>  -v\n",
        style("Flags:").bold()
    );
}

fn print_section(title: &str, commands: &[(&str, &str)]) {
    println!("\n {}", style(title).bold().underlined());
    for (cmd, desc) in commands {
        println!("   {} {}", style(format!("{:<22}", cmd)).green(), desc);
    }
}

pub(crate) fn parse_api_url(args: &[String]) -> String {
    let mut api_url = std::env::var("GGLTCG_API_URL")
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--api-url" => {
                if i + 1 < args.len() {
                    api_url = args[i + 1].clone();
                    i += 2;
                } else {
                    i += 1;
                }
            }
            _ => i += 1,
        }
    }
    api_url
}

pub(crate) fn parse_string_flag(args: &[String], flag: &str) -> Option<String> {
    let mut i = 2;
    while i < args.len() {
        if args[i] == flag {
            if i + 1 < args.len() {
                return Some(args[i + 1].clone());
            }
            return None;
        }
        i += 1;
    }
    None
}

pub(crate) fn parse_u64_flag(args: &[String], flag: &str) -> Option<u64> {
    parse_string_flag(args, flag).and_then(|raw| raw.parse().ok())
}

pub(crate) fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

pub(crate) fn parse_positional_args(args: &[String], start: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--api-url" | "--decks" | "--p1-model" | "--p2-model" | "--iterations"
            | "--max-turns" | "--interval-ms" | "--max-errors" | "--limit" | "--game" => {
                i += 2;
            }
            "--watch" | "--verbose" | "-v" => {
                i += 1;
            }
            _ => {
                out.push(args[i].clone());
                i += 1;
            }
        }
    }
    out
}

pub(crate) fn parse_watch_config(args: &[String]) -> WatchConfig {
    let mut config = WatchConfig::default();
    if let Some(ms) = parse_u64_flag(args, "--interval-ms") {
        // 100ms floor keeps a typoed value from hammering the backend.
        config.interval = Duration::from_millis(ms.max(100));
    }
    if let Some(ceiling) = parse_u64_flag(args, "--max-errors") {
        config.error_ceiling = ceiling.clamp(1, 100) as u32;
    }
    config
}

pub async fn run_main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    crate::logging::init(has_flag(&args, "--verbose") || has_flag(&args, "-v"));

    if args.len() < 2 {
        print_help();
        return Ok(());
    }

    match args[1].as_str() {
        "sim" | "simulation" => sim::run_sim_command(&args).await,
        "logs" | "ai-logs" => logs::run_logs_command(&args).await,
        "lobby" => lobby::run_lobby_command(&args).await,
        "cards" | "card" => cards::run_cards_command(&args).await,
        "doctor" => doctor::run_doctor(&args).await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        cmd => {
            print_error(&format!("Unknown command: {}", cmd));
            print_help();
            Ok(())
        }
    }
}
