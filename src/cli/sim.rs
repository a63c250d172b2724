use anyhow::{Result, anyhow};
use console::style;
use tokio::sync::mpsc;

use crate::core::api::BackendClient;
use crate::core::api::types::{MatchupStats, RunStatus, RunSummary, SimulationResults, StartSimulationRequest};
use crate::core::terminal::{TROPHY, print_error, print_info, print_status, print_step, print_success, print_warn};
use crate::core::watch::probes::SimulationProbe;
use crate::core::watch::{RunWatcher, WatchConfig, WatchEvent, WatchOutcome};

use super::{
    has_flag, parse_api_url, parse_positional_args, parse_string_flag, parse_u64_flag,
    parse_watch_config,
};

pub async fn run_sim_command(args: &[String]) -> Result<()> {
    let action = if args.len() > 2 { args[2].as_str() } else { "" };
    let client = BackendClient::new(&parse_api_url(args));
    match action {
        "start" => start(client, args).await,
        "watch" | "follow" => watch(client, args).await,
        "status" => status(client, args).await,
        "results" => results(client, args).await,
        "list" | "ls" => list(client, args).await,
        _ => {
            print_error(
                "Unknown or missing sim command. Expected: start, watch, status, results, list",
            );
            Ok(())
        }
    }
}

async fn start(client: BackendClient, args: &[String]) -> Result<()> {
    let request = build_start_request(args)?;
    print_step(&format!(
        "Starting simulation: {} deck(s), {} iteration(s) per matchup",
        request.deck_names.len(),
        request.iterations_per_matchup
    ));
    let started = client.start_simulation(&request).await?;
    print_success(&format!(
        "Run {} accepted ({} games)",
        started.run_id, started.total_games
    ));

    if has_flag(args, "--watch") {
        return watch_run(client, &started.run_id, parse_watch_config(args)).await;
    }
    print_info(&format!("Follow it with: ggltcg sim watch {}", started.run_id));
    Ok(())
}

async fn watch(client: BackendClient, args: &[String]) -> Result<()> {
    let positional = parse_positional_args(args, 3);
    let run_id = positional
        .first()
        .ok_or_else(|| anyhow!("sim watch requires <run_id>"))?;
    watch_run(client, run_id, parse_watch_config(args)).await
}

async fn watch_run(client: BackendClient, run_id: &str, config: WatchConfig) -> Result<()> {
    print_step(&format!("Watching run {}", run_id));
    let (tx, mut rx) = mpsc::channel(32);
    let mut watcher = RunWatcher::new();
    watcher.start(SimulationProbe::new(client.clone(), run_id), config, tx);

    let outcome = loop {
        match rx.recv().await {
            Some(WatchEvent::Progress {
                completed,
                total,
                status,
            }) => {
                print_status("Progress", &format_progress(completed, total, status));
            }
            Some(WatchEvent::Finished(outcome)) => break outcome,
            None => return Err(anyhow!("watch ended unexpectedly")),
        }
    };
    watcher.stop();

    let job_ended = !matches!(outcome, WatchOutcome::ConnectionLost { .. });
    let result = match outcome {
        WatchOutcome::Completed(results) => {
            print_results(&results);
            print_success(&format!("Run {} completed", run_id));
            Ok(())
        }
        WatchOutcome::JobFailed { status, message } => {
            Err(anyhow!("run {} {}: {}", run_id, status.as_str(), message))
        }
        WatchOutcome::ResultFetchFailed { message } => Err(anyhow!(
            "run {} completed but its results could not be fetched: {}",
            run_id,
            message
        )),
        WatchOutcome::ConnectionLost { attempts, message } => Err(anyhow!(
            "lost contact with the backend after {} failed polls: {}",
            attempts,
            message
        )),
    };

    if job_ended {
        show_recent_runs(&client).await;
    }
    result
}

async fn status(client: BackendClient, args: &[String]) -> Result<()> {
    let positional = parse_positional_args(args, 3);
    let run_id = positional
        .first()
        .ok_or_else(|| anyhow!("sim status requires <run_id>"))?;
    let run = client.simulation_status(run_id).await?;

    print_status("Run", &run.run_id);
    print_status("State", run.status.as_str());
    print_status("Games", &format_games(run.completed_games, run.total_games));
    if let Some(message) = &run.error_message {
        print_warn(message);
    }
    Ok(())
}

async fn results(client: BackendClient, args: &[String]) -> Result<()> {
    let positional = parse_positional_args(args, 3);
    let run_id = positional
        .first()
        .ok_or_else(|| anyhow!("sim results requires <run_id>"))?;
    let results = client.simulation_results(run_id).await?;
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

async fn list(client: BackendClient, args: &[String]) -> Result<()> {
    let limit = parse_u64_flag(args, "--limit").unwrap_or(20) as usize;
    let page = client.list_runs(limit).await?;
    if page.runs.is_empty() {
        print_info("No simulation runs yet");
        return Ok(());
    }
    print_step(&format!("Last {} run(s)", page.runs.len()));
    for run in &page.runs {
        print_status(&run.run_id, &format_run_summary(run));
    }
    Ok(())
}

/// Prints the newest runs after a watch ends. Best effort: a listing
/// failure is logged, never surfaced over the watch outcome.
async fn show_recent_runs(client: &BackendClient) {
    match client.list_runs(5).await {
        Ok(page) if !page.runs.is_empty() => {
            print_step("Recent runs");
            for run in &page.runs {
                print_status(&run.run_id, &format_run_summary(run));
            }
        }
        Ok(_) => {}
        Err(e) => tracing::debug!("run list refresh failed: {}", e),
    }
}

fn build_start_request(args: &[String]) -> Result<StartSimulationRequest> {
    let decks = parse_string_flag(args, "--decks")
        .map(|raw| parse_deck_list(&raw))
        .unwrap_or_default();
    if decks.is_empty() {
        return Err(anyhow!("sim start requires --decks <name,name,...>"));
    }
    let player1_model = parse_string_flag(args, "--p1-model")
        .ok_or_else(|| anyhow!("sim start requires --p1-model <model>"))?;
    let player2_model = parse_string_flag(args, "--p2-model")
        .ok_or_else(|| anyhow!("sim start requires --p2-model <model>"))?;

    Ok(StartSimulationRequest {
        deck_names: decks,
        player1_model,
        player2_model,
        iterations_per_matchup: parse_u64_flag(args, "--iterations").unwrap_or(1) as u32,
        max_turns: parse_u64_flag(args, "--max-turns").unwrap_or(50) as u32,
    })
}

fn parse_deck_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|deck| !deck.is_empty())
        .map(str::to_string)
        .collect()
}

fn format_progress(completed: u64, total: u64, status: RunStatus) -> String {
    if total == 0 {
        return format!("{} games ({})", completed, status.as_str());
    }
    let percent = completed * 100 / total;
    format!(
        "{}/{} games, {}% ({})",
        completed,
        total,
        percent,
        status.as_str()
    )
}

fn format_games(completed: u64, total: u64) -> String {
    if total == 0 {
        format!("{}", completed)
    } else {
        format!("{}/{}", completed, total)
    }
}

fn format_run_summary(run: &RunSummary) -> String {
    let games = format_games(run.completed_games, run.total_games);
    if run.created_at.is_empty() {
        format!("{} ({} games)", run.status.as_str(), games)
    } else {
        format!("{} ({} games, started {})", run.status.as_str(), games, run.created_at)
    }
}

fn print_results(results: &SimulationResults) {
    println!();
    println!("  {} {}", TROPHY, style("Matchup results").bold());
    for matchup in &results.matchups {
        println!("    {}", format_matchup(matchup));
    }
    if !results.games.is_empty() {
        println!(
            "    {}",
            style(format!("{} games recorded", results.games.len())).dim()
        );
    }
    println!();
}

fn format_matchup(matchup: &MatchupStats) -> String {
    format!(
        "{} vs {}: {}-{} ({} draws, avg {:.1} turns)",
        matchup.deck_a,
        matchup.deck_b,
        matchup.deck_a_wins,
        matchup.deck_b_wins,
        matchup.draws,
        matchup.avg_turns
    )
}
