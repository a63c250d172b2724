use anyhow::{Result, anyhow};
use tokio::sync::mpsc;

use crate::core::api::BackendClient;
use crate::core::api::types::LobbyStatus;
use crate::core::terminal::{print_error, print_info, print_status, print_step, print_success};
use crate::core::watch::probes::LobbyProbe;
use crate::core::watch::{RunWatcher, WatchEvent, WatchOutcome};

use super::{parse_api_url, parse_positional_args, parse_watch_config};

pub async fn run_lobby_command(args: &[String]) -> Result<()> {
    let action = if args.len() > 2 { args[2].as_str() } else { "" };
    let client = BackendClient::new(&parse_api_url(args));
    match action {
        "wait" | "watch" => wait(client, args).await,
        "status" => status(client, args).await,
        _ => {
            print_error("Unknown or missing lobby command. Expected: wait, status");
            Ok(())
        }
    }
}

async fn status(client: BackendClient, args: &[String]) -> Result<()> {
    let positional = parse_positional_args(args, 3);
    let code = positional
        .first()
        .ok_or_else(|| anyhow!("lobby status requires <code>"))?;
    let lobby = client.lobby_status(code).await?;
    print_lobby(&lobby);
    Ok(())
}

async fn wait(client: BackendClient, args: &[String]) -> Result<()> {
    let positional = parse_positional_args(args, 3);
    let code = positional
        .first()
        .ok_or_else(|| anyhow!("lobby wait requires <code>"))?;

    // One direct fetch up front: a bad code fails immediately instead of
    // burning through the poll error ceiling.
    let lobby = client.lobby_status(code).await?;
    if lobby.ready_to_start {
        print_lobby(&lobby);
        return Ok(());
    }
    print_step(&format!("Waiting for lobby {} to fill", code));

    let (tx, mut rx) = mpsc::channel(32);
    let mut watcher = RunWatcher::new();
    watcher.start(
        LobbyProbe::new(client.clone(), code),
        parse_watch_config(args),
        tx,
    );

    let mut last_seated = None;
    let outcome = loop {
        match rx.recv().await {
            Some(WatchEvent::Progress {
                completed, total, ..
            }) => {
                if last_seated != Some(completed) {
                    print_status("Seats", &format!("{}/{}", completed, total));
                    last_seated = Some(completed);
                }
            }
            Some(WatchEvent::Finished(outcome)) => break outcome,
            None => return Err(anyhow!("watch ended unexpectedly")),
        }
    };
    watcher.stop();

    match outcome {
        WatchOutcome::Completed(lobby) => {
            print_lobby(&lobby);
            Ok(())
        }
        WatchOutcome::JobFailed { status, message } => {
            Err(anyhow!("lobby {} {}: {}", code, status.as_str(), message))
        }
        WatchOutcome::ResultFetchFailed { message } => Err(anyhow!(
            "lobby {} became ready but could not be re-read: {}",
            code,
            message
        )),
        WatchOutcome::ConnectionLost { attempts, message } => Err(anyhow!(
            "lost contact with the backend after {} failed polls: {}",
            attempts,
            message
        )),
    }
}

fn print_lobby(lobby: &LobbyStatus) {
    print_status("Lobby", &lobby.code);
    print_status(
        "Player 1",
        lobby.player1_name.as_deref().unwrap_or("(empty seat)"),
    );
    print_status(
        "Player 2",
        lobby.player2_name.as_deref().unwrap_or("(empty seat)"),
    );
    if lobby.ready_to_start {
        print_success("Ready to start");
        if let Some(game_id) = &lobby.game_id {
            print_status("Game", game_id);
        }
    } else {
        print_info("Waiting for players");
    }
}
