use anyhow::Result;

use crate::core::api::BackendClient;
use crate::core::terminal::{self, print_error, print_link, print_step, print_success, print_warn};

use super::parse_api_url;

pub async fn run_doctor(args: &[String]) -> Result<()> {
    let client = BackendClient::new(&parse_api_url(args));

    print_step("GGLTCG Doctor - checking the backend...");
    print_link("Backend", client.base_url());
    println!();

    let mut all_ok = true;

    // 1. AI log store
    match client.list_ai_logs(1, None).await {
        Ok(page) => {
            print_success(&format!("AI log store reachable ({} records)", page.count));
        }
        Err(e) => {
            print_error(&format!("AI log store unreachable: {}", e));
            all_ok = false;
        }
    }

    // 2. Simulation admin surface
    match client.list_runs(1).await {
        Ok(page) => match page.runs.first() {
            Some(run) => print_success(&format!(
                "Simulation admin reachable (latest run {})",
                run.run_id
            )),
            None => print_success("Simulation admin reachable (no runs yet)"),
        },
        Err(e) => {
            print_error(&format!("Simulation admin unreachable: {}", e));
            all_ok = false;
        }
    }

    // 3. Card catalog
    match client.list_cards().await {
        Ok(page) if page.cards.is_empty() => print_warn("Card catalog is reachable but empty"),
        Ok(page) => print_success(&format!("Card catalog loaded ({} cards)", page.cards.len())),
        Err(e) => {
            print_error(&format!("Card catalog unreachable: {}", e));
            all_ok = false;
        }
    }

    println!();
    if all_ok {
        println!("{} All systems normal. Deal me in!", terminal::ROCKET);
    } else {
        print_error("The backend is not fully reachable. Check the URL and that the server is up.");
    }
    Ok(())
}
