pub mod types;

use std::time::Duration;

use anyhow::{Result, anyhow};
use reqwest::Client;

use types::{
    AiLogPage, CardsPage, LobbyStatus, RunsPage, SimulationResults, SimulationRunStatus,
    StartSimulationRequest, StartSimulationResponse,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Typed client for the game backend's REST surface.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);
        let res = self
            .client
            .get(&url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(anyhow!(
                "GGLTCG API Error ({}): {}",
                res.status(),
                res.text().await.unwrap_or_default()
            ));
        }
        let parsed: T = res.json().await?;
        Ok(parsed)
    }

    pub async fn start_simulation(
        &self,
        request: &StartSimulationRequest,
    ) -> Result<StartSimulationResponse> {
        let url = format!("{}/admin/simulation/start", self.base_url);
        tracing::debug!("POST {}", url);
        let res = self
            .client
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(request)
            .send()
            .await?;
        if !res.status().is_success() {
            return Err(anyhow!(
                "GGLTCG API Error ({}): {}",
                res.status(),
                res.text().await.unwrap_or_default()
            ));
        }
        let parsed: StartSimulationResponse = res.json().await?;
        Ok(parsed)
    }

    pub async fn simulation_status(&self, run_id: &str) -> Result<SimulationRunStatus> {
        self.get_json(&format!("/admin/simulation/runs/{}", run_id))
            .await
    }

    pub async fn simulation_results(&self, run_id: &str) -> Result<SimulationResults> {
        self.get_json(&format!("/admin/simulation/runs/{}/results", run_id))
            .await
    }

    pub async fn list_runs(&self, limit: usize) -> Result<RunsPage> {
        let limit = limit.clamp(1, 500);
        self.get_json(&format!("/admin/simulation/runs?limit={}", limit))
            .await
    }

    pub async fn list_ai_logs(&self, limit: usize, game_id: Option<&str>) -> Result<AiLogPage> {
        let limit = limit.clamp(1, 500);
        let path = match game_id {
            Some(game_id) => format!("/admin/ai-logs?limit={}&gameId={}", limit, game_id),
            None => format!("/admin/ai-logs?limit={}", limit),
        };
        self.get_json(&path).await
    }

    pub async fn lobby_status(&self, code: &str) -> Result<LobbyStatus> {
        self.get_json(&format!("/lobby/{}/status", code)).await
    }

    pub async fn list_cards(&self) -> Result<CardsPage> {
        self.get_json("/cards").await
    }
}
