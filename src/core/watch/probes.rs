use anyhow::Result;
use async_trait::async_trait;

use crate::core::api::BackendClient;
use crate::core::api::types::{LobbyStatus, RunStatus, SimulationResults};

use super::{JobProbe, JobSnapshot};

/// Polls one simulation run; progress is measured in finished games.
pub struct SimulationProbe {
    client: BackendClient,
    run_id: String,
}

impl SimulationProbe {
    pub fn new(client: BackendClient, run_id: &str) -> Self {
        Self {
            client,
            run_id: run_id.to_string(),
        }
    }
}

#[async_trait]
impl JobProbe for SimulationProbe {
    type Output = SimulationResults;

    async fn status(&self) -> Result<JobSnapshot> {
        let status = self.client.simulation_status(&self.run_id).await?;
        Ok(JobSnapshot {
            status: status.status,
            completed_units: status.completed_games,
            total_units: status.total_games,
            error_message: status.error_message,
        })
    }

    async fn result(&self) -> Result<SimulationResults> {
        self.client.simulation_results(&self.run_id).await
    }
}

/// Polls a lobby until it is ready to start. A lobby is a two-seat job:
/// each seated player counts as one unit, and `readyToStart` maps to the
/// completed state.
pub struct LobbyProbe {
    client: BackendClient,
    code: String,
}

impl LobbyProbe {
    pub fn new(client: BackendClient, code: &str) -> Self {
        Self {
            client,
            code: code.to_string(),
        }
    }
}

#[async_trait]
impl JobProbe for LobbyProbe {
    type Output = LobbyStatus;

    async fn status(&self) -> Result<JobSnapshot> {
        let lobby = self.client.lobby_status(&self.code).await?;
        let seated = u64::from(lobby.player1_name.is_some()) + u64::from(lobby.player2_name.is_some());
        Ok(JobSnapshot {
            status: if lobby.ready_to_start {
                RunStatus::Completed
            } else {
                RunStatus::Running
            },
            completed_units: seated,
            total_units: 2,
            error_message: None,
        })
    }

    async fn result(&self) -> Result<LobbyStatus> {
        self.client.lobby_status(&self.code).await
    }
}
