#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Cancelled => "cancelled",
        }
    }

    /// A terminal run never leaves its state; pollers stop once they see one.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Failed | RunStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSimulationRequest {
    pub deck_names: Vec<String>,
    pub player1_model: String,
    pub player2_model: String,
    pub iterations_per_matchup: u32,
    pub max_turns: u32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartSimulationResponse {
    pub run_id: String,
    pub total_games: u64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRunStatus {
    pub run_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub completed_games: u64,
    #[serde(default)]
    pub total_games: u64,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub run_id: String,
    pub status: RunStatus,
    #[serde(default)]
    pub completed_games: u64,
    #[serde(default)]
    pub total_games: u64,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RunsPage {
    #[serde(default)]
    pub runs: Vec<RunSummary>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResults {
    pub run_id: String,
    #[serde(default)]
    pub matchups: Vec<MatchupStats>,
    #[serde(default)]
    pub games: Vec<GameRecord>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchupStats {
    pub deck_a: String,
    pub deck_b: String,
    #[serde(default)]
    pub deck_a_wins: u64,
    #[serde(default)]
    pub deck_b_wins: u64,
    #[serde(default)]
    pub draws: u64,
    #[serde(default)]
    pub avg_turns: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_id: String,
    #[serde(default)]
    pub winner_deck: Option<String>,
    #[serde(default)]
    pub turns: u32,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AiLogPage {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub logs: Vec<AiLogRecord>,
}

/// One raw AI decision record as the backend stores it. Everything past the
/// id and timestamp is optional: the log table spans several schema
/// generations and older rows carry only a subset of these fields.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiLogRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub game_id: Option<String>,
    #[serde(default)]
    pub turn_number: Option<u32>,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(default)]
    pub log_version: Option<String>,
    #[serde(default)]
    pub plan: Option<TurnPlan>,
    #[serde(default)]
    pub plan_execution_status: Option<PlanExecutionStatus>,
    #[serde(default)]
    pub fallback_reason: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanExecutionStatus {
    Complete,
    Fallback,
    #[serde(other)]
    Other,
}

/// The parsed plan payload. Plan schemas drifted between log versions, so
/// only the fields shared by every generation are modeled; the rest of the
/// object is ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnPlan {
    #[serde(default)]
    pub planned_actions: Option<u32>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyStatus {
    pub code: String,
    #[serde(default)]
    pub player1_name: Option<String>,
    #[serde(default)]
    pub player2_name: Option<String>,
    #[serde(default)]
    pub ready_to_start: bool,
    #[serde(default)]
    pub game_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDef {
    pub name: String,
    #[serde(default)]
    pub cost: u32,
    #[serde(default)]
    pub card_type: String,
    #[serde(default)]
    pub attack: Option<u32>,
    #[serde(default)]
    pub health: Option<u32>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CardsPage {
    #[serde(default)]
    pub cards: Vec<CardDef>,
}
