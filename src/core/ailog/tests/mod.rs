mod grouping;

use crate::core::api::types::{AiLogRecord, PlanExecutionStatus, TurnPlan};

/// A groupable plan-bearing record. Plan size and summary start empty so
/// each test states only what it cares about.
pub fn turn_record(game: &str, turn: u32, actor: &str, created_at: &str) -> AiLogRecord {
    AiLogRecord {
        id: format!("{}-t{}-{}-{}", game, turn, actor, created_at),
        created_at: created_at.to_string(),
        game_id: Some(game.to_string()),
        turn_number: Some(turn),
        actor_id: Some(actor.to_string()),
        log_version: Some("v4".to_string()),
        plan: Some(TurnPlan::default()),
        plan_execution_status: Some(PlanExecutionStatus::Complete),
        ..Default::default()
    }
}

/// A pre-plan log row: free text only, nothing to group on.
pub fn legacy_record(id: &str, created_at: &str) -> AiLogRecord {
    AiLogRecord {
        id: id.to_string(),
        created_at: created_at.to_string(),
        response: Some("raw model text".to_string()),
        ..Default::default()
    }
}

pub fn with_fallback(mut record: AiLogRecord, reason: Option<&str>) -> AiLogRecord {
    record.plan_execution_status = Some(PlanExecutionStatus::Fallback);
    record.fallback_reason = reason.map(str::to_string);
    record
}

pub fn with_planned_actions(mut record: AiLogRecord, planned: u32) -> AiLogRecord {
    if let Some(plan) = record.plan.as_mut() {
        plan.planned_actions = Some(planned);
    }
    record
}

pub fn with_version(mut record: AiLogRecord, version: &str) -> AiLogRecord {
    record.log_version = Some(version.to_string());
    record
}
