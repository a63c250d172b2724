pub mod symptoms;

use std::collections::HashMap;

use crate::core::api::types::{AiLogRecord, PlanExecutionStatus};

#[cfg(test)]
mod tests;

/// Log versions whose rows carry a structured plan and can be collapsed
/// into per-turn groups. Anything else is shown as a standalone record.
const GROUPABLE_VERSIONS: &[&str] = &["v2", "v3", "v4"];

struct GroupIdentity {
    game_id: String,
    turn_number: u32,
    actor_id: String,
}

impl GroupIdentity {
    fn key(&self) -> String {
        format!("{}-{}-{}", self.game_id, self.turn_number, self.actor_id)
    }
}

fn group_identity(record: &AiLogRecord) -> Option<GroupIdentity> {
    let version = record.log_version.as_deref()?;
    if !GROUPABLE_VERSIONS.contains(&version) {
        return None;
    }
    record.plan.as_ref()?;
    Some(GroupIdentity {
        game_id: record.game_id.clone()?,
        turn_number: record.turn_number?,
        actor_id: record.actor_id.clone()?,
    })
}

/// All records one actor produced for one turn of one game, in the order
/// they arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnGroup {
    pub game_id: String,
    pub turn_number: u32,
    pub actor_id: String,
    pub records: Vec<AiLogRecord>,
    pub has_fallback: bool,
    pub fallback_reason: Option<String>,
}

impl TurnGroup {
    fn open(identity: GroupIdentity) -> Self {
        Self {
            game_id: identity.game_id,
            turn_number: identity.turn_number,
            actor_id: identity.actor_id,
            records: Vec::new(),
            has_fallback: false,
            fallback_reason: None,
        }
    }

    fn push(&mut self, record: AiLogRecord) {
        // First fallback wins: later fallback members never overwrite the
        // captured reason, even when theirs is more detailed.
        if !self.has_fallback
            && record.plan_execution_status == Some(PlanExecutionStatus::Fallback)
        {
            self.has_fallback = true;
            self.fallback_reason = record.fallback_reason.clone();
        }
        self.records.push(record);
    }

    /// Timestamp of the group's first member.
    pub fn created_at(&self) -> &str {
        self.records
            .first()
            .map(|record| record.created_at.as_str())
            .unwrap_or_default()
    }

    /// The plan summary of the earliest member that carries one.
    pub fn plan_summary(&self) -> Option<&str> {
        self.records
            .iter()
            .find_map(|record| record.plan.as_ref().and_then(|plan| plan.summary.as_deref()))
    }

    pub fn resolution(&self) -> GroupResolution {
        if self.has_fallback {
            return GroupResolution::FellBack;
        }
        let planned = self
            .records
            .iter()
            .find_map(|record| record.plan.as_ref().and_then(|plan| plan.planned_actions));
        // Exact match only: a retry-heavy turn can log more records than
        // the plan announced, and that surplus is an anomaly, not proof
        // of completion.
        match planned {
            Some(expected) if self.records.len() as u32 == expected => GroupResolution::Resolved,
            _ => GroupResolution::Partial,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupResolution {
    Resolved,
    Partial,
    FellBack,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AiLogEntry {
    Turn(TurnGroup),
    Single(AiLogRecord),
}

impl AiLogEntry {
    pub fn created_at(&self) -> &str {
        match self {
            AiLogEntry::Turn(group) => group.created_at(),
            AiLogEntry::Single(record) => &record.created_at,
        }
    }
}

/// Collapses raw backend log rows into displayable entries.
///
/// Records from groupable log versions merge by game, turn and actor;
/// everything else passes through untouched. The output is sorted
/// by `created_at` descending with a stable sort, and group membership
/// follows input order, so the same input always yields the same output.
pub fn aggregate(records: Vec<AiLogRecord>) -> Vec<AiLogEntry> {
    let mut groups: Vec<TurnGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut singles: Vec<AiLogRecord> = Vec::new();

    for record in records {
        let Some(identity) = group_identity(&record) else {
            singles.push(record);
            continue;
        };
        let key = identity.key();
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key, groups.len());
                groups.push(TurnGroup::open(identity));
                groups.len() - 1
            }
        };
        groups[slot].push(record);
    }

    let mut entries: Vec<AiLogEntry> = groups
        .into_iter()
        .map(AiLogEntry::Turn)
        .chain(singles.into_iter().map(AiLogEntry::Single))
        .collect();
    entries.sort_by(|a, b| b.created_at().cmp(a.created_at()));
    entries
}
