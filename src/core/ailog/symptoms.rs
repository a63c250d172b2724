use crate::core::api::types::AiLogRecord;

/// Display label and lowercase needle for each failure mode worth counting.
const SYMPTOM_PATTERNS: &[(&str, &str)] = &[
    ("json parse errors", "json parse error"),
    ("malformed plans", "malformed plan"),
    ("invalid card indexes", "invalid index"),
    ("request timeouts", "timed out"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymptomTally {
    pub label: &'static str,
    pub count: usize,
}

/// Counts known failure phrases across prompt, response and fallback
/// reason text. Plain non-overlapping substring matching, case folded; a
/// coarse signal for eyeballing a batch of logs, not a metric.
pub fn count_symptoms(records: &[AiLogRecord]) -> Vec<SymptomTally> {
    let mut counts = vec![0usize; SYMPTOM_PATTERNS.len()];
    for record in records {
        let fields = [
            record.prompt.as_deref(),
            record.response.as_deref(),
            record.fallback_reason.as_deref(),
        ];
        for text in fields.into_iter().flatten() {
            let lowered = text.to_lowercase();
            for (slot, (_, pattern)) in SYMPTOM_PATTERNS.iter().enumerate() {
                counts[slot] += lowered.matches(pattern).count();
            }
        }
    }
    SYMPTOM_PATTERNS
        .iter()
        .zip(counts)
        .map(|((label, _), count)| SymptomTally { label, count })
        .collect()
}
