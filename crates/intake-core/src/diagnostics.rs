//! Degradation counters for the scheduling pipeline.
//!
//! Every silent-skip path in the engine records what it dropped here instead
//! of swallowing it: trailing questions that fell off the 14-day window,
//! rule module references that resolve to nothing, condition strings the
//! evaluator cannot classify, duplicate trigger rules, and malformed
//! ingestion rows. A run never aborts on these; callers inspect the
//! collector afterwards and decide whether the losses matter.

use serde::{Deserialize, Serialize};

/// Collector for degenerate cases encountered during a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Diagnostics {
    /// Question ids dropped because the 14-day window was exhausted.
    #[serde(default)]
    pub dropped_questions: Vec<String>,
    /// Module names referenced by rules but absent from the catalog.
    #[serde(default)]
    pub unresolved_modules: Vec<String>,
    /// Condition strings that parsed to no recognized kind (always false).
    #[serde(default)]
    pub unrecognized_conditions: Vec<String>,
    /// Trigger question ids that appeared in more than one rule (last wins).
    #[serde(default)]
    pub duplicate_rules: Vec<String>,
    /// Question ids whose answer type fell back to the degenerate default.
    #[serde(default)]
    pub degenerate_answer_types: Vec<String>,
    /// Ingestion rows skipped as malformed.
    #[serde(default)]
    pub skipped_rows: usize,
}

impl Diagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_dropped_question(&mut self, id: impl Into<String>) {
        self.dropped_questions.push(id.into());
    }

    pub fn record_unresolved_module(&mut self, name: impl Into<String>) {
        self.unresolved_modules.push(name.into());
    }

    pub fn record_unrecognized_condition(&mut self, text: impl Into<String>) {
        self.unrecognized_conditions.push(text.into());
    }

    pub fn record_duplicate_rule(&mut self, trigger_id: impl Into<String>) {
        self.duplicate_rules.push(trigger_id.into());
    }

    pub fn record_degenerate_answer_type(&mut self, id: impl Into<String>) {
        self.degenerate_answer_types.push(id.into());
    }

    pub fn record_skipped_row(&mut self) {
        self.skipped_rows += 1;
    }

    /// Total number of recorded degradations.
    pub fn total(&self) -> usize {
        self.dropped_questions.len()
            + self.unresolved_modules.len()
            + self.unrecognized_conditions.len()
            + self.duplicate_rules.len()
            + self.degenerate_answer_types.len()
            + self.skipped_rows
    }

    /// True when nothing degraded during the run.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Fold another collector into this one.
    pub fn merge(&mut self, other: Diagnostics) {
        self.dropped_questions.extend(other.dropped_questions);
        self.unresolved_modules.extend(other.unresolved_modules);
        self.unrecognized_conditions
            .extend(other.unrecognized_conditions);
        self.duplicate_rules.extend(other.duplicate_rules);
        self.degenerate_answer_types
            .extend(other.degenerate_answer_types);
        self.skipped_rows += other.skipped_rows;
    }
}
