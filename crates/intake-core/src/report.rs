//! Summary reports assembled at pipeline stage boundaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schedule::{DaySchedule, TOTAL_DAYS};

/// The persisted 14-day schedule artifact with headline statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub total_days: u32,
    pub total_core_questions: usize,
    /// Days flagged as gateways, independent of whether their rules resolved.
    pub days_with_potential_expansions: usize,
    pub average_questions_per_day: f64,
    pub schedule: BTreeMap<u32, DaySchedule>,
}

impl ScheduleReport {
    /// Compute headline statistics over a built (and usually annotated)
    /// schedule.
    pub fn from_schedule(schedule: BTreeMap<u32, DaySchedule>) -> Self {
        let total_core_questions: usize = schedule.values().map(|d| d.question_count()).sum();
        let days_with_potential_expansions = schedule
            .values()
            .filter(|d| d.can_trigger_expansion)
            .count();

        Self {
            total_days: TOTAL_DAYS,
            total_core_questions,
            days_with_potential_expansions,
            average_questions_per_day: total_core_questions as f64 / TOTAL_DAYS as f64,
            schedule,
        }
    }
}

/// Headline counts produced by the ingestion stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    pub total_questions: usize,
    pub core_questions: usize,
    pub expansion_questions: usize,
    pub modules: Vec<String>,
    pub conditional_rules: usize,
}
