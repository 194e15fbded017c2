//! Schedule types for the 14-day onboarding plan.
//!
//! A [`DaySchedule`] is built once by the scheduler, then annotated exactly
//! once per resolver pass with the expansion branches its questions can
//! open. The simulator only reads these types.

use serde::{Deserialize, Serialize};

use crate::catalog::Question;
use crate::trigger::Condition;

/// Length of the onboarding window in days.
pub const TOTAL_DAYS: u32 = 14;

/// Inclusive time estimate bounds for a day, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinutesRange {
    pub min: u32,
    pub max: u32,
}

/// Worst-case expansion load for one module within an annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleExpansion {
    pub module: String,
    pub question_count: usize,
    pub questions: Vec<Question>,
}

/// A branch that one of the day's questions can open, with its worst-case
/// additional load. Derived from catalog and rule table; recomputed, never
/// persisted independently of its owning day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionAnnotation {
    pub trigger_question: Question,
    /// Raw condition text, for audit and display.
    pub condition: String,
    /// Classified condition used at answer time.
    pub parsed_condition: Condition,
    pub expansion_modules: Vec<ModuleExpansion>,
    pub total_additional_questions: usize,
    pub estimated_additional_minutes: u32,
}

/// One day of the onboarding plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Day number, 1 through 14.
    pub day: u32,
    pub title: String,
    pub description: String,
    /// Advisory note shown on gateway days.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_note: Option<String>,
    pub core_questions: Vec<Question>,
    pub estimated_minutes: u32,
    pub can_trigger_expansion: bool,
    #[serde(default)]
    pub possible_expansions: Vec<ExpansionAnnotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes_range: Option<MinutesRange>,
}

impl DaySchedule {
    /// Number of core questions assigned to this day.
    pub fn question_count(&self) -> usize {
        self.core_questions.len()
    }

    /// Worst-case additional questions across all annotations.
    pub fn max_additional_questions(&self) -> usize {
        self.possible_expansions
            .iter()
            .map(|a| a.total_additional_questions)
            .sum()
    }
}
