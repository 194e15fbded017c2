//! Day scheduler: partitions the core question set across days 1-14.
//!
//! The pacing plan is fixed:
//! - Days 1-2: demographics (split 3 / remainder, plus one sleep-quality
//!   item on day 2)
//! - Day 3: remaining sleep-quality questions
//! - Days 4-6: the three screening buckets, one per day, each a gateway
//!   that can open expansion branches
//! - Days 7-14: everything else in even chunks under rotating themes
//!
//! Every day 1-14 materializes an entry, even when its bucket is empty.
//! Questions that do not fit before day 14 are dropped and recorded in
//! diagnostics.

pub mod section;

use std::collections::BTreeMap;

use crate::catalog::Question;
use crate::diagnostics::Diagnostics;
use crate::schedule::{DaySchedule, TOTAL_DAYS};

pub use section::{SectionBuckets, SectionTag};

/// Rotating themes for days 7-14. Days past the table clamp to the last.
const LATER_THEMES: [(&str, &str); 8] = [
    (
        "Circadian Rhythm",
        "Understanding your natural sleep-wake cycle.",
    ),
    ("Sleep Environment", "How your bedroom affects your sleep."),
    ("Lifestyle Factors", "Daily habits that impact sleep."),
    ("Mental Health", "Stress, mood, and sleep connection."),
    ("Physical Health", "Your overall health and sleep."),
    ("Social Factors", "Relationships and sleep patterns."),
    ("Technology Use", "Screen time and sleep."),
    ("Final Questions", "Completing your sleep profile."),
];

const INSOMNIA_NOTE: &str = "If you report sleep difficulties, we'll ask some \
additional questions to better understand your situation.";
const DAYTIME_NOTE: &str = "Excessive daytime sleepiness may require deeper assessment.";
const APNEA_NOTE: &str = "Snoring or breathing pauses during sleep are important indicators.";

/// Builds the 14-day schedule skeleton from the core question set.
#[derive(Debug, Clone, Default)]
pub struct DayScheduler;

impl DayScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Assign every core question to a day.
    ///
    /// Returns entries for exactly days 1 through 14. Trailing questions
    /// beyond day 14 are dropped into `diagnostics` rather than silently
    /// lost.
    pub fn build(
        &self,
        core_questions: &[Question],
        diagnostics: &mut Diagnostics,
    ) -> BTreeMap<u32, DaySchedule> {
        let buckets = SectionBuckets::partition(core_questions);
        let mut schedule = BTreeMap::new();

        let demo_split = buckets.demographics.len().min(3);
        let (demo_first, demo_rest) = buckets.demographics.split_at(demo_split);

        let sleep_split = buckets.sleep_quality.len().min(1);
        let (sleep_first, sleep_rest) = buckets.sleep_quality.split_at(sleep_split);

        schedule.insert(
            1,
            fixed_day(
                1,
                "Welcome",
                "Let's start with some basic information about you.",
                demo_first.to_vec(),
                2,
            ),
        );

        let mut day2_questions = demo_rest.to_vec();
        day2_questions.extend_from_slice(sleep_first);
        schedule.insert(
            2,
            fixed_day(
                2,
                "Basic Profile",
                "A few more details to personalize your assessment.",
                day2_questions,
                2,
            ),
        );

        schedule.insert(
            3,
            fixed_day(
                3,
                "Sleep Quality Check",
                "How has your sleep been lately?",
                sleep_rest.to_vec(),
                2,
            ),
        );

        schedule.insert(
            4,
            gateway_day(
                4,
                "Sleep Difficulties",
                "Understanding your sleep patterns.",
                buckets.insomnia_screen,
                INSOMNIA_NOTE,
            ),
        );
        schedule.insert(
            5,
            gateway_day(
                5,
                "Daytime Energy",
                "How do you feel during the day?",
                buckets.daytime_function,
                DAYTIME_NOTE,
            ),
        );
        schedule.insert(
            6,
            gateway_day(
                6,
                "Breathing & Sleep",
                "Checking for breathing-related sleep issues.",
                buckets.apnea_screen,
                APNEA_NOTE,
            ),
        );

        let per_day = (buckets.other_core.len() / 8).max(2);
        let mut chunks = buckets.other_core.chunks(per_day);

        for day in 7..=TOTAL_DAYS {
            let day_questions: Vec<Question> =
                chunks.next().map(|c| c.to_vec()).unwrap_or_default();
            let theme_idx = ((day - 7) as usize).min(LATER_THEMES.len() - 1);
            let (title, description) = LATER_THEMES[theme_idx];
            let estimated_minutes = 2 + (day_questions.len() / 2) as u32;

            schedule.insert(
                day,
                fixed_day(day, title, description, day_questions, estimated_minutes),
            );
        }

        // Whatever the chunk iterator still holds fell off the window.
        for chunk in chunks {
            for question in chunk {
                diagnostics.record_dropped_question(&question.id);
            }
        }

        schedule
    }
}

fn fixed_day(
    day: u32,
    title: &str,
    description: &str,
    core_questions: Vec<Question>,
    estimated_minutes: u32,
) -> DaySchedule {
    DaySchedule {
        day,
        title: title.to_string(),
        description: description.to_string(),
        trigger_note: None,
        core_questions,
        estimated_minutes,
        can_trigger_expansion: false,
        possible_expansions: Vec::new(),
        estimated_minutes_range: None,
    }
}

fn gateway_day(
    day: u32,
    title: &str,
    description: &str,
    core_questions: Vec<Question>,
    note: &str,
) -> DaySchedule {
    DaySchedule {
        day,
        title: title.to_string(),
        description: description.to_string(),
        trigger_note: Some(note.to_string()),
        core_questions,
        estimated_minutes: 3,
        can_trigger_expansion: true,
        possible_expansions: Vec::new(),
        estimated_minutes_range: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AnswerType, QuestionKind, CORE_MODULE};

    fn question(id: &str, number: u32, section: Option<&str>) -> Question {
        Question {
            id: id.to_string(),
            number,
            text: format!("Question {number}?"),
            kind: QuestionKind::Core,
            section: section.map(str::to_string),
            module: CORE_MODULE.to_string(),
            answer_type: AnswerType::Boolean,
            options: Vec::new(),
            triggers_expansion: false,
        }
    }

    fn sample_core(n_demo: usize, n_sleep: usize, n_other: usize) -> Vec<Question> {
        let mut questions = Vec::new();
        let mut number = 0;
        for _ in 0..n_demo {
            number += 1;
            questions.push(question(
                &format!("CORE_{number}"),
                number,
                Some("DEMOGRAPHICS"),
            ));
        }
        for _ in 0..n_sleep {
            number += 1;
            questions.push(question(
                &format!("CORE_{number}"),
                number,
                Some("SLEEP QUALITY"),
            ));
        }
        number += 1;
        questions.push(question(
            &format!("CORE_{number}"),
            number,
            Some("INSOMNIA SCREEN"),
        ));
        number += 1;
        questions.push(question(
            &format!("CORE_{number}"),
            number,
            Some("DAYTIME FUNCTION"),
        ));
        number += 1;
        questions.push(question(
            &format!("CORE_{number}"),
            number,
            Some("APNEA SCREEN"),
        ));
        for _ in 0..n_other {
            number += 1;
            questions.push(question(&format!("CORE_{number}"), number, None));
        }
        questions
    }

    #[test]
    fn produces_exactly_fourteen_days() {
        let core = sample_core(5, 4, 16);
        let mut diag = Diagnostics::new();
        let schedule = DayScheduler::new().build(&core, &mut diag);

        assert_eq!(schedule.len(), 14);
        for day in 1..=14 {
            assert_eq!(schedule[&day].day, day);
        }
    }

    #[test]
    fn partition_has_no_duplicates_or_omissions() {
        let core = sample_core(5, 4, 16);
        let mut diag = Diagnostics::new();
        let schedule = DayScheduler::new().build(&core, &mut diag);

        let mut scheduled: Vec<String> = schedule
            .values()
            .flat_map(|d| d.core_questions.iter().map(|q| q.id.clone()))
            .collect();
        scheduled.sort();

        let mut expected: Vec<String> = core.iter().map(|q| q.id.clone()).collect();
        expected.sort();

        assert_eq!(scheduled.len(), core.len());
        assert_eq!(scheduled, expected);
        assert!(diag.dropped_questions.is_empty());
    }

    #[test]
    fn gateway_days_are_four_five_six() {
        let core = sample_core(4, 3, 10);
        let mut diag = Diagnostics::new();
        let schedule = DayScheduler::new().build(&core, &mut diag);

        for day in 1..=14u32 {
            let expected = (4..=6).contains(&day);
            assert_eq!(
                schedule[&day].can_trigger_expansion, expected,
                "day {day} gateway flag"
            );
            assert_eq!(schedule[&day].trigger_note.is_some(), expected);
        }
    }

    #[test]
    fn day_one_takes_first_three_demographics() {
        let core = sample_core(5, 2, 4);
        let mut diag = Diagnostics::new();
        let schedule = DayScheduler::new().build(&core, &mut diag);

        assert_eq!(schedule[&1].question_count(), 3);
        // Day 2: remaining 2 demographics + 1 sleep-quality.
        assert_eq!(schedule[&2].question_count(), 3);
        // Day 3: remaining sleep-quality.
        assert_eq!(schedule[&3].question_count(), 1);
    }

    #[test]
    fn short_demographics_bucket_does_not_panic() {
        let core = sample_core(1, 0, 0);
        let mut diag = Diagnostics::new();
        let schedule = DayScheduler::new().build(&core, &mut diag);

        assert_eq!(schedule[&1].question_count(), 1);
        assert_eq!(schedule[&2].question_count(), 0);
        assert_eq!(schedule.len(), 14);
    }

    #[test]
    fn estimated_minutes_follow_the_pacing_heuristic() {
        let core = sample_core(4, 3, 16); // 2 per day on days 7-14
        let mut diag = Diagnostics::new();
        let schedule = DayScheduler::new().build(&core, &mut diag);

        for day in 1..=3u32 {
            assert_eq!(schedule[&day].estimated_minutes, 2);
        }
        for day in 4..=6u32 {
            assert_eq!(schedule[&day].estimated_minutes, 3);
        }
        for day in 7..=14u32 {
            let expected = 2 + (schedule[&day].question_count() / 2) as u32;
            assert_eq!(schedule[&day].estimated_minutes, expected);
        }
    }

    #[test]
    fn trailing_questions_beyond_day_fourteen_are_diagnosed() {
        // 17 other-core questions: chunk size 2, eight chunks fill days
        // 7-14 with 16 questions, one falls off.
        let core = sample_core(3, 2, 17);
        let mut diag = Diagnostics::new();
        let schedule = DayScheduler::new().build(&core, &mut diag);

        let scheduled: usize = schedule.values().map(|d| d.question_count()).sum();
        assert_eq!(scheduled, core.len() - 1);
        assert_eq!(diag.dropped_questions.len(), 1);
    }

    #[test]
    fn empty_core_set_still_yields_fourteen_empty_days() {
        let mut diag = Diagnostics::new();
        let schedule = DayScheduler::new().build(&[], &mut diag);

        assert_eq!(schedule.len(), 14);
        assert!(schedule.values().all(|d| d.core_questions.is_empty()));
        assert!(diag.is_clean());
    }

    #[test]
    fn later_days_cycle_through_themes() {
        let core = sample_core(3, 2, 16);
        let mut diag = Diagnostics::new();
        let schedule = DayScheduler::new().build(&core, &mut diag);

        assert_eq!(schedule[&7].title, "Circadian Rhythm");
        assert_eq!(schedule[&8].title, "Sleep Environment");
        assert_eq!(schedule[&14].title, "Final Questions");
    }
}
