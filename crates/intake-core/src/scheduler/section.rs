//! Section tagging for core questions.
//!
//! The sheet's free-text section headers are mapped onto a closed label set
//! by case-insensitive substring match. Precedence is fixed: a header that
//! matches two keywords lands in the earlier bucket. Questions with no
//! matching header are "other core" and keep their catalog order.

use serde::{Deserialize, Serialize};

use crate::catalog::Question;

/// Thematic bucket a core question schedules under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionTag {
    Demographics,
    SleepQuality,
    InsomniaScreen,
    DaytimeFunction,
    ApneaScreen,
    OtherCore,
}

/// Keyword table in precedence order.
const KEYWORDS: [(SectionTag, &str); 5] = [
    (SectionTag::Demographics, "DEMO"),
    (SectionTag::SleepQuality, "SLEEP QUALITY"),
    (SectionTag::InsomniaScreen, "INSOMNIA"),
    (SectionTag::DaytimeFunction, "DAYTIME"),
    (SectionTag::ApneaScreen, "APNEA"),
];

impl SectionTag {
    /// Classify a section header. First keyword match wins; `None` or an
    /// unmatched header yields `OtherCore`.
    pub fn classify(section: Option<&str>) -> Self {
        let Some(section) = section else {
            return SectionTag::OtherCore;
        };
        let upper = section.to_uppercase();
        for (tag, keyword) in KEYWORDS {
            if upper.contains(keyword) {
                return tag;
            }
        }
        SectionTag::OtherCore
    }
}

/// Core questions grouped by section tag, each bucket in catalog order.
#[derive(Debug, Clone, Default)]
pub struct SectionBuckets {
    pub demographics: Vec<Question>,
    pub sleep_quality: Vec<Question>,
    pub insomnia_screen: Vec<Question>,
    pub daytime_function: Vec<Question>,
    pub apnea_screen: Vec<Question>,
    pub other_core: Vec<Question>,
}

impl SectionBuckets {
    /// Partition core questions into buckets.
    pub fn partition(questions: &[Question]) -> Self {
        let mut buckets = Self::default();
        for question in questions {
            let bucket = match SectionTag::classify(question.section.as_deref()) {
                SectionTag::Demographics => &mut buckets.demographics,
                SectionTag::SleepQuality => &mut buckets.sleep_quality,
                SectionTag::InsomniaScreen => &mut buckets.insomnia_screen,
                SectionTag::DaytimeFunction => &mut buckets.daytime_function,
                SectionTag::ApneaScreen => &mut buckets.apnea_screen,
                SectionTag::OtherCore => &mut buckets.other_core,
            };
            bucket.push(question.clone());
        }
        buckets
    }

    /// Total questions across all buckets.
    pub fn len(&self) -> usize {
        self.demographics.len()
            + self.sleep_quality.len()
            + self.insomnia_screen.len()
            + self.daytime_function.len()
            + self.apnea_screen.len()
            + self.other_core.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
