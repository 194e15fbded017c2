//! # Intake Core Library
//!
//! This library provides the core logic for Intake, an adaptive 14-day
//! onboarding questionnaire engine. It implements a CLI-first philosophy
//! where every pipeline stage is available via a standalone binary; the
//! stages exchange plain JSON artifacts.
//!
//! ## Architecture
//!
//! - **Ingestion**: best-effort normalization of pre-extracted spreadsheet
//!   rows into question, rule, and module records
//! - **Scheduling**: partitions the core question set across days 1-14
//!   under fixed pacing and thematic constraints
//! - **Expansion**: annotates each day with the conditional branches its
//!   gateway questions can open, and the worst-case additional load
//! - **Simulation**: seedable synthetic users walking the schedule to
//!   validate pacing and trigger logic
//!
//! ## Key Components
//!
//! - [`QuestionCatalog`]: the immutable question bank
//! - [`DayScheduler`]: builds the 14-day skeleton
//! - [`ExpansionResolver`]: attaches branch annotations
//! - [`Condition`]: classified trigger conditions, parsed once at ingestion
//! - [`JourneySimulator`]: persona-profiled response walker
//! - [`Diagnostics`]: counters for every silently-degraded case

pub mod catalog;
pub mod diagnostics;
pub mod error;
pub mod expansion;
pub mod ingest;
pub mod report;
pub mod rules;
pub mod schedule;
pub mod scheduler;
pub mod simulator;
pub mod storage;
pub mod trigger;

pub use catalog::{AnswerType, ExpansionModule, Question, QuestionCatalog, QuestionKind};
pub use diagnostics::Diagnostics;
pub use error::{ArtifactError, ConfigError, CoreError, ValidationError};
pub use expansion::ExpansionResolver;
pub use ingest::{parse_sheets, ParsedQuestionnaire, Sheet};
pub use report::{IngestSummary, ScheduleReport};
pub use rules::{ConditionalRule, RuleTable, TriggerRule};
pub use schedule::{DaySchedule, ExpansionAnnotation, MinutesRange, TOTAL_DAYS};
pub use scheduler::{DayScheduler, SectionTag};
pub use simulator::{JourneyReport, JourneySimulator, PersonaProfile, UserResponse};
pub use storage::{ArtifactStore, Config};
pub use trigger::{evaluate, Condition, ResponseValue};
