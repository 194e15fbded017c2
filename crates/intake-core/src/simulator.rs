//! Synthetic journey simulation over a built schedule.
//!
//! A [`JourneySimulator`] walks the 14-day plan as one synthetic user,
//! drawing answers from a persona-shaped distribution and resolving
//! expansion triggers against the recorded answers. Within a day, core
//! questions are answered in scheduled order before any expansion
//! question, and modules within an annotation are processed in rule order.
//!
//! Runs are seedable (`Mcg128Xsl64`) so a journey can be replayed exactly.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::catalog::{AnswerType, Question};
use crate::error::ValidationError;
use crate::schedule::{DaySchedule, TOTAL_DAYS};
use crate::trigger::ResponseValue;

/// Default frequency scale when a question carries no options.
pub const DEFAULT_FREQUENCY_OPTIONS: [&str; 5] =
    ["Never", "Rarely", "Sometimes", "Often", "Always"];

/// Response-generation profile for a synthetic user.
///
/// `balanced` reproduces the historical fixed distributions; the other
/// presets skew the same knobs toward a healthy or problematic sleeper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaProfile {
    pub name: String,
    /// Probability a boolean question answers "Yes".
    pub yes_probability: f64,
    /// Inclusive bounds for scale answers.
    pub scale_range: (i64, i64),
    /// Weights over the five-point frequency scale, Never through Always.
    pub frequency_weights: [u32; 5],
}

impl PersonaProfile {
    pub fn balanced() -> Self {
        Self {
            name: "balanced".to_string(),
            yes_probability: 0.65,
            scale_range: (3, 8),
            frequency_weights: [10, 20, 40, 20, 10],
        }
    }

    pub fn healthy() -> Self {
        Self {
            name: "healthy".to_string(),
            yes_probability: 0.30,
            scale_range: (1, 5),
            frequency_weights: [30, 30, 25, 10, 5],
        }
    }

    pub fn problematic() -> Self {
        Self {
            name: "problematic".to_string(),
            yes_probability: 0.85,
            scale_range: (6, 10),
            frequency_weights: [5, 10, 25, 30, 30],
        }
    }

    /// Look up a preset by name.
    pub fn by_name(name: &str) -> Result<Self, ValidationError> {
        match name {
            "balanced" => Ok(Self::balanced()),
            "healthy" => Ok(Self::healthy()),
            "problematic" => Ok(Self::problematic()),
            other => Err(ValidationError::UnknownPersona(other.to_string())),
        }
    }

    /// All built-in presets.
    pub fn presets() -> Vec<Self> {
        vec![Self::balanced(), Self::healthy(), Self::problematic()]
    }
}

/// One recorded answer. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub question_id: String,
    pub question_text: String,
    pub response: ResponseValue,
    pub day: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion: Option<bool>,
    pub timestamp: DateTime<Utc>,
}

/// Abbreviated record of an answered core question in a day log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedQuestion {
    pub id: String,
    pub text: String,
    pub response: String,
}

/// An expansion that fired during one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggeredExpansion {
    pub trigger_question_id: String,
    pub trigger_response: String,
    pub modules: Vec<String>,
    pub additional_questions: usize,
}

/// Journey-level record of a fired expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpansionEvent {
    pub day: u32,
    pub modules: Vec<String>,
    pub question_count: usize,
}

/// Everything that happened on one simulated day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayLog {
    pub day: u32,
    pub date_simulated: DateTime<Utc>,
    pub title: String,
    pub description: String,
    pub core_questions_completed: Vec<CompletedQuestion>,
    pub expansions_triggered: Vec<TriggeredExpansion>,
    pub total_questions_answered: usize,
    pub total_time_minutes: u32,
}

/// The persisted journey artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyReport {
    pub persona: String,
    pub run_id: String,
    pub simulation_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub total_days: u32,
    pub total_questions_answered: usize,
    pub total_time_minutes: u32,
    pub expansions_triggered_count: usize,
    pub expansions_triggered: Vec<ExpansionEvent>,
    pub daily_logs: BTreeMap<u32, DayLog>,
    pub user_responses: BTreeMap<String, UserResponse>,
}

/// Walks a schedule as one synthetic user.
pub struct JourneySimulator {
    schedule: BTreeMap<u32, DaySchedule>,
    persona: PersonaProfile,
    seed: Option<u64>,
    rng: Mcg128Xsl64,
    responses: BTreeMap<String, UserResponse>,
    triggered: Vec<ExpansionEvent>,
    daily_logs: BTreeMap<u32, DayLog>,
}

impl JourneySimulator {
    /// Create a simulator with entropy seeding.
    pub fn new(schedule: BTreeMap<u32, DaySchedule>, persona: PersonaProfile) -> Self {
        Self {
            schedule,
            persona,
            seed: None,
            rng: Mcg128Xsl64::from_entropy(),
            responses: BTreeMap::new(),
            triggered: Vec::new(),
            daily_logs: BTreeMap::new(),
        }
    }

    /// Create a reproducible simulator from a fixed seed.
    pub fn with_seed(
        schedule: BTreeMap<u32, DaySchedule>,
        persona: PersonaProfile,
        seed: u64,
    ) -> Self {
        Self {
            schedule,
            persona,
            seed: Some(seed),
            rng: Mcg128Xsl64::seed_from_u64(seed),
            responses: BTreeMap::new(),
            triggered: Vec::new(),
            daily_logs: BTreeMap::new(),
        }
    }

    /// Draw one answer consistent with the question's answer type.
    pub fn simulate_response(&mut self, question: &Question) -> ResponseValue {
        match question.answer_type {
            AnswerType::Boolean => {
                if self.rng.gen_bool(self.persona.yes_probability) {
                    "Yes".into()
                } else {
                    "No".into()
                }
            }
            AnswerType::Scale => {
                let (lo, hi) = self.persona.scale_range;
                ResponseValue::Integer(self.rng.gen_range(lo..=hi))
            }
            AnswerType::Frequency => self.frequency_response(question),
            AnswerType::Numeric => self.numeric_response(question),
            AnswerType::Text => "Simulated User".into(),
            AnswerType::Email => "user@example.com".into(),
            AnswerType::Date => {
                let years_ago: i64 = self.rng.gen_range(25..=65);
                let birthdate = Utc::now() - Duration::days(years_ago * 365);
                birthdate.format("%Y-%m-%d").to_string().into()
            }
            AnswerType::SingleChoice => match question.options.choose(&mut self.rng) {
                Some(option) => option.clone().into(),
                None => "Other".into(),
            },
            AnswerType::MultipleChoice => "Simulated response".into(),
        }
    }

    fn frequency_response(&mut self, question: &Question) -> ResponseValue {
        if question.options.len() == DEFAULT_FREQUENCY_OPTIONS.len() {
            let index = self.weighted_index(question.options.len());
            return question.options[index].clone().into();
        }
        if let Some(option) = question.options.choose(&mut self.rng) {
            return option.clone().into();
        }
        let index = self.weighted_index(DEFAULT_FREQUENCY_OPTIONS.len());
        DEFAULT_FREQUENCY_OPTIONS[index].into()
    }

    fn weighted_index(&mut self, len: usize) -> usize {
        match WeightedIndex::new(self.persona.frequency_weights) {
            Ok(dist) => dist.sample(&mut self.rng).min(len - 1),
            Err(_) => self.rng.gen_range(0..len),
        }
    }

    fn numeric_response(&mut self, question: &Question) -> ResponseValue {
        let text = question.text.to_lowercase();
        if text.contains("hours") {
            ResponseValue::Number(self.rng.gen_range(5.5..8.5))
        } else if text.contains("neck") {
            ResponseValue::Number(self.rng.gen_range(14.0..17.0))
        } else if text.contains("weight") {
            ResponseValue::Integer(self.rng.gen_range(120..=200))
        } else if text.contains("height") {
            ResponseValue::Integer(self.rng.gen_range(60..=75))
        } else {
            ResponseValue::Integer(self.rng.gen_range(1..=10))
        }
    }

    /// Simulate one day: answer its core questions in order, then resolve
    /// and answer any triggered expansions.
    pub fn simulate_day(&mut self, day: u32) {
        let Some(day_schedule) = self.schedule.get(&day).cloned() else {
            return;
        };

        let mut log = DayLog {
            day,
            date_simulated: Utc::now(),
            title: day_schedule.title.clone(),
            description: day_schedule.description.clone(),
            core_questions_completed: Vec::new(),
            expansions_triggered: Vec::new(),
            total_questions_answered: 0,
            total_time_minutes: day_schedule.estimated_minutes,
        };

        for question in &day_schedule.core_questions {
            let response = self.simulate_response(question);
            self.responses.insert(
                question.id.clone(),
                UserResponse {
                    question_id: question.id.clone(),
                    question_text: question.text.clone(),
                    response: response.clone(),
                    day,
                    module: None,
                    expansion: None,
                    timestamp: Utc::now(),
                },
            );
            log.core_questions_completed.push(CompletedQuestion {
                id: question.id.clone(),
                text: preview(&question.text),
                response: response.to_string(),
            });
            log.total_questions_answered += 1;
        }

        for annotation in &day_schedule.possible_expansions {
            let Some(recorded) = self.responses.get(&annotation.trigger_question.id) else {
                continue;
            };
            let trigger_response = recorded.response.clone();

            if !annotation.parsed_condition.evaluate(&trigger_response) {
                continue;
            }

            let mut fired = TriggeredExpansion {
                trigger_question_id: annotation.trigger_question.id.clone(),
                trigger_response: trigger_response.to_string(),
                modules: Vec::new(),
                additional_questions: 0,
            };

            for module_info in &annotation.expansion_modules {
                fired.modules.push(module_info.module.clone());
                fired.additional_questions += module_info.questions.len();

                for exp_question in &module_info.questions {
                    let response = self.simulate_response(exp_question);
                    self.responses.insert(
                        exp_question.id.clone(),
                        UserResponse {
                            question_id: exp_question.id.clone(),
                            question_text: exp_question.text.clone(),
                            response,
                            day,
                            module: Some(module_info.module.clone()),
                            expansion: Some(true),
                            timestamp: Utc::now(),
                        },
                    );
                    log.total_questions_answered += 1;
                }
            }

            log.total_time_minutes += annotation.estimated_additional_minutes;
            self.triggered.push(ExpansionEvent {
                day,
                modules: fired.modules.clone(),
                question_count: fired.additional_questions,
            });
            log.expansions_triggered.push(fired);
        }

        self.daily_logs.insert(day, log);
    }

    /// Log for an already-simulated day.
    pub fn day_log(&self, day: u32) -> Option<&DayLog> {
        self.daily_logs.get(&day)
    }

    /// Walk all 14 days and assemble the journey report.
    pub fn run(mut self) -> JourneyReport {
        for day in 1..=TOTAL_DAYS {
            self.simulate_day(day);
        }

        let total_questions_answered: usize = self
            .daily_logs
            .values()
            .map(|l| l.total_questions_answered)
            .sum();
        let total_time_minutes: u32 =
            self.daily_logs.values().map(|l| l.total_time_minutes).sum();

        JourneyReport {
            persona: self.persona.name.clone(),
            run_id: uuid::Uuid::new_v4().to_string(),
            simulation_date: Utc::now(),
            seed: self.seed,
            total_days: TOTAL_DAYS,
            total_questions_answered,
            total_time_minutes,
            expansions_triggered_count: self.triggered.len(),
            expansions_triggered: self.triggered,
            daily_logs: self.daily_logs,
            user_responses: self.responses,
        }
    }
}

/// Truncate long question text for day-log display.
fn preview(text: &str) -> String {
    const LIMIT: usize = 60;
    if text.chars().count() > LIMIT {
        let head: String = text.chars().take(LIMIT).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{QuestionCatalog, QuestionKind, CORE_MODULE};
    use crate::diagnostics::Diagnostics;
    use crate::expansion::ExpansionResolver;
    use crate::rules::{ConditionalRule, RuleTable};
    use crate::scheduler::DayScheduler;

    fn core_question(id: &str, number: u32, section: Option<&str>) -> Question {
        Question {
            id: id.to_string(),
            number,
            text: format!("Question {number}?"),
            kind: QuestionKind::Core,
            section: section.map(str::to_string),
            module: CORE_MODULE.to_string(),
            answer_type: AnswerType::Boolean,
            options: vec!["Yes".to_string(), "No".to_string()],
            triggers_expansion: false,
        }
    }

    fn module_question(module: &str, number: u32) -> Question {
        Question {
            id: format!("{module}_{number}"),
            number,
            text: format!("{module} item {number}"),
            kind: QuestionKind::Expansion,
            section: None,
            module: module.to_string(),
            answer_type: AnswerType::Scale,
            options: Vec::new(),
            triggers_expansion: false,
        }
    }

    fn annotated_schedule() -> BTreeMap<u32, DaySchedule> {
        let mut diag = Diagnostics::new();

        let mut questions = vec![core_question("CORE_1", 1, Some("INSOMNIA SCREEN"))];
        for n in 1..=7 {
            questions.push(module_question("ISI", n));
        }
        let catalog = QuestionCatalog::from_questions(questions);

        let rules = RuleTable::from_rules(
            &[ConditionalRule {
                trigger_question_id: "CORE_1".to_string(),
                condition: "YES".to_string(),
                expanded_modules: vec!["ISI".to_string()],
                rule_text: "IF YES: Expand to ISI (7 questions)".to_string(),
            }],
            &mut diag,
        );

        let mut schedule = DayScheduler::new().build(catalog.core(), &mut diag);
        ExpansionResolver::new().annotate(&mut schedule, &rules, &catalog, &mut diag);
        schedule
    }

    fn always_yes() -> PersonaProfile {
        PersonaProfile {
            name: "always-yes".to_string(),
            yes_probability: 1.0,
            ..PersonaProfile::balanced()
        }
    }

    fn never_yes() -> PersonaProfile {
        PersonaProfile {
            name: "never-yes".to_string(),
            yes_probability: 0.0,
            ..PersonaProfile::balanced()
        }
    }

    #[test]
    fn yes_answer_fires_expansion_with_full_module() {
        let mut sim = JourneySimulator::with_seed(annotated_schedule(), always_yes(), 42);
        sim.simulate_day(4);

        let log = sim.day_log(4).unwrap();
        assert_eq!(log.expansions_triggered.len(), 1);
        assert_eq!(log.expansions_triggered[0].additional_questions, 7);
        // 1 core + 7 expansion answers.
        assert_eq!(log.total_questions_answered, 8);
        // Base 3 minutes + floor(7/2).
        assert_eq!(log.total_time_minutes, 3 + 3);

        let expansion_responses: Vec<_> = sim
            .responses
            .values()
            .filter(|r| r.expansion == Some(true))
            .collect();
        assert_eq!(expansion_responses.len(), 7);
        assert!(expansion_responses
            .iter()
            .all(|r| r.module.as_deref() == Some("ISI") && r.day == 4));
    }

    #[test]
    fn no_answer_leaves_expansion_closed() {
        let mut sim = JourneySimulator::with_seed(annotated_schedule(), never_yes(), 42);
        sim.simulate_day(4);

        let log = sim.day_log(4).unwrap();
        assert!(log.expansions_triggered.is_empty());
        assert_eq!(log.total_questions_answered, 1);
        assert_eq!(log.total_time_minutes, 3);
    }

    #[test]
    fn same_seed_reproduces_the_journey() {
        let run = |seed| {
            let sim = JourneySimulator::with_seed(annotated_schedule(), always_yes(), seed);
            let report = sim.run();
            report
                .user_responses
                .values()
                .map(|r| (r.question_id.clone(), r.response.to_string()))
                .collect::<Vec<_>>()
        };

        assert_eq!(run(7), run(7));
    }

    #[test]
    fn different_seeds_diverge() {
        let draws = |seed| {
            let mut question = core_question("CORE_20", 20, None);
            question.answer_type = AnswerType::Scale;
            let mut sim = JourneySimulator::with_seed(BTreeMap::new(), always_yes(), seed);
            (0..20)
                .map(|_| sim.simulate_response(&question).to_string())
                .collect::<Vec<_>>()
        };

        assert_ne!(draws(7), draws(8));
    }

    #[test]
    fn report_totals_match_daily_logs() {
        let sim = JourneySimulator::with_seed(annotated_schedule(), always_yes(), 1);
        let report = sim.run();

        assert_eq!(report.total_days, 14);
        let from_logs: usize = report
            .daily_logs
            .values()
            .map(|l| l.total_questions_answered)
            .sum();
        assert_eq!(report.total_questions_answered, from_logs);
        assert_eq!(report.expansions_triggered_count, 1);
        assert_eq!(report.expansions_triggered[0].day, 4);
        assert_eq!(report.expansions_triggered[0].question_count, 7);
        assert_eq!(report.seed, Some(1));
    }

    #[test]
    fn frequency_answers_stay_on_the_scale() {
        let question = Question {
            answer_type: AnswerType::Frequency,
            options: DEFAULT_FREQUENCY_OPTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ..core_question("CORE_9", 9, None)
        };

        let schedule = BTreeMap::new();
        let mut sim = JourneySimulator::with_seed(schedule, PersonaProfile::balanced(), 3);
        for _ in 0..50 {
            let response = sim.simulate_response(&question);
            let text = response.as_text().unwrap().to_string();
            assert!(DEFAULT_FREQUENCY_OPTIONS.contains(&text.as_str()));
        }
    }

    #[test]
    fn numeric_answers_respect_keyword_ranges() {
        let mut question = core_question("CORE_10", 10, None);
        question.answer_type = AnswerType::Numeric;
        question.text = "How many hours do you sleep?".to_string();
        question.options = Vec::new();

        let mut sim = JourneySimulator::with_seed(BTreeMap::new(), PersonaProfile::balanced(), 5);
        for _ in 0..50 {
            let value = sim.simulate_response(&question).as_number().unwrap();
            assert!((5.5..8.5).contains(&value));
        }
    }

    #[test]
    fn single_choice_without_options_degrades_to_other() {
        let mut question = core_question("CORE_11", 11, None);
        question.answer_type = AnswerType::SingleChoice;
        question.options = Vec::new();

        let mut sim = JourneySimulator::with_seed(BTreeMap::new(), PersonaProfile::balanced(), 5);
        assert_eq!(
            sim.simulate_response(&question),
            ResponseValue::Text("Other".to_string())
        );
    }

    #[test]
    fn unknown_persona_is_rejected() {
        assert!(matches!(
            PersonaProfile::by_name("insomniac-robot"),
            Err(ValidationError::UnknownPersona(_))
        ));
        assert_eq!(PersonaProfile::by_name("healthy").unwrap().name, "healthy");
    }

    #[test]
    fn preview_truncates_long_text() {
        let long = "x".repeat(80);
        assert_eq!(preview(&long).chars().count(), 63);
        assert_eq!(preview("short"), "short");
    }
}
