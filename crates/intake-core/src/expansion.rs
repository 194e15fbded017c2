//! Expansion resolver: annotates the schedule with possible branches.
//!
//! For every day, every core question bound to a trigger rule yields one
//! [`ExpansionAnnotation`] carrying the worst-case additional load of the
//! modules the rule opens. Module names absent from the catalog contribute
//! nothing and are recorded in diagnostics. The pass is pure: annotations
//! and the minutes range are reassigned wholesale, so re-annotating an
//! already-annotated schedule regenerates identical results.

use std::collections::BTreeMap;

use crate::catalog::QuestionCatalog;
use crate::diagnostics::Diagnostics;
use crate::rules::RuleTable;
use crate::schedule::{DaySchedule, ExpansionAnnotation, MinutesRange, ModuleExpansion};

/// Annotates day schedules with the branches their questions can open.
#[derive(Debug, Clone, Default)]
pub struct ExpansionResolver;

impl ExpansionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Attach expansion annotations and minutes ranges to every day.
    pub fn annotate(
        &self,
        schedule: &mut BTreeMap<u32, DaySchedule>,
        rules: &RuleTable,
        catalog: &QuestionCatalog,
        diagnostics: &mut Diagnostics,
    ) {
        for day in schedule.values_mut() {
            let mut annotations = Vec::new();

            for question in &day.core_questions {
                let Some(rule) = rules.get(&question.id) else {
                    continue;
                };

                let mut modules = Vec::new();
                let mut total = 0usize;

                for module_name in &rule.modules {
                    match catalog.module(module_name) {
                        Some(module) => {
                            total += module.question_count();
                            modules.push(ModuleExpansion {
                                module: module.name.clone(),
                                question_count: module.question_count(),
                                questions: module.questions.clone(),
                            });
                        }
                        None => diagnostics.record_unresolved_module(module_name),
                    }
                }

                annotations.push(ExpansionAnnotation {
                    trigger_question: question.clone(),
                    condition: rule.condition_text.clone(),
                    parsed_condition: rule.condition.clone(),
                    expansion_modules: modules,
                    total_additional_questions: total,
                    estimated_additional_minutes: (total / 2) as u32,
                });
            }

            day.estimated_minutes_range = if annotations.is_empty() {
                None
            } else {
                let max_additional: usize = annotations
                    .iter()
                    .map(|a| a.total_additional_questions)
                    .sum();
                Some(MinutesRange {
                    min: day.estimated_minutes,
                    max: day.estimated_minutes + (max_additional / 2) as u32,
                })
            };
            day.possible_expansions = annotations;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AnswerType, Question, QuestionKind, CORE_MODULE};
    use crate::rules::ConditionalRule;
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
            triggers_expansion: true,
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

    fn fixture() -> (
        BTreeMap<u32, DaySchedule>,
        RuleTable,
        QuestionCatalog,
        Diagnostics,
    ) {
        let mut diag = Diagnostics::new();

        let mut questions = vec![
            core_question("CORE_1", 1, Some("INSOMNIA SCREEN")),
            core_question("CORE_2", 2, Some("DAYTIME FUNCTION")),
            core_question("CORE_3", 3, Some("APNEA SCREEN")),
        ];
        for n in 1..=7 {
            questions.push(module_question("ISI", n));
        }
        for n in 1..=8 {
            questions.push(module_question("ESS", n));
        }
        let catalog = QuestionCatalog::from_questions(questions);

        let rules = RuleTable::from_rules(
            &[
                ConditionalRule {
                    trigger_question_id: "CORE_1".to_string(),
                    condition: "YES".to_string(),
                    expanded_modules: vec!["ISI".to_string()],
                    rule_text: "IF YES: Expand to ISI (7 questions)".to_string(),
                },
                ConditionalRule {
                    trigger_question_id: "CORE_2".to_string(),
                    condition: "OFTEN/ALWAYS".to_string(),
                    expanded_modules: vec!["ESS".to_string(), "MISSING".to_string()],
                    rule_text: "IF OFTEN/ALWAYS: Expand to ESS (8 questions) + MISSING"
                        .to_string(),
                },
            ],
            &mut diag,
        );

        let schedule = DayScheduler::new().build(catalog.core(), &mut diag);
        (schedule, rules, catalog, diag)
    }

    #[test]
    fn trigger_days_gain_annotations() {
        let (mut schedule, rules, catalog, mut diag) = fixture();
        ExpansionResolver::new().annotate(&mut schedule, &rules, &catalog, &mut diag);

        let day4 = &schedule[&4];
        assert_eq!(day4.possible_expansions.len(), 1);
        let annotation = &day4.possible_expansions[0];
        assert_eq!(annotation.trigger_question.id, "CORE_1");
        assert_eq!(annotation.total_additional_questions, 7);
        assert_eq!(annotation.estimated_additional_minutes, 3);
        assert_eq!(annotation.expansion_modules.len(), 1);
        assert_eq!(annotation.expansion_modules[0].module, "ISI");
    }

    #[test]
    fn minutes_range_covers_worst_case() {
        let (mut schedule, rules, catalog, mut diag) = fixture();
        ExpansionResolver::new().annotate(&mut schedule, &rules, &catalog, &mut diag);

        let day4 = &schedule[&4];
        let range = day4.estimated_minutes_range.unwrap();
        assert_eq!(range.min, day4.estimated_minutes);
        assert_eq!(range.max, day4.estimated_minutes + 3);

        // Day 5's rule opens ESS (8 questions); MISSING contributes zero.
        let day5 = &schedule[&5];
        let range = day5.estimated_minutes_range.unwrap();
        assert_eq!(range.max, day5.estimated_minutes + 4);
    }

    #[test]
    fn days_without_triggers_have_no_range() {
        let (mut schedule, rules, catalog, mut diag) = fixture();
        ExpansionResolver::new().annotate(&mut schedule, &rules, &catalog, &mut diag);

        for day in [1u32, 2, 3, 6, 7, 14] {
            assert!(schedule[&day].possible_expansions.is_empty());
            assert!(schedule[&day].estimated_minutes_range.is_none());
        }
    }

    #[test]
    fn unresolved_module_is_skipped_and_diagnosed() {
        let (mut schedule, rules, catalog, mut diag) = fixture();
        ExpansionResolver::new().annotate(&mut schedule, &rules, &catalog, &mut diag);

        assert_eq!(diag.unresolved_modules, vec!["MISSING"]);
        let day5 = &schedule[&5];
        assert_eq!(day5.possible_expansions[0].expansion_modules.len(), 1);
        assert_eq!(day5.possible_expansions[0].total_additional_questions, 8);
    }

    #[test]
    fn annotation_is_idempotent() {
        let (mut schedule, rules, catalog, mut diag) = fixture();
        let resolver = ExpansionResolver::new();

        resolver.annotate(&mut schedule, &rules, &catalog, &mut diag);
        let first = serde_json::to_string(&schedule).unwrap();

        resolver.annotate(&mut schedule, &rules, &catalog, &mut diag);
        let second = serde_json::to_string(&schedule).unwrap();

        assert_eq!(first, second);
    }
}
