//! Conditional rule records and the trigger lookup table.
//!
//! A rule binds a CORE question id to a condition and the expansion modules
//! that open when the condition passes. Rules are persisted with their raw
//! condition text; building a [`RuleTable`] classifies every condition once
//! so answer-time evaluation never re-parses. Duplicate trigger ids resolve
//! last-wins and are counted in diagnostics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostics;
use crate::trigger::Condition;

/// A persisted conditional rule, as ingested from the questionnaire sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalRule {
    /// CORE question whose answer is tested.
    pub trigger_question_id: String,
    /// Raw condition fragment, e.g. "YES" or ">7 hours".
    pub condition: String,
    /// Modules opened when the condition passes, in activation order.
    pub expanded_modules: Vec<String>,
    /// Original rule line from the sheet, for audit.
    pub rule_text: String,
}

/// A rule resolved for lookup: condition classified, modules in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerRule {
    pub condition_text: String,
    pub condition: Condition,
    pub modules: Vec<String>,
    pub rule_text: String,
}

/// Lookup table from trigger question id to its resolved rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleTable {
    by_trigger: BTreeMap<String, TriggerRule>,
}

impl RuleTable {
    /// Build the table from persisted rules, classifying each condition.
    ///
    /// When two rules name the same trigger question the later one wins;
    /// the shadowed id and any unclassifiable condition are recorded in
    /// `diagnostics`.
    pub fn from_rules(rules: &[ConditionalRule], diagnostics: &mut Diagnostics) -> Self {
        let mut by_trigger = BTreeMap::new();

        for rule in rules {
            let condition = Condition::parse(&rule.condition);
            if condition == Condition::Unrecognized {
                diagnostics.record_unrecognized_condition(&rule.condition);
            }

            let resolved = TriggerRule {
                condition_text: rule.condition.clone(),
                condition,
                modules: rule.expanded_modules.clone(),
                rule_text: rule.rule_text.clone(),
            };

            if by_trigger
                .insert(rule.trigger_question_id.clone(), resolved)
                .is_some()
            {
                diagnostics.record_duplicate_rule(&rule.trigger_question_id);
            }
        }

        Self { by_trigger }
    }

    /// Rule bound to the given question id, if any.
    pub fn get(&self, trigger_question_id: &str) -> Option<&TriggerRule> {
        self.by_trigger.get(trigger_question_id)
    }

    pub fn len(&self) -> usize {
        self.by_trigger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_trigger.is_empty()
    }

    /// Iterate over all resolved rules.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &TriggerRule)> {
        self.by_trigger.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(trigger: &str, condition: &str, modules: &[&str]) -> ConditionalRule {
        ConditionalRule {
            trigger_question_id: trigger.to_string(),
            condition: condition.to_string(),
            expanded_modules: modules.iter().map(|m| m.to_string()).collect(),
            rule_text: format!("IF {condition}: Expand to {}", modules.join(" + ")),
        }
    }

    #[test]
    fn conditions_are_classified_at_build_time() {
        let mut diag = Diagnostics::new();
        let table = RuleTable::from_rules(
            &[
                rule("CORE_7", "YES", &["ISI", "DBAS-16"]),
                rule("CORE_12", ">7 hours", &["SLEEP-DIARY"]),
            ],
            &mut diag,
        );

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("CORE_7").unwrap().condition,
            Condition::Equals {
                value: "Yes".to_string()
            }
        );
        assert_eq!(
            table.get("CORE_12").unwrap().condition,
            Condition::GreaterThan { threshold: 7.0 }
        );
        assert!(diag.is_clean());
    }

    #[test]
    fn duplicate_trigger_resolves_last_wins() {
        let mut diag = Diagnostics::new();
        let table = RuleTable::from_rules(
            &[
                rule("CORE_7", "YES", &["ISI"]),
                rule("CORE_7", "OFTEN/ALWAYS", &["ESS"]),
            ],
            &mut diag,
        );

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("CORE_7").unwrap().modules, vec!["ESS"]);
        assert_eq!(diag.duplicate_rules, vec!["CORE_7"]);
    }

    #[test]
    fn unrecognized_condition_is_counted_but_kept() {
        let mut diag = Diagnostics::new();
        let table = RuleTable::from_rules(&[rule("CORE_3", "WHEN TIRED", &["ESS"])], &mut diag);

        assert_eq!(
            table.get("CORE_3").unwrap().condition,
            Condition::Unrecognized
        );
        assert_eq!(diag.unrecognized_conditions, vec!["WHEN TIRED"]);
    }

    #[test]
    fn module_order_is_preserved() {
        let mut diag = Diagnostics::new();
        let table = RuleTable::from_rules(
            &[rule("CORE_7", "YES", &["ISI", "DBAS-16", "PSQI"])],
            &mut diag,
        );
        assert_eq!(
            table.get("CORE_7").unwrap().modules,
            vec!["ISI", "DBAS-16", "PSQI"]
        );
    }
}
