//! Best-effort normalizer for pre-extracted questionnaire sheets.
//!
//! The upstream spreadsheet is exported as plain text rows (`sheets.json`)
//! before it reaches this module; no workbook parsing happens here. The
//! "CORE Assessment" sheet yields core questions and trigger rules, and
//! every "EXPANSION - <Name>" sheet yields one expansion module. Answer
//! types and options are inferred from question text with fixed
//! heuristics. Malformed rows are skipped and counted, never fatal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{
    AnswerType, ExpansionModule, Question, QuestionCatalog, QuestionKind, CORE_MODULE,
};
use crate::diagnostics::Diagnostics;
use crate::report::IngestSummary;
use crate::rules::ConditionalRule;

/// Sheet holding the core question set.
pub const CORE_SHEET: &str = "CORE Assessment";
/// Prefix naming expansion module sheets.
pub const EXPANSION_SHEET_PREFIX: &str = "EXPANSION - ";

const GATEWAY_MARKER: &str = "GATEWAY:";
const RULE_MARKER: &str = "IF";
const RULE_ARROW: &str = "→";

/// One spreadsheet tab, pre-extracted to text cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sheet {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

/// Everything the normalizer recovered from the sheets.
#[derive(Debug, Clone, Default)]
pub struct ParsedQuestionnaire {
    /// All questions, core first, then module questions in sheet order.
    pub questions: Vec<Question>,
    pub rules: Vec<ConditionalRule>,
    pub modules: BTreeMap<String, ExpansionModule>,
}

impl ParsedQuestionnaire {
    /// Headline counts for the summary artifact.
    pub fn summary(&self) -> IngestSummary {
        let core = self.questions.iter().filter(|q| q.is_core()).count();
        IngestSummary {
            total_questions: self.questions.len(),
            core_questions: core,
            expansion_questions: self.questions.len() - core,
            modules: self.modules.keys().cloned().collect(),
            conditional_rules: self.rules.len(),
        }
    }

    /// Assemble the question catalog, merging module sheet metadata.
    pub fn into_catalog(self) -> (QuestionCatalog, Vec<ConditionalRule>) {
        let catalog =
            QuestionCatalog::from_questions(self.questions).with_module_metadata(self.modules);
        (catalog, self.rules)
    }
}

/// Normalize a set of sheets into questions, rules, and modules.
pub fn parse_sheets(sheets: &[Sheet], diagnostics: &mut Diagnostics) -> ParsedQuestionnaire {
    let mut parsed = ParsedQuestionnaire::default();

    if let Some(core_sheet) = sheets.iter().find(|s| s.name == CORE_SHEET) {
        parse_core_sheet(core_sheet, &mut parsed, diagnostics);
    }

    for sheet in sheets.iter().filter(|s| s.name.starts_with("EXPANSION")) {
        parse_expansion_sheet(sheet, &mut parsed, diagnostics);
    }

    parsed
}

fn parse_core_sheet(sheet: &Sheet, parsed: &mut ParsedQuestionnaire, diagnostics: &mut Diagnostics) {
    let mut current_section: Option<String> = None;

    for row in &sheet.rows {
        let Some(first) = cell(row, 0) else {
            continue;
        };
        let second = cell(row, 1);

        // Gateway markers replace the running section header.
        if let Some(idx) = first.find(GATEWAY_MARKER) {
            current_section = Some(first[idx + GATEWAY_MARKER.len()..].trim().to_string());
            continue;
        }

        // An all-caps first cell with nothing beside it is a section header.
        if second.is_none() && is_upper_header(first) {
            current_section = Some(first.to_string());
            continue;
        }

        if is_rule_row(first) {
            if let Some(last) = parsed.questions.iter_mut().rev().find(|q| q.is_core()) {
                if let Some(rule) = parse_trigger_rule(first, &last.id) {
                    last.triggers_expansion = true;
                    parsed.rules.push(rule);
                }
            }
            continue;
        }

        match (first.parse::<u32>(), second) {
            (Ok(number), Some(text)) => {
                parsed.questions.push(build_question(
                    format!("{CORE_MODULE}_{number}"),
                    number,
                    text,
                    QuestionKind::Core,
                    current_section.clone(),
                    CORE_MODULE,
                    diagnostics,
                ));
            }
            (Err(_), Some(_)) => diagnostics.record_skipped_row(),
            _ => {}
        }
    }
}

fn parse_expansion_sheet(
    sheet: &Sheet,
    parsed: &mut ParsedQuestionnaire,
    diagnostics: &mut Diagnostics,
) {
    let module_name = sheet
        .name
        .strip_prefix(EXPANSION_SHEET_PREFIX)
        .unwrap_or(&sheet.name)
        .trim()
        .to_string();
    let id_prefix = module_name.to_uppercase().replace(' ', "_");

    // Metadata lives in the first two rows: description, then trigger text.
    let description = sheet
        .rows
        .first()
        .and_then(|row| cell(row, 0))
        .map(str::to_string);
    let trigger_condition = sheet
        .rows
        .get(1)
        .and_then(|row| cell(row, 0))
        .filter(|c| c.to_uppercase().contains("TRIGGER"))
        .map(str::to_string);

    let mut module_questions = Vec::new();
    for row in sheet.rows.iter().skip(3) {
        let Some(first) = cell(row, 0) else {
            continue;
        };
        match (first.parse::<u32>(), cell(row, 1)) {
            (Ok(number), Some(text)) => {
                module_questions.push(build_question(
                    format!("{id_prefix}_{number}"),
                    number,
                    text,
                    QuestionKind::Expansion,
                    None,
                    &module_name,
                    diagnostics,
                ));
            }
            (Err(_), Some(_)) => diagnostics.record_skipped_row(),
            _ => {}
        }
    }

    if !module_questions.is_empty() {
        parsed.modules.insert(
            module_name.clone(),
            ExpansionModule {
                name: module_name,
                description,
                trigger_condition,
                questions: module_questions.clone(),
            },
        );
        parsed.questions.extend(module_questions);
    }
}

fn build_question(
    id: String,
    number: u32,
    text: &str,
    kind: QuestionKind,
    section: Option<String>,
    module: &str,
    diagnostics: &mut Diagnostics,
) -> Question {
    let answer_type = detect_answer_type(text);
    let options = extract_options(text);
    if answer_type == AnswerType::SingleChoice && options.is_empty() {
        diagnostics.record_degenerate_answer_type(&id);
    }

    Question {
        id,
        number,
        text: text.to_string(),
        kind,
        section,
        module: module.to_string(),
        answer_type,
        options,
        triggers_expansion: false,
    }
}

/// Infer the answer type from question text. First matching heuristic wins.
pub fn detect_answer_type(text: &str) -> AnswerType {
    let lower = text.to_lowercase();

    if lower.contains("(yes/no)") {
        AnswerType::Boolean
    } else if lower.contains("(0-10)") || lower.contains("scale") {
        AnswerType::Scale
    } else if lower.contains("never/rarely/sometimes/often/always") {
        AnswerType::Frequency
    } else if lower.contains("select all") || lower.contains("check all") {
        AnswerType::MultipleChoice
    } else if lower.contains("inches") || lower.contains("hours") || lower.contains("weight") {
        AnswerType::Numeric
    } else if lower.contains("email") {
        AnswerType::Email
    } else if lower.contains("date of birth") || lower.contains("date") {
        AnswerType::Date
    } else if lower.contains("name") {
        AnswerType::Text
    } else {
        AnswerType::SingleChoice
    }
}

/// Pull answer options out of the last parenthesized group in the text.
pub fn extract_options(text: &str) -> Vec<String> {
    let Some(group) = last_paren_group(text) else {
        return Vec::new();
    };

    if group.contains('/') {
        group.split('/').map(|o| o.trim().to_string()).collect()
    } else if group.contains(',') {
        group.split(',').map(|o| o.trim().to_string()).collect()
    } else if group.starts_with("0-10") {
        (0..=10).map(|n| n.to_string()).collect()
    } else if group.starts_with("1-10") {
        (1..=10).map(|n| n.to_string()).collect()
    } else {
        Vec::new()
    }
}

fn last_paren_group(text: &str) -> Option<&str> {
    let mut last = None;
    let mut start = None;
    for (i, c) in text.char_indices() {
        match c {
            '(' => start = Some(i + c.len_utf8()),
            ')' => {
                if let Some(s) = start.take() {
                    last = Some(&text[s..i]);
                }
            }
            _ => {}
        }
    }
    last
}

fn is_rule_row(first: &str) -> bool {
    // "→ IF YES: ..." with or without the arrow glyph surviving export.
    first.contains(RULE_ARROW) && first.contains(RULE_MARKER)
        || first.trim_start().starts_with("IF ")
}

/// Parse a trigger rule line into a persisted rule bound to a question.
///
/// Shape: "→ IF YES: Expand to ISI (7 questions) + DBAS-16 (16 questions)".
pub fn parse_trigger_rule(text: &str, trigger_question_id: &str) -> Option<ConditionalRule> {
    let (left, right) = text.split_once(':')?;
    let stripped = left.trim().trim_start_matches(RULE_ARROW).trim_start();
    let condition = stripped
        .strip_prefix(RULE_MARKER)
        .unwrap_or(stripped)
        .trim()
        .to_string();

    let expansions = right.replace("Expand to", "");
    let modules: Vec<String> = expansions
        .split('+')
        .map(|part| part.split('(').next().unwrap_or("").trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();

    if modules.is_empty() {
        return None;
    }

    Some(ConditionalRule {
        trigger_question_id: trigger_question_id.to_string(),
        condition,
        expanded_modules: modules,
        rule_text: text.to_string(),
    })
}

fn cell(row: &[String], idx: usize) -> Option<&str> {
    row.get(idx).map(|c| c.trim()).filter(|c| !c.is_empty())
}

/// Python-style uppercase test: at least one cased character, none lowercase.
fn is_upper_header(text: &str) -> bool {
    text.chars().any(|c| c.is_alphabetic()) && !text.chars().any(|c| c.is_lowercase())
}
