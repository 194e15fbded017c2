//! Question catalog: the immutable question bank.
//!
//! Questions are partitioned into the always-asked CORE set and named
//! expansion modules that only activate when a gateway answer triggers them.
//! The catalog is built once from ingested records and read-only afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Module name reserved for the core question set.
pub const CORE_MODULE: &str = "CORE";

/// Whether a question belongs to the core set or an expansion module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QuestionKind {
    Core,
    Expansion,
}

/// Answer format of a question.
///
/// Unknown values in stored artifacts fall back to `SingleChoice`, the
/// degenerate default; ingestion counts those cases separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerType {
    Boolean,
    Scale,
    Frequency,
    MultipleChoice,
    Numeric,
    Email,
    Date,
    Text,
    #[serde(other)]
    SingleChoice,
}

/// A single questionnaire item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Globally unique identifier, e.g. `CORE_12` or `ISI_3`.
    pub id: String,
    /// Position within the source sheet.
    pub number: u32,
    /// Question text as shown to the user.
    pub text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Source section header, when the sheet provided one.
    #[serde(default)]
    pub section: Option<String>,
    /// Owning module: `CORE` or an expansion module name.
    pub module: String,
    pub answer_type: AnswerType,
    #[serde(default)]
    pub options: Vec<String>,
    /// Set when a trigger rule is bound to this question.
    #[serde(default)]
    pub triggers_expansion: bool,
}

impl Question {
    /// True for members of the core set.
    pub fn is_core(&self) -> bool {
        self.module == CORE_MODULE
    }
}

/// A named bundle of conditionally-activated questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionModule {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Raw trigger text from the module sheet header, for audit.
    #[serde(default)]
    pub trigger_condition: Option<String>,
    pub questions: Vec<Question>,
}

impl ExpansionModule {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// Immutable question bank: the core set plus expansion modules by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionCatalog {
    core: Vec<Question>,
    modules: BTreeMap<String, ExpansionModule>,
}

impl QuestionCatalog {
    /// Partition a flat question list into core and per-module sets.
    ///
    /// Questions keep their input order within each partition. Module
    /// entries are created on demand with no description; use
    /// [`QuestionCatalog::with_module_metadata`] to merge sheet metadata in.
    pub fn from_questions(questions: Vec<Question>) -> Self {
        let mut core = Vec::new();
        let mut modules: BTreeMap<String, ExpansionModule> = BTreeMap::new();

        for question in questions {
            if question.is_core() {
                core.push(question);
            } else {
                modules
                    .entry(question.module.clone())
                    .or_insert_with(|| ExpansionModule {
                        name: question.module.clone(),
                        description: None,
                        trigger_condition: None,
                        questions: Vec::new(),
                    })
                    .questions
                    .push(question);
            }
        }

        Self { core, modules }
    }

    /// Merge description and trigger text from separately-ingested module
    /// metadata. Question lists already in the catalog win over metadata.
    pub fn with_module_metadata(mut self, metadata: BTreeMap<String, ExpansionModule>) -> Self {
        for (name, meta) in metadata {
            match self.modules.get_mut(&name) {
                Some(module) => {
                    module.description = meta.description;
                    module.trigger_condition = meta.trigger_condition;
                }
                None => {
                    self.modules.insert(name, meta);
                }
            }
        }
        self
    }

    /// The always-asked core questions, in catalog order.
    pub fn core(&self) -> &[Question] {
        &self.core
    }

    /// Look up an expansion module by name.
    pub fn module(&self, name: &str) -> Option<&ExpansionModule> {
        self.modules.get(name)
    }

    /// All expansion modules, keyed by name.
    pub fn modules(&self) -> &BTreeMap<String, ExpansionModule> {
        &self.modules
    }

    /// Total question count across core and all modules.
    pub fn len(&self) -> usize {
        self.core.len()
            + self
                .modules
                .values()
                .map(|m| m.questions.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check catalog invariants: globally unique ids, and every module
    /// question carrying its owning module's name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = std::collections::HashSet::new();

        for question in self.core.iter() {
            if !seen.insert(question.id.as_str()) {
                return Err(ValidationError::DuplicateQuestionId(question.id.clone()));
            }
        }

        for (name, module) in &self.modules {
            for question in &module.questions {
                if !seen.insert(question.id.as_str()) {
                    return Err(ValidationError::DuplicateQuestionId(question.id.clone()));
                }
                if &question.module != name {
                    return Err(ValidationError::ModuleMismatch {
                        question_id: question.id.clone(),
                        expected: name.clone(),
                        actual: question.module.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
