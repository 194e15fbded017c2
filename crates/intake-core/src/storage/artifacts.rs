//! JSON artifact persistence for pipeline stage boundaries.
//!
//! Each stage reads the previous stage's artifact and writes its own:
//! sheets -> questions/rules/modules/summary -> schedule -> journeys.
//! File names and the data directory come from [`Config`]; nothing here
//! hardcodes a path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::catalog::{ExpansionModule, Question};
use crate::diagnostics::Diagnostics;
use crate::error::ArtifactError;
use crate::ingest::Sheet;
use crate::report::{IngestSummary, ScheduleReport};
use crate::rules::ConditionalRule;
use crate::simulator::JourneyReport;

use super::{ArtifactFiles, Config};

/// Reads and writes the JSON artifacts under one data directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    files: ArtifactFiles,
}

impl ArtifactStore {
    pub fn new(dir: PathBuf, files: ArtifactFiles) -> Self {
        Self { dir, files }
    }

    /// Store over `dir` with default file names.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir.into(), ArtifactFiles::default())
    }

    /// Store resolved from configuration.
    pub fn from_config(config: &Config) -> Result<Self, crate::error::ConfigError> {
        Ok(Self::new(
            config.resolve_data_dir()?,
            config.artifacts.clone(),
        ))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn sheets_path(&self) -> PathBuf {
        self.dir.join(&self.files.sheets)
    }

    pub fn questions_path(&self) -> PathBuf {
        self.dir.join(&self.files.questions)
    }

    pub fn rules_path(&self) -> PathBuf {
        self.dir.join(&self.files.rules)
    }

    pub fn modules_path(&self) -> PathBuf {
        self.dir.join(&self.files.modules)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(&self.files.summary)
    }

    pub fn schedule_path(&self) -> PathBuf {
        self.dir.join(&self.files.schedule)
    }

    pub fn diagnostics_path(&self) -> PathBuf {
        self.dir.join(&self.files.diagnostics)
    }

    pub fn journey_path(&self, persona: &str) -> PathBuf {
        self.dir
            .join(format!("{}{persona}.json", self.files.journey_prefix))
    }

    pub fn load_sheets(&self) -> Result<Vec<Sheet>, ArtifactError> {
        read_json(&self.sheets_path())
    }

    pub fn save_sheets(&self, sheets: &[Sheet]) -> Result<(), ArtifactError> {
        self.write_json(&self.sheets_path(), sheets)
    }

    pub fn load_questions(&self) -> Result<Vec<Question>, ArtifactError> {
        read_json(&self.questions_path())
    }

    pub fn save_questions(&self, questions: &[Question]) -> Result<(), ArtifactError> {
        self.write_json(&self.questions_path(), questions)
    }

    pub fn load_rules(&self) -> Result<Vec<ConditionalRule>, ArtifactError> {
        read_json(&self.rules_path())
    }

    pub fn save_rules(&self, rules: &[ConditionalRule]) -> Result<(), ArtifactError> {
        self.write_json(&self.rules_path(), rules)
    }

    pub fn load_modules(&self) -> Result<BTreeMap<String, ExpansionModule>, ArtifactError> {
        read_json(&self.modules_path())
    }

    pub fn save_modules(
        &self,
        modules: &BTreeMap<String, ExpansionModule>,
    ) -> Result<(), ArtifactError> {
        self.write_json(&self.modules_path(), modules)
    }

    pub fn load_summary(&self) -> Result<IngestSummary, ArtifactError> {
        read_json(&self.summary_path())
    }

    pub fn save_summary(&self, summary: &IngestSummary) -> Result<(), ArtifactError> {
        self.write_json(&self.summary_path(), summary)
    }

    pub fn load_schedule(&self) -> Result<ScheduleReport, ArtifactError> {
        read_json(&self.schedule_path())
    }

    pub fn save_schedule(&self, report: &ScheduleReport) -> Result<(), ArtifactError> {
        self.write_json(&self.schedule_path(), report)
    }

    pub fn load_diagnostics(&self) -> Result<Diagnostics, ArtifactError> {
        read_json(&self.diagnostics_path())
    }

    pub fn save_diagnostics(&self, diagnostics: &Diagnostics) -> Result<(), ArtifactError> {
        self.write_json(&self.diagnostics_path(), diagnostics)
    }

    pub fn load_journey(&self, persona: &str) -> Result<JourneyReport, ArtifactError> {
        read_json(&self.journey_path(persona))
    }

    pub fn save_journey(&self, report: &JourneyReport) -> Result<(), ArtifactError> {
        self.write_json(&self.journey_path(&report.persona), report)
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), ArtifactError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| ArtifactError::WriteFailed {
            path: self.dir.clone(),
            source: e,
        })?;
        let json = serde_json::to_string_pretty(value).map_err(|e| ArtifactError::ParseFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| ArtifactError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|e| ArtifactError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ArtifactError::ParseFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
