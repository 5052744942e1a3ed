//! Application session: class metadata, schema and roster, saved as YAML
//!
//! The importer is the only writer of schema and roster together; an import
//! either replaces both or leaves the session untouched.

use crate::core::{aggregate, Aggregates, Roster, Schema, SchemaModel};
use crate::error::GoalsheetResult;
use crate::excel::{
    report_file_name, ExcelExporter, ExcelImporter, ImportOutcome, ImportStatus, ReportInput,
};
use crate::types::{ClassMetadata, GoalKey, Mark};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    pub metadata: ClassMetadata,
    pub schema: SchemaModel,
    pub roster: Roster,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a session file; a missing file is a fresh session
    pub fn load(path: &Path) -> GoalsheetResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no session file, starting fresh");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> GoalsheetResult<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn active_schema(&self) -> Cow<'_, Schema> {
        self.schema.active()
    }

    pub fn aggregates(&self) -> Aggregates {
        aggregate(&self.active_schema().goal_keys, self.roster.students())
    }

    /// Replace schema and roster from a successful import; otherwise no change
    pub fn apply_import(&mut self, outcome: ImportOutcome) -> ImportStatus {
        let status = outcome.status();
        if let ImportOutcome::Imported(sheet) = outcome {
            self.schema = SchemaModel::imported(sheet.schema, sheet.labels);
            self.roster = Roster::from_students(sheet.students);
        }
        status
    }

    pub fn import_file(&mut self, path: &Path) -> GoalsheetResult<ImportStatus> {
        let outcome = ExcelImporter::new(path).import()?;
        Ok(self.apply_import(outcome))
    }

    pub fn add_student(&mut self, name: &str) -> GoalsheetResult<usize> {
        self.roster.add_student(name)?;
        Ok(self.roster.len())
    }

    /// Cycle the mark of student `sequence` (1-based) on a goal reference
    pub fn cycle_mark(&mut self, sequence: usize, goal: &str) -> GoalsheetResult<(GoalKey, Mark)> {
        let key = self.schema.resolve_goal(goal)?;
        let mark = self.roster.cycle_mark(sequence, &key)?;
        Ok((key, mark))
    }

    pub fn set_mark(&mut self, sequence: usize, goal: &str, mark: Mark) -> GoalsheetResult<GoalKey> {
        let key = self.schema.resolve_goal(goal)?;
        self.roster.set_mark(sequence, &key, mark)?;
        Ok(key)
    }

    pub fn set_label(&mut self, goal: &str, label: &str) -> GoalsheetResult<GoalKey> {
        let key = self.schema.resolve_goal(goal)?;
        self.schema.set_label(&key, label)?;
        Ok(key)
    }

    /// Default output file name for the report of this class
    pub fn report_path(&self) -> PathBuf {
        PathBuf::from(report_file_name(&self.metadata.class_name))
    }

    pub fn export_report(&self, path: &Path) -> GoalsheetResult<()> {
        let schema = self.active_schema();
        let aggregates = self.aggregates();
        ExcelExporter::new(self.report_input(&schema, &aggregates)).export(path)
    }

    pub fn export_template(&self, path: &Path) -> GoalsheetResult<()> {
        let schema = self.active_schema();
        let aggregates = Aggregates::default();
        ExcelExporter::new(self.report_input(&schema, &aggregates)).export_template(path)
    }

    fn report_input<'a>(&'a self, schema: &'a Schema, aggregates: &'a Aggregates) -> ReportInput<'a> {
        ReportInput {
            metadata: &self.metadata,
            schema,
            labels: &self.schema.labels,
            students: self.roster.students(),
            aggregates,
        }
    }
}
