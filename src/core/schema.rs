//! Goal-column schema: ordered goal keys and the categories that group them
//!
//! The active schema is either the built-in one or the one inferred from the
//! last imported workbook. The choice is an explicit [`SchemaSource`] rather
//! than an "empty list means default" convention.

use crate::error::{GoalsheetError, GoalsheetResult};
use crate::types::{label_for, GoalKey, GoalLabels};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Built-in categories: (id, printed name, goal count)
pub const DEFAULT_CATEGORIES: [(&str, &str, usize); 5] = [
    ("pttc", "PTTC", 5),
    ("ptnt", "PTNT", 5),
    ("ptnn", "PTNN", 5),
    ("tcknxh", "TC, KN, XH", 5),
    ("pttm", "PTTM", 5),
];

/// A named, contiguous group of goal columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub goal_count: usize,
}

impl Category {
    pub fn new(name: impl Into<String>, goal_count: usize) -> Self {
        Self {
            name: name.into(),
            goal_count,
        }
    }
}

/// Ordered goal keys partitioned by ordered categories
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    pub categories: Vec<Category>,
    pub goal_keys: Vec<GoalKey>,
}

impl Schema {
    pub fn new(categories: Vec<Category>, goal_keys: Vec<GoalKey>) -> Self {
        Self {
            categories,
            goal_keys,
        }
    }

    /// The schema shipped with the application (five areas × five goals)
    pub fn builtin() -> Self {
        let mut categories = Vec::with_capacity(DEFAULT_CATEGORIES.len());
        let mut goal_keys = Vec::new();
        for (id, name, count) in DEFAULT_CATEGORIES {
            categories.push(Category::new(name, count));
            goal_keys.extend((0..count).map(|i| GoalKey::new(format!("{}_{}", id, i))));
        }
        Self {
            categories,
            goal_keys,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.goal_keys.is_empty()
    }

    pub fn goal_count(&self) -> usize {
        self.goal_keys.len()
    }

    /// Categories cover the goal keys exactly, each with at least one goal
    pub fn is_partitioned(&self) -> bool {
        self.categories.iter().all(|c| c.goal_count > 0)
            && self.categories.iter().map(|c| c.goal_count).sum::<usize>() == self.goal_keys.len()
    }

    /// Goal keys owned by each category, in display order
    pub fn groups(&self) -> Vec<(&Category, &[GoalKey])> {
        let mut start = 0;
        let mut groups = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            let end = (start + category.goal_count).min(self.goal_keys.len());
            groups.push((category, &self.goal_keys[start.min(end)..end]));
            start = end;
        }
        groups
    }

    pub fn position(&self, key: &GoalKey) -> Option<usize> {
        self.goal_keys.iter().position(|k| k == key)
    }

    pub fn contains(&self, key: &GoalKey) -> bool {
        self.position(key).is_some()
    }
}

/// Which schema is active
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum SchemaSource {
    #[default]
    Default,
    Imported(Schema),
}

impl SchemaSource {
    /// An empty imported schema never overrides the default
    pub fn from_import(schema: Schema) -> Self {
        if schema.goal_keys.is_empty() {
            SchemaSource::Default
        } else {
            SchemaSource::Imported(schema)
        }
    }

    pub fn resolve(&self) -> Cow<'_, Schema> {
        match self {
            SchemaSource::Default => Cow::Owned(Schema::builtin()),
            SchemaSource::Imported(schema) => Cow::Borrowed(schema),
        }
    }

    pub fn is_imported(&self) -> bool {
        matches!(self, SchemaSource::Imported(_))
    }
}

/// Active schema plus the editable goal labels
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaModel {
    pub source: SchemaSource,
    pub labels: GoalLabels,
}

impl SchemaModel {
    pub fn imported(schema: Schema, labels: GoalLabels) -> Self {
        Self {
            source: SchemaSource::from_import(schema),
            labels,
        }
    }

    pub fn active(&self) -> Cow<'_, Schema> {
        self.source.resolve()
    }

    pub fn label(&self, key: &GoalKey) -> &str {
        label_for(&self.labels, key)
    }

    pub fn set_label(&mut self, key: &GoalKey, label: &str) -> GoalsheetResult<()> {
        if !self.active().contains(key) {
            return Err(GoalsheetError::UnknownGoal(key.to_string()));
        }
        self.labels.insert(key.clone(), label.trim().to_string());
        Ok(())
    }

    /// Find a goal by key, then by label, then by 1-based column position
    pub fn resolve_goal(&self, reference: &str) -> GoalsheetResult<GoalKey> {
        let reference = reference.trim();
        let schema = self.active();

        if let Some(key) = schema.goal_keys.iter().find(|k| k.as_str() == reference) {
            return Ok(key.clone());
        }
        if let Some(key) = schema
            .goal_keys
            .iter()
            .find(|k| self.labels.get(*k).is_some_and(|l| l == reference))
        {
            return Ok(key.clone());
        }
        if let Ok(position) = reference.parse::<usize>() {
            if let Some(key) = position.checked_sub(1).and_then(|i| schema.goal_keys.get(i)) {
                return Ok(key.clone());
            }
        }

        Err(GoalsheetError::UnknownGoal(reference.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_schema() -> Schema {
        Schema::new(
            vec![Category::new("A", 2), Category::new("B", 1)],
            vec!["dyn_0".into(), "dyn_1".into(), "dyn_2".into()],
        )
    }

    #[test]
    fn test_builtin_schema_shape() {
        let schema = Schema::builtin();
        assert_eq!(schema.categories.len(), 5);
        assert_eq!(schema.goal_count(), 25);
        assert!(schema.is_partitioned());
        assert_eq!(schema.goal_keys[0].as_str(), "pttc_0");
        assert_eq!(schema.goal_keys[24].as_str(), "pttm_4");
        assert_eq!(schema.categories[3].name, "TC, KN, XH");
    }

    #[test]
    fn test_groups_follow_partition() {
        let schema = small_schema();
        let groups = schema.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1, &[GoalKey::from("dyn_2")]);
    }

    #[test]
    fn test_partition_violation_detected() {
        let schema = Schema::new(vec![Category::new("A", 3)], vec!["dyn_0".into()]);
        assert!(!schema.is_partitioned());
        // groups never slice out of bounds
        assert_eq!(schema.groups()[0].1.len(), 1);
    }

    #[test]
    fn test_source_default_resolves_builtin() {
        let source = SchemaSource::Default;
        assert_eq!(source.resolve().into_owned(), Schema::builtin());
    }

    #[test]
    fn test_source_imported_overrides_default() {
        let source = SchemaSource::from_import(small_schema());
        assert!(source.is_imported());
        assert_eq!(source.resolve().goal_count(), 3);
    }

    #[test]
    fn test_empty_import_keeps_default() {
        let source = SchemaSource::from_import(Schema::default());
        assert_eq!(source, SchemaSource::Default);
    }

    #[test]
    fn test_set_label_rejects_inactive_key() {
        let mut model = SchemaModel::default();
        assert!(model.set_label(&"pttc_0".into(), " MT15 ").is_ok());
        assert_eq!(model.label(&"pttc_0".into()), "MT15");
        assert!(matches!(
            model.set_label(&"dyn_0".into(), "MT1"),
            Err(GoalsheetError::UnknownGoal(_))
        ));
    }

    #[test]
    fn test_resolve_goal_by_key_label_position() {
        let mut labels = GoalLabels::new();
        labels.insert("dyn_1".into(), "MT29".to_string());
        let model = SchemaModel::imported(small_schema(), labels);

        assert_eq!(model.resolve_goal("dyn_2").unwrap(), GoalKey::from("dyn_2"));
        assert_eq!(model.resolve_goal("MT29").unwrap(), GoalKey::from("dyn_1"));
        assert_eq!(model.resolve_goal("1").unwrap(), GoalKey::from("dyn_0"));
        assert!(model.resolve_goal("0").is_err());
        assert!(model.resolve_goal("4").is_err());
        assert!(model.resolve_goal("pttc_0").is_err());
    }
}
