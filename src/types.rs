use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

//==============================================================================
// Goal columns
//==============================================================================

/// Opaque identifier of one evaluation-goal column.
///
/// Built-in keys look like `pttc_0`, imported keys like `dyn_7`; nothing
/// outside the schema module should depend on that shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalKey(String);

impl GoalKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoalKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Printed column headers (e.g. "MT1") by goal key, sorted so saved
/// sessions are stable
pub type GoalLabels = BTreeMap<GoalKey, String>;

/// Header shown for a goal column that has no label yet
pub const PLACEHOLDER_LABEL: &str = "MT...";

/// Look up the printed header for a goal, falling back to the placeholder
pub fn label_for<'a>(labels: &'a GoalLabels, key: &GoalKey) -> &'a str {
    match labels.get(key) {
        Some(label) if !label.is_empty() => label,
        _ => PLACEHOLDER_LABEL,
    }
}

//==============================================================================
// Marks
//==============================================================================

/// Outcome of one student against one goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mark {
    #[serde(rename = "+")]
    Reached,
    #[serde(rename = "-")]
    NotReached,
    #[default]
    #[serde(rename = "")]
    Unset,
}

impl Mark {
    /// Parse a spreadsheet cell. Only an exact `+` or `-` (after trimming)
    /// counts; anything else is Unset.
    pub fn parse(cell: &str) -> Self {
        match cell.trim() {
            "+" => Mark::Reached,
            "-" => Mark::NotReached,
            _ => Mark::Unset,
        }
    }

    /// Symbol written to the report ("" for Unset)
    pub fn symbol(self) -> &'static str {
        match self {
            Mark::Reached => "+",
            Mark::NotReached => "-",
            Mark::Unset => "",
        }
    }

    /// Next state on click: Unset → Reached → NotReached → Unset
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Mark::Unset => Mark::Reached,
            Mark::Reached => Mark::NotReached,
            Mark::NotReached => Mark::Unset,
        }
    }

    pub fn is_set(self) -> bool {
        self != Mark::Unset
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

//==============================================================================
// Students
//==============================================================================

/// One row of the roster.
///
/// `evaluations` only ever holds set marks; a missing key reads as Unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub evaluations: BTreeMap<GoalKey, Mark>,
}

impl StudentRecord {
    /// Create a record with a fresh id. The caller guarantees a non-blank name.
    pub fn new(name: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            name: name.trim().to_string(),
            evaluations: BTreeMap::new(),
        }
    }

    pub fn mark(&self, key: &GoalKey) -> Mark {
        self.evaluations.get(key).copied().unwrap_or_default()
    }

    pub fn set_mark(&mut self, key: GoalKey, mark: Mark) {
        if mark.is_set() {
            self.evaluations.insert(key, mark);
        } else {
            self.evaluations.remove(&key);
        }
    }

    /// Advance one cell through the click cycle and return the new state
    pub fn cycle_mark(&mut self, key: &GoalKey) -> Mark {
        let next = self.mark(key).cycle();
        self.set_mark(key.clone(), next);
        next
    }

    /// Number of `+` marks among the given goal columns
    pub fn reached_count(&self, keys: &[GoalKey]) -> usize {
        self.count(keys, Mark::Reached)
    }

    /// Number of `-` marks among the given goal columns
    pub fn unreached_count(&self, keys: &[GoalKey]) -> usize {
        self.count(keys, Mark::NotReached)
    }

    fn count(&self, keys: &[GoalKey], wanted: Mark) -> usize {
        keys.iter().filter(|k| self.mark(k) == wanted).count()
    }
}

//==============================================================================
// Free-text fields
//==============================================================================

/// Class information and the free-text parts of the printed report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassMetadata {
    pub school_name: String,
    pub class_name: String,
    pub topic: String,
    pub duration: String,
    pub teacher_name: String,
    /// Head of school signing the approval column
    pub approver_name: String,
    pub remarks: String,
    pub sign_day: String,
    pub sign_month: String,
    pub sign_year: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_parse_exact_symbols_only() {
        assert_eq!(Mark::parse("+"), Mark::Reached);
        assert_eq!(Mark::parse("  - "), Mark::NotReached);
        assert_eq!(Mark::parse(""), Mark::Unset);
        assert_eq!(Mark::parse("   "), Mark::Unset);
        assert_eq!(Mark::parse("++"), Mark::Unset);
        assert_eq!(Mark::parse("x"), Mark::Unset);
        assert_eq!(Mark::parse("1"), Mark::Unset);
    }

    #[test]
    fn test_mark_cycle_order() {
        let mut mark = Mark::Unset;
        let mut seen = Vec::new();
        for _ in 0..6 {
            mark = mark.cycle();
            seen.push(mark);
        }
        assert_eq!(
            seen,
            vec![
                Mark::Reached,
                Mark::NotReached,
                Mark::Unset,
                Mark::Reached,
                Mark::NotReached,
                Mark::Unset
            ]
        );
    }

    #[test]
    fn test_student_new_trims_name() {
        let student = StudentRecord::new("  Nguyễn An  ");
        assert_eq!(student.name, "Nguyễn An");
        assert!(student.evaluations.is_empty());
        assert!(!student.id.is_empty());
    }

    #[test]
    fn test_student_ids_are_unique() {
        let a = StudentRecord::new("An");
        let b = StudentRecord::new("An");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_set_unset_removes_entry() {
        let key = GoalKey::from("g1");
        let mut student = StudentRecord::new("An");
        student.set_mark(key.clone(), Mark::Reached);
        assert_eq!(student.mark(&key), Mark::Reached);
        student.set_mark(key.clone(), Mark::Unset);
        assert!(student.evaluations.is_empty());
        assert_eq!(student.mark(&key), Mark::Unset);
    }

    #[test]
    fn test_cycle_mark_stores_only_set_states() {
        let key = GoalKey::from("g1");
        let mut student = StudentRecord::new("An");
        assert_eq!(student.cycle_mark(&key), Mark::Reached);
        assert_eq!(student.cycle_mark(&key), Mark::NotReached);
        assert_eq!(student.cycle_mark(&key), Mark::Unset);
        assert!(!student.evaluations.contains_key(&key));
    }

    #[test]
    fn test_counts_only_consider_given_keys() {
        let keys = vec![GoalKey::from("g1"), GoalKey::from("g2")];
        let mut student = StudentRecord::new("An");
        student.set_mark(GoalKey::from("g1"), Mark::Reached);
        student.set_mark(GoalKey::from("g2"), Mark::NotReached);
        student.set_mark(GoalKey::from("stale"), Mark::Reached);
        assert_eq!(student.reached_count(&keys), 1);
        assert_eq!(student.unreached_count(&keys), 1);
    }

    #[test]
    fn test_label_for_placeholder() {
        let mut labels = GoalLabels::new();
        let key = GoalKey::from("g1");
        assert_eq!(label_for(&labels, &key), PLACEHOLDER_LABEL);
        labels.insert(key.clone(), String::new());
        assert_eq!(label_for(&labels, &key), PLACEHOLDER_LABEL);
        labels.insert(key.clone(), "MT15".to_string());
        assert_eq!(label_for(&labels, &key), "MT15");
    }

    #[test]
    fn test_mark_serializes_as_symbol() {
        let json = serde_json::to_string(&Mark::NotReached).unwrap();
        assert_eq!(json, "\"-\"");
    }
}
