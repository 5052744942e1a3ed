//! Ordered student roster

use crate::error::{GoalsheetError, GoalsheetResult};
use crate::types::{GoalKey, Mark, StudentRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    students: Vec<StudentRecord>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_students(students: Vec<StudentRecord>) -> Self {
        Self { students }
    }

    pub fn students(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Append a student; blank names are rejected
    pub fn add_student(&mut self, name: &str) -> GoalsheetResult<&StudentRecord> {
        if name.trim().is_empty() {
            return Err(GoalsheetError::Validation(
                "Student name must not be blank".to_string(),
            ));
        }
        self.students.push(StudentRecord::new(name));
        Ok(&self.students[self.students.len() - 1])
    }

    /// Remove by 1-based sequence number (the STT column)
    pub fn remove_student(&mut self, sequence: usize) -> GoalsheetResult<StudentRecord> {
        let index = self.index_of(sequence)?;
        Ok(self.students.remove(index))
    }

    pub fn student(&self, sequence: usize) -> GoalsheetResult<&StudentRecord> {
        let index = self.index_of(sequence)?;
        Ok(&self.students[index])
    }

    pub fn find_by_id(&self, id: &str) -> Option<&StudentRecord> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn cycle_mark(&mut self, sequence: usize, key: &GoalKey) -> GoalsheetResult<Mark> {
        let index = self.index_of(sequence)?;
        Ok(self.students[index].cycle_mark(key))
    }

    pub fn set_mark(&mut self, sequence: usize, key: &GoalKey, mark: Mark) -> GoalsheetResult<()> {
        let index = self.index_of(sequence)?;
        self.students[index].set_mark(key.clone(), mark);
        Ok(())
    }

    fn index_of(&self, sequence: usize) -> GoalsheetResult<usize> {
        sequence
            .checked_sub(1)
            .filter(|i| *i < self.students.len())
            .ok_or(GoalsheetError::StudentNotFound(sequence))
    }
}
