//! Per-goal statistics for the four summary rows of the report

use crate::types::{GoalKey, Mark, StudentRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Counts for one goal column. Unset marks are not counted anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GoalStats {
    pub reached: usize,
    pub unreached: usize,
    pub total: usize,
}

impl GoalStats {
    pub fn reached_percent(&self) -> u32 {
        percentage(self.reached, self.total)
    }

    pub fn unreached_percent(&self) -> u32 {
        percentage(self.unreached, self.total)
    }
}

/// `round(100 * count / total)`, rounding halves up; 0 when `total` is 0
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    // floor(100c/t + 1/2) in integers
    ((200 * count + total) / (2 * total)) as u32
}

/// Statistics for every active goal column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregates {
    stats: HashMap<GoalKey, GoalStats>,
}

impl Aggregates {
    /// Stats for a goal; unknown goals read as all zeros
    pub fn get(&self, key: &GoalKey) -> GoalStats {
        self.stats.get(key).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

/// Recompute all goal statistics from scratch
pub fn aggregate(goal_keys: &[GoalKey], students: &[StudentRecord]) -> Aggregates {
    let stats = goal_keys
        .iter()
        .map(|key| {
            let mut stats = GoalStats::default();
            for student in students {
                match student.mark(key) {
                    Mark::Reached => stats.reached += 1,
                    Mark::NotReached => stats.unreached += 1,
                    Mark::Unset => {}
                }
            }
            stats.total = stats.reached + stats.unreached;
            (key.clone(), stats)
        })
        .collect();
    Aggregates { stats }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, marks: &[(&str, Mark)]) -> StudentRecord {
        let mut record = StudentRecord::new(name);
        for (key, mark) in marks {
            record.set_mark(GoalKey::from(*key), *mark);
        }
        record
    }

    #[test]
    fn test_classroom_scenario() {
        let keys = vec![GoalKey::from("g1"), GoalKey::from("g2")];
        let students = vec![
            student("An", &[("g1", Mark::Reached), ("g2", Mark::NotReached)]),
            student("Binh", &[("g1", Mark::Reached)]),
        ];

        let aggregates = aggregate(&keys, &students);
        let g1 = aggregates.get(&keys[0]);
        let g2 = aggregates.get(&keys[1]);

        assert_eq!(
            g1,
            GoalStats {
                reached: 2,
                unreached: 0,
                total: 2
            }
        );
        assert_eq!(
            g2,
            GoalStats {
                reached: 0,
                unreached: 1,
                total: 1
            }
        );
        assert_eq!(g1.reached_percent(), 100);
        assert_eq!(g2.unreached_percent(), 100);
        assert_eq!(g2.reached_percent(), 0);
    }

    #[test]
    fn test_zero_total_gives_zero_percent() {
        let keys = vec![GoalKey::from("g1")];
        let aggregates = aggregate(&keys, &[student("An", &[])]);
        let stats = aggregates.get(&keys[0]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.reached_percent(), 0);
        assert_eq!(stats.unreached_percent(), 0);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(1, 200), 1); // 0.5 rounds up
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn test_counts_are_bounded_by_roster() {
        let keys = vec![GoalKey::from("g1"), GoalKey::from("g2"), GoalKey::from("g3")];
        let students = vec![
            student("A", &[("g1", Mark::Reached), ("g3", Mark::NotReached)]),
            student("B", &[("g1", Mark::NotReached), ("g2", Mark::Reached)]),
            student("C", &[]),
        ];
        let aggregates = aggregate(&keys, &students);
        for key in &keys {
            let stats = aggregates.get(key);
            assert_eq!(stats.reached + stats.unreached, stats.total);
            assert!(stats.total <= students.len());
        }
    }

    #[test]
    fn test_unknown_goal_reads_zero() {
        let aggregates = aggregate(&[], &[]);
        assert!(aggregates.is_empty());
        assert_eq!(aggregates.get(&GoalKey::from("nope")), GoalStats::default());
    }
}
