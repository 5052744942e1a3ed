//! Excel importer - uploaded workbook → schema + roster
//!
//! Categories are recovered from the merge geometry of the category header
//! row, so a workbook without merges yields nothing. Cells that are not
//! understood are dropped without error.

use super::grid::{MergeRegion, SheetGrid};
use super::layout::{
    CATEGORY_ROW, FIRST_GOAL_COL, FIRST_STUDENT_ROW, LABEL_ROW, NAME_COL, TOTAL_REACHED_TITLE,
};
use crate::core::{Category, Schema};
use crate::error::{GoalsheetError, GoalsheetResult};
use crate::types::{GoalKey, GoalLabels, Mark, StudentRecord};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Schema, labels and students recovered from one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedSheet {
    pub schema: Schema,
    pub labels: GoalLabels,
    pub students: Vec<StudentRecord>,
}

/// Result of reading an importable grid
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// Fewer rows than the three header rows
    TooShort { rows: usize },
    /// No category merges in the category header row
    NoCategories,
    Imported(ImportedSheet),
}

/// Summary of an import, without the data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatus {
    TooShort { rows: usize },
    NoCategories,
    Replaced {
        categories: usize,
        goals: usize,
        students: usize,
    },
}

impl ImportOutcome {
    pub fn status(&self) -> ImportStatus {
        match self {
            ImportOutcome::TooShort { rows } => ImportStatus::TooShort { rows: *rows },
            ImportOutcome::NoCategories => ImportStatus::NoCategories,
            ImportOutcome::Imported(sheet) => ImportStatus::Replaced {
                categories: sheet.schema.categories.len(),
                goals: sheet.schema.goal_count(),
                students: sheet.students.len(),
            },
        }
    }
}

/// Interpret an importable grid (row 0 = title header, see `layout`)
pub fn import_grid(grid: &SheetGrid) -> ImportOutcome {
    if grid.height() < 3 {
        debug!(rows = grid.height(), "grid too short for the header block");
        return ImportOutcome::TooShort {
            rows: grid.height(),
        };
    }

    let category_spans = category_spans(grid);
    if category_spans.is_empty() {
        return ImportOutcome::NoCategories;
    }

    let mut categories = Vec::with_capacity(category_spans.len());
    let mut goal_keys = Vec::new();
    let mut goal_columns = Vec::new();
    let mut labels = GoalLabels::new();

    for (idx, span) in category_spans.iter().enumerate() {
        let name = match grid.text(span.start_row, span.start_col) {
            "" => format!("Lĩnh vực {}", idx + 1),
            name => name.to_string(),
        };
        let goal_count = span.width() as usize;
        debug!(category = %name, goal_count, start_col = span.start_col, "detected category");
        categories.push(Category::new(name, goal_count));

        for col in span.start_col..span.start_col + span.width() {
            let seq = goal_keys.len();
            let key = GoalKey::new(format!("dyn_{}", seq));
            let label = match grid.text(LABEL_ROW, col) {
                "" => format!("MT{}", seq + 1),
                label => label.to_string(),
            };
            labels.insert(key.clone(), label);
            goal_keys.push(key);
            goal_columns.push(col);
        }
    }

    let students = (FIRST_STUDENT_ROW..grid.height() as u32)
        .filter_map(|row| {
            let name = grid.text(row, NAME_COL);
            if name.is_empty() {
                return None;
            }
            let mut student = StudentRecord::new(name);
            for (key, col) in goal_keys.iter().zip(&goal_columns) {
                let mark = Mark::parse(grid.text(row, *col));
                if mark.is_set() {
                    student.evaluations.insert(key.clone(), mark);
                }
            }
            Some(student)
        })
        .collect();

    ImportOutcome::Imported(ImportedSheet {
        schema: Schema::new(categories, goal_keys),
        labels,
        students,
    })
}

/// Category columns of the category row, ordered left to right.
///
/// Every merge starting on that row at or right of the first goal column is a
/// category. When the title row carries the "Tổng Đạt" header, a named cell
/// outside any merge and left of that column is a one-goal category too.
fn category_spans(grid: &SheetGrid) -> Vec<MergeRegion> {
    let mut spans: Vec<MergeRegion> = grid
        .merges()
        .iter()
        .filter(|m| m.start_row == CATEGORY_ROW && m.start_col >= FIRST_GOAL_COL)
        .copied()
        .collect();

    let totals_col =
        (FIRST_GOAL_COL..grid.width() as u32).find(|&col| grid.text(0, col) == TOTAL_REACHED_TITLE);
    if let Some(totals_col) = totals_col {
        spans.extend(
            (FIRST_GOAL_COL..totals_col)
                .filter(|&col| {
                    !grid.text(CATEGORY_ROW, col).is_empty() && !grid.is_merged(CATEGORY_ROW, col)
                })
                .map(|col| MergeRegion::new(CATEGORY_ROW, col, CATEGORY_ROW, col)),
        );
    }

    spans.sort_by_key(|m| m.start_col);
    spans
}

/// Excel importer for uploaded evaluation sheets (first worksheet only)
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read and interpret the workbook
    pub fn import(&self) -> GoalsheetResult<ImportOutcome> {
        let grid = self.read_grid()?;
        let outcome = import_grid(&grid.importable_region());
        log_outcome(&self.path.display().to_string(), &outcome);
        Ok(outcome)
    }

    /// Raw grid and merges of the first worksheet
    pub fn read_grid(&self) -> GoalsheetResult<SheetGrid> {
        let workbook: Xlsx<_> = open_workbook(&self.path)
            .map_err(|e| GoalsheetError::Import(format!("Failed to open Excel file: {}", e)))?;
        read_first_sheet(workbook)
    }

    /// Same as [`ExcelImporter::import`] for an uploaded byte buffer
    pub fn import_bytes(bytes: &[u8]) -> GoalsheetResult<ImportOutcome> {
        let workbook = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| GoalsheetError::Import(format!("Failed to read Excel data: {}", e)))?;
        let grid = read_first_sheet(workbook)?;
        let outcome = import_grid(&grid.importable_region());
        log_outcome("<buffer>", &outcome);
        Ok(outcome)
    }
}

fn read_first_sheet<RS: Read + Seek>(mut workbook: Xlsx<RS>) -> GoalsheetResult<SheetGrid> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| GoalsheetError::Import("Workbook has no worksheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| GoalsheetError::Import(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

    workbook
        .load_merged_regions()
        .map_err(|e| GoalsheetError::Import(format!("Failed to read merged cells: {}", e)))?;
    let merges: Vec<MergeRegion> = workbook
        .merged_regions_by_sheet(&sheet_name)
        .into_iter()
        .map(|(_, _, dims)| MergeRegion::new(dims.start.0, dims.start.1, dims.end.0, dims.end.1))
        .collect();

    // Absolute positions, so a sheet starting below A1 keeps its row numbers
    let rows = match range.end() {
        Some((last_row, last_col)) => (0..=last_row)
            .map(|row| {
                (0..=last_col)
                    .map(|col| range.get_value((row, col)).and_then(cell_text))
                    .collect()
            })
            .collect(),
        None => Vec::new(),
    };

    debug!(
        sheet = %sheet_name,
        merges = merges.len(),
        "read worksheet"
    );
    Ok(SheetGrid::new(rows, merges))
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn log_outcome(source: &str, outcome: &ImportOutcome) {
    match outcome.status() {
        ImportStatus::TooShort { rows } => {
            warn!(source, rows, "sheet has fewer than 3 header rows, nothing imported")
        }
        ImportStatus::NoCategories => {
            warn!(source, "no merged category headers found, nothing imported")
        }
        ImportStatus::Replaced {
            categories,
            goals,
            students,
        } => info!(source, categories, goals, students, "imported evaluation sheet"),
    }
}
