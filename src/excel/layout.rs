//! Sheet layout of the printed report and the blank import template
//!
//! Both sheets share the three-row header block:
//!
//! ```text
//! row A | STT | Họ và tên | MỤC TIÊU GIÁO DỤC ......... | Tổng Đạt | Tổng Chưa |
//! row B |  ↕  |     ↕     | PTTC      | PTNT      | ... |    ↕     |     ↕     |
//! row C |     |           | MT1 | MT2 | MT3 | ... | ... |          |           |
//! ```
//!
//! The importer relies on this shape: within the importable grid, row 1 holds
//! one merge per category starting at column 2, row 2 holds goal labels and
//! student rows follow. A one-goal category cannot be stored as a merge, so it
//! is written as a plain named cell on row 1; the importer reads such a cell
//! as a one-column category when it sits left of the "Tổng Đạt" column.
//! The layout is planned as plain data ([`SheetPlan`]) and only then rendered
//! to xlsx.

use super::grid::{MergeRegion, SheetGrid};
use crate::core::{Aggregates, GoalStats, Schema};
use crate::types::{label_for, ClassMetadata, GoalLabels, StudentRecord};
use std::collections::BTreeMap;

pub const SEQUENCE_TITLE: &str = "STT";
pub const NAME_TITLE: &str = "Họ và tên";
pub const GOALS_TITLE: &str = "MỤC TIÊU GIÁO DỤC (Đạt +; chưa đạt -)";
pub const TOTAL_REACHED_TITLE: &str = "Tổng Đạt";
pub const TOTAL_UNREACHED_TITLE: &str = "Tổng Chưa";
pub const REPORT_TITLE: &str = "BẢNG ĐÁNH GIÁ TRẺ CUỐI CHỦ ĐỀ";
pub const REMARKS_TITLE: &str = "Nhận xét chung của giáo viên:";
pub const APPROVER_TITLE: &str = "BGH phê duyệt";
pub const AUTHOR_TITLE: &str = "Người lập biểu";

/// Labels of the four summary rows, in print order
pub const AGGREGATE_LABELS: [&str; 4] = [
    "Tổng số trẻ đạt",
    "Tỉ lệ trẻ đạt (%)",
    "Số trẻ chưa đạt",
    "Tỉ lệ trẻ chưa đạt (%)",
];

pub const REPORT_SHEET_NAME: &str = "Bao_Cao";
pub const TEMPLATE_SHEET_NAME: &str = "Mau";
pub const TEMPLATE_FILE_NAME: &str = "Mau.xlsx";

// Importable-grid rows and columns
pub const CATEGORY_ROW: u32 = 1;
pub const LABEL_ROW: u32 = 2;
pub const FIRST_STUDENT_ROW: u32 = 3;
pub const SEQUENCE_COL: u32 = 0;
pub const NAME_COL: u32 = 1;
pub const FIRST_GOAL_COL: u32 = 2;

/// Header row A of the full report (banner, spacer, title block, spacer above it)
pub const REPORT_HEADER_ROW: u32 = 7;

pub const SEQUENCE_WIDTH: f64 = 6.0;
pub const NAME_WIDTH: f64 = 28.0;
pub const GOAL_WIDTH: f64 = 5.0;
pub const TOTAL_WIDTH: f64 = 10.0;

/// File name of the exported report for a class
pub fn report_file_name(class_name: &str) -> String {
    let class_name = class_name.trim();
    let class_name = if class_name.is_empty() { "Tre" } else { class_name };
    format!("Bao_Cao_In_Chuan_{}.xlsx", class_name)
}

/// Total columns: sequence, name, one per goal, two totals
pub fn column_count(goal_count: usize) -> u32 {
    goal_count as u32 + 4
}

pub fn column_widths(goal_count: usize) -> Vec<f64> {
    let mut widths = vec![SEQUENCE_WIDTH, NAME_WIDTH];
    widths.extend(std::iter::repeat(GOAL_WIDTH).take(goal_count));
    widths.extend([TOTAL_WIDTH, TOTAL_WIDTH]);
    widths
}

//==============================================================================
// Plan
//==============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// Formatted but empty (borders around empty table cells)
    Blank,
}

impl CellValue {
    /// Text as a spreadsheet reader would report it
    pub fn display(&self) -> Option<String> {
        match self {
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
            CellValue::Number(n) => Some(n.to_string()),
            CellValue::Blank => None,
        }
    }
}

/// Visual role of a cell, mapped to a concrete format at render time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStyle {
    Banner,
    Title,
    Subtitle,
    Header,
    Text,
    Centered,
    Mark,
    AggregateLabel,
    Aggregate,
    Percent,
    RemarksTitle,
    Remarks,
    DateLine,
    SignatureTitle,
    SignatureName,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCell {
    pub value: CellValue,
    pub style: CellStyle,
}

/// Everything needed to write one worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub sheet_name: String,
    cells: BTreeMap<(u32, u32), PlannedCell>,
    merges: Vec<MergeRegion>,
    column_widths: Vec<f64>,
}

impl SheetPlan {
    fn new(sheet_name: &str, column_widths: Vec<f64>) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
            column_widths,
        }
    }

    fn put(&mut self, row: u32, col: u32, value: CellValue, style: CellStyle) {
        self.cells.insert((row, col), PlannedCell { value, style });
    }

    fn text(&mut self, row: u32, col: u32, text: impl Into<String>, style: CellStyle) {
        self.put(row, col, CellValue::Text(text.into()), style);
    }

    fn number(&mut self, row: u32, col: u32, value: f64, style: CellStyle) {
        self.put(row, col, CellValue::Number(value), style);
    }

    /// Single-cell regions cannot be stored as merges and are skipped
    fn merge(&mut self, region: MergeRegion) {
        if !region.is_single_cell() {
            self.merges.push(region);
        }
    }

    /// Write `text` at the region's anchor and merge the region
    fn merged_text(&mut self, region: MergeRegion, text: impl Into<String>, style: CellStyle) {
        self.text(region.start_row, region.start_col, text, style);
        self.merge(region);
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&PlannedCell> {
        self.cells.get(&(row, col))
    }

    pub fn cells(&self) -> impl Iterator<Item = (u32, u32, &PlannedCell)> {
        self.cells.iter().map(|((row, col), cell)| (*row, *col, cell))
    }

    pub fn merges(&self) -> &[MergeRegion] {
        &self.merges
    }

    pub fn column_widths(&self) -> &[f64] {
        &self.column_widths
    }

    pub fn row_count(&self) -> u32 {
        self.cells.keys().map(|(row, _)| row + 1).max().unwrap_or(0)
    }

    pub fn is_merge_anchor(&self, row: u32, col: u32) -> bool {
        self.merges
            .iter()
            .any(|m| m.start_row == row && m.start_col == col)
    }

    /// The plan as the importer would see the written file
    pub fn to_grid(&self) -> SheetGrid {
        let width = self.column_widths.len().max(
            self.cells
                .keys()
                .map(|(_, col)| *col as usize + 1)
                .max()
                .unwrap_or(0),
        );
        let mut rows = vec![vec![None; width]; self.row_count() as usize];
        for ((row, col), cell) in &self.cells {
            rows[*row as usize][*col as usize] = cell.value.display();
        }
        SheetGrid::new(rows, self.merges.clone())
    }
}

//==============================================================================
// Report
//==============================================================================

/// Read-only inputs of the printed report
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub metadata: &'a ClassMetadata,
    pub schema: &'a Schema,
    pub labels: &'a GoalLabels,
    pub students: &'a [StudentRecord],
    pub aggregates: &'a Aggregates,
}

impl ReportInput<'_> {
    fn goal_count(&self) -> usize {
        self.schema.goal_count()
    }

    fn last_col(&self) -> u32 {
        column_count(self.goal_count()) - 1
    }

    fn full_width(&self, row: u32) -> MergeRegion {
        MergeRegion::new(row, 0, row, self.last_col())
    }

    /// Full report: banner, title, header, students, summary, signatures
    pub fn plan_report(&self) -> SheetPlan {
        let mut plan = SheetPlan::new(REPORT_SHEET_NAME, column_widths(self.goal_count()));
        let meta = self.metadata;

        plan.merged_text(self.full_width(0), meta.school_name.to_uppercase(), CellStyle::Banner);
        plan.merged_text(
            self.full_width(1),
            format!("Lớp: {}", meta.class_name),
            CellStyle::Banner,
        );
        plan.merged_text(self.full_width(3), REPORT_TITLE, CellStyle::Title);
        plan.merged_text(
            self.full_width(4),
            format!("Chủ đề: {}", meta.topic),
            CellStyle::Subtitle,
        );
        plan.merged_text(
            self.full_width(5),
            format!("Thời gian thực hiện: {}", meta.duration),
            CellStyle::Subtitle,
        );

        plan_header(&mut plan, self.schema, self.labels, REPORT_HEADER_ROW);

        let mut row = REPORT_HEADER_ROW + 3;
        row = self.plan_students(&mut plan, row);
        row = self.plan_aggregates(&mut plan, row);
        self.plan_footer(&mut plan, row + 1);

        plan
    }

    fn plan_students(&self, plan: &mut SheetPlan, mut row: u32) -> u32 {
        let keys = &self.schema.goal_keys;
        let last = self.last_col();

        for (idx, student) in self.students.iter().enumerate() {
            plan.number(row, SEQUENCE_COL, (idx + 1) as f64, CellStyle::Centered);
            plan.text(row, NAME_COL, student.name.as_str(), CellStyle::Text);
            for (offset, key) in keys.iter().enumerate() {
                plan.text(
                    row,
                    FIRST_GOAL_COL + offset as u32,
                    student.mark(key).symbol(),
                    CellStyle::Mark,
                );
            }
            plan.number(row, last - 1, student.reached_count(keys) as f64, CellStyle::Centered);
            plan.number(row, last, student.unreached_count(keys) as f64, CellStyle::Centered);
            row += 1;
        }
        row
    }

    fn plan_aggregates(&self, plan: &mut SheetPlan, mut row: u32) -> u32 {
        let last = self.last_col();
        let rows: [(fn(&GoalStats) -> u32, CellStyle); 4] = [
            (|s| s.reached as u32, CellStyle::Aggregate),
            (GoalStats::reached_percent, CellStyle::Percent),
            (|s| s.unreached as u32, CellStyle::Aggregate),
            (GoalStats::unreached_percent, CellStyle::Percent),
        ];

        for (label, (value_of, style)) in AGGREGATE_LABELS.iter().zip(rows) {
            plan.merged_text(
                MergeRegion::new(row, SEQUENCE_COL, row, NAME_COL),
                *label,
                CellStyle::AggregateLabel,
            );
            for (offset, key) in self.schema.goal_keys.iter().enumerate() {
                let stats = self.aggregates.get(key);
                plan.number(row, FIRST_GOAL_COL + offset as u32, value_of(&stats) as f64, style);
            }
            plan.put(row, last - 1, CellValue::Blank, CellStyle::Aggregate);
            plan.put(row, last, CellValue::Blank, CellStyle::Aggregate);
            row += 1;
        }
        row
    }

    fn plan_footer(&self, plan: &mut SheetPlan, mut row: u32) {
        let meta = self.metadata;
        let last = self.last_col();
        let right_start = last.saturating_sub(3).max(FIRST_GOAL_COL);
        let left = |row| MergeRegion::new(row, SEQUENCE_COL, row, NAME_COL);
        let right = |row| MergeRegion::new(row, right_start, row, last);

        plan.merged_text(self.full_width(row), REMARKS_TITLE, CellStyle::RemarksTitle);
        row += 1;
        plan.merged_text(self.full_width(row), meta.remarks.as_str(), CellStyle::Remarks);
        row += 2;

        plan.merged_text(right(row), signing_date_line(meta), CellStyle::DateLine);
        row += 1;
        plan.merged_text(left(row), APPROVER_TITLE, CellStyle::SignatureTitle);
        plan.merged_text(right(row), AUTHOR_TITLE, CellStyle::SignatureTitle);
        row += 3;
        plan.merged_text(left(row), meta.approver_name.as_str(), CellStyle::SignatureName);
        plan.merged_text(right(row), meta.teacher_name.as_str(), CellStyle::SignatureName);
    }
}

/// Blank import template with the current schema: header rows only
pub fn plan_template(schema: &Schema, labels: &GoalLabels) -> SheetPlan {
    let mut plan = SheetPlan::new(TEMPLATE_SHEET_NAME, column_widths(schema.goal_count()));
    plan_header(&mut plan, schema, labels, 0);
    plan
}

/// "......, ngày d tháng m năm y" with dotted placeholders for blank parts
pub fn signing_date_line(meta: &ClassMetadata) -> String {
    fn or<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
        let value = value.trim();
        if value.is_empty() {
            placeholder
        } else {
            value
        }
    }
    format!(
        "......, ngày {} tháng {} năm {}",
        or(&meta.sign_day, "..."),
        or(&meta.sign_month, "..."),
        or(&meta.sign_year, "20...")
    )
}

/// Rows A, B, C starting at `top`
fn plan_header(plan: &mut SheetPlan, schema: &Schema, labels: &GoalLabels, top: u32) {
    let goal_count = schema.goal_count() as u32;
    let last = column_count(schema.goal_count()) - 1;
    let (row_a, row_b, row_c) = (top, top + 1, top + 2);

    // Row A, with vertical spans over A–B
    plan.merged_text(
        MergeRegion::new(row_a, SEQUENCE_COL, row_b, SEQUENCE_COL),
        SEQUENCE_TITLE,
        CellStyle::Header,
    );
    plan.merged_text(
        MergeRegion::new(row_a, NAME_COL, row_b, NAME_COL),
        NAME_TITLE,
        CellStyle::Header,
    );
    if goal_count > 0 {
        plan.merged_text(
            MergeRegion::new(row_a, FIRST_GOAL_COL, row_a, FIRST_GOAL_COL + goal_count - 1),
            GOALS_TITLE,
            CellStyle::Header,
        );
    }
    plan.merged_text(
        MergeRegion::new(row_a, last - 1, row_b, last - 1),
        TOTAL_REACHED_TITLE,
        CellStyle::Header,
    );
    plan.merged_text(
        MergeRegion::new(row_a, last, row_b, last),
        TOTAL_UNREACHED_TITLE,
        CellStyle::Header,
    );

    // Row B: one span per category, clipped to the goal columns so a
    // category list that overshoots the goal keys never reaches the totals
    let goal_end = FIRST_GOAL_COL + goal_count;
    let mut col = FIRST_GOAL_COL;
    for category in &schema.categories {
        let span = (category.goal_count as u32).min(goal_end - col);
        if span == 0 {
            continue;
        }
        plan.merged_text(
            MergeRegion::new(row_b, col, row_b, col + span - 1),
            category.name.as_str(),
            CellStyle::Header,
        );
        col += span;
    }

    // Row C: goal labels, bordered blanks under the vertical spans
    for c in [SEQUENCE_COL, NAME_COL, last - 1, last] {
        plan.put(row_c, c, CellValue::Blank, CellStyle::Header);
    }
    for (offset, key) in schema.goal_keys.iter().enumerate() {
        plan.text(
            row_c,
            FIRST_GOAL_COL + offset as u32,
            label_for(labels, key),
            CellStyle::Header,
        );
    }
}
