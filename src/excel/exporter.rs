//! Excel exporter implementation - renders a [`SheetPlan`] with rust_xlsxwriter

use super::layout::{plan_template, CellStyle, CellValue, ReportInput, SheetPlan};
use crate::error::{GoalsheetError, GoalsheetResult};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};
use std::path::Path;
use tracing::{debug, info};

const FONT_NAME: &str = "Times New Roman";
const A4_PAPER: u8 = 9;

/// Excel exporter for the printed report and the blank template
pub struct ExcelExporter<'a> {
    input: ReportInput<'a>,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new Excel exporter
    pub fn new(input: ReportInput<'a>) -> Self {
        Self { input }
    }

    /// Write the full report to an .xlsx file
    pub fn export(&self, output_path: &Path) -> GoalsheetResult<()> {
        let plan = self.input.plan_report();
        save(&plan, output_path)?;
        info!(
            path = %output_path.display(),
            students = self.input.students.len(),
            goals = self.input.schema.goal_count(),
            "exported report"
        );
        Ok(())
    }

    /// Write the blank import template to an .xlsx file
    pub fn export_template(&self, output_path: &Path) -> GoalsheetResult<()> {
        let plan = plan_template(self.input.schema, self.input.labels);
        save(&plan, output_path)?;
        info!(path = %output_path.display(), "exported template");
        Ok(())
    }

    /// Full report as xlsx bytes
    pub fn report_to_buffer(&self) -> GoalsheetResult<Vec<u8>> {
        to_buffer(&self.input.plan_report())
    }

    /// Blank template as xlsx bytes
    pub fn template_to_buffer(&self) -> GoalsheetResult<Vec<u8>> {
        to_buffer(&plan_template(self.input.schema, self.input.labels))
    }
}

fn save(plan: &SheetPlan, output_path: &Path) -> GoalsheetResult<()> {
    let mut workbook = render(plan)?;
    workbook
        .save(output_path)
        .map_err(|e| GoalsheetError::Export(format!("Failed to save Excel file: {}", e)))
}

fn to_buffer(plan: &SheetPlan) -> GoalsheetResult<Vec<u8>> {
    let mut workbook = render(plan)?;
    workbook
        .save_to_buffer()
        .map_err(|e| GoalsheetError::Export(format!("Failed to create Excel data: {}", e)))
}

/// Write one planned sheet into a new workbook
pub fn render(plan: &SheetPlan) -> GoalsheetResult<Workbook> {
    let formats = ReportFormats::new();
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    worksheet
        .set_name(&plan.sheet_name)
        .map_err(|e| GoalsheetError::Export(format!("Failed to set worksheet name: {}", e)))?;
    worksheet.set_landscape();
    worksheet.set_paper_size(A4_PAPER);
    worksheet.set_print_fit_to_pages(1, 0);

    for (col, width) in plan.column_widths().iter().enumerate() {
        worksheet
            .set_column_width(col as u16, *width)
            .map_err(|e| GoalsheetError::Export(format!("Failed to set column width: {}", e)))?;
    }

    // Merged ranges carry their anchor's value and format
    for region in plan.merges() {
        let (text, style) = match plan.cell(region.start_row, region.start_col) {
            Some(cell) => (cell.value.display().unwrap_or_default(), cell.style),
            None => (String::new(), CellStyle::Text),
        };
        worksheet
            .merge_range(
                region.start_row,
                region.start_col as u16,
                region.end_row,
                region.end_col as u16,
                &text,
                formats.get(style),
            )
            .map_err(|e| GoalsheetError::Export(format!("Failed to merge cells: {}", e)))?;
    }

    for (row, col, cell) in plan.cells() {
        if plan.is_merge_anchor(row, col) {
            continue;
        }
        let format = formats.get(cell.style);
        let col = col as u16;
        match &cell.value {
            CellValue::Text(text) => {
                worksheet
                    .write_string_with_format(row, col, text, format)
                    .map_err(|e| GoalsheetError::Export(format!("Failed to write text: {}", e)))?;
            }
            CellValue::Number(value) => {
                worksheet
                    .write_number_with_format(row, col, *value, format)
                    .map_err(|e| {
                        GoalsheetError::Export(format!("Failed to write number: {}", e))
                    })?;
            }
            CellValue::Blank => {
                worksheet
                    .write_blank(row, col, format)
                    .map_err(|e| GoalsheetError::Export(format!("Failed to write cell: {}", e)))?;
            }
        }
    }

    debug!(
        sheet = %plan.sheet_name,
        rows = plan.row_count(),
        merges = plan.merges().len(),
        "rendered worksheet"
    );
    Ok(workbook)
}

/// One format per [`CellStyle`]
struct ReportFormats {
    banner: Format,
    title: Format,
    subtitle: Format,
    header: Format,
    text: Format,
    centered: Format,
    mark: Format,
    aggregate_label: Format,
    aggregate: Format,
    percent: Format,
    remarks_title: Format,
    remarks: Format,
    date_line: Format,
    signature_title: Format,
    signature_name: Format,
}

impl ReportFormats {
    fn new() -> Self {
        let base = Format::new().set_font_name(FONT_NAME).set_font_size(12);
        let cell = base.clone().set_border(FormatBorder::Thin);
        let centered = cell
            .clone()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);

        Self {
            banner: base.clone().set_bold(),
            title: base
                .clone()
                .set_bold()
                .set_font_size(16)
                .set_align(FormatAlign::Center),
            subtitle: base.clone().set_bold().set_align(FormatAlign::Center),
            header: centered.clone().set_bold().set_text_wrap(),
            text: cell.clone().set_align(FormatAlign::VerticalCenter),
            mark: centered.clone().set_bold(),
            aggregate_label: cell.clone().set_bold().set_align(FormatAlign::Right),
            aggregate: centered.clone().set_bold(),
            percent: centered.clone().set_bold().set_num_format("0\"%\""),
            centered,
            remarks_title: base.clone().set_bold().set_italic(),
            remarks: base.clone().set_text_wrap().set_align(FormatAlign::Top),
            date_line: base.clone().set_italic().set_align(FormatAlign::Center),
            signature_title: base.clone().set_bold().set_align(FormatAlign::Center),
            signature_name: base.set_bold().set_align(FormatAlign::Center),
        }
    }

    fn get(&self, style: CellStyle) -> &Format {
        match style {
            CellStyle::Banner => &self.banner,
            CellStyle::Title => &self.title,
            CellStyle::Subtitle => &self.subtitle,
            CellStyle::Header => &self.header,
            CellStyle::Text => &self.text,
            CellStyle::Centered => &self.centered,
            CellStyle::Mark => &self.mark,
            CellStyle::AggregateLabel => &self.aggregate_label,
            CellStyle::Aggregate => &self.aggregate,
            CellStyle::Percent => &self.percent,
            CellStyle::RemarksTitle => &self.remarks_title,
            CellStyle::Remarks => &self.remarks,
            CellStyle::DateLine => &self.date_line,
            CellStyle::SignatureTitle => &self.signature_title,
            CellStyle::SignatureName => &self.signature_name,
        }
    }
}
