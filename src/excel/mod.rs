//! Excel import/export of evaluation sheets
//!
//! - Import: uploaded .xlsx → schema (from merged category headers) + roster
//! - Export: schema + roster + aggregates → printable report or blank template

mod exporter;
mod grid;
mod importer;
pub mod layout;

pub use exporter::{render, ExcelExporter};
pub use grid::{MergeRegion, SheetGrid};
pub use importer::{import_grid, ExcelImporter, ImportOutcome, ImportStatus, ImportedSheet};
pub use layout::{plan_template, report_file_name, ReportInput, SheetPlan};
