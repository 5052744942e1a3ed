//! Goalsheet - end-of-topic evaluation sheets for kindergarten classes
//!
//! Teachers mark each child against a set of educational goals ("+" reached,
//! "-" not reached) grouped into development areas, then print the result as
//! a fixed-layout spreadsheet.
//!
//! # Features
//!
//! - Goal schema inferred from the merged category headers of an uploaded
//!   workbook, with a built-in five-area default
//! - Per-goal reached / not-reached counts and percentages
//! - Printable report export (banner, grouped headers, summary rows,
//!   signature block) and a blank import template
//! - Session state kept in a YAML file between CLI invocations
//!
//! # Example
//!
//! ```no_run
//! use goalsheet::session::Session;
//! use std::path::Path;
//!
//! let mut session = Session::new();
//! session.import_file(Path::new("Mau.xlsx"))?;
//! session.add_student("Nguyễn Văn An")?;
//! session.cycle_mark(1, "1")?;
//!
//! session.export_report(&session.report_path())?;
//! # Ok::<(), goalsheet::error::GoalsheetError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use error::{GoalsheetError, GoalsheetResult};
pub use session::Session;
pub use types::{ClassMetadata, GoalKey, Mark, StudentRecord};
