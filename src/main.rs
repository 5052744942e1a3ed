use clap::{Args, Parser, Subcommand};
use goalsheet::cli;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "goalsheet")]
#[command(about = "End-of-topic kindergarten evaluation sheets: import, mark, export.")]
#[command(long_about = "Goalsheet - BẢNG ĐÁNH GIÁ TRẺ CUỐI CHỦ ĐỀ
Record '+' / '-' per child and goal, print the report as Excel.

COMMANDS:
  init      - Start a new session file
  meta      - Set school, class, topic, signatures
  import    - Load goals and students from an .xlsx
  add       - Add a student
  remove    - Remove a student
  mark      - Cycle or set a mark
  label     - Rename a goal column (e.g. MT15)
  show      - Print the roster
  stats     - Per-goal counts and percentages
  export    - Write the printable report (.xlsx)
  template  - Write the blank import template (Mau.xlsx)

EXAMPLES:
  goalsheet template                      # Blank Mau.xlsx with current goals
  goalsheet import Mau.xlsx               # Goals from merged headers + students
  goalsheet mark 3 MT15                   # Student 3, goal MT15: · → + → - → ·
  goalsheet export                        # Bao_Cao_In_Chuan_<class>.xlsx

Logging: GOALSHEET_LOG=goalsheet=debug")]
#[command(version)]
struct Cli {
    /// Session file holding class info, goals and students
    #[arg(
        short,
        long,
        global = true,
        env = "GOALSHEET_SESSION",
        default_value = "goalsheet.yaml"
    )]
    session: PathBuf,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Default)]
struct MetaArgs {
    /// School name (printed upper-case in the banner)
    #[arg(long)]
    school: Option<String>,

    /// Class name (also used in the report file name)
    #[arg(long)]
    class: Option<String>,

    /// Topic ("Chủ đề")
    #[arg(long)]
    topic: Option<String>,

    /// Duration ("Thời gian thực hiện")
    #[arg(long)]
    duration: Option<String>,

    /// Teacher signing the report
    #[arg(long)]
    teacher: Option<String>,

    /// Head of school approving the report
    #[arg(long)]
    approver: Option<String>,

    /// General remarks
    #[arg(long)]
    remarks: Option<String>,

    /// Signing day
    #[arg(long)]
    day: Option<String>,

    /// Signing month
    #[arg(long)]
    month: Option<String>,

    /// Signing year
    #[arg(long)]
    year: Option<String>,

    /// Use today's date for the signing line
    #[arg(long, conflicts_with_all = ["day", "month", "year"])]
    today: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new session file
    Init {
        /// Overwrite an existing session file
        #[arg(short, long)]
        force: bool,
    },

    /// Set class information and signature fields
    Meta(MetaArgs),

    #[command(long_about = "Import goals and students from an Excel .xlsx file.

Reads the first worksheet. The header block starts at the row whose first
cell is 'STT'; the row below it must hold one merged cell per category
(from column C), followed by the goal label row and one row per student.

Marks are read only when a cell is exactly '+' or '-'. Rows without a name
are skipped. A sheet without merged category headers changes nothing.

Both the blank template and an exported report can be imported.")]
    /// Import goals and students from an .xlsx file
    Import {
        /// Path to Excel file (.xlsx)
        input: PathBuf,
    },

    /// Add a student at the end of the roster
    Add {
        /// Student name
        name: String,
    },

    /// Remove a student
    Remove {
        /// Student number (STT)
        student: usize,
    },

    #[command(long_about = "Cycle or set a mark.

Without --set the mark cycles: empty → '+' → '-' → empty.

GOAL may be a goal key (pttc_0, dyn_4), a label (MT15) or the 1-based
goal column number.")]
    /// Cycle or set a student's mark on a goal
    Mark {
        /// Student number (STT)
        student: usize,

        /// Goal key, label, or column number
        goal: String,

        /// Set a specific mark: '+', '-' or 'none'
        #[arg(long, allow_hyphen_values = true)]
        set: Option<String>,
    },

    /// Set the printed label of a goal column
    Label {
        /// Goal key, label, or column number
        goal: String,

        /// New label
        text: String,
    },

    /// Print the roster with marks
    Show,

    /// Print per-goal statistics
    Stats {
        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Write the printable report
    Export {
        /// Output Excel file path (default: Bao_Cao_In_Chuan_<class>.xlsx)
        output: Option<PathBuf>,
    },

    /// Write the blank import template
    Template {
        /// Output Excel file path (default: Mau.xlsx)
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "goalsheet=info"
    } else {
        "goalsheet=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GOALSHEET_LOG").unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let session = cli.session.as_path();
    match cli.command {
        Commands::Init { force } => cli::init(session, force)?,

        Commands::Meta(args) => cli::meta(
            session,
            cli::MetaUpdate {
                school: args.school,
                class: args.class,
                topic: args.topic,
                duration: args.duration,
                teacher: args.teacher,
                approver: args.approver,
                remarks: args.remarks,
                day: args.day,
                month: args.month,
                year: args.year,
                today: args.today,
            },
        )?,

        Commands::Import { input } => cli::import(session, input, cli.verbose)?,

        Commands::Add { name } => cli::add(session, &name)?,

        Commands::Remove { student } => cli::remove(session, student)?,

        Commands::Mark { student, goal, set } => cli::mark(session, student, &goal, set)?,

        Commands::Label { goal, text } => cli::label(session, &goal, &text)?,

        Commands::Show => cli::show(session)?,

        Commands::Stats { json } => cli::stats(session, json)?,

        Commands::Export { output } => cli::export(session, output, cli.verbose)?,

        Commands::Template { output } => cli::template(session, output)?,
    }

    Ok(())
}
