use crate::error::{GoalsheetError, GoalsheetResult};
use crate::excel::layout::TEMPLATE_FILE_NAME;
use crate::excel::ImportStatus;
use crate::session::Session;
use crate::types::Mark;
use chrono::Datelike;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Free-text fields to overwrite; `None` leaves a field as it is
#[derive(Debug, Default, Clone)]
pub struct MetaUpdate {
    pub school: Option<String>,
    pub class: Option<String>,
    pub topic: Option<String>,
    pub duration: Option<String>,
    pub teacher: Option<String>,
    pub approver: Option<String>,
    pub remarks: Option<String>,
    pub day: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
    /// Fill day/month/year from the local date
    pub today: bool,
}

/// Parse a mark argument: `+`, `-` or `none`
fn parse_mark(value: &str) -> GoalsheetResult<Mark> {
    match value.trim() {
        "+" => Ok(Mark::Reached),
        "-" => Ok(Mark::NotReached),
        "none" | "" => Ok(Mark::Unset),
        other => Err(GoalsheetError::Validation(format!(
            "Unknown mark '{}' (expected '+', '-' or 'none')",
            other
        ))),
    }
}

fn mark_display(mark: Mark) -> String {
    match mark {
        Mark::Reached => "+".bold().to_string(),
        Mark::NotReached => "-".bold().blue().to_string(),
        Mark::Unset => "·".red().to_string(),
    }
}

/// Execute the init command
pub fn init(session_path: &Path, force: bool) -> GoalsheetResult<()> {
    if session_path.exists() && !force {
        return Err(GoalsheetError::Validation(format!(
            "{} already exists (use --force to overwrite)",
            session_path.display()
        )));
    }
    Session::new().save(session_path)?;
    println!("{}", "✅ New evaluation session".bold().green());
    println!("   Session: {}", session_path.display());
    Ok(())
}

/// Execute the meta command
pub fn meta(session_path: &Path, update: MetaUpdate) -> GoalsheetResult<()> {
    let mut session = Session::load(session_path)?;
    let meta = &mut session.metadata;

    let fields = [
        (update.school, &mut meta.school_name),
        (update.class, &mut meta.class_name),
        (update.topic, &mut meta.topic),
        (update.duration, &mut meta.duration),
        (update.teacher, &mut meta.teacher_name),
        (update.approver, &mut meta.approver_name),
        (update.remarks, &mut meta.remarks),
        (update.day, &mut meta.sign_day),
        (update.month, &mut meta.sign_month),
        (update.year, &mut meta.sign_year),
    ];
    for (value, field) in fields {
        if let Some(value) = value {
            *field = value;
        }
    }

    if update.today {
        let today = chrono::Local::now().date_naive();
        meta.sign_day = today.day().to_string();
        meta.sign_month = today.month().to_string();
        meta.sign_year = today.year().to_string();
    }

    session.save(session_path)?;

    let meta = &session.metadata;
    println!("{}", "📝 Class information".bold().green());
    println!("   School:   {}", meta.school_name);
    println!("   Class:    {}", meta.class_name);
    println!("   Topic:    {}", meta.topic);
    println!("   Duration: {}", meta.duration);
    println!("   Teacher:  {}", meta.teacher_name);
    println!("   Approver: {}", meta.approver_name);
    println!(
        "   Signed:   {}",
        crate::excel::layout::signing_date_line(meta)
    );
    Ok(())
}

/// Execute the import command
pub fn import(session_path: &Path, input: PathBuf, verbose: bool) -> GoalsheetResult<()> {
    println!("{}", "📥 Goalsheet - Excel Import".bold().green());
    println!("   Input: {}\n", input.display());

    let mut session = Session::load(session_path)?;
    let status = session.import_file(&input)?;

    match status {
        ImportStatus::TooShort { rows } => {
            println!(
                "{}",
                format!("⚠️  Sheet has only {} header rows, nothing imported", rows).yellow()
            );
            return Ok(());
        }
        ImportStatus::NoCategories => {
            println!(
                "{}",
                "⚠️  No merged category headers found, nothing imported".yellow()
            );
            return Ok(());
        }
        ImportStatus::Replaced {
            categories,
            goals,
            students,
        } => {
            session.save(session_path)?;
            println!("{}", "✅ Import Complete!".bold().green());
            println!(
                "   {} categories, {} goals, {} students\n",
                categories, goals, students
            );
        }
    }

    if verbose {
        let schema = session.active_schema();
        for (category, keys) in schema.groups() {
            let labels: Vec<&str> = keys.iter().map(|k| session.schema.label(k)).collect();
            println!(
                "   📊 {}: {}",
                category.name.bright_blue(),
                labels.join(", ")
            );
        }
        println!();
    }

    Ok(())
}

/// Execute the add command
pub fn add(session_path: &Path, name: &str) -> GoalsheetResult<()> {
    let mut session = Session::load(session_path)?;
    let sequence = session.add_student(name)?;
    session.save(session_path)?;
    println!("{} {}. {}", "➕".green(), sequence, name.trim());
    Ok(())
}

/// Execute the remove command
pub fn remove(session_path: &Path, sequence: usize) -> GoalsheetResult<()> {
    let mut session = Session::load(session_path)?;
    let removed = session.roster.remove_student(sequence)?;
    session.save(session_path)?;
    println!("{} {}. {}", "➖".red(), sequence, removed.name);
    Ok(())
}

/// Execute the mark command: cycle, or set when `set` is given
pub fn mark(
    session_path: &Path,
    sequence: usize,
    goal: &str,
    set: Option<String>,
) -> GoalsheetResult<()> {
    let mut session = Session::load(session_path)?;
    let (key, mark) = match set {
        Some(value) => {
            let mark = parse_mark(&value)?;
            (session.set_mark(sequence, goal, mark)?, mark)
        }
        None => session.cycle_mark(sequence, goal)?,
    };
    session.save(session_path)?;

    let student = session.roster.student(sequence)?;
    println!(
        "   {} × {} → {}",
        student.name,
        session.schema.label(&key),
        mark_display(mark)
    );
    Ok(())
}

/// Execute the label command
pub fn label(session_path: &Path, goal: &str, text: &str) -> GoalsheetResult<()> {
    let mut session = Session::load(session_path)?;
    let key = session.set_label(goal, text)?;
    session.save(session_path)?;
    println!("   {} → {}", key, session.schema.label(&key).bold());
    Ok(())
}

/// Execute the show command
pub fn show(session_path: &Path) -> GoalsheetResult<()> {
    let session = Session::load(session_path)?;
    let schema = session.active_schema();
    let keys = &schema.goal_keys;

    println!(
        "{}",
        format!(
            "📋 {} ({})",
            session.metadata.class_name, session.metadata.school_name
        )
        .bold()
    );
    for (category, group) in schema.groups() {
        println!(
            "   {} [{}]",
            category.name.bright_blue(),
            group
                .iter()
                .map(|k| session.schema.label(k))
                .collect::<Vec<_>>()
                .join(" ")
        );
    }
    println!();

    if session.roster.is_empty() {
        println!("   {}", "No students yet".dimmed());
        return Ok(());
    }

    for (idx, student) in session.roster.students().iter().enumerate() {
        let marks: String = keys.iter().map(|k| mark_display(student.mark(k))).collect();
        println!(
            "{:>4}. {:<28} {}  {} {}",
            idx + 1,
            student.name,
            marks,
            student.reached_count(keys).to_string().green(),
            student.unreached_count(keys).to_string().blue()
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct GoalStatsRow<'a> {
    key: &'a str,
    label: &'a str,
    reached: usize,
    unreached: usize,
    total: usize,
    reached_percent: u32,
    unreached_percent: u32,
}

/// Execute the stats command
pub fn stats(session_path: &Path, json: bool) -> GoalsheetResult<()> {
    let session = Session::load(session_path)?;
    let schema = session.active_schema();
    let aggregates = session.aggregates();

    let rows: Vec<GoalStatsRow> = schema
        .goal_keys
        .iter()
        .map(|key| {
            let stats = aggregates.get(key);
            GoalStatsRow {
                key: key.as_str(),
                label: session.schema.label(key),
                reached: stats.reached,
                unreached: stats.unreached,
                total: stats.total,
                reached_percent: stats.reached_percent(),
                unreached_percent: stats.unreached_percent(),
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{}", "📊 Goal statistics".bold().green());
    println!(
        "   {:<10} {:>6} {:>6} {:>6} {:>7} {:>7}",
        "Goal", "Đạt", "Chưa", "Tổng", "% Đạt", "% Chưa"
    );
    for row in &rows {
        println!(
            "   {:<10} {:>6} {:>6} {:>6} {:>6}% {:>6}%",
            row.label,
            row.reached.to_string().green(),
            row.unreached.to_string().blue(),
            row.total,
            row.reached_percent,
            row.unreached_percent
        );
    }
    Ok(())
}

/// Execute the export command
pub fn export(session_path: &Path, output: Option<PathBuf>, verbose: bool) -> GoalsheetResult<()> {
    let session = Session::load(session_path)?;
    let output = output.unwrap_or_else(|| session.report_path());

    println!("{}", "📤 Goalsheet - Excel Export".bold().green());
    println!("   Output: {}\n", output.display());

    if verbose {
        println!(
            "   {} students, {} goals\n",
            session.roster.len(),
            session.active_schema().goal_count()
        );
    }

    session.export_report(&output)?;

    println!("{}", "✅ Export Complete!".bold().green());
    println!("   Excel file: {}", output.display());
    Ok(())
}

/// Execute the template command
pub fn template(session_path: &Path, output: Option<PathBuf>) -> GoalsheetResult<()> {
    let session = Session::load(session_path)?;
    let output = output.unwrap_or_else(|| PathBuf::from(TEMPLATE_FILE_NAME));
    session.export_template(&output)?;
    println!("{}", "✅ Template written".bold().green());
    println!("   Excel file: {}", output.display());
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
