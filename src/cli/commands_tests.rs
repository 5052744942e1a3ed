use super::*;
use tempfile::TempDir;

fn session_file(dir: &TempDir) -> PathBuf {
    dir.path().join("goalsheet.yaml")
}

// =========================================================================
// parse_mark Tests
// =========================================================================

#[test]
fn test_parse_mark_symbols() {
    assert_eq!(parse_mark("+").unwrap(), Mark::Reached);
    assert_eq!(parse_mark(" - ").unwrap(), Mark::NotReached);
    assert_eq!(parse_mark("none").unwrap(), Mark::Unset);
}

#[test]
fn test_parse_mark_rejects_other_values() {
    assert!(matches!(
        parse_mark("x"),
        Err(GoalsheetError::Validation(_))
    ));
}

// =========================================================================
// Session command Tests
// =========================================================================

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();
    let path = session_file(&dir);

    init(&path, false).unwrap();
    assert!(path.exists());
    assert!(init(&path, false).is_err());
    assert!(init(&path, true).is_ok());
}

#[test]
fn test_meta_updates_only_given_fields() {
    let dir = TempDir::new().unwrap();
    let path = session_file(&dir);

    meta(
        &path,
        MetaUpdate {
            school: Some("MG Bình Hòa".to_string()),
            class: Some("Lá 1".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    meta(
        &path,
        MetaUpdate {
            topic: Some("Gia đình".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    let session = Session::load(&path).unwrap();
    assert_eq!(session.metadata.school_name, "MG Bình Hòa");
    assert_eq!(session.metadata.class_name, "Lá 1");
    assert_eq!(session.metadata.topic, "Gia đình");
}

#[test]
fn test_meta_today_fills_date_parts() {
    let dir = TempDir::new().unwrap();
    let path = session_file(&dir);

    meta(
        &path,
        MetaUpdate {
            today: true,
            ..Default::default()
        },
    )
    .unwrap();

    let session = Session::load(&path).unwrap();
    assert!(!session.metadata.sign_day.is_empty());
    assert!(!session.metadata.sign_month.is_empty());
    assert_eq!(session.metadata.sign_year.len(), 4);
}

#[test]
fn test_add_mark_and_label_persist() {
    let dir = TempDir::new().unwrap();
    let path = session_file(&dir);

    add(&path, "An").unwrap();
    add(&path, "Bình").unwrap();
    mark(&path, 1, "1", None).unwrap();
    mark(&path, 2, "1", Some("-".to_string())).unwrap();
    label(&path, "pttc_0", "MT15").unwrap();

    let session = Session::load(&path).unwrap();
    assert_eq!(session.roster.len(), 2);
    assert_eq!(session.schema.label(&"pttc_0".into()), "MT15");

    let stats = session.aggregates().get(&"pttc_0".into());
    assert_eq!(stats.reached, 1);
    assert_eq!(stats.unreached, 1);
    assert_eq!(stats.total, 2);
}

#[test]
fn test_add_blank_name_fails() {
    let dir = TempDir::new().unwrap();
    let path = session_file(&dir);
    assert!(add(&path, "  ").is_err());
    assert!(!path.exists());
}

#[test]
fn test_mark_unknown_student_fails() {
    let dir = TempDir::new().unwrap();
    let path = session_file(&dir);
    add(&path, "An").unwrap();
    assert!(matches!(
        mark(&path, 3, "1", None),
        Err(GoalsheetError::StudentNotFound(3))
    ));
}

#[test]
fn test_remove_student() {
    let dir = TempDir::new().unwrap();
    let path = session_file(&dir);
    add(&path, "An").unwrap();
    add(&path, "Bình").unwrap();
    remove(&path, 1).unwrap();

    let session = Session::load(&path).unwrap();
    assert_eq!(session.roster.student(1).unwrap().name, "Bình");
}

// =========================================================================
// Export / import command Tests
// =========================================================================

#[test]
fn test_export_then_import_keeps_roster() {
    let dir = TempDir::new().unwrap();
    let path = session_file(&dir);
    let report = dir.path().join("report.xlsx");

    add(&path, "An").unwrap();
    mark(&path, 1, "3", Some("+".to_string())).unwrap();
    export(&path, Some(report.clone()), false).unwrap();
    assert!(report.exists());

    let other = dir.path().join("other.yaml");
    import(&other, report, true).unwrap();

    let session = Session::load(&other).unwrap();
    assert!(session.schema.source.is_imported());
    assert_eq!(session.active_schema().goal_count(), 25);
    assert_eq!(session.roster.student(1).unwrap().name, "An");
    assert_eq!(session.aggregates().get(&"dyn_2".into()).reached, 1);
}

#[test]
fn test_template_writes_file() {
    let dir = TempDir::new().unwrap();
    let path = session_file(&dir);
    let output = dir.path().join("Mau.xlsx");

    template(&path, Some(output.clone())).unwrap();
    assert!(output.exists());
}

#[test]
fn test_stats_and_show_on_fresh_session() {
    let dir = TempDir::new().unwrap();
    let path = session_file(&dir);
    assert!(stats(&path, true).is_ok());
    assert!(stats(&path, false).is_ok());
    assert!(show(&path).is_ok());
}
