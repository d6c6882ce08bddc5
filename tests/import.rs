use college_sync::{
    count_archived, count_rows, get_all_applications, get_applications_for_student,
    import_applications_from_csv, setup_database, Attending, ImportError, Table,
};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const DISTRICT: &str = "SchooLinks";

const COLUMNS: [&str; 6] = [
    "student_number",
    "ceeb_code",
    "college_name",
    "application_result",
    "application_type",
    "attending",
];

/// Write rows (in COLUMNS order) to a CSV file inside `dir`
fn write_csv(dir: &Path, filename: &str, header: &[&str], rows: &[[&str; 6]]) -> PathBuf {
    let path = dir.join(filename);
    let mut writer = csv::Writer::from_path(&path).expect("csv writer");
    writer.write_record(header).expect("header written");
    for row in rows {
        writer.write_record(row).expect("row written");
    }
    writer.flush().expect("csv flushed");
    path
}

fn setup() -> (TempDir, Connection) {
    let dir = tempdir().expect("temporary directory");
    let conn = Connection::open_in_memory().expect("in-memory database");
    setup_database(&conn).expect("schema created");
    (dir, conn)
}

fn attending_of(conn: &Connection, student_number: &str) -> Attending {
    let views = get_applications_for_student(conn, DISTRICT, student_number).expect("views");
    assert_eq!(views.len(), 1, "one application for {student_number}");
    views[0].attending
}

#[test]
fn import_creates_new_applications() {
    let (dir, mut conn) = setup();
    let path = write_csv(
        dir.path(),
        "applications.csv",
        &COLUMNS,
        &[
            ["974228", "2295", "Stonehill College", "accepted", "Early Action", "1"],
            ["996713", "", "Lasell University", "", "Rolling Decision", "0"],
            ["974424", "3771", "Suffolk University", "accepted", "Rolling", "unknown"],
        ],
    );

    let summary = import_applications_from_csv(&mut conn, &path, DISTRICT).expect("import");

    assert_eq!(summary.total_processed, 3);
    assert_eq!(summary.created, 3);
    assert_eq!(summary.updated, 0);
    assert_eq!(summary.archived, 0);

    assert_eq!(count_rows(&conn, Table::Districts).unwrap(), 1);
    assert_eq!(count_rows(&conn, Table::Students).unwrap(), 3);
    assert_eq!(count_rows(&conn, Table::Applications).unwrap(), 3);

    assert_eq!(attending_of(&conn, "974228"), Attending::Yes);
    assert_eq!(attending_of(&conn, "996713"), Attending::No);
    assert_eq!(attending_of(&conn, "974424"), Attending::Unknown);

    let lasell = get_applications_for_student(&conn, DISTRICT, "996713").unwrap();
    assert_eq!(lasell[0].application_result, None);
    assert_eq!(lasell[0].ceeb_code, "");
}

#[test]
fn import_keeps_last_row_for_duplicates() {
    let (dir, mut conn) = setup();
    let path = write_csv(
        dir.path(),
        "applications_duplicates.csv",
        &COLUMNS,
        &[
            ["974472", "3771", "Suffolk University", "denied", "Early Action", "0"],
            ["974472", "3771", "Suffolk University", "accepted", "Early Action", "1"],
            ["974195", "", "Quinnipiac University", "", "Rolling Decision", "unknown"],
            ["974195", "", "quinnipiac university", "accepted", "Rolling Decision", "1"],
        ],
    );

    let summary = import_applications_from_csv(&mut conn, &path, DISTRICT).expect("import");

    assert_eq!(summary.total_processed, 2);
    assert_eq!(count_rows(&conn, Table::Applications).unwrap(), 2);

    let suffolk = get_applications_for_student(&conn, DISTRICT, "974472").unwrap();
    assert_eq!(suffolk[0].application_result.as_deref(), Some("accepted"));
    assert_eq!(suffolk[0].attending, Attending::Yes);

    let quinnipiac = get_applications_for_student(&conn, DISTRICT, "974195").unwrap();
    assert_eq!(quinnipiac[0].application_result.as_deref(), Some("accepted"));
    assert_eq!(quinnipiac[0].attending, Attending::Yes);
    // The surviving row is the lower-case one, and that is the name the college was created with
    assert_eq!(quinnipiac[0].college_name, "quinnipiac university");
}

#[test]
fn import_updates_existing_record() {
    let (dir, mut conn) = setup();
    let initial = write_csv(
        dir.path(),
        "application_initial.csv",
        &COLUMNS,
        &[["974228", "3780", "Sacred Heart University", "unknown", "Early Action", "unknown"]],
    );
    let update = write_csv(
        dir.path(),
        "application_update.csv",
        &COLUMNS,
        &[["974228", "3780", "Sacred Heart University", "accepted", "Early Action", "1"]],
    );

    let first = import_applications_from_csv(&mut conn, &initial, DISTRICT).expect("first import");
    assert_eq!(first.created, 1);
    assert_eq!(first.updated, 0);

    let second = import_applications_from_csv(&mut conn, &update, DISTRICT).expect("second import");
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 1);
    assert_eq!(count_rows(&conn, Table::Applications).unwrap(), 1);

    let app = get_applications_for_student(&conn, DISTRICT, "974228").unwrap();
    assert_eq!(app[0].application_result.as_deref(), Some("accepted"));
    assert_eq!(app[0].attending, Attending::Yes);
    assert!(!app[0].is_archived);
}

#[test]
fn import_archives_rows_missing_from_latest_file() {
    let (dir, mut conn) = setup();
    let full = write_csv(
        dir.path(),
        "application_full.csv",
        &COLUMNS,
        &[
            ["974150", "3369", "Endicott College", "accepted", "Rolling Decision", "0"],
            ["975900", "2400", "Marist College", "accepted", "Early Action", "1"],
        ],
    );
    let partial = write_csv(
        dir.path(),
        "application_partial.csv",
        &COLUMNS,
        &[["974150", "3369", "Endicott College", "accepted", "Rolling Decision", "0"]],
    );

    import_applications_from_csv(&mut conn, &full, DISTRICT).expect("full import");
    assert_eq!(count_archived(&conn, false).unwrap(), 2);

    let summary = import_applications_from_csv(&mut conn, &partial, DISTRICT).expect("partial import");
    assert_eq!(summary.archived, 1);
    assert_eq!(count_archived(&conn, false).unwrap(), 1);
    assert_eq!(count_archived(&conn, true).unwrap(), 1);

    let archived = get_applications_for_student(&conn, DISTRICT, "975900").unwrap();
    assert!(archived[0].is_archived);
    assert!(archived[0].archived_at.is_some());

    // Coming back in a later file revives it
    let summary = import_applications_from_csv(&mut conn, &full, DISTRICT).expect("full import again");
    assert_eq!(summary.created, 0);
    assert_eq!(summary.updated, 2);
    assert_eq!(count_archived(&conn, true).unwrap(), 0);
}

#[test]
fn importing_same_file_twice_is_idempotent() {
    let (dir, mut conn) = setup();
    let path = write_csv(
        dir.path(),
        "applications.csv",
        &COLUMNS,
        &[
            ["974228", "2295", "Stonehill College", "accepted", "Early Action", "yes"],
            ["996713", "", "Lasell University", "", "Rolling Decision", "false"],
            ["974424", "3771", "Suffolk University", "waitlisted", "Rolling", ""],
        ],
    );

    import_applications_from_csv(&mut conn, &path, DISTRICT).expect("first import");
    let before = get_all_applications(&conn).unwrap();

    let summary = import_applications_from_csv(&mut conn, &path, DISTRICT).expect("second import");
    let after = get_all_applications(&conn).unwrap();

    assert_eq!(summary.created, 0);
    assert_eq!(summary.updated, 3);
    assert_eq!(summary.archived, 0);
    assert_eq!(before, after);
}

#[test]
fn attending_values_survive_reimport() {
    let (dir, mut conn) = setup();
    let values = ["1", "TRUE", "yes", "0", "false", "No", "", "unknown", "nan", "None", "maybe"];
    let numbers: Vec<String> = (0..values.len()).map(|i| format!("9000{i}")).collect();
    let rows: Vec<[&str; 6]> = values
        .iter()
        .zip(&numbers)
        .map(|(value, number)| [number.as_str(), "2295", "Stonehill College", "accepted", "Rolling", *value])
        .collect();
    let path = write_csv(dir.path(), "attending.csv", &COLUMNS, &rows);

    let expected = [
        Attending::Yes,
        Attending::Yes,
        Attending::Yes,
        Attending::No,
        Attending::No,
        Attending::No,
        Attending::Unknown,
        Attending::Unknown,
        Attending::Unknown,
        Attending::Unknown,
        Attending::Unknown,
    ];

    for run in 0..2 {
        import_applications_from_csv(&mut conn, &path, DISTRICT).expect("import");
        for (number, want) in numbers.iter().zip(expected) {
            assert_eq!(attending_of(&conn, number), want, "run {run}, student {number}");
        }
    }
}

#[test]
fn missing_column_fails_before_touching_database() {
    let (dir, mut conn) = setup();
    let path = write_csv(
        dir.path(),
        "bad.csv",
        &["student_number", "college_name", "application_result", "application_type", "attending", "extra"],
        &[["1", "Test College", "accepted", "Rolling", "1", ""]],
    );

    let err = import_applications_from_csv(&mut conn, &path, DISTRICT).unwrap_err();

    assert!(matches!(err, ImportError::MissingColumns { .. }));
    assert!(err.to_string().contains("ceeb_code"));
    assert_eq!(count_rows(&conn, Table::Districts).unwrap(), 0);
    assert_eq!(count_rows(&conn, Table::Students).unwrap(), 0);
    assert_eq!(count_rows(&conn, Table::Applications).unwrap(), 0);
}

#[test]
fn messy_headers_and_padding_are_accepted() {
    let (dir, mut conn) = setup();
    let path = write_csv(
        dir.path(),
        "messy.csv",
        &[" Student_Number", "CEEB_CODE ", "College_Name", "Application_Result", "APPLICATION_TYPE", " Attending "],
        &[[" 001234 ", " 2400 ", " Marist College ", " Accepted ", " Early Action ", " YES "]],
    );

    let summary = import_applications_from_csv(&mut conn, &path, DISTRICT).expect("import");
    assert_eq!(summary.created, 1);

    let views = get_applications_for_student(&conn, DISTRICT, "001234").unwrap();
    assert_eq!(views[0].college_name, "Marist College");
    assert_eq!(views[0].ceeb_code, "2400");
    assert_eq!(views[0].application_result.as_deref(), Some("accepted"));
    assert_eq!(views[0].application_type.as_deref(), Some("Early Action"));
    assert_eq!(views[0].attending, Attending::Yes);
}

#[test]
fn missing_file_is_reported() {
    let (dir, mut conn) = setup();
    let path = dir.path().join("does_not_exist.csv");

    let err = import_applications_from_csv(&mut conn, &path, DISTRICT).unwrap_err();
    assert!(matches!(err, ImportError::Io(_)));
}

#[test]
fn run_import_uses_configured_database_and_district() {
    use college_sync::{open_database, run_import, ImportConfig};

    let dir = tempdir().expect("temporary directory");
    let csv_path = write_csv(
        dir.path(),
        "applications.csv",
        &COLUMNS,
        &[["974228", "2295", "Stonehill College", "accepted", "Early Action", "1"]],
    );
    let config = ImportConfig::new("Springfield USD")
        .with_database_path(dir.path().join("sync.db"))
        .with_csv_path(&csv_path);

    let summary = run_import(&config).expect("import");
    assert_eq!(summary.created, 1);

    let conn = open_database(&config.database_path).expect("reopen database");
    let views = get_applications_for_student(&conn, "Springfield USD", "974228").unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].district_name, "Springfield USD");
}

#[test]
fn run_import_rejects_bad_header_without_creating_database() {
    use college_sync::{run_import, ImportConfig};

    let dir = tempdir().expect("temporary directory");
    let csv_path = write_csv(
        dir.path(),
        "bad.csv",
        &["student_number", "college_name", "application_result", "application_type", "attending", "extra"],
        &[["1", "Test College", "accepted", "Rolling", "1", ""]],
    );
    let database_path = dir.path().join("fresh.db");
    let config = ImportConfig::default()
        .with_database_path(&database_path)
        .with_csv_path(&csv_path);

    let err = run_import(&config).unwrap_err();

    assert!(matches!(err, ImportError::MissingColumns { .. }));
    assert!(!database_path.exists(), "database file created for a rejected export");
}

#[test]
fn run_import_with_missing_file_does_not_create_database() {
    use college_sync::{run_import, ImportConfig};

    let dir = tempdir().expect("temporary directory");
    let database_path = dir.path().join("fresh.db");
    let config = ImportConfig::default()
        .with_database_path(&database_path)
        .with_csv_path(dir.path().join("does_not_exist.csv"));

    let err = run_import(&config).unwrap_err();

    assert!(matches!(err, ImportError::Io(_)));
    assert!(!database_path.exists(), "database file created for a missing export");
}
