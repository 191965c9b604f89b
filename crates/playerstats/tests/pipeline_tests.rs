//! End-to-end runs of the upload pipeline against a scratch database

use std::fs;
use std::path::Path;

use playerstats::surface::Shown;
use playerstats::{
    AllColumns, ErrorKind, FixedColumns, MemorySurface, Pipeline, Session, Severity, Store,
    UploadedFile,
};
use tempfile::tempdir;

const PLAYERS_TXT: &str = "name\tgames\twinnings\nAlice\t10\t250.5\nBob\t5\t80.0\n";

fn write_upload(dir: &Path, name: &str, content: &str) -> UploadedFile {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    UploadedFile::from_path(&path).unwrap()
}

fn stored_rows(store: &Store, table: &str) -> Vec<Vec<String>> {
    store
        .execute(&format!("SELECT * FROM \"{table}\""))
        .unwrap()
        .rows_as_strings()
        .unwrap()
}

#[test]
fn test_players_txt_scenario() {
    let tmp = tempdir().unwrap();
    let uploads = tmp.path().join("uploads");
    fs::create_dir_all(&uploads).unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let session = Session::default();
    let pipeline = Pipeline::new(&store, &session, tmp.path().join("work"));

    let mut surface = MemorySurface::new();
    assert!(pipeline.initialize(&mut surface));

    let upload = write_upload(&uploads, "players.txt", PLAYERS_TXT);
    let report = pipeline.run(Some(&upload), &mut AllColumns, &mut surface);

    assert!(report.succeeded(), "{:?}", surface.shown);
    assert_eq!(report.normalized, Some(tmp.path().join("work").join("players.csv")));
    assert_eq!(report.rows_written, Some(2));
    assert_eq!(report.columns, vec!["name", "games", "winnings"]);

    let count = report.count.unwrap();
    assert_eq!(count.counts, vec![2]);

    let aggregate = report.aggregate.unwrap();
    assert_eq!(
        aggregate.table.rows_as_strings().unwrap(),
        vec![
            vec!["Alice".to_string(), "10".to_string(), "250.5".to_string()],
            vec!["Bob".to_string(), "5".to_string(), "80.0".to_string()],
        ]
    );
    assert_eq!(aggregate.value.as_deref(), Some("games"));

    let charts = surface.charts();
    assert_eq!(charts.len(), 2);
    assert_eq!(charts[0].bars[0].value, 2.0);
    let labels: Vec<&str> = charts[1].bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Alice: 10", "Bob: 5"]);

    assert_eq!(
        surface.messages(Severity::Success),
        vec!["Player data has been successfully converted and stored in the database."]
    );
}

#[test]
fn test_count_is_stable_across_requery() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let session = Session::default();
    let pipeline = Pipeline::new(&store, &session, tmp.path().to_path_buf());

    let upload = write_upload(tmp.path(), "players.txt", PLAYERS_TXT);
    let mut surface = MemorySurface::new();
    pipeline.run(Some(&upload), &mut AllColumns, &mut surface);

    let first = pipeline.report(&mut MemorySurface::new());
    let second = pipeline.report(&mut MemorySurface::new());
    assert_eq!(first.count.unwrap().counts, vec![2]);
    assert_eq!(second.count.unwrap().counts, vec![2]);
}

#[test]
fn test_empty_selection_leaves_store_untouched() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let session = Session::default();
    let pipeline = Pipeline::new(&store, &session, tmp.path().to_path_buf());

    let upload = write_upload(tmp.path(), "players.txt", PLAYERS_TXT);
    pipeline.run(Some(&upload), &mut AllColumns, &mut MemorySurface::new());
    let before = stored_rows(&store, "PlayerData");

    let other = write_upload(tmp.path(), "teams.csv", "team,points\nRed,3\n");
    let mut surface = MemorySurface::new();
    let report = pipeline.run(Some(&other), &mut FixedColumns::default(), &mut surface);

    assert_eq!(report.halted, Some(ErrorKind::Selection));
    assert_eq!(report.rows_written, None);
    assert_eq!(
        surface.messages(Severity::Warning),
        vec!["Please select at least one column"]
    );
    assert_eq!(stored_rows(&store, "PlayerData"), before);
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let session = Session::default();
    let pipeline = Pipeline::new(&store, &session, tmp.path().join("work"));
    pipeline.initialize(&mut MemorySurface::new());

    let upload = write_upload(tmp.path(), "data.json", "{\"name\": \"Alice\"}");
    let mut surface = MemorySurface::new();
    let report = pipeline.run(Some(&upload), &mut AllColumns, &mut surface);

    assert_eq!(report.halted, Some(ErrorKind::Input));
    let errors = surface.messages(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Unsupported file format"));
    assert!(stored_rows(&store, "PlayerData").is_empty());
    assert!(!tmp.path().join("work").exists());
}

#[test]
fn test_replace_on_write_across_uploads() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let session = Session::default();
    let pipeline = Pipeline::new(&store, &session, tmp.path().to_path_buf());

    let players = write_upload(tmp.path(), "players.txt", PLAYERS_TXT);
    pipeline.run(Some(&players), &mut AllColumns, &mut MemorySurface::new());

    let teams = write_upload(tmp.path(), "teams.csv", "team,city,points\nRed,Oslo,3\nBlue,Rome,7\n");
    let report = pipeline.run(
        Some(&teams),
        &mut FixedColumns::new(["team", "points"]),
        &mut MemorySurface::new(),
    );
    assert_eq!(report.count.unwrap().counts, vec![2]);

    let schema = store.table_schema("PlayerData").unwrap();
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["team", "points"]);
}

#[test]
fn test_sessions_do_not_share_tables() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let alice = Session::resolve("PlayerData", Some("alice")).unwrap();
    let bob = Session::resolve("PlayerData", Some("bob")).unwrap();

    let players = write_upload(tmp.path(), "players.txt", PLAYERS_TXT);
    let teams = write_upload(tmp.path(), "teams.csv", "team,points\nRed,3\n");

    Pipeline::new(&store, &alice, tmp.path().to_path_buf()).run(
        Some(&players),
        &mut AllColumns,
        &mut MemorySurface::new(),
    );
    Pipeline::new(&store, &bob, tmp.path().to_path_buf()).run(
        Some(&teams),
        &mut AllColumns,
        &mut MemorySurface::new(),
    );

    assert_eq!(stored_rows(&store, "PlayerData_alice").len(), 2);
    assert_eq!(stored_rows(&store, "PlayerData_bob").len(), 1);
}

#[test]
fn test_tables_are_shown_for_both_queries() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let session = Session::default();
    let pipeline = Pipeline::new(&store, &session, tmp.path().to_path_buf());

    let upload = write_upload(tmp.path(), "players.txt", PLAYERS_TXT);
    let mut surface = MemorySurface::new();
    pipeline.run(Some(&upload), &mut AllColumns, &mut surface);

    let titles: Vec<&str> = surface
        .shown
        .iter()
        .filter_map(|s| match s {
            Shown::Table(title, _) => Some(title.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(titles, vec!["Query 1 Result:", "Query 2 Result:"]);
    assert!(surface.tables()[0].contains("Count"));
    assert!(surface.tables()[1].contains("Alice"));
}

#[test]
fn test_repeated_group_keys_are_summed() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let session = Session::default();
    let pipeline = Pipeline::new(&store, &session, tmp.path().to_path_buf());

    let upload = write_upload(
        tmp.path(),
        "rounds.csv",
        "name,team,games,winnings\nAlice,Red,10,250.5\nAlice,Blue,3,1.5\nBob,Red,5,80.0\n",
    );
    let mut surface = MemorySurface::new();
    let report = pipeline.run(Some(&upload), &mut AllColumns, &mut surface);
    assert!(report.succeeded(), "{:?}", surface.shown);
    assert_eq!(report.rows_written, Some(3));
    assert_eq!(report.count.unwrap().counts, vec![3]);

    let aggregate = report.aggregate.unwrap();
    let rows = aggregate.table.rows_as_strings().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "Alice");
    // Text columns take one of the group's values
    assert!(rows[0][1] == "Red" || rows[0][1] == "Blue", "{rows:?}");
    assert_eq!(rows[0][2..], ["13".to_string(), "252.0".to_string()]);
    assert_eq!(
        rows[1],
        vec!["Bob".to_string(), "Red".to_string(), "5".to_string(), "80.0".to_string()]
    );
    assert_eq!(
        aggregate.pairs,
        vec![("Alice".to_string(), 13.0), ("Bob".to_string(), 5.0)]
    );

    let charts = surface.charts();
    let labels: Vec<&str> = charts[1].bars.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["Alice: 13", "Bob: 5"]);
}

#[test]
fn test_repeated_headers_can_be_ingested() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let session = Session::default();
    let pipeline = Pipeline::new(&store, &session, tmp.path().join("work"));

    let upload = UploadedFile::new("d.csv", b"name,games,games\nA,1,2\n".to_vec());
    let mut surface = MemorySurface::new();
    let report = pipeline.run(Some(&upload), &mut AllColumns, &mut surface);

    assert!(report.succeeded(), "{:?}", surface.shown);
    assert_eq!(report.columns, vec!["name", "games", "games.1"]);
    assert_eq!(
        stored_rows(&store, "PlayerData"),
        vec![vec!["A".to_string(), "1".to_string(), "2".to_string()]]
    );
}

#[test]
fn test_stat_style_headers_are_accepted() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let session = Session::default();
    let pipeline = Pipeline::new(&store, &session, tmp.path().join("work"));

    let upload = UploadedFile::new(
        "stats.csv",
        b"Player,Winnings ($),Win %\nAlice,250.5,0.6\nBob,80.0,0.4\n".to_vec(),
    );
    let mut surface = MemorySurface::new();
    let report = pipeline.run(Some(&upload), &mut AllColumns, &mut surface);

    assert!(report.succeeded(), "{:?}", surface.shown);
    assert_eq!(report.aggregate.unwrap().value.as_deref(), Some("Winnings ($)"));
}

#[test]
fn test_bad_header_is_an_input_failure() {
    let tmp = tempdir().unwrap();
    let store = Store::new(tmp.path().join("player_data.db"));
    let session = Session::default();
    let pipeline = Pipeline::new(&store, &session, tmp.path().join("work"));

    let upload = UploadedFile::new("stats.csv", b"name,wins; --\nAlice,3\n".to_vec());
    let mut surface = MemorySurface::new();
    let report = pipeline.run(Some(&upload), &mut AllColumns, &mut surface);

    assert_eq!(report.halted, Some(ErrorKind::Input));
    let errors = surface.messages(Severity::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("'wins; --'"), "{}", errors[0]);
    assert!(errors[0].contains("character ';' is not allowed"), "{}", errors[0]);
}
