//! End-to-end tests for the `age` binary

use similar_asserts::assert_eq;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

fn age(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_age"))
        .args(args)
        .output()
        .expect("Failed to run age binary");
    (
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in stdout"),
        String::from_utf8(output.stderr).expect("Invalid UTF-8 in stderr"),
        output.status.success(),
    )
}

fn age_with_stdin(args: &[&str], input: &str) -> (String, bool) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_age"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn age binary");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait for age");
    (
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in stdout"),
        output.status.success(),
    )
}

fn write_event_and_results(dir: &Path) -> (PathBuf, PathBuf) {
    let event = dir.join("event.json");
    let results = dir.join("results.json");
    std::fs::write(
        &event,
        r#"{"id":"e1","name":"AGE Open #1","circuit":"AGE Open","status":"upcoming"}"#,
    )
    .unwrap();
    std::fs::write(
        &results,
        r#"[{"playerName":"Ada","gemId":"111","placement":1,"agePoints":10}]"#,
    )
    .unwrap();
    (event, results)
}

fn event_status(event: &Path) -> serde_json::Value {
    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(event).unwrap()).unwrap();
    saved["status"].clone()
}

fn fixture(name: &str) -> String {
    format!("{}/test_decklists/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("age-cli-{test}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_parse_json_output() {
    let (stdout, _, ok) = age(&["parse", "--json", &fixture("bravo_blitz.txt")]);
    assert!(ok);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["hero"], "Bravo");
    assert_eq!(json["fabraryUrl"], "https://fabrary.net/decks/abc123");
    assert_eq!(json["parsedCards"]["deckCards"][0]["quantity"], 3);
}

#[test]
fn test_parse_multiple_files_keeps_order() {
    let (stdout, _, ok) = age(&[
        "parse",
        "--json",
        &fixture("bravo_blitz.txt"),
        &fixture("dorinthea_classic_constructed.txt"),
    ]);
    assert!(ok);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json[0]["deckName"], "Test Deck");
    assert_eq!(json[1]["hero"], "Dorinthea Ironsong");
}

#[test]
fn test_parse_text_summary() {
    let (stdout, _, ok) = age(&["parse", "-v", "silent", &fixture("bravo_blitz.txt")]);
    assert!(ok);
    assert!(stdout.contains("Hero:   Bravo"));
    assert!(stdout.contains("  3x Command and Conquer (blue)"));
}

#[test]
fn test_access_decisions() {
    let args = [
        "access",
        "--mode",
        "Premium",
        "--published-at",
        "2025-11-01T00:00:00Z",
        "--now",
    ];

    let (gated, _, ok) = age(&[&args[..], &["2025-11-30T23:59:59Z"]].concat());
    assert!(ok);
    assert_eq!(gated.trim(), "gated until 2025-12-01T00:00:00+00:00");

    let (lifted, _, _) = age(&[&args[..], &["2025-12-01T00:00:00Z"]].concat());
    assert!(lifted.starts_with("free"));

    let (bogus, _, _) = age(&["access", "--mode", "bogus", "--now", "2030-01-01"]);
    assert_eq!(bogus.trim(), "gated");
}

#[test]
fn test_closeout_writes_event_and_standings() {
    let dir = scratch_dir("closeout");
    let event = dir.join("event.json");
    let results = dir.join("results.json");
    let standings = dir.join("standings.json");
    let _ = std::fs::remove_file(&standings);

    std::fs::write(
        &event,
        r#"{"id":"e1","name":"AGE Open #1","circuit":"AGE Open","status":"upcoming"}"#,
    )
    .unwrap();
    std::fs::write(
        &results,
        r#"[{"playerName":"Ada","gemId":"111","placement":1,"agePoints":10},
            {"playerName":"Bea","gemId":"222","placement":2,"agePoints":7}]"#,
    )
    .unwrap();

    let (stdout, _, ok) = age(&[
        "closeout",
        "--event",
        event.to_str().unwrap(),
        "--results",
        results.to_str().unwrap(),
        "--standings",
        standings.to_str().unwrap(),
        "--actor",
        "staff-1",
        "--role",
        "tournament_staff",
        "--assigned",
        "--now",
        "2025-03-15T23:00:00Z",
    ]);
    assert!(ok);

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["standingsCreated"], 2);

    let saved_event: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&event).unwrap()).unwrap();
    assert_eq!(saved_event["status"], "completed");
    assert!(!dir.join("event.json.tmp").exists());
    assert!(!dir.join("standings.json.tmp").exists());

    let (ranked, _, ok) = age(&[
        "standings",
        "--standings",
        standings.to_str().unwrap(),
        "--circuit",
        "AGE Open",
        "--season",
        "2025",
    ]);
    assert!(ok);
    let ada = ranked.find("Ada").unwrap();
    let bea = ranked.find("Bea").unwrap();
    assert!(ada < bea);

    let (_, _, ok) = age(&[
        "reopen",
        "--event",
        event.to_str().unwrap(),
        "--actor",
        "staff-1",
        "--role",
        "tournament_staff",
    ]);
    assert!(!ok, "staff must not be able to reopen");
}

#[test]
fn test_parse_reads_stdin() {
    let export = std::fs::read_to_string(fixture("bravo_blitz.txt")).unwrap();
    let (stdout, ok) = age_with_stdin(&["parse", "--json", "-"], &export);
    assert!(ok);

    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["deckName"], "Test Deck");
    assert_eq!(json["parsedCards"]["arenaCards"][0]["name"], "Boltyn's Hammer");
}

#[test]
fn test_closeout_by_unassigned_staff_fails() {
    let dir = scratch_dir("unassigned");
    let (event, results) = write_event_and_results(&dir);
    let standings = dir.join("standings.json");
    let _ = std::fs::remove_file(&standings);

    let (stdout, _, ok) = age(&[
        "closeout",
        "--event",
        event.to_str().unwrap(),
        "--results",
        results.to_str().unwrap(),
        "--standings",
        standings.to_str().unwrap(),
        "--actor",
        "staff-2",
        "--role",
        "tournament_staff",
    ]);
    assert!(!ok);
    assert!(stdout.is_empty());
    assert_eq!(event_status(&event), "upcoming");
    assert!(!standings.exists());
}

#[test]
fn test_failed_standings_write_leaves_event_open() {
    let dir = scratch_dir("unwritable");
    let (event, results) = write_event_and_results(&dir);
    let standings = dir.join("missing-dir").join("standings.json");

    let (_, _, ok) = age(&[
        "closeout",
        "--event",
        event.to_str().unwrap(),
        "--results",
        results.to_str().unwrap(),
        "--standings",
        standings.to_str().unwrap(),
        "--actor",
        "admin-1",
        "--role",
        "admin",
    ]);
    assert!(!ok);
    assert_eq!(event_status(&event), "upcoming");
    assert!(!dir.join("event.json.tmp").exists());
}

#[test]
fn test_role_aliases_are_rejected() {
    let dir = scratch_dir("alias");
    let (event, _) = write_event_and_results(&dir);
    let (_, _, ok) = age(&[
        "reopen",
        "--event",
        event.to_str().unwrap(),
        "--actor",
        "s1",
        "--role",
        "staff",
    ]);
    assert!(!ok);
}
