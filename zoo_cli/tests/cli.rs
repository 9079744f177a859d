//! Integration tests for the zoo binary.
//!
//! Every test writes a scenario into a temp dir and drives the binary on it.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const ROYAL_ZOO: &str = include_str!("../scenarios/royal_zoo.json");

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("zoo"))
}

/// Write the sample scenario into a fresh temp dir
fn setup_scenario() -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("royal_zoo.json");
    fs::write(&path, ROYAL_ZOO).expect("Failed to write scenario");
    (temp_dir, path)
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Zoo record ledger and daily schedule reports"));
}

#[test]
fn test_zookeeper_schedule() {
    let (_dir, scenario) = setup_scenario();

    cli()
        .arg("schedule")
        .arg(&scenario)
        .arg("--staff")
        .arg("daniel")
        .assert()
        .success()
        .stdout(predicate::str::contains("DANIEL_S1 DAILY TASK SCHEDULE:"))
        .stdout(predicate::str::contains(
            "EVENT 1 @ 06:00:00\n - Daniel_S1 to feed Muad'Dib_A3 (2x whole Grasshopper)",
        ))
        .stdout(predicate::str::contains(
            "EVENT 2 @ 07:00:00\n - Daniel_S1 to clean Dune_E1 (standard)\n - Daniel_S1 to clean DesertHideout_E3 (standard)",
        ))
        .stdout(predicate::str::contains("Pinky").not())
        .stderr(predicate::str::contains("1 event(s) were skipped"));
}

#[test]
fn test_veterinarian_schedule_includes_treatments() {
    let (_dir, scenario) = setup_scenario();

    cli()
        .args(["schedule", scenario.to_str().unwrap(), "--staff", "ethan"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            " - Ethan_S3 to perform health checkup on Pinky_A2 (standard)",
        ))
        .stdout(predicate::str::contains(
            "@ 11:00:00\n - Ethan_S3 to treat Muad'Dib_A3 (5 min cuddles)",
        ))
        .stdout(predicate::str::contains(
            "@ 22:20:00\n - Ethan_S3 to perform health checkup on Muad'Dib_A3 (Behavioural Review)",
        ));
}

#[test]
fn test_unknown_staff_key_fails() {
    let (_dir, scenario) = setup_scenario();

    cli()
        .args(["schedule", scenario.to_str().unwrap(), "--staff", "nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key 'nobody'"));
}

#[test]
fn test_display_report_hides_patients() {
    let (_dir, scenario) = setup_scenario();

    cli()
        .args(["report", scenario.to_str().unwrap(), "display"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ANIMALS CURRENTLY ON DISPLAY (2):"))
        .stdout(predicate::str::contains(" - Pinky_A2 (Emperor Penguin)"))
        .stdout(predicate::str::contains("Muad'Dib").not());
}

#[test]
fn test_species_and_overview_reports() {
    let (_dir, scenario) = setup_scenario();

    cli()
        .args(["report", scenario.to_str().unwrap(), "species"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ANIMALS BY SPECIES (3 total):"))
        .stdout(predicate::str::contains("Brown Desert Mouse (1):\n - Muad'Dib_A3"));

    cli()
        .args(["report", scenario.to_str().unwrap(), "overview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("~~~~~ THE ROYAL ZOO ~~~~~"))
        .stdout(predicate::str::contains(" > Health Status: [UNDER TREATMENT]"))
        .stdout(predicate::str::contains("<VETERINARIAN> ID: S3 | NAME: Ethan"));
}

#[test]
fn test_medical_report_for_one_animal() {
    let (_dir, scenario) = setup_scenario();

    cli()
        .args(["report", scenario.to_str().unwrap(), "medical", "--animal", "mouse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MUAD'DIB_A3 MEDICAL LOG:"))
        .stdout(predicate::str::contains("Psychological illness - anxiety"))
        .stdout(predicate::str::contains("Get 5 min of cuddles 2x per day."));
}

#[test]
fn test_staff_activity_report_cites_medical_refs() {
    let (_dir, scenario) = setup_scenario();

    cli()
        .args(["report", scenario.to_str().unwrap(), "staff-activity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("COMBINED STAFF GENERAL ACTIVITY LOG:"))
        .stdout(predicate::str::contains("Ethan_S3 diagnoses Muad'Dib_A3 (log ref:"))
        .stdout(predicate::str::contains("Nenja_S2 cleans Pinky_A2 (standard)."))
        // the veterinarian's feeding attempt was rejected
        .stdout(predicate::str::contains("Ethan_S3 feeds").not());
}

#[test]
fn test_export_maintenance_csv() {
    let (_dir, scenario) = setup_scenario();

    let output = cli()
        .args(["export", scenario.to_str().unwrap(), "maintenance"])
        .output()
        .expect("Failed to run zoo");
    assert!(output.status.success());

    let csv = String::from_utf8(output.stdout).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Ref,Timestamp,SubjectID,SubjectName,ObjectID,ObjectName,Action,Details")
    );
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].contains("become_dirtier"));
    assert!(rows[1].contains("receive_cleaning"));
}

#[test]
fn test_config_overrides_routine_times() {
    let (dir, scenario) = setup_scenario();
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        "[schedule]\nkeeper_clean_time = \"05:30:00\"\nroutine_details = \"deep clean\"\n",
    )
    .unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["schedule", scenario.to_str().unwrap(), "--staff", "nenja"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "EVENT 1 @ 05:30:00\n - Nenja_S2 to clean BlueLagoon_E2 (deep clean)",
        ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (dir, scenario) = setup_scenario();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[schedule]\nroutine_details = \"  \"\n").unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["report", scenario.to_str().unwrap(), "species"])
        .assert()
        .failure();
}

#[test]
fn test_missing_scenario_file_fails() {
    let dir = tempfile::tempdir().unwrap();

    cli()
        .args(["report", dir.path().join("absent.json").to_str().unwrap(), "display"])
        .assert()
        .failure();
}
