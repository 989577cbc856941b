//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn classkit() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("classkit").unwrap()
}

const STUDENTS: &str = "3\n1001,Ada,18,17,19,80\n1002,Bob,5,6,7,30\n1003,Cy,20,20,20,100\n";

fn students_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("students.txt");
    std::fs::write(&path, STUDENTS).unwrap();
    path
}

#[test]
fn help_output() {
    classkit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("arithmetic quiz"));
}

#[test]
fn version_output() {
    classkit()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("classkit"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    classkit()
        .current_dir(dir.path())
        .env_remove("CLASSKIT_JOKES_PATH")
        .env_remove("CLASSKIT_STUDENTS_PATH")
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created classkit.toml"))
        .stdout(predicate::str::contains("Created jokes.txt"))
        .stdout(predicate::str::contains("Created students.txt"));

    assert!(dir.path().join("classkit.toml").exists());

    // The scaffolded files are picked up through classkit.toml.
    classkit()
        .current_dir(dir.path())
        .env_remove("CLASSKIT_JOKES_PATH")
        .env_remove("CLASSKIT_STUDENTS_PATH")
        .args(["students", "highest"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lee Scott"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    classkit().current_dir(dir.path()).arg("init").assert().success();

    classkit()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn quiz_all_wrong_scores_zero() {
    let mut script = String::from("not a number\n");
    for _ in 0..20 {
        script.push_str("999999\n");
    }
    script.push_str("no\n");

    let dir = TempDir::new().unwrap();
    classkit()
        .current_dir(dir.path())
        .args(["quiz", "--difficulty", "easy", "--seed", "42"])
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Please enter a valid number."))
        .stdout(predicate::str::contains("Final Score: 0/100"))
        .stdout(predicate::str::contains("Rank: D"));
}

#[test]
fn quiz_rejects_unknown_difficulty() {
    let dir = TempDir::new().unwrap();
    classkit()
        .current_dir(dir.path())
        .args(["quiz", "--difficulty", "impossible"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn joke_session_reveals_setup_then_punchline() {
    let dir = TempDir::new().unwrap();
    let jokes = dir.path().join("jokes.txt");
    std::fs::write(
        &jokes,
        "not a joke\nWhat do you call a fake noodle?An impasta.\n",
    )
    .unwrap();

    classkit()
        .current_dir(dir.path())
        .args(["joke", "--seed", "1", "--file"])
        .arg(&jokes)
        .write_stdin("Alexa tell me a Joke\n\nno\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("What do you call a fake noodle?"))
        .stdout(predicate::str::contains("An impasta."))
        .stdout(predicate::str::contains("come back to me anytime"));
}

#[test]
fn joke_missing_file_fails_gracefully() {
    let dir = TempDir::new().unwrap();
    classkit()
        .current_dir(dir.path())
        .args(["joke", "--file", "missing.txt"])
        .assert()
        .success()
        .stderr(predicate::str::contains("source unavailable"))
        .stdout(predicate::str::contains("No jokes to tell"));
}

#[test]
fn students_list_and_extremes() {
    let dir = TempDir::new().unwrap();
    let file = students_file(&dir);

    classkit()
        .args(["students", "list", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Students: 3"))
        .stdout(predicate::str::contains("100.00%"));

    classkit()
        .args(["students", "highest", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Cy"));

    classkit()
        .args(["students", "lowest", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Name: Bob"))
        .stdout(predicate::str::contains("Grade: F"));
}

#[test]
fn students_add_duplicate_fails_and_keeps_file() {
    let dir = TempDir::new().unwrap();
    let file = students_file(&dir);

    classkit()
        .args(["students", "add", "1002", "Imposter", "1", "1", "1", "1", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    assert_eq!(std::fs::read_to_string(&file).unwrap(), STUDENTS);
}

#[test]
fn students_add_update_delete_rewrite_file() {
    let dir = TempDir::new().unwrap();
    let file = students_file(&dir);

    classkit()
        .args(["students", "add", "1004", "Di", "10", "10", "10", "50", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 1004 - Di"));
    let content = std::fs::read_to_string(&file).unwrap();
    assert!(content.starts_with("4\n"));
    assert!(content.ends_with("1004,Di,10,10,10,50\n"));

    classkit()
        .args(["students", "update", "1004", "Diana", "11", "12", "13", "60", "--file"])
        .arg(&file)
        .assert()
        .success();
    let content = std::fs::read_to_string(&file).unwrap();
    assert!(content.contains("1004,Diana,11,12,13,60\n"));

    classkit()
        .args(["students", "delete", "1004", "--file"])
        .arg(&file)
        .write_stdin("yes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 1004 - Diana"));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), STUDENTS);
}

#[test]
fn students_add_out_of_range_mark_fails() {
    let dir = TempDir::new().unwrap();
    let file = students_file(&dir);

    classkit()
        .args(["students", "add", "1005", "Eve", "25", "1", "1", "1", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("coursework 1 must be between 0 and 20"));
}

#[test]
fn students_missing_file_lists_empty() {
    let dir = TempDir::new().unwrap();
    classkit()
        .args(["students", "list", "--file"])
        .arg(dir.path().join("none.txt"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning"))
        .stdout(predicate::str::contains("No student records found."));
}

#[test]
fn missing_config_file_is_an_error() {
    classkit()
        .args(["--config", "no_such_config.toml", "students", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn students_unreadable_file_refuses_to_mutate() {
    let dir = TempDir::new().unwrap();
    classkit()
        .args(["students", "add", "1004", "Di", "1", "1", "1", "1", "--file"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("source unavailable"));
}

#[test]
fn students_file_with_invalid_utf8_keeps_records_on_add() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("students.txt");
    std::fs::write(&file, b"2\n1001,Ada,18,17,19,80\n1002,Jos\xE9,5,6,7,30\n").unwrap();

    classkit()
        .args(["students", "add", "2000", "New", "1", "1", "1", "1", "--file"])
        .arg(&file)
        .assert()
        .success();

    let content = std::fs::read_to_string(&file).unwrap();
    assert!(content.starts_with("3\n1001,Ada,18,17,19,80\n"));
    assert!(content.ends_with("2000,New,1,1,1,1\n"));
}
