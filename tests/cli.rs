use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const MARCH: &str = "date 03/2015 gas 34.56 -- bob 55 susan 45";

fn args(line: &str) -> Vec<&str> {
    line.split(' ').collect()
}

#[test]
fn report_from_arguments() {
    let mut cmd = cargo_bin_cmd!("roomies");
    cmd.arg("--no-color").args(args(MARCH));
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("March 2015\n"))
        .stdout(predicate::str::contains("Gas:           $34.56\n"))
        .stdout(predicate::str::contains("Bob's Total:   $19.01\n"))
        .stdout(predicate::str::contains("Susan's Total: $15.55\n"));
}

#[test]
fn malformed_arguments() {
    let mut cmd = cargo_bin_cmd!("roomies");
    cmd.arg("--no-color")
        .args(args("date 03/2015 gas 34.56 electric -- bob 55 susan 45"));
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("--> Error: There was a problem with your inputs"))
        .stdout(predicate::str::contains("'date 03/2015 gas 34.56 electric -- bob 55 susan 45'"))
        .stdout(predicate::str::contains("March 2015").not());
}

#[test]
fn unparseable_value() {
    let mut cmd = cargo_bin_cmd!("roomies");
    cmd.arg("--no-color")
        .args(args("date 13/2015 gas 34.56 -- bob 55 susan 45"));
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("--> Error: Invalid date"));
}

#[test]
fn collapse_single_share() {
    let mut cmd = cargo_bin_cmd!("roomies");
    cmd.arg("--no-color")
        .arg("--collapse-single-share")
        .args(args("header Cabin rent 800 -- bob 100"));
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("Cabin\n"))
        .stdout(predicate::str::contains("Bob's Total").not());
}

#[test]
fn custom_width() {
    let mut cmd = cargo_bin_cmd!("roomies");
    cmd.arg("--no-color").arg("--width").arg("40").args(args(MARCH));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(format!("\n{}\n", "*".repeat(40))));
}

#[test]
fn file_with_valid_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bills.txt");
    fs::write(
        &path,
        format!("// spring\n{}\n\ndate 04/2015 rent 900 -- bob 50 susan 50\n", MARCH),
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("roomies");
    cmd.arg("--no-color").arg("--file").arg(&path);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("March 2015"))
        .stdout(predicate::str::contains("April 2015"))
        .stdout(predicate::str::contains("Susan's Total: $450.00"))
        .stdout(predicate::str::contains("spring").not());
}

#[test]
fn file_keeps_going_after_bad_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bills.txt");
    fs::write(
        &path,
        format!("date 04/2015 gas abc -- bob 50 susan 50\n{}\n", MARCH),
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("roomies");
    cmd.arg("--no-color").arg("-f").arg(&path);
    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("--> Error: Invalid amount"))
        .stdout(predicate::str::contains("March 2015"));
}

#[test]
fn missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nowhere.txt");

    let mut cmd = cargo_bin_cmd!("roomies");
    cmd.arg("--no-color").arg("--file").arg(&path);
    cmd.assert()
        .code(2)
        .stderr(predicate::function(|err: &str| err.matches("could not open bill file").count() == 1));
}
