//! Integration tests for profile registration and lookup via CLI.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_register_json() {
    let env = TestEnv::init();

    env.gripe()
        .args([
            "profile", "register", "Sam Student", "-e", "sam@example.edu", "-r", "student",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":\"grp-"))
        .stdout(predicate::str::contains("\"full_name\":\"Sam Student\""))
        .stdout(predicate::str::contains("\"role\":\"student\""));
}

#[test]
fn test_register_human() {
    let env = TestEnv::init();

    env.gripe()
        .args([
            "-H", "profile", "register", "Tara Staff", "-e", "tara@example.edu", "-r", "staff",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("grp-"))
        .stdout(predicate::str::contains("Tara Staff <tara@example.edu>"));
}

#[test]
fn test_register_defaults_to_student_role() {
    let env = TestEnv::init();

    env.gripe()
        .args(["profile", "register", "Sam Student", "-e", "sam@example.edu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"role\":\"student\""));
}

#[test]
fn test_register_invalid_role() {
    let env = TestEnv::init();

    env.gripe()
        .args([
            "profile", "register", "Sam", "-e", "sam@example.edu", "-r", "janitor",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown role"));
}

#[test]
fn test_register_duplicate_email() {
    let env = TestEnv::init();
    env.register("Sam Student", "sam@example.edu", "student");

    env.gripe()
        .args(["profile", "register", "Sam Again", "-e", "sam@example.edu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already registered"));
}

#[test]
fn test_register_empty_name() {
    let env = TestEnv::init();

    env.gripe()
        .args(["profile", "register", " ", "-e", "sam@example.edu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("name must not be empty"));
}

#[test]
fn test_list_profiles() {
    let env = TestEnv::init();
    env.register("Sam Student", "sam@example.edu", "student");
    env.register("Tara Staff", "tara@example.edu", "staff");

    env.gripe()
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":2"));

    env.gripe()
        .args(["profile", "list", "--role", "staff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\":1"))
        .stdout(predicate::str::contains("Tara Staff"));
}

#[test]
fn test_show_profile() {
    let env = TestEnv::init();
    let id = env.register("Sam Student", "sam@example.edu", "student");

    env.gripe()
        .args(["profile", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"email\":\"sam@example.edu\""));
}

#[test]
fn test_show_unknown_profile() {
    let env = TestEnv::init();

    env.gripe()
        .args(["profile", "show", "grp-ffff"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_default_profile_config_fallback() {
    let env = TestEnv::init();
    let student = env.register("Sam Student", "sam@example.edu", "student");

    env.gripe()
        .args(["config", "set", "default_profile", &student])
        .assert()
        .success();

    // No --as needed once default_profile is set
    env.gripe()
        .args(["submit", "Wifi down", "-c", "technical", "-d", "desc"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "\"student_id\":\"{}\"",
            student
        )));
}

#[test]
fn test_missing_actor_rejected() {
    let env = TestEnv::init();

    env.gripe()
        .args(["submit", "Wifi down", "-c", "technical", "-d", "desc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No acting profile"));
}
