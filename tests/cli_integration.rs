mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

use common::{create_seeded_store, temp_config_file};

const ENV_VARS: [&str; 9] = [
    "CHATLIST_SOURCE",
    "CHATLIST_HTTP_BASE_URL",
    "CHATLIST_HTTP_TIMEOUT_SECONDS",
    "CHATLIST_DB",
    "CHATLIST_CACHE_TTL_SECONDS",
    "CHATLIST_GROUP_SUFFIX",
    "CHATLIST_LOAD_POLICY",
    "CHATLIST_LOG_LEVEL",
    "CHATLIST_JSON_LOGS",
];

/// `chatlist` pointed at `db` with no config file
fn chatlist(db: &Path) -> Command {
    let mut cmd = Command::cargo_bin("chatlist").expect("binary should build");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1")
        .arg("--config")
        .arg(db.with_file_name("missing-config.yaml"))
        .arg("--db-path")
        .arg(db);
    cmd
}

#[test]
fn test_list_json_outputs_summaries() {
    let (_store, tmp) = create_seeded_store();
    let output = chatlist(&tmp.path().join("messages.db"))
        .args(["list", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summaries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0]["id"], "222@c.us");
    assert_eq!(summaries[0]["display_name"], "Alice");
    assert_eq!(summaries[0]["kind"], "contact");
    assert_eq!(summaries[1]["display_name"], "Team");
    assert_eq!(summaries[1]["kind"], "group");
}

#[test]
fn test_list_query_filters_case_insensitively() {
    let (_store, tmp) = create_seeded_store();
    let output = chatlist(&tmp.path().join("messages.db"))
        .args(["list", "--query", "TEA", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summaries: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["id"], "111@g.us");
}

#[test]
fn test_list_table_output() {
    let (_store, tmp) = create_seeded_store();
    chatlist(&tmp.path().join("messages.db"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("Team"))
        .stdout(predicate::str::contains("2023-11-14"));
}

#[test]
fn test_list_empty_store() {
    let tmp = tempfile::TempDir::new().unwrap();
    chatlist(&tmp.path().join("messages.db"))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversations found."));
}

#[test]
fn test_open_resolves_selection() {
    let (_store, tmp) = create_seeded_store();
    let output = chatlist(&tmp.path().join("messages.db"))
        .args(["open", "111@g.us", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["display_name"], "Team");
    assert_eq!(summary["subtitle"], "hi");
}

#[test]
fn test_open_unknown_handle() {
    let (_store, tmp) = create_seeded_store();
    let db = tmp.path().join("messages.db");

    chatlist(&db)
        .args(["open", "999@c.us"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversation 999@c.us not found."));

    chatlist(&db)
        .args(["open", "999@c.us", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("null\n"));
}

#[test]
fn test_unreachable_http_backend_reports_error() {
    let (_tmp, config_path) = temp_config_file(
        "source:\n  type: http\n  cache_ttl_seconds: 0\n  http:\n    base_url: http://127.0.0.1:1\n    timeout_seconds: 2\n",
    );

    let mut cmd = Command::cargo_bin("chatlist").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("--config")
        .arg(&config_path)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversations found."))
        .stderr(predicate::str::contains("Could not load conversations"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_tmp, config_path) = temp_config_file("source:\n  type: carrier-pigeon\n");

    let mut cmd = Command::cargo_bin("chatlist").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("--config")
        .arg(&config_path)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid source type"));
}

#[test]
fn test_config_load_warnings_reach_stderr() {
    let (_store, tmp) = create_seeded_store();
    chatlist(&tmp.path().join("messages.db"))
        .env("CHATLIST_CACHE_TTL_SECONDS", "soon")
        .args(["list", "--json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Config file not found"))
        .stderr(predicate::str::contains("Invalid CHATLIST_CACHE_TTL_SECONDS: soon"));
}

#[test]
fn test_db_path_from_environment() {
    let (_store, tmp) = create_seeded_store();
    let mut cmd = Command::cargo_bin("chatlist").unwrap();
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.env("CHATLIST_DB", tmp.path().join("messages.db"))
        .arg("--config")
        .arg(tmp.path().join("missing-config.yaml"))
        .args(["open", "222@c.us", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"display_name\": \"Alice\""));
}
