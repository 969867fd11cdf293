use assert_cmd::Command;
use axum::http::HeaderValue;
use bulletin_server::{serve, AppState, MemoryRepository, ServerSettings};
use predicates::prelude::*;
use serde_json::Value;
use std::net::SocketAddr;

const SECRET: &str = "cli-secret";

fn bulletin() -> Command {
    let mut cmd = Command::cargo_bin("bulletin").unwrap();
    // Keep the developer's environment out of the tests
    cmd.env_remove("BULLETIN_API_URL")
        .env_remove("BULLETIN_ADMIN_SECRET")
        .env_remove("RUST_LOG");
    cmd
}

/// Start an empty server on a background runtime
fn start_server() -> SocketAddr {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let settings = ServerSettings {
                admin_secret: SECRET.to_string(),
                client_origin: HeaderValue::from_static("http://localhost:5173"),
                body_limit_bytes: 10 * 1024,
            };
            let state = AppState::new(MemoryRepository::new(), settings);
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            serve(listener, state, std::future::pending()).await.unwrap();
        });
    });
    rx.recv().unwrap()
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help_lists_commands() {
    bulletin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("categories"))
        .stdout(predicate::str::contains("seed"));
}

#[test]
fn test_categories_offline_ranks_typo() {
    let output = bulletin()
        .args(["categories", "helth", "--offline"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().next(), Some("Health"));
    assert_eq!(stdout.lines().count(), 9);
}

#[test]
fn test_categories_offline_json_excludes_selected() {
    let output = bulletin()
        .args(["--format", "json", "categories", "--offline", "--exclude", "City"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let names = stdout_json(&output);
    assert_eq!(names.as_array().unwrap().len(), 8);
    assert!(!names.as_array().unwrap().contains(&Value::from("City")));
}

#[test]
fn test_search_offline_filters_by_category() {
    let output = bulletin()
        .args(["--format", "json", "search", "--offline", "--category", "Community events"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let body = stdout_json(&output);
    assert_eq!(body["source"], "fallback");
    assert_eq!(body["sort"], "publication-date-desc");
    let mut ids: Vec<i64> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["item"]["id"].as_i64().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![12, 15, 18]);
}

#[test]
fn test_search_offline_text_output() {
    bulletin()
        .args(["search", "mock description 7", "--sort", "relevance", "--offline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title 7"));
}

#[test]
fn test_search_rejects_unknown_sort() {
    bulletin()
        .args(["search", "--offline", "--sort", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_seed_requires_secret() {
    bulletin()
        .arg("seed")
        .assert()
        .failure()
        .stderr(predicate::str::contains("BULLETIN_ADMIN_SECRET"));
}

#[test]
fn test_serve_without_required_settings_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    bulletin()
        .current_dir(dir.path())
        .env_remove("CLIENT_URL")
        .env_remove("ADMIN_SECRET")
        .arg("serve")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("CLIENT_URL"));
}

#[test]
fn test_seed_then_search_against_server() {
    let addr = start_server();
    let url = format!("http://{addr}");

    let output = bulletin()
        .env("BULLETIN_API_URL", &url)
        .env("BULLETIN_ADMIN_SECRET", SECRET)
        .args(["--format", "json", "seed"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let summary = stdout_json(&output);
    assert_eq!(summary["created"], 29);
    assert_eq!(summary["updated"], 0);

    // A second run updates everything in place
    let output = bulletin()
        .env("BULLETIN_API_URL", &url)
        .env("BULLETIN_ADMIN_SECRET", SECRET)
        .args(["--format", "json", "seed"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let summary = stdout_json(&output);
    assert_eq!(summary["created"], 0);
    assert_eq!(summary["updated"], 29);

    let output = bulletin()
        .env("BULLETIN_API_URL", &url)
        .args(["--format", "json", "search", "helth", "--sort", "relevance"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let body = stdout_json(&output);
    assert_eq!(body["source"], "server");

    bulletin()
        .env("BULLETIN_API_URL", &url)
        .arg("health")
        .assert()
        .success()
        .stdout(predicate::str::contains("is up"));
}
