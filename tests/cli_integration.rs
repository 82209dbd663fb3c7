//! Integration tests for the `tdl` CLI.
//!
//! Each test starts a mock list server, gives `tdl` a temp config home,
//! runs it as a subprocess, and verifies stdout and/or the saved config.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "0123456789abcdefghijklmnopqrstuv";

/// Get the path to the built `tdl` binary.
fn tdl_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tdl"))
}

fn config_file(home: &Path) -> PathBuf {
    home.join("todoshare").join("config.toml")
}

/// Write a config pointing at the mock server.
fn write_config(home: &Path, server: &MockServer, token: Option<&str>) {
    let mut content = format!(
        "server = \"{}/api\"\nweb_url = \"https://lists.example.org\"\n",
        server.uri()
    );
    if let Some(token) = token {
        content.push_str(&format!("token = \"{}\"\n", token));
    }
    fs::create_dir_all(home.join("todoshare")).unwrap();
    fs::write(config_file(home), content).unwrap();
}

async fn mount_list(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/todo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "Buy milk", "text": "", "done": false, "category": ["home"], "rank": 10 },
            { "id": 2, "name": "Send report", "text": "", "done": false, "category": ["work"], "rank": 30 },
            { "id": 3, "name": "", "text": "", "done": true, "category": null, "rank": 20 }
        ])))
        .mount(server)
        .await;
}

/// Run `tdl` with the given args and config home, returning (stdout, stderr, success).
fn run_tdl(home: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tdl_bin())
        .args(args)
        .env("XDG_CONFIG_HOME", home)
        .env_remove("TODOSHARE_SERVER")
        .env_remove("TODOSHARE_TOKEN")
        .env_remove("TODOSHARE_LOG")
        .output()
        .expect("failed to run tdl");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tdl` expecting success, return stdout.
fn run_tdl_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tdl(home, args);
    if !success {
        panic!(
            "tdl {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

// ---------------------------------------------------------------------------
// Session command tests
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn test_new_saves_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/list"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TOKEN))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, None);

    let out = run_tdl_ok(tmp.path(), &["new"]);
    assert_eq!(out.trim(), format!("https://lists.example.org/{}", TOKEN));

    let saved = fs::read_to_string(config_file(tmp.path())).unwrap();
    assert!(saved.contains(&format!("token = \"{}\"", TOKEN)));
    assert!(saved.contains(&server.uri()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_open_share_url() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, None);

    let url = format!("https://lists.example.org/{}", TOKEN);
    run_tdl_ok(tmp.path(), &["open", &url]);

    let out = run_tdl_ok(tmp.path(), &["share", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["token"], TOKEN);
    assert_eq!(parsed["share_url"], url.as_str());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_open_rejected_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todo"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, None);

    let (_, stderr, success) = run_tdl(tmp.path(), &["open", TOKEN]);
    assert!(!success);
    assert!(stderr.contains("does not know list"));
    let saved = fs::read_to_string(config_file(tmp.path())).unwrap();
    assert!(!saved.contains(TOKEN));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_without_token_fails() {
    let server = MockServer::start().await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, None);

    let (_, stderr, success) = run_tdl(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.contains("no list selected"));
}

// ---------------------------------------------------------------------------
// Read command tests
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn test_list_in_rank_order() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let out = run_tdl_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[ ] 2 Send report #work",
            "[x] 3 Unnamed Todo",
            "[ ] 1 Buy milk #home",
        ]
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_category_filter_json() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let out = run_tdl_ok(tmp.path(), &["list", "--category", "home", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["name"], "Buy milk");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_token_flag_overrides_config() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, None);

    let out = run_tdl_ok(tmp.path(), &["list", "--group", "--token", TOKEN]);
    assert!(out.contains("#home"));
    assert!(out.contains("(no category)"));
}

// ---------------------------------------------------------------------------
// Write command tests
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread")]
async fn test_add_prints_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/todo"))
        .and(body_json(json!({
            "done": false, "name": "Water plants", "text": "", "category": ["home", "green"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4, "name": "Water plants", "text": "", "done": false,
            "category": ["home", "green"], "rank": 31
        })))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let out = run_tdl_ok(tmp.path(), &["add", "Water plants", "-c", "home", "-c", "green"]);
    assert_eq!(out.trim(), "4");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mv_prints_swapped_order() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/todo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "", "text": "", "done": true, "category": null, "rank": 35
        })))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let out = run_tdl_ok(tmp.path(), &["mv", "3", "up"]);
    let first = out.lines().next().unwrap();
    assert_eq!(first, "[x] 3 Unnamed Todo");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mv_unknown_id_fails() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let (_, stderr, success) = run_tdl(tmp.path(), &["mv", "42", "down"]);
    assert!(!success);
    assert!(stderr.contains("todo not found: 42"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rm() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    Mock::given(method("DELETE"))
        .and(path("/api/todo"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    run_tdl_ok(tmp.path(), &["rm", "1"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cat_rm_missing_label_fails() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let (_, stderr, success) = run_tdl(tmp.path(), &["cat", "rm", "1", "work"]);
    assert!(!success);
    assert!(stderr.contains("has no category 'work'"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_edit_sends_patched_todo() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/todo"))
        .and(body_json(json!({
            "id": 1, "name": "Buy oat milk", "text": "", "done": true, "category": [], "rank": 10
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "name": "Buy oat milk", "text": "", "done": true, "category": null, "rank": 10
        })))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let out = run_tdl_ok(
        tmp.path(),
        &["edit", "1", "--name", "Buy oat milk", "--clear-categories", "--done", "true"],
    );
    assert_eq!(out.trim(), "[x] 1 Buy oat milk");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_edit_without_changes_fails() {
    let server = MockServer::start().await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let (_, stderr, success) = run_tdl(tmp.path(), &["edit", "1"]);
    assert!(!success);
    assert!(stderr.contains("nothing to change"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_mark_toggles_done() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/todo"))
        .and(body_json(json!({
            "id": 3, "name": "", "text": "", "done": false, "category": [], "rank": 20
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 3, "name": "", "text": "", "done": false, "category": null, "rank": 20
        })))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let out = run_tdl_ok(tmp.path(), &["mark", "3"]);
    assert_eq!(out.trim(), "[ ] 3 Unnamed Todo");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cat_add_appends_label() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    Mock::given(method("PUT"))
        .and(path("/api/todo"))
        .and(body_json(json!({
            "id": 2, "name": "Send report", "text": "", "done": false,
            "category": ["work", "urgent"], "rank": 30
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "name": "Send report", "text": "", "done": false,
            "category": ["work", "urgent"], "rank": 30
        })))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let out = run_tdl_ok(tmp.path(), &["cat", "add", "2", " urgent "]);
    assert_eq!(out.trim(), "[ ] 2 Send report #work #urgent");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_cat_ls_lists_labels_in_display_order() {
    let server = MockServer::start().await;
    mount_list(&server).await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let out = run_tdl_ok(tmp.path(), &["cat", "ls"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines, vec!["#work", "#home"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_digit_string_ids_are_reachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/todo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "123", "name": "Text id", "text": "", "done": false, "category": null, "rank": 5 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/todo"))
        .and(body_json(json!({
            "id": "123", "name": "Text id", "text": "", "done": true, "category": [], "rank": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "123", "name": "Text id", "text": "", "done": true, "category": null, "rank": 5
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/todo"))
        .and(query_param("id", "123"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = tempfile::TempDir::new().unwrap();
    write_config(tmp.path(), &server, Some(TOKEN));

    let out = run_tdl_ok(tmp.path(), &["mark", "123"]);
    assert_eq!(out.trim(), "[x] 123 Text id");
    run_tdl_ok(tmp.path(), &["rm", "123"]);
}
