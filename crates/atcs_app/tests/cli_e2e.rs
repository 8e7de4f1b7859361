//! End-to-end tests for the `atcs` binary.

// `Command::cargo_bin` is deprecated in newer assert_cmd releases.
#![allow(deprecated)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TASK_HTML: &str = r#"<html><body><div id="task-statement"><span class="lang">
<span class="lang-ja">
<div class="part"><section><h3>問題文</h3><p>整数 A, B が与えられます。</p><img src="/img/figure.png"></section></div>
<div class="part"><section><h3>制約</h3><p>1 \leq A, B \leq 100</p></section></div>
<div class="part"><section><h3>入力</h3><pre>A B</pre></section></div>
</span>
<span class="lang-en">
<div class="part"><section><h3>Problem Statement</h3><p>You are given integers A and B.</p></section></div>
</span></span></div></body></html>"#;

fn atcs() -> Command {
    Command::cargo_bin("atcs").unwrap()
}

async fn serve_task(server: &MockServer) -> String {
    Mock::given(method("GET"))
        .and(path("/contests/abc123/tasks/abc123_a"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(TASK_HTML, "text/html; charset=utf-8"))
        .mount(server)
        .await;
    format!("{}/contests/abc123/tasks/abc123_a", server.uri())
}

/// Runs the binary off the async runtime so the mock server keeps serving.
async fn run_blocking(mut cmd: Command) -> assert_cmd::assert::Assert {
    tokio::task::spawn_blocking(move || cmd.assert())
        .await
        .unwrap()
}

#[test]
fn help_lists_usage_and_examples() {
    atcs()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: atcs"))
        .stdout(predicate::str::contains("--no-inline-images"))
        .stdout(predicate::str::contains("Examples:"));
}

#[test]
fn missing_url_is_a_usage_error() {
    atcs()
        .assert()
        .failure()
        .stderr(predicate::str::contains("<URL>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn prints_record_to_stdout() {
    let server = MockServer::start().await;
    let url = serve_task(&server).await;

    let mut cmd = atcs();
    cmd.arg(&url);
    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::starts_with("{\n  \"problem\": \"整数 A, B が与えられます。\""))
        .stdout(predicate::str::contains("\"images\": [\n    \"/img/figure.png\"\n  ]"))
        .stdout(predicate::str::contains("Saved problem data").not());
}

#[tokio::test(flavor = "multi_thread")]
async fn lang_option_selects_english_block() {
    let server = MockServer::start().await;
    let url = serve_task(&server).await;

    let mut cmd = atcs();
    cmd.args([url.as_str(), "--lang", "en"]);
    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("You are given integers A and B."))
        .stdout(predicate::str::contains("\"constraints\": \"\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn directory_output_saves_record_and_images() {
    let server = MockServer::start().await;
    let url = serve_task(&server).await;
    Mock::given(method("GET"))
        .and(path("/img/figure.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"figure".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("abc123_a");
    let mut cmd = atcs();
    cmd.arg(&url).arg(&dir);
    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains(format!(
            "Saved problem data to {}",
            dir.display()
        )));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("problem.json")).unwrap()).unwrap();
    assert_eq!(json["input"], "A B");
    assert_eq!(fs::read(dir.join("figure.png")).unwrap(), b"figure");
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_image_is_a_warning_not_an_error() {
    let server = MockServer::start().await;
    let url = serve_task(&server).await;
    Mock::given(method("GET"))
        .and(path("/img/figure.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("abc123_a");
    let mut cmd = atcs();
    cmd.arg(&url).arg(&dir);
    run_blocking(cmd)
        .await
        .success()
        .stderr(predicate::str::contains("warning: 1 of 1 images could not be saved"));

    assert!(dir.join("problem.json").is_file());
    assert!(!dir.join("figure.png").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn file_output_writes_single_json_file() {
    let server = MockServer::start().await;
    let url = serve_task(&server).await;

    let temp = TempDir::new().unwrap();
    let file = temp.path().join("abc123_a.json");
    let mut cmd = atcs();
    cmd.arg(&url).arg(&file);
    run_blocking(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Saved problem data to"));

    assert!(file.is_file());
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn page_without_statement_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html><body></body></html>", "text/html"))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("out");
    let mut cmd = atcs();
    cmd.arg(format!("{}/contests/x/tasks/x_a", server.uri())).arg(&dir);
    run_blocking(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("error: problem statement not found"));

    assert!(!dir.exists());
}

#[test]
fn unreachable_host_exits_non_zero() {
    atcs()
        .args(["http://127.0.0.1:9/tasks/a", "--timeout", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("error: failed to fetch"));
}
