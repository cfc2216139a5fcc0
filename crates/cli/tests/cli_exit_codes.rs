// End-to-end tests for the `patfolio` binary: exit codes and written files.
// Run with: cargo test -p patfolio-cli --test cli_exit_codes

use std::path::Path;
use std::process::{Command, Output};

use httpmock::prelude::*;
use serde_json::json;

const KEY_VAR: &str = "PATFOLIO_TEST_API_KEY";

/// Binary with an isolated config directory and no real API key in scope.
fn patfolio(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_patfolio"));
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join(".config"));
    cmd.env_remove("PATENTSVIEW_API_KEY");
    cmd.env_remove(KEY_VAR);
    cmd.env_remove("PATFOLIO_CLIENT_SECRET");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &Path, base_url: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[source]\nbase_url = \"{base_url}\"\nretry_backoff_ms = 10\napi_key_env = \"{KEY_VAR}\"\n\n\
             [profile]\napi_base = \"{base_url}/v2\"\ndelay_ms = 0\n"
        ),
    )
    .unwrap();
    path
}

fn assert_code(output: &Output, expected: i32) {
    assert_eq!(
        output.status.code(),
        Some(expected),
        "expected exit {}, got {:?}\nstdout: {}\nstderr: {}",
        expected,
        output.status.code(),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr),
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn patent(id: &str, title: &str, date: &str) -> serde_json::Value {
    json!({
        "patent_id": id,
        "patent_title": title,
        "patent_abstract": "A processor flushes cache lines to persistent memory.",
        "patent_date": date,
        "inventors": [
            { "inventor_name_first": "Ashok", "inventor_name_last": "Raj" },
            { "inventor_name_first": "Ron", "inventor_name_last": "Gabor" }
        ],
        "assignees": [ { "assignee_organization": "Intel Corporation" } ]
    })
}

#[test]
fn empty_name_exits_2() {
    let home = tempfile::tempdir().unwrap();
    let output = patfolio(home.path())
        .args(["search", "  ", "--api-key", "k", "--no-files"])
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 2);
    assert!(stderr(&output).contains("inventor name is empty"));
}

#[test]
fn missing_api_key_exits_12() {
    let home = tempfile::tempdir().unwrap();
    let config = write_config(home.path(), "http://127.0.0.1:9");
    let output = patfolio(home.path())
        .arg("--config")
        .arg(&config)
        .args(["search", "Ashok Raj", "--no-files"])
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 12);
    assert!(stderr(&output).contains(KEY_VAR), "stderr: {}", stderr(&output));
}

#[test]
fn source_down_exits_10() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/v1/patent/");
        then.status(500).json_body(json!({ "error": true }));
    });

    let home = tempfile::tempdir().unwrap();
    let config = write_config(home.path(), &server.base_url());
    let output = patfolio(home.path())
        .arg("--config")
        .arg(&config)
        .args(["search", "Ashok Raj", "--api-key", "test-key", "--no-files"])
        .output()
        .expect("failed to run patfolio");

    assert_code(&output, 10);
    mock.assert_hits(2);
    assert!(stderr(&output).contains("hint:"));
}

#[test]
fn no_match_exits_0_with_notice() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/patent/");
        then.status(200)
            .json_body(json!({ "error": false, "count": 0, "total_hits": 0, "patents": [] }));
    });

    let home = tempfile::tempdir().unwrap();
    let config = write_config(home.path(), &server.base_url());
    let output = patfolio(home.path())
        .arg("--config")
        .arg(&config)
        .args(["search", "Nobody Atall", "--api-key", "test-key"])
        .current_dir(home.path())
        .output()
        .expect("failed to run patfolio");

    assert_code(&output, 0);
    assert!(stdout(&output).contains("No patents found for inventor Nobody Atall."));
    assert!(!home.path().join("patents.json").exists());
}

#[test]
fn search_writes_three_files_and_summary_reads_them() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/patent/")
            .header("X-Api-Key", "test-key")
            .query_param("o", r#"{"size":100}"#);
        then.status(200).json_body(json!({
            "error": false,
            "count": 2,
            "total_hits": 2,
            "patents": [
                patent("10157142", "Offloading cache flush to persistent memory", "2018-12-18"),
                patent("9612345", "Memory error recovery in a processor", "2017-04-04")
            ]
        }));
    });
    // Second page is empty.
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/patent/")
            .query_param("o", r#"{"after":"9612345","size":100}"#);
        then.status(200).json_body(json!({ "error": false, "count": 0, "patents": [] }));
    });

    let home = tempfile::tempdir().unwrap();
    let config = write_config(home.path(), &server.base_url());
    let out = home.path().join("ashok.json");
    let output = patfolio(home.path())
        .arg("--config")
        .arg(&config)
        .args(["search", "Ashok Raj", "--api-key", "test-key", "--list", "-o"])
        .arg(&out)
        .output()
        .expect("failed to run patfolio");

    assert_code(&output, 0);
    mock.assert();
    let text = stdout(&output);
    assert!(text.contains("=== Found 2 Patents ==="), "stdout: {}", text);
    assert!(text.contains("Total patents:    2"));

    assert!(out.exists());
    assert!(home.path().join("ashok_raw.json").exists());
    let csv = std::fs::read_to_string(home.path().join("ashok.csv")).unwrap();
    assert!(csv.starts_with("Title,Patent Number,Issue Date"));
    assert_eq!(csv.lines().count(), 3);

    let saved: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(saved.as_array().unwrap().len(), 2);

    let output = patfolio(home.path())
        .arg("--config")
        .arg(&config)
        .arg("summary")
        .arg(&out)
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 0);
    assert!(stdout(&output).contains("Timeline:         2017 - 2018 (2 years)"));
}

#[test]
fn summary_of_bad_file_exits_2() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("bad.json");
    std::fs::write(&path, "not json").unwrap();
    let output = patfolio(home.path())
        .arg("summary")
        .arg(&path)
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 2);
}

#[test]
fn publish_without_login_exits_20() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("patents.json");
    std::fs::write(
        &path,
        r#"[{"title":"Widget","summary":"","number":"123","office":{"name":"USPTO"},"inventors":[]}]"#,
    )
    .unwrap();

    let output = patfolio(home.path())
        .arg("publish")
        .arg(&path)
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 20);
    assert!(stderr(&output).contains("patfolio login"));
}

#[test]
fn login_without_client_id_exits_2() {
    let home = tempfile::tempdir().unwrap();
    let output = patfolio(home.path())
        .arg("login")
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 2);
    assert!(stderr(&output).contains("client id"));
}

#[test]
fn login_prints_authorization_url() {
    let home = tempfile::tempdir().unwrap();
    let output = patfolio(home.path())
        .args(["login", "--client-id", "my-app"])
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 0);
    let text = stdout(&output);
    assert!(text.contains("client_id=my-app"), "stdout: {}", text);
    assert!(text.contains("state=patent_upload_session"));
}

#[test]
fn logout_without_token_succeeds() {
    let home = tempfile::tempdir().unwrap();
    let output = patfolio(home.path())
        .arg("logout")
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 0);
}

#[test]
fn invalid_config_exits_30() {
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("config.toml");
    std::fs::write(&config, "[source]\npage_size = 0\n").unwrap();
    let output = patfolio(home.path())
        .arg("--config")
        .arg(&config)
        .args(["search", "Ashok Raj", "--api-key", "k", "--no-files"])
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 30);
}

#[test]
fn template_writes_header_sample_and_blank_rows() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("manual.csv");
    let output = patfolio(home.path())
        .arg("template")
        .arg(&path)
        .args(["--rows", "3"])
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 0);

    let csv = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Title,Patent Number,Issue Date,Inventors,Assignee,Abstract,Google Patents URL");
    assert_eq!(lines[4], ",,,,,,");
}

#[test]
fn template_into_missing_directory_exits_3() {
    let home = tempfile::tempdir().unwrap();
    let output = patfolio(home.path())
        .arg("template")
        .arg(home.path().join("no-such-dir").join("t.csv"))
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 3);
}

#[test]
fn links_prints_search_urls() {
    let home = tempfile::tempdir().unwrap();
    let output = patfolio(home.path())
        .args(["links", "Ashok Raj", "--assignee", "Intel"])
        .output()
        .expect("failed to run patfolio");
    assert_code(&output, 0);
    let text = stdout(&output);
    assert!(
        text.contains("https://patents.google.com/?q=inventor%3A%22Ashok+Raj%22+assignee%3A%22Intel%22"),
        "stdout: {}",
        text
    );
    assert!(text.contains("IN:(Ashok Raj) AND AN:(Intel)"));
}
