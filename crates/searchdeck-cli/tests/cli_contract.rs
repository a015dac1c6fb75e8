use std::process::{Command, Output};

use serde_json::Value;

const CONSOLE_ENV_VARS: [&str; 7] = [
    "SEARCHDECK_SEARCH_URL",
    "SEARCHDECK_RESOURCE_URL",
    "SEARCHDECK_LLM_BASE_URL",
    "SEARCHDECK_LLM_KEY",
    "SEARCHDECK_INDEX_ID",
    "SEARCHDECK_SHARE_BASE",
    "SEARCHDECK_ASSETS_DIR",
];

fn run_cli(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_searchdeck"));
    cmd.args(args);
    for name in CONSOLE_ENV_VARS {
        cmd.env_remove(name);
    }
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("run searchdeck")
}

#[test]
fn service_json_error_envelope_has_required_keys_and_no_secret_leak() {
    let secret = "searchdeck-contract-secret";
    let output = run_cli(
        &["search", "--mode", "service-json"],
        &[("SEARCHDECK_LLM_KEY", secret)],
    );
    assert_eq!(output.status.code(), Some(2));

    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(
        json.get("schema_version").and_then(Value::as_str),
        Some("v1")
    );
    assert_eq!(json.get("command").and_then(Value::as_str), Some("search"));
    assert_eq!(json.get("ok").and_then(Value::as_bool), Some(false));
    assert!(json.get("result").is_some());
    assert!(
        json.get("error")
            .and_then(|error| error.get("code"))
            .and_then(Value::as_str)
            .is_some()
    );
    assert_eq!(
        json.get("error")
            .and_then(|error| error.get("details"))
            .and_then(|details| details.get("notice_code"))
            .and_then(Value::as_u64),
        Some(103),
        "validation failures should carry the notification code"
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stdout.contains(secret));
    assert!(!stderr.contains(secret));
}

#[test]
fn view_mode_keeps_stderr_error_behavior() {
    let output = run_cli(&["search"], &[]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("question must not be empty"),
        "view mode should keep non-enveloped stderr errors"
    );
}

#[test]
fn a_malformed_filter_flag_fails_before_any_request() {
    let output = run_cli(
        &["search", "--question", "q", "--filter", "no-separator"],
        &[],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("expected key=value"),
        "filter shape errors should name the expected form"
    );
}

#[test]
fn share_prints_a_deep_link_in_contract_parameter_order() {
    let secret = "sk-contract-secret";
    let output = run_cli(
        &[
            "share",
            "--question",
            "what is the retention period?",
            "--index-id",
            "idx-docs",
            "--llm-key",
            secret,
            "--share-base",
            "https://console.example.com",
            "--file-name",
            "bucket/guide.pdf",
            "--doc-name",
            "guide",
        ],
        &[],
    );
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let url = stdout.trim();
    assert!(
        url.starts_with("https://console.example.com/#/document?"),
        "share should print the deep link: {url}"
    );
    assert!(url.contains("fileName=guide.pdf"), "got {url}");
    assert!(
        !url.contains(secret),
        "raw key material must not appear in the link"
    );

    let (_, query) = url.split_once('?').expect("link has a query");
    let names: Vec<&str> = query
        .split('&')
        .map(|pair| pair.split('=').next().unwrap_or(pair))
        .collect();
    assert_eq!(
        names,
        vec![
            "fileName",
            "docName",
            "retrieveIndexId",
            "query",
            "searchServiceUrl",
            "llmBaseUrl",
            "generateModelName",
            "generateDeployName",
            "retrieveFilterMetadata",
            "extraParams",
            "retrieveVectorEnabled",
            "retrieveSparseEnabled",
            "retrieveRrfEnabled",
            "retrieveTopK",
            "retrieverPreFilterK",
            "resourceServiceUrl",
        ]
    );
}

#[test]
fn share_service_json_wraps_the_link() {
    let output = run_cli(
        &[
            "share",
            "--file-name",
            "guide.pdf",
            "--doc-name",
            "guide",
            "--share-base",
            "https://console.example.com",
            "--mode",
            "service-json",
        ],
        &[],
    );
    assert_eq!(output.status.code(), Some(0));

    let json: Value = serde_json::from_slice(&output.stdout).expect("stdout should be json");
    assert_eq!(json.get("ok").and_then(Value::as_bool), Some(true));
    assert_eq!(json.get("command").and_then(Value::as_str), Some("share"));
    assert!(
        json.get("result")
            .and_then(|result| result.get("share_url"))
            .and_then(Value::as_str)
            .is_some_and(|url| url.contains("docName=guide"))
    );
}

#[test]
fn document_rejects_a_link_without_query_parameters() {
    let output = run_cli(
        &["document", "--link", "https://console.example.com/#/document"],
        &[],
    );
    assert_eq!(output.status.code(), Some(2));
    assert!(
        String::from_utf8_lossy(&output.stderr)
            .contains("share link carries no query parameters")
    );
}

#[test]
fn help_lists_every_command() {
    let output = run_cli(&["--help"], &[]);
    assert_eq!(output.status.code(), Some(0));

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["search", "document", "share"] {
        assert!(stdout.contains(command), "help should list {command}");
    }
}
