use assert_cmd::Command;
use mockito::Matcher;
use predicates::prelude::*;
use serde_json::json;

fn cmd(server: &mockito::ServerGuard, api_key: Option<&str>) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("pdfshift"));
    cmd.env("PDFSHIFT_API_BASE", server.url())
        .env("NO_PROXY", "127.0.0.1,localhost")
        .env_remove("HTTP_PROXY")
        .env_remove("HTTPS_PROXY")
        .env_remove("http_proxy")
        .env_remove("https_proxy")
        .env_remove("PDFSHIFT_API_KEY");
    if let Some(key) = api_key {
        cmd.env("PDFSHIFT_API_KEY", key);
    }
    cmd
}

/// Credits are printed as JSON.
#[test]
fn test_cli_credits() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("GET", "/credits/")
        .with_status(200)
        .with_body(json!({"credits": {"remaining": 248}, "success": true}).to_string())
        .create();

    cmd(&server, Some("sk_test"))
        .arg("credits")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"remaining\": 248"));
}

/// Missing API key fails without contacting the server.
#[test]
fn test_cli_credits_without_key() {
    let mut server = mockito::Server::new();
    let mock = server.mock("GET", "/credits/").expect(0).create();

    cmd(&server, None)
        .arg("credits")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Please indicate a valid API Key."));

    mock.assert();
}

/// Converted document is written to the -o path.
#[test]
fn test_cli_convert_to_file() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/convert/")
        .match_body(Matcher::PartialJson(json!({
            "source": "https://example.com",
            "landscape": true
        })))
        .with_status(200)
        .with_body("%PDF-1.7 fake")
        .create();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.pdf");

    cmd(&server, Some("sk_test"))
        .args(["convert", "https://example.com", "--landscape", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(std::fs::read(&out).unwrap(), b"%PDF-1.7 fake");
}

/// Without -o the document goes to stdout.
#[test]
fn test_cli_convert_stdin_to_stdout() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/convert/")
        .match_body(Matcher::PartialJson(json!({"source": "<h1>Hello</h1>"})))
        .with_status(200)
        .with_body("%PDF-1.7 inline")
        .create();

    cmd(&server, Some("sk_test"))
        .args(["convert", "-"])
        .write_stdin("<h1>Hello</h1>")
        .assert()
        .success()
        .stdout("%PDF-1.7 inline");
}

/// Service validation errors are reported on stderr.
#[test]
fn test_cli_convert_bad_request() {
    let mut server = mockito::Server::new();
    let _mock = server
        .mock("POST", "/convert/")
        .with_status(400)
        .with_body(r#"{"errors": {"format": ["is not a valid format"]}}"#)
        .create();

    cmd(&server, Some("sk_test"))
        .args(["convert", "https://example.com", "--format", "A99"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("format : is not a valid format"));
}
