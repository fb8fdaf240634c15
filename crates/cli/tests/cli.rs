// ABOUTME: Integration tests for the springer-doi CLI binary.
// ABOUTME: Tests HTML file parsing, URL fetching, output formats and argument validation.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

fn springer_cmd() -> Command {
    Command::cargo_bin("springer-doi").unwrap()
}

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../springer/tests/fixtures/html")
        .join(format!("{}.html", name))
}

#[test]
fn parse_html_from_file_as_bibtex() {
    springer_cmd()
        .arg("--html")
        .arg(fixture_path("paper"))
        .arg("--url")
        .arg("https://link.springer.com/chapter/10.1007/978-3-030-11111-1_7")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("@Paper{Smith2020,"))
        .stdout(predicate::str::contains("  title = {Scalable Graph Kernels},"));
}

#[test]
fn parse_html_from_file_as_json() {
    springer_cmd()
        .arg("--html")
        .arg(fixture_path("article"))
        .arg("--url")
        .arg("https://link.springer.com/article/10.1007/s11222-019-00001-2")
        .arg("-f")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ENTRYTYPE\": \"article\""))
        .stdout(predicate::str::contains("\"ID\": \"John2019\""))
        .stdout(predicate::str::contains("\"timestamp\": \"2019-01-01 2019\""));
}

#[test]
fn join_flag_changes_separator() {
    springer_cmd()
        .arg("--html")
        .arg(fixture_path("article"))
        .arg("--url")
        .arg("https://link.springer.com/article/10.1007/s11222-019-00001-2")
        .arg("--join")
        .arg("; ")
        .assert()
        .success()
        .stdout(predicate::str::contains("  author = {John Smith; Ann Lee},"))
        .stdout(predicate::str::contains("  timestamp = {2019-01-01; 2019},"));
}

#[test]
fn unrecognized_page_prints_nothing() {
    springer_cmd()
        .arg("--html")
        .arg(fixture_path("unrelated"))
        .arg("--url")
        .arg("https://link.springer.com/search")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn multiple_urls_outputs_entries() {
    let server = MockServer::start();

    let paper = server.mock(|when, then| {
        when.method(GET).path("/chapter/paper");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(fs::read_to_string(fixture_path("paper")).unwrap());
    });

    let book = server.mock(|when, then| {
        when.method(GET).path("/book/book");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(fs::read_to_string(fixture_path("book")).unwrap());
    });

    let book_url = server.url("/book/book");

    let output = springer_cmd()
        .arg("--allow-private-networks")
        .arg(server.url("/chapter/paper"))
        .arg(&book_url)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    paper.assert();
    book.assert();

    let stdout = String::from_utf8(output).unwrap();
    assert_eq!(stdout.matches("\n@").count(), 1, "expected two entries");
    assert!(stdout.contains("@Paper{Smith2020,"));
    assert!(stdout.contains("@Book{Jane,"));
    assert!(stdout.contains(&format!("  url = {{{}}},", book_url)));
}

#[test]
fn failed_url_sets_exit_code_but_keeps_others() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404);
    });

    server.mock(|when, then| {
        when.method(GET).path("/chapter/paper");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(fs::read_to_string(fixture_path("paper")).unwrap());
    });

    springer_cmd()
        .arg("--allow-private-networks")
        .arg(server.url("/missing"))
        .arg(server.url("/chapter/paper"))
        .assert()
        .failure()
        .stdout(predicate::str::contains("@Paper{Smith2020,"))
        .stderr(predicate::str::contains("error parsing"));
}

#[test]
fn private_network_blocked_by_default() {
    let server = MockServer::start();

    springer_cmd()
        .arg(server.url("/chapter/paper"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("SSRF blocked"));
}

#[test]
fn timing_flag_prints_elapsed() {
    springer_cmd()
        .arg("--html")
        .arg(fixture_path("book"))
        .arg("--url")
        .arg("https://link.springer.com/book/10.1007/978-3-030-00000-0")
        .arg("--timing")
        .assert()
        .success()
        .stderr(predicate::str::contains("elapsed:"))
        .stderr(predicate::str::contains("ms"));
}

#[test]
fn output_to_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("records.bib");

    springer_cmd()
        .arg("--html")
        .arg(fixture_path("book"))
        .arg("--url")
        .arg("https://link.springer.com/book/10.1007/978-3-030-00000-0")
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let output_content = fs::read_to_string(&output_path).unwrap();
    assert!(output_content.starts_with("@Book{Jane,"));
    assert!(output_content.contains("  ISBN = {978-3-030-00000-0},"));
}

#[test]
fn malformed_selectors_file_fails() {
    let temp_dir = TempDir::new().unwrap();
    let selectors_path = temp_dir.path().join("selectors.json");
    fs::write(&selectors_path, "{ not json").unwrap();

    springer_cmd()
        .arg("--html")
        .arg(fixture_path("book"))
        .arg("--url")
        .arg("https://link.springer.com/book/x")
        .arg("--selectors")
        .arg(&selectors_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}

#[test]
fn missing_url_with_html_fails() {
    springer_cmd()
        .arg("--html")
        .arg(fixture_path("book"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--url is required"));
}

#[test]
fn html_and_urls_together_fails() {
    springer_cmd()
        .arg("--html")
        .arg(fixture_path("book"))
        .arg("--url")
        .arg("https://link.springer.com/book/x")
        .arg("https://link.springer.com/book/y")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot use both"));
}

#[test]
fn no_args_fails() {
    springer_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one URL is required"));
}
