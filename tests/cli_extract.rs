use assert_cmd::Command;
use serde_json::Value;

const ARTICLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/article.html");
const RESPONSE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/response.txt");
const URL: &str = "https://example.com/news/rail";

fn factlens() -> Command {
    let mut cmd = Command::cargo_bin("factlens").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn extract_prints_header_and_article_body() {
    let out = stdout_of(factlens().args(["extract", "--file", ARTICLE, "--url", URL]));

    assert!(out.starts_with("PAGE: Rail line opens in spring\nURL: https://example.com/news/rail\n"));
    assert!(out.contains("TOPICS: Rail line opens in spring | Funding\n"));
    assert!(out.contains("\nCONTENT:\n"));
    assert!(out.contains("regional bond approved by voters"));
    assert!(!out.contains("Subscribe to our newsletter"));
    assert!(!out.contains("All rights reserved"));
}

#[test]
fn extract_json_reports_strategy() {
    let out = stdout_of(factlens().args([
        "--output", "json", "extract", "--file", ARTICLE, "--url", URL,
    ]));
    let value: Value = serde_json::from_str(&out).unwrap();

    assert_eq!(value["strategy"], "container_selectors");
    assert_eq!(value["source_selector"], "article");
    assert_eq!(value["page_meta"]["domain"], "example.com");
    assert_eq!(value["page_meta"]["headings"][1], "Funding");
}

#[test]
fn extract_with_bad_url_degrades_to_raw_text() {
    let out = stdout_of(factlens().args(["extract", "--file", ARTICLE, "--url", "not a url"]));
    assert!(!out.contains("CONTENT:"));
    assert!(out.contains("regional bond approved by voters"));
    assert!(!out.contains("window.analytics"));

    let out = stdout_of(factlens().args([
        "--output", "json", "extract", "--file", ARTICLE, "--url", "not a url",
    ]));
    let value: Value = serde_json::from_str(&out).unwrap();
    assert!(value["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid page URL"));
    assert!(value["text"]
        .as_str()
        .unwrap()
        .contains("Officials said the new rail line"));
}

#[test]
fn extract_fails_only_when_page_cannot_be_read() {
    factlens()
        .args(["extract", "--file", "/nonexistent/page.html", "--url", URL])
        .assert()
        .failure();
}

#[test]
fn format_renders_saved_response() {
    let out = stdout_of(factlens().args(["format", "--file", RESPONSE]));

    assert!(out.contains("1. \"The rail line opens in spring\" => True"));
    assert!(out.contains("2. \"The project was funded by federal grants\" => False"));
    assert!(out.contains("It was paid for by a regional bond."));
}

#[test]
fn format_html_marks_verdicts() {
    let out = stdout_of(factlens().args(["format", "--file", RESPONSE, "--html"]));

    assert!(out.starts_with("<div class=\"fact-check-result\">"));
    assert!(out.contains("<div class=\"verdict verdict-true\">True</div>"));
    assert!(out.contains("<div class=\"verdict verdict-false\">False</div>"));
}
