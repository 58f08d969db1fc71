//! Sweep tests against mock websites

use crate::create_test_config;
use hire_sweep::{run_sweep, EmailStatus, Flag, Record, RecordResult, TerminalError};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn record(index: usize, website: &str) -> Record {
    Record::new(index, Some(website.to_string()))
}

/// Position of a category in the default table
fn category(name: &str) -> usize {
    hire_sweep::config::CategoryTable::default()
        .names()
        .iter()
        .position(|n| *n == name)
        .expect("default category")
}

fn flag(result: &RecordResult, name: &str) -> Flag {
    result.flags.get(category(name)).expect("flag present")
}

#[tokio::test]
async fn test_fast_tier_finds_email() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/careers"))
        .and(header(
            "user-agent",
            "TestSweep/1.0 (+https://example.com/about; admin@example.com)",
        ))
        .respond_with(html(
            r#"<h1>Careers</h1><p>We are hiring.</p>
               <a href="mailto:Jobs@Example.org?subject=CV">Apply</a>
               <p>Or write to jobs@example.org</p>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let records = vec![record(0, &format!("{}/careers", server.uri()))];
    let results = run_sweep(create_test_config(""), &records).await.unwrap();

    let result = &results[0];
    assert_eq!(
        result.emails.iter().cloned().collect::<Vec<_>>(),
        vec!["jobs@example.org".to_string()]
    );
    assert_eq!(result.email_status, EmailStatus::Found);
    assert_eq!(flag(result, "CareerOrCareers"), Flag::Yes);
    assert_eq!(flag(result, "Traineeship"), Flag::No);
    assert!(!result.used_detailed);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_detailed_tier_follows_contact_link() {
    let server = MockServer::start().await;

    // Served to both tiers; no email on the landing page
    Mock::given(method("GET"))
        .and(path("/acme"))
        .respond_with(html(
            r#"<p>Acme apprenticeship scheme</p>
               <a href="/acme/contact">Contact us</a>
               <a href="/acme/pricing">Pricing</a>"#,
        ))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/acme/contact"))
        .respond_with(html("<p>Human Resources: people@acme.example.org</p>"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/acme/pricing"))
        .respond_with(html("<p>sales@acme.example.org</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let records = vec![record(0, &format!("{}/acme", server.uri()))];
    let results = run_sweep(create_test_config(""), &records).await.unwrap();

    let result = &results[0];
    assert!(result.used_detailed);
    assert!(result.emails.contains("people@acme.example.org"));
    assert!(!result.emails.contains("sales@acme.example.org"));
    assert_eq!(flag(result, "Apprenticeship"), Flag::Yes);
    assert_eq!(flag(result, "HROrHumanResources"), Flag::Yes);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn test_depth_limit_one_skips_link_hop() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/contact">Contact</a>"#))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(html("<p>hello@example.org</p>"))
        .expect(0)
        .mount(&server)
        .await;

    let records = vec![record(0, &server.uri())];
    let results = run_sweep(create_test_config("depth-limit = 1"), &records)
        .await
        .unwrap();

    let result = &results[0];
    assert!(result.used_detailed);
    assert!(result.emails.is_empty());
    assert_eq!(result.email_status, EmailStatus::NoneFound);
    assert_eq!(result.email_cell("NA"), "NA");
}

#[tokio::test]
async fn test_not_found_without_body_fails_fast_tier() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let records = vec![record(0, &format!("{}/gone", server.uri()))];
    let results = run_sweep(create_test_config(""), &records).await.unwrap();

    let result = &results[0];
    assert_eq!(
        result.error,
        Some(TerminalError::FastFetch("HTTP 404".to_string()))
    );
    assert!(result.flags.iter().all(|f| f == Flag::No));
    assert!(!result.used_detailed);
}

#[tokio::test]
async fn test_server_error_with_body_is_still_classified() {
    let server = MockServer::start().await;

    // Retried once, then the body is used
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(
            ResponseTemplate::new(503).set_body_string("<p>Internship desk: intern@example.org</p>"),
        )
        .expect(2)
        .mount(&server)
        .await;

    let records = vec![record(0, &format!("{}/flaky", server.uri()))];
    let results = run_sweep(create_test_config(""), &records).await.unwrap();

    let result = &results[0];
    assert!(result.error.is_none());
    assert!(result.emails.contains("intern@example.org"));
    assert_eq!(flag(result, "Internship"), Flag::Yes);
}

#[tokio::test]
async fn test_slow_site_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<p>late@example.org</p>").set_delay(Duration::from_secs(4)))
        .mount(&server)
        .await;

    let records = vec![record(0, &format!("{}/slow", server.uri()))];
    let mut config = create_test_config("");
    config.crawler.retry_count = 0;
    config.crawler.request_timeout = 1000;
    let results = run_sweep(config, &records).await.unwrap();

    assert_eq!(
        results[0].error_cell(),
        "fast tier fetch failed: timeout"
    );
    assert!(results[0].emails.is_empty());
}

#[tokio::test]
async fn test_mixed_records_keep_order() {
    let server = MockServer::start().await;

    for i in 0..6 {
        Mock::given(method("GET"))
            .and(path(format!("/biz{}", i)))
            .respond_with(html(&format!("<p>office{}@example.org</p>", i)))
            .mount(&server)
            .await;
    }

    let mut records: Vec<Record> = (0..6)
        .map(|i| record(i, &format!("{}/biz{}", server.uri(), i)))
        .collect();
    records.push(Record::new(6, None));
    records.push(record(7, "http://exa mple.org"));

    let results = run_sweep(create_test_config(""), &records).await.unwrap();

    assert_eq!(results.len(), 8);
    for (i, result) in results.iter().enumerate().take(6) {
        assert_eq!(result.index, i);
        assert!(result.emails.contains(&format!("office{}@example.org", i)));
    }
    assert_eq!(results[6].error, Some(TerminalError::MissingWebsite));
    assert_eq!(results[7].error, Some(TerminalError::InvalidWebsite));
    assert!(results.iter().all(|r| r.flags.is_resolved()));
}
