//! End-to-end tests: CSV in, sweep, CSV and summary out

use crate::create_test_config;
use chrono::Utc;
use hire_sweep::config::CategoryTable;
use hire_sweep::input::load_records;
use hire_sweep::output::{build_handlers, write_all, SweepReport};
use hire_sweep::run_sweep;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_csv_round_trip_through_sweep() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bakery"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<p>Traineeship places open. Contact: bread@bakery.example.org</p>",
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/quiet"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>Opening hours</p>"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.csv");
    let output_path = dir.path().join("output.csv");
    let summary_path = dir.path().join("summary.md");
    fs::write(
        &input_path,
        format!(
            "Name,Website,Town\nBakery,{uri}/bakery,Leeds\nQuiet,{uri}/quiet,York\nNoSite,,Hull\n",
            uri = server.uri()
        ),
    )
    .unwrap();

    let mut config = create_test_config("");
    config.output.summary_path = Some(summary_path.to_string_lossy().into_owned());

    let input = load_records(&input_path, &config.input.website_column).unwrap();
    let categories: Vec<String> = CategoryTable::from_config(&config)
        .names()
        .into_iter()
        .map(String::from)
        .collect();
    let handlers = build_handlers(&output_path, &config.output);

    let started_at = Utc::now();
    let results = run_sweep(config, &input.records).await.unwrap();
    let report = SweepReport {
        input: &input,
        results: &results,
        categories: &categories,
        started_at,
        finished_at: Utc::now(),
        config_hash: "test-hash",
    };
    write_all(&handlers, &report).unwrap();

    let mut reader = csv::Reader::from_path(&output_path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(&headers[..3], &["Name", "Website", "Town"]);
    assert_eq!(headers.len(), 3 + categories.len() + 2);
    assert_eq!(headers[headers.len() - 2], "EmailCrawler");
    assert_eq!(headers[headers.len() - 1], "CrawlError");

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);

    let traineeship = headers.iter().position(|h| h == "Traineeship").unwrap();
    let email = headers.len() - 2;
    let error = headers.len() - 1;

    assert_eq!(&rows[0][0], "Bakery");
    assert_eq!(&rows[0][2], "Leeds");
    assert_eq!(&rows[0][traineeship], "YES");
    assert_eq!(&rows[0][email], "bread@bakery.example.org");
    assert_eq!(&rows[0][error], "");

    // Both tiers ran without finding an email
    assert_eq!(&rows[1][traineeship], "NO");
    assert_eq!(&rows[1][email], "NA");
    assert_eq!(&rows[1][error], "");

    assert_eq!(&rows[2][email], "");
    assert_eq!(&rows[2][error], "missing website");

    let summary = fs::read_to_string(&summary_path).unwrap();
    assert!(summary.contains("- **Config Hash**: test-hash"));
    assert!(summary.contains("- **Total Records**: 3"));
    assert!(summary.contains("| Traineeship | 1 |"));
}
