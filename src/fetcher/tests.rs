//! Tests for the paginated fetcher

use super::*;
use crate::error::Error;
use crate::pagination::EndReason;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher_for(server: &MockServer) -> Fetcher {
    let config = HttpClientConfig::builder()
        .endpoint(format!("{}/v1/data", server.uri()))
        .build();
    Fetcher::with_config(config).unwrap()
}

fn nation_query(format: OutputFormat) -> DatasetQuery {
    DatasetQuery::new(
        Filters::from(vec!["areaType=nation"]),
        Structure::new()
            .field("date", "date")
            .field("newCases", "newCasesByPublishDate"),
        format,
    )
}

fn json_page(records: Value, next: Option<&str>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": records,
        "pagination": {"current": null, "next": next, "previous": null}
    }))
}

async fn mount_page(server: &MockServer, page: u32, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/v1/data"))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// JSON mode
// ============================================================================

#[tokio::test]
async fn test_fetch_json_two_pages() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        json_page(
            json!([
                {"date": "2021-01-03", "newCases": 9},
                {"date": "2021-01-02", "newCases": 7}
            ]),
            Some("/v1/data?page=2"),
        ),
    )
    .await;
    mount_page(
        &server,
        2,
        json_page(json!([{"date": "2021-01-01", "newCases": 5}]), None),
    )
    .await;

    let fetcher = fetcher_for(&server);
    let (dataset, stats) = fetcher
        .fetch_with_stats(&nation_query(OutputFormat::Json))
        .await
        .unwrap();

    let records = dataset.into_records().unwrap();
    let dates: Vec<_> = records.iter().map(|r| r["date"].clone()).collect();
    assert_eq!(
        dates,
        vec![json!("2021-01-03"), json!("2021-01-02"), json!("2021-01-01")]
    );

    assert_eq!(stats.requests, 2);
    assert_eq!(stats.pages_merged, 2);
    assert_eq!(stats.items, 3);
    assert_eq!(stats.end, EndReason::NextEmpty);
}

#[tokio::test]
async fn test_fetch_sends_all_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/data"))
        .and(query_param("filters", "areaType=nation;areaName=England"))
        .and(query_param(
            "structure",
            r#"{"date":"date","cases":{"daily":"newCasesByPublishDate"}}"#,
        ))
        .and(query_param("format", "json"))
        .and(query_param("page", "1"))
        .respond_with(json_page(json!([{"date": "2021-01-01"}]), None))
        .expect(1)
        .mount(&server)
        .await;

    let query = DatasetQuery::new(
        Filters::from(vec!["areaType=nation", "areaName=England"]),
        Structure::new().field("date", "date").nested(
            "cases",
            Structure::new().field("daily", "newCasesByPublishDate"),
        ),
        OutputFormat::Json,
    );

    let dataset = fetcher_for(&server).fetch(&query).await.unwrap();
    assert_eq!(dataset.as_records().unwrap().len(), 1);
}

#[tokio::test]
async fn test_fetch_json_no_content_first_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(204)).await;

    let (dataset, stats) = fetcher_for(&server)
        .fetch_with_stats(&nation_query(OutputFormat::Json))
        .await
        .unwrap();

    assert_eq!(dataset, Dataset::Records(vec![]));
    assert_eq!(stats.end, EndReason::NoContent);
    assert_eq!(stats.pages_merged, 0);
}

#[tokio::test]
async fn test_fetch_json_no_content_after_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        json_page(json!([{"date": "2021-01-02"}]), Some("/v1/data?page=2")),
    )
    .await;
    mount_page(&server, 2, ResponseTemplate::new(204)).await;

    let records = fetcher_for(&server)
        .fetch_records(
            &Filters::from(vec!["areaType=nation"]),
            &Structure::new().field("date", "date"),
        )
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_fetch_json_schema_violation() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_json(json!({"data": []})),
    )
    .await;

    let err = fetcher_for(&server)
        .fetch(&nation_query(OutputFormat::Json))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Schema { .. }));
}

#[tokio::test]
async fn test_fetch_is_repeatable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/data"))
        .and(query_param("page", "1"))
        .respond_with(json_page(json!([{"date": "2021-01-02"}]), Some("2")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/data"))
        .and(query_param("page", "2"))
        .respond_with(json_page(json!([{"date": "2021-01-01"}]), None))
        .mount(&server)
        .await;

    let fetcher = fetcher_for(&server);
    let query = nation_query(OutputFormat::Json);
    let first = fetcher.fetch(&query).await.unwrap();
    let second = fetcher.fetch(&query).await.unwrap();

    assert_eq!(first, second);
}

// ============================================================================
// CSV mode
// ============================================================================

#[tokio::test]
async fn test_fetch_csv_strips_repeated_headers() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_string("date,newCases\n2021-01-01,5\n"),
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200).set_body_string("date,newCases\n2021-01-02,7\n"),
    )
    .await;
    mount_page(&server, 3, ResponseTemplate::new(204)).await;

    let (dataset, stats) = fetcher_for(&server)
        .fetch_with_stats(&nation_query(OutputFormat::Csv))
        .await
        .unwrap();

    assert_eq!(
        dataset.as_csv().unwrap(),
        "date,newCases\n2021-01-01,5\n2021-01-02,7"
    );
    assert_eq!(stats.requests, 3);
    assert_eq!(stats.pages_merged, 2);
    assert_eq!(stats.items, 2);
    assert_eq!(stats.end, EndReason::NoContent);
}

#[tokio::test]
async fn test_fetch_csv_n_pages_of_k_rows() {
    let server = MockServer::start().await;
    let pages = 4;
    let rows = 3;

    for page in 1..=pages {
        let mut body = String::from("date,newCases\n");
        for row in 0..rows {
            body.push_str(&format!("p{page}r{row},{row}\n"));
        }
        mount_page(&server, page, ResponseTemplate::new(200).set_body_string(body)).await;
    }
    mount_page(&server, pages + 1, ResponseTemplate::new(204)).await;

    let text = fetcher_for(&server)
        .fetch_csv(
            &Filters::from(vec!["areaType=nation"]),
            &Structure::new().field("date", "date"),
        )
        .await
        .unwrap();

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), 1 + (pages * rows) as usize);
    assert_eq!(lines[0], "date,newCases");
    assert_eq!(lines.iter().filter(|l| **l == "date,newCases").count(), 1);
    assert_eq!(lines[1], "p1r0,0");
    assert_eq!(lines[lines.len() - 1], "p4r2,2");
}

#[tokio::test]
async fn test_fetch_csv_no_content_first_page() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(204)).await;

    let dataset = fetcher_for(&server)
        .fetch(&nation_query(OutputFormat::Csv))
        .await
        .unwrap();

    assert_eq!(dataset, Dataset::Csv(String::new()));
}

#[tokio::test]
async fn test_fetch_csv_requests_csv_format() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/data"))
        .and(query_param("format", "csv"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("date\n2021-01-01"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, 2, ResponseTemplate::new(204)).await;

    let dataset = fetcher_for(&server)
        .fetch(&nation_query(OutputFormat::Csv))
        .await
        .unwrap();
    assert_eq!(dataset.as_csv(), Some("date\n2021-01-01"));
}

// ============================================================================
// Failures
// ============================================================================

#[test_case(1; "first page")]
#[test_case(2; "second page")]
#[test_case(3; "third page")]
#[tokio::test]
async fn test_fetch_json_fails_on_error_page(failing_page: u32) {
    let server = MockServer::start().await;

    for page in 1..failing_page {
        mount_page(
            &server,
            page,
            json_page(json!([{"date": "2021-01-01"}]), Some("next")),
        )
        .await;
    }
    mount_page(
        &server,
        failing_page,
        ResponseTemplate::new(500).set_body_string("upstream exploded"),
    )
    .await;

    let err = fetcher_for(&server)
        .fetch(&nation_query(OutputFormat::Json))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Request failed: upstream exploded");
}

#[test_case(1; "first page")]
#[test_case(2; "second page")]
#[tokio::test]
async fn test_fetch_csv_fails_on_error_page(failing_page: u32) {
    let server = MockServer::start().await;

    for page in 1..failing_page {
        mount_page(
            &server,
            page,
            ResponseTemplate::new(200).set_body_string("date\n2021-01-01\n"),
        )
        .await;
    }
    mount_page(
        &server,
        failing_page,
        ResponseTemplate::new(400).set_body_string("Invalid structure"),
    )
    .await;

    let err = fetcher_for(&server)
        .fetch(&nation_query(OutputFormat::Csv))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RequestFailed { status: 400, .. }));
}

// ============================================================================
// Blocking API
// ============================================================================

#[test]
fn test_fetch_blocking() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/data"))
            .and(query_param("page", "1"))
            .respond_with(json_page(json!([{"date": "2021-01-01"}]), None))
            .mount(&server)
            .await;
        server
    });

    let dataset = fetcher_for(&server)
        .fetch_blocking(&nation_query(OutputFormat::Json))
        .unwrap();

    assert_eq!(dataset.as_records().unwrap().len(), 1);
    runtime.block_on(async move { drop(server) });
}

// ============================================================================
// Free functions
// ============================================================================

#[tokio::test]
async fn test_get_paginated_dataset_with_endpoint_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/data"))
        .and(query_param("filters", "areaType=nation;areaName=Wales"))
        .and(query_param("structure", r#"{"date":"date"}"#))
        .and(query_param("format", "json"))
        .and(query_param("page", "1"))
        .respond_with(json_page(json!([{"date": "2021-01-02"}]), Some("/v1/data?page=2")))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, 2, json_page(json!([{"date": "2021-01-01"}]), None)).await;

    let dataset = get_paginated_dataset_with_endpoint(
        &format!("{}/v1/data", server.uri()),
        vec!["areaType=nation", "areaName=Wales"],
        Structure::new().field("date", "date"),
        false,
    )
    .await
    .unwrap();

    let records = dataset.into_records().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["date"], "2021-01-01");
}

#[tokio::test]
async fn test_get_paginated_dataset_with_endpoint_csv() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_string("date\n2021-01-01\n"),
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200).set_body_string("date\n"),
    )
    .await;
    mount_page(
        &server,
        3,
        ResponseTemplate::new(200).set_body_string("date\n2021-01-03\n"),
    )
    .await;
    mount_page(&server, 4, ResponseTemplate::new(204)).await;

    let dataset = get_paginated_dataset_with_endpoint(
        &format!("{}/v1/data", server.uri()),
        vec!["areaType=nation"],
        Structure::new().field("date", "date"),
        true,
    )
    .await
    .unwrap();

    assert_eq!(
        dataset,
        Dataset::Csv("date\n2021-01-01\n\n2021-01-03".to_string())
    );
}

#[test]
fn test_get_paginated_dataset_blocking_with_endpoint() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/data"))
            .and(query_param("format", "csv"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;
        server
    });

    let dataset = get_paginated_dataset_blocking_with_endpoint(
        &format!("{}/v1/data", server.uri()),
        vec!["areaType=nation"],
        Structure::new().field("date", "date"),
        true,
    )
    .unwrap();

    assert_eq!(dataset, Dataset::Csv(String::new()));
    runtime.block_on(async move { drop(server) });
}
