//! End-to-end tests for the listings endpoint, driving the router in-process

use std::io::Write;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Number, Value};
use tower::ServiceExt;

use listings_server::{
    build_router, AppState, FilterSet, FilterValue, JsonFileSource, MemoryConnector,
    PropertyQuery, PropertyRecord, QueryStringSource,
};

fn bogota_apartment() -> PropertyRecord {
    PropertyRecord {
        address: "carrera 100 #15-90".into(),
        city: "bogota".into(),
        state: "en_venta".into(),
        price: Number::from(350_000_000_i64),
        description: Some("Amplio apartamento en conjunto cerrado".into()),
    }
}

fn app(connector: &MemoryConnector) -> Router {
    build_router(AppState::new(connector.clone(), QueryStringSource))
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_owned());
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, content_type, body.to_vec())
}

#[tokio::test]
async fn no_matches_returns_empty_array() {
    let connector = MemoryConnector::new();

    let (status, content_type, body) = send(app(&connector), Method::GET, "/properties").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, b"[]");
    assert_eq!(connector.release_count(), 1);
}

#[tokio::test]
async fn single_record_round_trips() {
    let connector = MemoryConnector::with_records(vec![bogota_apartment()]);

    let (status, _, body) = send(app(&connector), Method::GET, "/properties").await;

    assert_eq!(status, StatusCode::OK);
    let value: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        value,
        json!([{
            "address": "carrera 100 #15-90",
            "city": "bogota",
            "state": "en_venta",
            "price": 350000000,
            "description": "Amplio apartamento en conjunto cerrado"
        }])
    );

    let records: Vec<PropertyRecord> = serde_json::from_slice(&body).unwrap();
    assert_eq!(records, vec![bogota_apartment()]);
}

#[tokio::test]
async fn query_string_filters_reach_the_query() {
    let connector = MemoryConnector::new();

    let (status, _, _) = send(
        app(&connector),
        Method::GET,
        "/properties?year=2020&city=bogota&state=pre_venta",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let executed = connector.executed_queries();
    assert_eq!(executed.len(), 1);
    assert_eq!(
        executed[0].params,
        vec![
            FilterValue::Int(2020),
            FilterValue::Text("bogota".into()),
            FilterValue::Text("pre_venta".into()),
        ]
    );
}

#[tokio::test]
async fn invalid_year_is_still_ok() {
    let connector = MemoryConnector::new();

    let (status, content_type, body) =
        send(app(&connector), Method::GET, "/properties?year=invalid").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, b"[]");
    assert_eq!(
        connector.executed_queries()[0].params,
        vec![FilterValue::Text("invalid".into())]
    );
}

#[tokio::test]
async fn unknown_path_is_404_for_any_method() {
    for method in [Method::GET, Method::POST, Method::DELETE] {
        let connector = MemoryConnector::new();

        let (status, _, _) = send(app(&connector), method, "/invalid_path").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(connector.acquire_count(), 0);
    }
}

#[tokio::test]
async fn sub_paths_share_the_prefix() {
    let connector = MemoryConnector::with_records(vec![bogota_apartment()]);

    let (status, _, _) = send(app(&connector), Method::GET, "/properties/").await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn non_get_on_properties_is_rejected() {
    let connector = MemoryConnector::new();

    let (status, _, _) = send(app(&connector), Method::POST, "/properties").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(connector.acquire_count(), 0);
}

#[tokio::test]
async fn connection_failure_is_500_and_nothing_leaks() {
    let connector = MemoryConnector::new().failing_connections();

    let (status, _, body) = send(app(&connector), Method::GET, "/properties").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!String::from_utf8(body).unwrap().contains("connection refused"));
    assert_eq!(connector.acquire_count(), connector.release_count());
}

#[tokio::test]
async fn query_failure_is_500_and_releases_once() {
    let connector = MemoryConnector::new().failing_queries();

    let (status, _, _) = send(app(&connector), Method::GET, "/properties?city=cali").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(connector.acquire_count(), 1);
    assert_eq!(connector.release_count(), 1);
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let connector = MemoryConnector::with_records(vec![bogota_apartment()]);
    let router = app(&connector);

    let first = send(router.clone(), Method::GET, "/properties?city=bogota").await;
    let second = send(router, Method::GET, "/properties?city=bogota").await;

    assert_eq!(first, second);
    assert_eq!(connector.acquire_count(), 2);
    assert_eq!(connector.release_count(), 2);
}

#[tokio::test]
async fn file_source_drives_the_query() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"year": 2020, "city": "bogota", "state": "pre_venta"}}"#).unwrap();

    let connector = MemoryConnector::with_records(vec![bogota_apartment()]);
    let router = build_router(AppState::new(
        connector.clone(),
        JsonFileSource::new(file.path()),
    ));

    let (status, _, _) = send(router, Method::GET, "/properties?city=cali").await;

    assert_eq!(status, StatusCode::OK);
    let expected = PropertyQuery::build(
        &FilterSet::new()
            .with_year(2020)
            .with_city("bogota")
            .with_state("pre_venta"),
    );
    assert_eq!(connector.executed_queries(), vec![expected]);
}

#[tokio::test]
async fn missing_filter_file_is_500_without_connecting() {
    let dir = tempfile::tempdir().unwrap();
    let connector = MemoryConnector::new();
    let router = build_router(AppState::new(
        connector.clone(),
        JsonFileSource::new(dir.path().join("payload.json")),
    ));

    let (status, _, _) = send(router, Method::GET, "/properties").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(connector.acquire_count(), 0);
}

#[tokio::test]
async fn mistyped_filter_document_values_are_bound_not_rejected() {
    let cases = [
        (r#"{"city": 2020}"#, FilterSet::new().with_city(2020)),
        (r#"{"year": true}"#, FilterSet::new().with_year(true)),
        (r#"{"state": 1}"#, FilterSet::new().with_state(1)),
    ];

    for (document, filters) in cases {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", document).unwrap();

        let connector = MemoryConnector::new();
        let router = build_router(AppState::new(
            connector.clone(),
            JsonFileSource::new(file.path()),
        ));

        let (status, _, body) = send(router, Method::GET, "/properties").await;

        assert_eq!(status, StatusCode::OK, "document {}", document);
        assert_eq!(body, b"[]");
        assert_eq!(connector.acquire_count(), 1);
        assert_eq!(
            connector.executed_queries(),
            vec![PropertyQuery::build(&filters)]
        );
    }
}

#[tokio::test]
async fn repeated_query_keys_use_the_first_value() {
    let connector = MemoryConnector::new();

    let (status, _, body) = send(
        app(&connector),
        Method::GET,
        "/properties?city=bogota&city=cali",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"[]");
    assert_eq!(
        connector.executed_queries()[0].params,
        vec![FilterValue::Text("bogota".into())]
    );
}
