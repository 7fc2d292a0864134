use std::time::Duration;

use pretty_assertions::assert_eq;
use related_view_core::{ParentKey, RecordId};
use related_view_engine::{FailureKind, FetchSettings, RelatedFetcher, ReqwestFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BODY: &str = r#"[
    {"Id":"006A","Name":"Alpha","Amount":1200.5,"StageName":"Prospecting",
     "CloseDate":"2026-02-01","MainCompetitors__c":"Acme","Probability":10},
    {"Id":"006B","Name":"Beta","StageName":"Closed Won","Probability":0.5}
]"#;

#[tokio::test]
async fn fetcher_returns_records_in_backend_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/001XY/opportunities"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "application/json"))
        .mount(&server)
        .await;

    let base = format!("{}/api", server.uri());
    let fetcher = ReqwestFetcher::new(&base, FetchSettings::default()).expect("valid base url");

    let records = fetcher
        .fetch_related(&ParentKey::from("001XY"))
        .await
        .expect("fetch ok");
    let ids: Vec<_> = records.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids, vec![RecordId::from("006A"), RecordId::from("006B")]);
    assert_eq!(records[0].main_competitors.as_deref(), Some("Acme"));
    assert_eq!(records[1].amount, None);
    assert_eq!(records[1].probability, Some(0.5));
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts/P1/opportunities"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(&server.uri(), FetchSettings::default()).unwrap();
    let err = fetcher
        .fetch_related(&ParentKey::from("P1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(500));
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts/P1/opportunities"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("[]", "application/json"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(&server.uri(), settings).unwrap();
    let err = fetcher
        .fetch_related(&ParentKey::from("P1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
    assert!(err.detail().message.contains("timeout"));
}

#[tokio::test]
async fn fetcher_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts/P1/opportunities"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"oops":true}"#, "application/json"),
        )
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(&server.uri(), FetchSettings::default()).unwrap();
    let err = fetcher
        .fetch_related(&ParentKey::from("P1"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/accounts/P1/opportunities"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BODY, "application/json"))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 16,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(&server.uri(), settings).unwrap();
    let err = fetcher
        .fetch_related(&ParentKey::from("P1"))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 16, .. }));
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestFetcher::new("not a url", FetchSettings::default()).unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);

    let err = ReqwestFetcher::new("mailto:someone@example.com", FetchSettings::default())
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
