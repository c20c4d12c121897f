//! End-to-end detail lookups through the API server and the 청약홈 provider.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use cheongyak_core::config::UpstreamConfig;
use cheongyak_core::{
    ApplyhomeProvider, DetailLookupHandler, FAILURE_MESSAGE, NOT_FOUND_MESSAGE,
};
use cheongyak_web::{AppState, server};
use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::stub_upstream::{GARBAGE_ID, SERVICE_KEY, SLOW_ID, StubUpstream};

fn sample_record() -> Value {
    json!({
        "HOUSE_MANAGE_NO": "2024000123",
        "PBLANC_NO": "2024000123",
        "HOUSE_NM": "테스트 자이",
        "HSSPLY_ADRES": "서울특별시 송파구 올림픽로 300",
        "TOT_SUPLY_HSHLDCO": 300,
        "RCEPT_BGNDE": "2024-03-25",
        "RCEPT_ENDDE": "2024-03-27"
    })
}

async fn start_api(upstream: &StubUpstream, service_key: &str) -> SocketAddr {
    let config = UpstreamConfig {
        base_url: upstream.base_url(),
        service_key: Some(service_key.to_string()),
        request_timeout: Duration::from_secs(1),
        ..Default::default()
    };
    let provider = ApplyhomeProvider::new(&config).unwrap();
    let state = AppState::new(DetailLookupHandler::new(Arc::new(provider)));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        server::serve(listener, state).await.unwrap();
    });
    addr
}

async fn get_detail(addr: SocketAddr, id: &str) -> (StatusCode, Value) {
    let response = reqwest::get(format!("http://{addr}/api/bunyanggwon/{id}"))
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_existing_record_is_returned_unmodified() {
    let upstream = StubUpstream::start(vec![sample_record()]).await;
    let addr = start_api(&upstream, SERVICE_KEY).await;

    let (status, body) = get_detail(addr, "2024000123").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": sample_record()}));
}

#[tokio::test]
async fn test_upstream_request_filters_on_identifier() {
    let upstream = StubUpstream::start(vec![sample_record()]).await;
    let addr = start_api(&upstream, SERVICE_KEY).await;

    get_detail(addr, "2024000123").await;

    let queries = upstream.seen_queries();
    assert_eq!(queries.len(), 1);
    let query = &queries[0];
    assert_eq!(query["cond[HOUSE_MANAGE_NO::EQ]"], "2024000123");
    assert_eq!(query["page"], "1");
    assert_eq!(query["perPage"], "1");
    assert_eq!(query["serviceKey"], SERVICE_KEY);
}

#[tokio::test]
async fn test_unknown_record_is_not_found() {
    let upstream = StubUpstream::start(vec![sample_record()]).await;
    let addr = start_api(&upstream, SERVICE_KEY).await;

    let (status, body) = get_detail(addr, "nonexistent").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": NOT_FOUND_MESSAGE}));
    assert_eq!(
        NOT_FOUND_MESSAGE,
        "해당 분양권 정보를 찾을 수 없습니다."
    );
}

#[tokio::test]
async fn test_upstream_timeout_is_generic_failure() {
    let upstream = StubUpstream::start(vec![sample_record()]).await;
    let addr = start_api(&upstream, SERVICE_KEY).await;

    let (status, body) = get_detail(addr, SLOW_ID).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"success": false, "error": "분양권 상세 정보를 불러오는데 실패했습니다."})
    );
    // One upstream call, no retry.
    assert_eq!(upstream.seen_queries().len(), 1);
}

#[tokio::test]
async fn test_rejected_service_key_is_generic_failure() {
    let upstream = StubUpstream::start(vec![sample_record()]).await;
    let addr = start_api(&upstream, "wrong-key").await;

    let (status, body) = get_detail(addr, "2024000123").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "error": FAILURE_MESSAGE}));
    assert!(!body.to_string().contains("인증키"));
}

#[tokio::test]
async fn test_unreadable_upstream_body_is_generic_failure() {
    let upstream = StubUpstream::start(vec![sample_record()]).await;
    let addr = start_api(&upstream, SERVICE_KEY).await;

    let (status, body) = get_detail(addr, GARBAGE_ID).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"success": false, "error": FAILURE_MESSAGE}));
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let upstream = StubUpstream::start(vec![sample_record()]).await;
    let addr = start_api(&upstream, SERVICE_KEY).await;

    let (found, missing, slow) = tokio::join!(
        get_detail(addr, "2024000123"),
        get_detail(addr, "nonexistent"),
        get_detail(addr, SLOW_ID),
    );

    assert_eq!(found.0, StatusCode::OK);
    assert_eq!(found.1, json!({"success": true, "data": sample_record()}));

    assert_eq!(missing.0, StatusCode::NOT_FOUND);
    assert_eq!(missing.1, json!({"success": false, "error": NOT_FOUND_MESSAGE}));

    assert_eq!(slow.0, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(slow.1, json!({"success": false, "error": FAILURE_MESSAGE}));

    // One upstream call per request.
    assert_eq!(upstream.seen_queries().len(), 3);
}
