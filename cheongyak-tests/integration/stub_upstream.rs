//! Local stand-in for the public data portal detail endpoint.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};

pub const SERVICE_KEY: &str = "test-service-key";

/// Identifier the stub answers only after `SLOW_DELAY`.
pub const SLOW_ID: &str = "slow";
pub const SLOW_DELAY: Duration = Duration::from_secs(5);

/// Identifier the stub answers with a non-JSON body.
pub const GARBAGE_ID: &str = "garbage";

#[derive(Clone, Default)]
struct StubState {
    records: Arc<HashMap<String, Value>>,
    seen_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

/// Running stub; dropping it leaves the task serving until the runtime ends.
pub struct StubUpstream {
    pub addr: SocketAddr,
    seen_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl StubUpstream {
    pub async fn start(records: Vec<Value>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record["HOUSE_MANAGE_NO"].as_str().unwrap().to_string(), record))
            .collect();
        let state = StubState {
            records: Arc::new(records),
            ..Default::default()
        };
        let seen_queries = state.seen_queries.clone();

        let app = Router::new()
            .route("/v1/getAPTLttotPblancDetail", get(detail_listing))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, seen_queries }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn seen_queries(&self) -> Vec<HashMap<String, String>> {
        self.seen_queries.lock().unwrap().clone()
    }
}

async fn detail_listing(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.seen_queries.lock().unwrap().push(params.clone());

    if params.get("serviceKey").map(String::as_str) != Some(SERVICE_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({"code": -4, "msg": "등록되지 않은 인증키 입니다."})),
        )
            .into_response();
    }

    let id = params
        .get("cond[HOUSE_MANAGE_NO::EQ]")
        .cloned()
        .unwrap_or_default();

    if id == SLOW_ID {
        tokio::time::sleep(SLOW_DELAY).await;
    }
    if id == GARBAGE_ID {
        return (StatusCode::OK, "<html>maintenance</html>").into_response();
    }

    let data: Vec<Value> = state.records.get(&id).cloned().into_iter().collect();
    axum::Json(json!({
        "currentCount": data.len(),
        "matchCount": data.len(),
        "page": 1,
        "perPage": 1,
        "totalCount": state.records.len(),
        "data": data,
    }))
    .into_response()
}
