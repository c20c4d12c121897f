//! API handlers for bunyanggwon details

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use cheongyak_core::{DetailLookupHandler, Identifier, ResponseEnvelope};
use tracing::debug;

use crate::server::AppState;

/// `GET /api/bunyanggwon/{id}`
///
/// Answers 200 with the upstream record, 404 when it does not exist and 500
/// when the upstream call fails. An id that cannot be extracted or is empty
/// is answered like a missing record, so every reply is an envelope.
pub async fn api_bunyanggwon_detail(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> (StatusCode, Json<ResponseEnvelope>) {
    let identifier = match id {
        Ok(Path(id)) => Identifier::new(id).ok(),
        Err(rejection) => {
            debug!("Rejected bunyanggwon id: {}", rejection.body_text());
            None
        }
    };

    let (envelope, status) = match identifier {
        Some(identifier) => state.lookup.handle(&identifier).await,
        None => DetailLookupHandler::not_found(),
    };

    (status, Json(envelope))
}
