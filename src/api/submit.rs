// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Report submission endpoint.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::StatusCode,
    Json,
};
use tracing::warn;

use crate::{
    error::ApiError,
    models::{ErrorResponse, Submission, SubmitResponse},
    state::AppState,
};

/// Relays an agent report to the configured Telegram chat.
///
/// The body is read as raw bytes so that an empty or malformed body is
/// reported as missing fields instead of an extractor rejection.
#[utoipa::path(
    post,
    path = "/api/submit",
    request_body = Submission,
    tag = "Reports",
    responses(
        (status = 200, description = "Report delivered", body = SubmitResponse),
        (status = 400, description = "Missing required fields or invalid proof", body = ErrorResponse),
        (status = 405, description = "Method not allowed", body = ErrorResponse),
        (status = 413, description = "Request body or decoded proof too large", body = ErrorResponse),
        (status = 500, description = "Configuration missing, Telegram failure or server error", body = ErrorResponse)
    )
)]
pub async fn submit(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
        } else {
            warn!(reason = %rejection.body_text(), "failed to read submission body");
            ApiError::server_error()
        }
    })?;

    let submission = Submission::from_body(&body);
    state.relay.relay(&submission).await?;

    Ok(Json(SubmitResponse { ok: true }))
}

/// Answers every method other than `POST` on the submission route.
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::RelayConfig, relay::Relay};
    use serde_json::json;
    use url::Url;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn state_for(server: &MockServer) -> AppState {
        let mut config = RelayConfig::new(Some("t0k3n".into()), Some("-42".into()));
        config.api_base_url = Url::parse(&server.uri()).unwrap();
        AppState::new(Relay::new(config).unwrap())
    }

    #[tokio::test]
    async fn submit_success_returns_ok() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bott0k3n/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let body = json!({ "subject": "s", "details": "d" }).to_string();
        let Json(response) = submit(State(state_for(&server)), Ok(Bytes::from(body)))
            .await
            .expect("submission relayed");

        assert_eq!(response, SubmitResponse { ok: true });
    }

    #[tokio::test]
    async fn submit_without_subject_is_bad_request() {
        let server = MockServer::start().await;
        let body = json!({ "details": "d" }).to_string();

        let result = submit(State(state_for(&server)), Ok(Bytes::from(body))).await;

        match result {
            Err(err) => {
                assert_eq!(err.status, StatusCode::BAD_REQUEST);
                assert_eq!(err.message, "Missing required fields");
            }
            Ok(_) => panic!("expected missing fields error"),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn method_not_allowed_has_json_message() {
        let err = method_not_allowed().await;
        assert_eq!(err.status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(err.message, "Method not allowed");
    }
}
