// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::any::Any;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::Request,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::error;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ApiError,
    models::{ErrorResponse, Submission, SubmitResponse},
    state::AppState,
};

pub mod health;
pub mod submit;

pub fn router(state: AppState) -> Router {
    let body_limit = state.relay.config().body_limit();

    let submit_route = post(submit::submit)
        .fallback(submit::method_not_allowed)
        .layer(DefaultBodyLimit::max(body_limit));

    let routes = Router::new()
        .route("/api/submit", submit_route)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    let app = Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    with_middleware(app)
}

/// Request id, tracing, panic recovery and CORS, outermost first.
fn with_middleware(app: Router) -> Router {
    app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "http",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id,
                )
            }))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(CorsLayer::permissive()),
    )
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let reason = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(%reason, "handler panicked");
    ApiError::server_error().into_response()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        submit::submit,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Submission,
            SubmitResponse,
            ErrorResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Reports", description = "Agent report submission"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
