// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::{error, info};

use crate::{models::ErrorResponse, relay::RelayError};

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Upstream response body passed back to the caller as `data`.
    pub data: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Generic 500 that hides the cause from the caller.
    pub fn server_error() -> Self {
        Self::internal("Server error")
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::MissingFields => Self::bad_request("Missing required fields"),
            RelayError::ConfigMissing => {
                error!("submission rejected: TG_BOT_TOKEN or TG_CHAT_ID is not set");
                Self::internal("Telegram config missing")
            }
            RelayError::InvalidProof(reason) => {
                info!(%reason, "submission rejected: invalid proof");
                Self::bad_request("Invalid proof attachment")
            }
            RelayError::ProofTooLarge { .. } => {
                Self::new(StatusCode::PAYLOAD_TOO_LARGE, "Proof attachment too large")
            }
            RelayError::DocumentRejected(data) => {
                Self::internal("Telegram sendDocument failed").with_data(data)
            }
            RelayError::MessageRejectedAfterDocument(data) => {
                Self::internal("Telegram sendMessage failed (after document)").with_data(data)
            }
            RelayError::MessageRejected(data) => {
                Self::internal("Telegram sendMessage failed").with_data(data)
            }
            RelayError::Internal(reason) => {
                error!(%reason, "submission failed unexpectedly");
                Self::server_error()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.message,
            data: self.data,
        });
        (self.status, body).into_response()
    }
}
