// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Telegram Bot API client for relaying reports.
//!
//! Only two Bot API methods are used: `sendMessage` for the report text and
//! `sendDocument` for the proof attachment. Calls are single attempts. A
//! non-2xx status is returned as [`TelegramError::Rejected`] carrying the
//! response body, so callers can pass it back to the submitter.

use std::time::Duration;

use reqwest::{
    multipart::{Form, Part},
    Client, StatusCode,
};
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::config::TelegramCredentials;

const SEND_MESSAGE: &str = "sendMessage";
const SEND_DOCUMENT: &str = "sendDocument";

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("Telegram HTTP client setup failed: {0}")]
    Client(String),

    #[error("Telegram {method} request failed: {reason}")]
    Transport {
        method: &'static str,
        reason: String,
    },

    #[error("Telegram {method} returned {status}")]
    Rejected {
        method: &'static str,
        status: StatusCode,
        body: Value,
    },

    #[error("invalid document attachment: {0}")]
    InvalidAttachment(String),
}

/// A file ready to be uploaded through `sendDocument`.
#[derive(Debug)]
pub struct DocumentUpload {
    part: Part,
    file_name: String,
    len: usize,
}

impl DocumentUpload {
    /// Wraps raw bytes as a document part.
    ///
    /// Fails if `mime` is not a syntactically valid MIME type.
    pub fn new(bytes: Vec<u8>, file_name: &str, mime: &str) -> Result<Self, TelegramError> {
        let len = bytes.len();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)
            .map_err(|_| TelegramError::InvalidAttachment(format!("bad MIME type `{mime}`")))?;
        Ok(Self {
            part,
            file_name: file_name.to_string(),
            len,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone)]
pub struct TelegramClient {
    api_base_url: Url,
    http: Client,
}

impl TelegramClient {
    pub fn new(api_base_url: Url, timeout: Option<Duration>) -> Result<Self, TelegramError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| TelegramError::Client(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { api_base_url, http })
    }

    /// Sends `text` as a plain message to the configured chat.
    pub async fn send_message(
        &self,
        credentials: &TelegramCredentials,
        text: &str,
    ) -> Result<Value, TelegramError> {
        let payload = json!({
            "chat_id": credentials.chat_id,
            "text": text,
        });

        let response = self
            .http
            .post(self.method_url(&credentials.bot_token, SEND_MESSAGE))
            .json(&payload)
            .send()
            .await
            .map_err(|e| transport_error(SEND_MESSAGE, e))?;

        read_response(SEND_MESSAGE, response).await
    }

    /// Uploads `document` with `caption` to the configured chat.
    pub async fn send_document(
        &self,
        credentials: &TelegramCredentials,
        caption: &str,
        document: DocumentUpload,
    ) -> Result<Value, TelegramError> {
        if document.is_empty() {
            warn!(file_name = %document.file_name(), "Telegram sendDocument: proof is empty");
        }
        debug!(
            file_name = %document.file_name(),
            bytes = document.len(),
            "Telegram sendDocument: uploading proof"
        );

        let form = Form::new()
            .text("chat_id", credentials.chat_id.clone())
            .text("caption", caption.to_string())
            .part("document", document.part);

        let response = self
            .http
            .post(self.method_url(&credentials.bot_token, SEND_DOCUMENT))
            .multipart(form)
            .send()
            .await
            .map_err(|e| transport_error(SEND_DOCUMENT, e))?;

        read_response(SEND_DOCUMENT, response).await
    }

    // Contains the bot token; never log the result.
    fn method_url(&self, bot_token: &str, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_base_url.as_str().trim_end_matches('/'),
            bot_token,
            method
        )
    }
}

fn transport_error(method: &'static str, error: reqwest::Error) -> TelegramError {
    // The request URL embeds the bot token.
    TelegramError::Transport {
        method,
        reason: error.without_url().to_string(),
    }
}

/// Reads the Bot API response body, falling back to `{}` when it is missing
/// or not JSON.
async fn read_response(
    method: &'static str,
    response: reqwest::Response,
) -> Result<Value, TelegramError> {
    let status = response.status();
    let body = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_| json!({})),
        Err(_) => json!({}),
    };

    if status.is_success() {
        debug!(method, %status, "Telegram call succeeded");
        Ok(body)
    } else {
        warn!(method, %status, response = %body, "Telegram call rejected");
        Err(TelegramError::Rejected {
            method,
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn credentials() -> TelegramCredentials {
        TelegramCredentials {
            bot_token: "123:abc".to_string(),
            chat_id: "-100500".to_string(),
        }
    }

    fn client_for(server: &MockServer) -> TelegramClient {
        TelegramClient::new(Url::parse(&server.uri()).unwrap(), None).unwrap()
    }

    #[tokio::test]
    async fn send_message_posts_chat_id_and_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "chat_id": "-100500", "text": "hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server)
            .send_message(&credentials(), "hello")
            .await
            .expect("message accepted");
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn rejected_call_carries_status_and_body() {
        let server = MockServer::start().await;
        let upstream = json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        });
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(upstream.clone()))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_message(&credentials(), "hello")
            .await
            .expect_err("message rejected");

        match err {
            TelegramError::Rejected {
                method,
                status,
                body,
            } => {
                assert_eq!(method, "sendMessage");
                assert_eq!(status, StatusCode::BAD_REQUEST);
                assert_eq!(body, upstream);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_becomes_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .send_message(&credentials(), "hello")
            .await
            .expect_err("gateway error");
        assert!(matches!(
            err,
            TelegramError::Rejected { ref body, .. } if *body == json!({})
        ));
    }

    #[tokio::test]
    async fn send_document_uploads_multipart_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendDocument"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let document =
            DocumentUpload::new(b"PNGDATA".to_vec(), "shot.png", "image/png").expect("valid");
        client_for(&server)
            .send_document(&credentials(), "caption text", document)
            .await
            .expect("document accepted");

        let requests = server.received_requests().await.expect("recording enabled");
        assert_eq!(requests.len(), 1);
        let content_type = requests[0]
            .headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("multipart/form-data"));

        let body = String::from_utf8_lossy(&requests[0].body).to_string();
        assert!(body.contains("name=\"chat_id\""));
        assert!(body.contains("-100500"));
        assert!(body.contains("name=\"caption\""));
        assert!(body.contains("caption text"));
        assert!(body.contains("name=\"document\"; filename=\"shot.png\""));
        assert!(body.to_ascii_lowercase().contains("content-type: image/png"));
        assert!(body.contains("PNGDATA"));
    }

    #[tokio::test]
    async fn empty_document_is_still_uploaded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendDocument"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let document = DocumentUpload::new(Vec::new(), "blank.txt", "text/plain").expect("valid");
        assert!(document.is_empty());
        assert_eq!(document.len(), 0);

        client_for(&server)
            .send_document(&credentials(), "caption", document)
            .await
            .expect("empty document accepted");

        let requests = server.received_requests().await.expect("recording enabled");
        let body = String::from_utf8_lossy(&requests[0].body).to_string();
        assert!(body.contains("filename=\"blank.txt\""));
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_token() {
        // Nothing listens on port 9.
        let client = TelegramClient::new(Url::parse("http://127.0.0.1:9").unwrap(), None).unwrap();

        let err = client
            .send_message(&credentials(), "hello")
            .await
            .expect_err("connection refused");
        assert!(matches!(err, TelegramError::Transport { .. }));
        assert!(!err.to_string().contains("123:abc"));
    }

    #[test]
    fn document_upload_rejects_invalid_mime() {
        let err = DocumentUpload::new(vec![1, 2, 3], "proof.png", "not a mime")
            .expect_err("invalid mime");
        assert!(matches!(err, TelegramError::InvalidAttachment(_)));

        let upload = DocumentUpload::new(vec![1, 2, 3], "proof.png", "application/pdf")
            .expect("valid mime");
        assert_eq!(upload.len(), 3);
        assert_eq!(upload.file_name(), "proof.png");
    }

    #[test]
    fn method_url_trims_trailing_slash() {
        let client =
            TelegramClient::new(Url::parse("https://api.telegram.org/").unwrap(), None).unwrap();
        assert_eq!(
            client.method_url("123:abc", "sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }
}
