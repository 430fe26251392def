// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Submission Relay
//!
//! Turns a validated [`Submission`] into Telegram calls.
//!
//! ## Pipeline
//!
//! 1. Check that `subject` and `details` are present.
//! 2. Resolve bot credentials from [`RelayConfig`].
//! 3. Decode the proof attachment, if both `proofBase64` and `proofMime`
//!    were supplied.
//! 4. With a proof: `sendDocument` with the short caption, then
//!    `sendMessage` with the full report. Without: `sendMessage` only.
//!
//! Each step returns a [`RelayError`] variant on failure and nothing is sent
//! after a failed step. The calls are never retried. If `sendMessage` fails
//! after the document went through, the document stays delivered and the
//! failure is reported as [`RelayError::MessageRejectedAfterDocument`].

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::RelayConfig,
    models::Submission,
    providers::telegram::{DocumentUpload, TelegramClient, TelegramError},
    report::{proof_file_name, render_report_text, short_caption},
};

/// Standard alphabet, padding optional, non-zero trailing bits tolerated.
const PROOF_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("submission is missing subject or details")]
    MissingFields,

    #[error("Telegram bot token or chat id is not configured")]
    ConfigMissing,

    #[error("invalid proof attachment: {0}")]
    InvalidProof(String),

    #[error("proof attachment exceeds {limit} bytes")]
    ProofTooLarge { limit: usize },

    #[error("Telegram rejected the proof document")]
    DocumentRejected(Value),

    #[error("Telegram rejected the report message after the proof was delivered")]
    MessageRejectedAfterDocument(Value),

    #[error("Telegram rejected the report message")]
    MessageRejected(Value),

    #[error("unexpected relay failure: {0}")]
    Internal(String),
}

/// What reached Telegram for a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Message,
    DocumentAndMessage,
}

/// Relays submissions to the configured Telegram chat.
#[derive(Debug, Clone)]
pub struct Relay {
    config: RelayConfig,
    telegram: TelegramClient,
}

impl Relay {
    pub fn new(config: RelayConfig) -> Result<Self, TelegramError> {
        let telegram = TelegramClient::new(config.api_base_url.clone(), config.request_timeout)?;
        Ok(Self { config, telegram })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    /// True when both bot credentials are present.
    pub fn is_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    #[tracing::instrument(name = "relay", skip_all, fields(submission_id = %Uuid::new_v4()))]
    pub async fn relay(&self, submission: &Submission) -> Result<Delivery, RelayError> {
        let subject = validate(submission)?;
        let credentials = self.config.credentials().ok_or(RelayError::ConfigMissing)?;

        let text = render_report_text(submission);
        let document = self.prepare_document(submission)?;

        let Some(document) = document else {
            self.telegram
                .send_message(&credentials, &text)
                .await
                .map_err(|e| upstream_error(e, RelayError::MessageRejected))?;

            info!("report relayed as message");
            return Ok(Delivery::Message);
        };

        self.telegram
            .send_document(&credentials, &short_caption(subject), document)
            .await
            .map_err(|e| upstream_error(e, RelayError::DocumentRejected))?;

        self.telegram
            .send_message(&credentials, &text)
            .await
            .map_err(|e| upstream_error(e, RelayError::MessageRejectedAfterDocument))?;

        info!("report relayed with proof document");
        Ok(Delivery::DocumentAndMessage)
    }

    /// Builds the proof upload, or `None` when the submission has no
    /// complete attachment.
    fn prepare_document(
        &self,
        submission: &Submission,
    ) -> Result<Option<DocumentUpload>, RelayError> {
        let (encoded, mime) = match (&submission.proof_base64, &submission.proof_mime) {
            (Some(encoded), Some(mime)) => (encoded, mime),
            (None, None) => return Ok(None),
            (Some(_), None) => {
                warn!("proofBase64 without proofMime, sending report without proof");
                return Ok(None);
            }
            (None, Some(_)) => {
                warn!("proofMime without proofBase64, sending report without proof");
                return Ok(None);
            }
        };

        let bytes = decode_proof(encoded, self.config.max_proof_bytes)?;
        DocumentUpload::new(bytes, proof_file_name(submission), mime)
            .map(Some)
            .map_err(|e| RelayError::InvalidProof(e.to_string()))
    }
}

/// Returns the subject once both required fields are known to be present.
fn validate(submission: &Submission) -> Result<&str, RelayError> {
    let subject = submission.subject.as_deref().filter(|s| !s.is_empty());
    let has_details = submission.details.as_deref().is_some_and(|d| !d.is_empty());

    match subject {
        Some(subject) if has_details => Ok(subject),
        _ => Err(RelayError::MissingFields),
    }
}

/// Decodes standard or URL-safe base64, padded or not, ignoring ASCII
/// whitespace and non-canonical trailing bits. The size limit applies to the
/// decoded bytes.
fn decode_proof(encoded: &str, limit: usize) -> Result<Vec<u8>, RelayError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    // Reject oversized input before allocating the decoded buffer.
    let max_encoded = limit.div_ceil(3).saturating_mul(4);
    if compact.len() > max_encoded {
        return Err(RelayError::ProofTooLarge { limit });
    }

    let bytes = PROOF_ENGINE
        .decode(&compact)
        .map_err(|e| RelayError::InvalidProof(format!("bad base64: {e}")))?;

    if bytes.len() > limit {
        return Err(RelayError::ProofTooLarge { limit });
    }
    Ok(bytes)
}

/// Maps a Telegram failure onto the relay step that made the call. Anything
/// other than a rejection by the Bot API is unexpected.
fn upstream_error(error: TelegramError, rejected: fn(Value) -> RelayError) -> RelayError {
    match error {
        TelegramError::Rejected { body, .. } => rejected(body),
        other => RelayError::Internal(other.to_string()),
    }
}
