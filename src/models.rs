// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the submission endpoint. Types derive
//! `ToSchema` so they show up in the generated OpenAPI document.
//!
//! The submission body comes straight from a browser form, so field names
//! keep the form's camelCase spelling (`proofBase64`, `proofMime`,
//! `proofName`).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// An agent report submitted through the complaint form.
///
/// Every field is optional at the wire level. `subject` and `details` are
/// required by the relay and checked before anything is sent. Empty strings
/// and non-string JSON values are treated the same as absent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Reporter's display name.
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    /// Reporter's contact info (phone, email, handle).
    #[serde(default, deserialize_with = "lenient_string")]
    pub contact: Option<String>,
    /// Agent ID of the reporter.
    #[serde(default, deserialize_with = "lenient_string")]
    pub agent: Option<String>,
    /// Agent ID of the agent being reported.
    #[serde(default, deserialize_with = "lenient_string")]
    pub complainer: Option<String>,
    /// Complaint subject (required).
    #[serde(default, deserialize_with = "lenient_string")]
    pub subject: Option<String>,
    /// Complaint details (required).
    #[serde(default, deserialize_with = "lenient_string")]
    pub details: Option<String>,
    /// Proof attachment, base64-encoded.
    #[serde(default, deserialize_with = "lenient_string")]
    pub proof_base64: Option<String>,
    /// MIME type of the proof attachment.
    #[serde(default, deserialize_with = "lenient_string")]
    pub proof_mime: Option<String>,
    /// Filename for the proof attachment (defaults to `proof.png`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub proof_name: Option<String>,
}

impl Submission {
    /// Parses a raw request body.
    ///
    /// An empty body, or one that is not a JSON object, yields an empty
    /// submission so that it fails required-field validation rather than
    /// surfacing a parse error.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }
}

/// Keeps non-empty strings, drops everything else.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Returned when a submission was delivered.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SubmitResponse {
    pub ok: bool,
}

/// Error body returned for every failed submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Telegram's response body, present when the Bot API rejected a call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}
