// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! CSB Report Relay - Agent Complaint Relay Service
//!
//! This crate accepts agent report submissions over HTTP and relays them to a
//! Telegram chat through the Bot API, optionally with a proof attachment.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `config` - Environment configuration
//! - `providers` - Telegram Bot API client
//! - `relay` - Validation and the send pipeline
//! - `report` - Report text rendering

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod relay;
pub mod report;
pub mod state;
