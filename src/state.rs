// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    config::RelayConfig,
    providers::telegram::TelegramError,
    relay::Relay,
};

/// Shared handler state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }

    pub fn from_config(config: RelayConfig) -> Result<Self, TelegramError> {
        Ok(Self::new(Relay::new(config)?))
    }
}
