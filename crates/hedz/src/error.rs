// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt;

/// Failure of a registry operation, as surfaced to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No provider token configured. Never reaches the network.
    NoToken,
    /// The caller handed over an incomplete spawn request.
    InvalidRequest(String),
    /// The provider answered with a non-success status.
    Provider { status: u16, message: String },
    /// Connection, timeout, or response decoding failure.
    Transport(String),
}

impl RegistryError {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoToken => "NO_TOKEN",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::Provider { .. } => "PROVIDER_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
        }
    }

    /// HTTP status returned by the provider, if the failure came from one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for failures resolved locally by the user supplying input.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::NoToken | Self::InvalidRequest(_))
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoToken => f.write_str("No Hetzner token configured"),
            Self::InvalidRequest(msg) => f.write_str(msg),
            Self::Provider { message, .. } => f.write_str(message),
            Self::Transport(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<reqwest::Error> for RegistryError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
