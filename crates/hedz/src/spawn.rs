// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent creation input and the provider payload built from it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::provider::wire::CreateServerRequest;
use crate::provider::{AGENT_IMAGE, MANAGED_LABEL, NAME_LABEL};

/// Hetzner location an agent can be created in.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Fsn1,
    Nbg1,
    Hel1,
}

impl Region {
    pub const ALL: [Region; 3] = [Self::Fsn1, Self::Nbg1, Self::Hel1];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fsn1 => "fsn1",
            Self::Nbg1 => "nbg1",
            Self::Hel1 => "hel1",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fsn1 => "Falkenstein, DE",
            Self::Nbg1 => "Nuremberg, DE",
            Self::Hel1 => "Helsinki, FI",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hetzner server type an agent can be created as.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ServerSize {
    #[default]
    Cx22,
    Cx32,
    Cx42,
}

impl ServerSize {
    pub const ALL: [ServerSize; 3] = [Self::Cx22, Self::Cx32, Self::Cx42];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cx22 => "cx22",
            Self::Cx32 => "cx32",
            Self::Cx42 => "cx42",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cx22 => "CX22 (2 vCPU, 4GB RAM) ~€4/mo",
            Self::Cx32 => "CX32 (4 vCPU, 8GB RAM) ~€8/mo",
            Self::Cx42 => "CX42 (8 vCPU, 16GB RAM) ~€15/mo",
        }
    }
}

impl fmt::Display for ServerSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to create one agent. Consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Display name. Sanitized into the server name, kept verbatim in a label.
    pub name: String,
    pub region: Region,
    pub size: ServerSize,
    /// Anthropic API key handed to the agent.
    pub secondary_key: String,
    pub bot_token: Option<String>,
}

impl SpawnRequest {
    /// Trim inputs and drop an empty bot token.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            secondary_key: self.secondary_key.trim().to_owned(),
            bot_token: self.bot_token.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty()),
            ..self
        }
    }

    /// Reject requests missing a name or key.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::InvalidRequest("Agent name is required".to_owned()));
        }
        if self.secondary_key.trim().is_empty() {
            return Err(RegistryError::InvalidRequest("Anthropic API key is required".to_owned()));
        }
        Ok(())
    }

    /// Build the `POST /servers` body around a rendered bootstrap payload.
    pub fn to_create_request(&self, user_data: String) -> CreateServerRequest {
        let mut labels = BTreeMap::new();
        labels.insert(MANAGED_LABEL.to_owned(), "true".to_owned());
        labels.insert(NAME_LABEL.to_owned(), self.name.clone());

        CreateServerRequest {
            name: sanitize_name(&self.name),
            server_type: self.size.as_str().to_owned(),
            location: self.region.as_str().to_owned(),
            image: AGENT_IMAGE.to_owned(),
            labels,
            user_data,
            start_after_create: true,
        }
    }
}

/// Lowercase, replacing every character outside `[a-z0-9-]` with `-`.
///
/// One output character per input character.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| c.to_ascii_lowercase())
        .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' { c } else { '-' })
        .collect()
}

#[cfg(test)]
#[path = "spawn_tests.rs"]
mod tests;
