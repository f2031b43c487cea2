// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User credentials: Hetzner token, Anthropic key, and named Telegram bots.
//!
//! Persisted as a single opaque JSON blob through a [`storage::SecretStorage`]
//! capability. The blob layout matches what the mobile client writes, so a
//! credential file can move between the two.

pub mod storage;
pub mod store;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Storage key for the serialized credential blob.
pub const CREDENTIALS_KEY: &str = "hedz_credentials";

/// Everything the user has configured.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Hetzner Cloud API token. Required for any registry operation.
    #[serde(rename = "hetznerToken", default)]
    pub provider_token: String,
    /// Anthropic API key used as the default for new agents.
    #[serde(rename = "anthropicKey", default)]
    pub secondary_key: String,
    /// Telegram bot tokens keyed by bot name (case-sensitive).
    #[serde(rename = "telegramBots", default, with = "bot_list")]
    pub bots: IndexMap<String, String>,
}

impl Credentials {
    /// Provider token, if non-empty.
    pub fn provider_token(&self) -> Option<&str> {
        non_empty(&self.provider_token)
    }

    /// Secondary-service key to pre-fill spawn requests with, if non-empty.
    pub fn default_secondary_key(&self) -> Option<&str> {
        non_empty(&self.secondary_key)
    }

    /// Token of the bot registered under `name`.
    pub fn bot_token(&self, name: &str) -> Option<&str> {
        self.bots.get(name).map(String::as_str)
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

/// A named Telegram bot as it appears in the persisted blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotToken {
    pub name: String,
    pub token: String,
}

/// (De)serialize the bot map as a `[{name, token}]` list.
mod bot_list {
    use indexmap::IndexMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::BotToken;

    pub fn serialize<S: Serializer>(
        bots: &IndexMap<String, String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<BotToken> = bots
            .iter()
            .map(|(name, token)| BotToken { name: name.clone(), token: token.clone() })
            .collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<IndexMap<String, String>, D::Error> {
        let list = Option::<Vec<BotToken>>::deserialize(deserializer)?.unwrap_or_default();
        // Later duplicates win, matching add-replaces semantics.
        Ok(list.into_iter().map(|b| (b.name, b.token)).collect())
    }
}
