// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hetzner Cloud wire formats for the endpoints hedz consumes.
//!
//! Every field the provider may omit or null is optional here; defaults are
//! applied once, in [`crate::provider::mapper`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One entry of `GET /servers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerRecord {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub public_net: Option<PublicNet>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub datacenter: Option<NamedRef>,
    #[serde(default)]
    pub server_type: Option<NamedRef>,
    #[serde(default)]
    pub labels: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublicNet {
    #[serde(default)]
    pub ipv4: Option<IpRecord>,
    #[serde(default)]
    pub ipv6: Option<IpRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpRecord {
    #[serde(default)]
    pub ip: Option<String>,
}

/// Nested object the provider references by name (datacenter, server type).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `GET /servers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerListResponse {
    #[serde(default)]
    pub servers: Vec<ServerRecord>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl ServerListResponse {
    pub fn next_page(&self) -> Option<u32> {
        self.meta.as_ref()?.pagination.as_ref()?.next_page
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub next_page: Option<u32>,
}

/// Body of `POST /servers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateServerRequest {
    pub name: String,
    pub server_type: String,
    pub location: String,
    pub image: String,
    pub labels: BTreeMap<String, String>,
    pub user_data: String,
    pub start_after_create: bool,
}

/// Error envelope returned on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorEnvelope {
    /// Provider-supplied message from a raw error body, if there is a usable one.
    pub fn message_from(body: &str) -> Option<String> {
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        let message = envelope.error?.message?;
        if message.trim().is_empty() {
            None
        } else {
            Some(message)
        }
    }
}
