// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider record to [`Agent`] mapping. Total: never fails.

use crate::agent::{Agent, AgentStatus};
use crate::provider::wire::ServerRecord;
use crate::provider::NAME_LABEL;

/// Normalize one provider server record.
pub fn map_server(raw: ServerRecord) -> Agent {
    let labels = raw.labels.unwrap_or_default();
    let name = [labels.get(NAME_LABEL).map(String::as_str), raw.name.as_deref()]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_owned();
    let ip = raw
        .public_net
        .and_then(|net| net.ipv4)
        .and_then(|v4| v4.ip)
        .filter(|ip| !ip.is_empty());
    let status = raw.status.as_deref().map(AgentStatus::from_provider).unwrap_or_default();

    Agent {
        server_id: raw.id,
        name,
        ip,
        status,
        created: raw.created.unwrap_or_default(),
        datacenter: raw.datacenter.and_then(|d| d.name).unwrap_or_default(),
        server_type: raw.server_type.and_then(|t| t.name).unwrap_or_default(),
        labels,
        openclaw_status: None,
    }
}

#[cfg(test)]
#[path = "mapper_tests.rs"]
mod tests;
