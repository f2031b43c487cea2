// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hetzner Cloud provider: wire schemas, HTTP client, and record mapping.

pub mod client;
pub mod mapper;
pub mod wire;

/// Default Hetzner Cloud API base URL.
pub const DEFAULT_API_URL: &str = "https://api.hetzner.cloud/v1";

/// Label marking a server as managed by hedz.
pub const MANAGED_LABEL: &str = "openclaw";

/// Label carrying the agent's original display name.
pub const NAME_LABEL: &str = "openclaw-name";

/// Image every agent is created from.
pub const AGENT_IMAGE: &str = "ubuntu-24.04";
