// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Normalized agent model: one provisioned server plus optional OpenClaw status.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle state reported by the provider.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Running,
    Off,
    Starting,
    Stopping,
    Migrating,
    Rebuilding,
    Deleting,
    #[default]
    Unknown,
}

impl AgentStatus {
    /// Parse a provider status string. Unrecognized values map to `Unknown`.
    pub fn from_provider(s: &str) -> Self {
        match s {
            "running" => Self::Running,
            "off" => Self::Off,
            "starting" => Self::Starting,
            "stopping" => Self::Stopping,
            "migrating" => Self::Migrating,
            "rebuilding" => Self::Rebuilding,
            "deleting" => Self::Deleting,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Off => "off",
            Self::Starting => "starting",
            Self::Stopping => "stopping",
            Self::Migrating => "migrating",
            Self::Rebuilding => "rebuilding",
            Self::Deleting => "deleting",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State reported by the OpenClaw service itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Running,
    Starting,
    Error,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Starting => f.write_str("starting"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Contents of `/.well-known/openclaw.json` on an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenClawStatus {
    pub name: String,
    pub version: String,
    pub status: ServiceState,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub channels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_bot: Option<String>,
    /// Whole seconds. Fractional values are truncated.
    #[serde(
        default,
        rename = "uptime",
        deserialize_with = "whole_seconds",
        skip_serializing_if = "Option::is_none"
    )]
    pub uptime_seconds: Option<u64>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept any JSON number. Negative or non-finite values count as absent.
fn whole_seconds<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let secs = Option::<f64>::deserialize(deserializer)?;
    Ok(secs.filter(|s| s.is_finite() && *s >= 0.0).map(|s| s.trunc() as u64))
}

impl OpenClawStatus {
    /// Telegram deep link for the agent's bot, if it reported one.
    pub fn telegram_link(&self) -> Option<String> {
        let bot = self.telegram_bot.as_deref()?.trim_start_matches('@');
        if bot.is_empty() {
            return None;
        }
        Some(format!("https://t.me/{bot}"))
    }
}

/// One provider server, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    pub server_id: u64,
    pub name: String,
    pub ip: Option<String>,
    pub status: AgentStatus,
    pub created: String,
    pub datacenter: String,
    pub server_type: String,
    pub labels: BTreeMap<String, String>,
    #[serde(default, rename = "openclaw", skip_serializing_if = "Option::is_none")]
    pub openclaw_status: Option<OpenClawStatus>,
}

impl Agent {
    /// Whether the agent should be probed for OpenClaw status.
    pub fn is_probe_eligible(&self) -> bool {
        self.status == AgentStatus::Running && self.ip.is_some()
    }
}

/// Render an uptime in seconds as `Nd Nh`, `Nh Nm`, or `Nm`.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let mins = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
