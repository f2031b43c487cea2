// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::command::agents::{DestroyArgs, ListArgs, ServerArgs, SpawnArgs};
use crate::command::creds::CredsArgs;
use crate::probe::ProbeConfig;
use crate::provider::DEFAULT_API_URL;

/// Provision and monitor OpenClaw agents on Hetzner Cloud.
#[derive(Debug, Parser)]
#[command(name = "hedz", version, about)]
pub struct Config {
    /// Hetzner Cloud API base URL.
    #[arg(long, env = "HEDZ_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Directory holding the credential file.
    #[arg(long, env = "HEDZ_STATE_DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Timeout for provider API calls in milliseconds.
    #[arg(long, env = "HEDZ_REQUEST_TIMEOUT_MS", default_value_t = 30_000, global = true)]
    pub request_timeout_ms: u64,

    /// Hard timeout for each OpenClaw status probe in milliseconds.
    #[arg(long, env = "HEDZ_PROBE_TIMEOUT_MS", default_value_t = 5_000, global = true)]
    pub probe_timeout_ms: u64,

    /// Scheme used to reach agent status documents.
    #[arg(long, env = "HEDZ_PROBE_SCHEME", default_value = "https", hide = true, global = true)]
    pub probe_scheme: String,

    /// Port override for agent status documents.
    #[arg(long, env = "HEDZ_PROBE_PORT", hide = true, global = true)]
    pub probe_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "HEDZ_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (text, json).
    #[arg(long, env = "HEDZ_LOG_FORMAT", default_value = "text", global = true)]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// List agents with their OpenClaw status.
    List(ListArgs),
    /// Show one agent in detail.
    Show(ServerArgs),
    /// Create a new agent.
    Spawn(SpawnArgs),
    /// Reboot an agent.
    Reboot(ServerArgs),
    /// Permanently delete an agent.
    Destroy(DestroyArgs),
    /// Manage stored credentials.
    Creds(CredsArgs),
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.request_timeout_ms == 0 {
            anyhow::bail!("--request-timeout-ms must be greater than zero");
        }
        if self.probe_timeout_ms == 0 {
            anyhow::bail!("--probe-timeout-ms must be greater than zero");
        }
        if !matches!(self.probe_scheme.as_str(), "http" | "https") {
            anyhow::bail!("invalid probe scheme: {}", self.probe_scheme);
        }
        if !matches!(self.log_format.as_str(), "text" | "json") {
            anyhow::bail!("invalid log format: {}", self.log_format);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Resolved credential directory.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(default_state_dir)
    }

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            api_url: self.api_url.clone(),
            request_timeout: self.request_timeout(),
            probe: ProbeConfig {
                scheme: self.probe_scheme.clone(),
                port: self.probe_port,
                timeout: self.probe_timeout(),
            },
        }
    }
}

/// Library-facing settings for [`crate::registry::AgentRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub api_url: String,
    pub request_timeout: Duration,
    pub probe: ProbeConfig,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            request_timeout: Duration::from_secs(30),
            probe: ProbeConfig::default(),
        }
    }
}

/// Resolve the default state directory.
///
/// Checks `$XDG_STATE_HOME/hedz`, then `$HOME/.local/state/hedz`.
pub fn default_state_dir() -> PathBuf {
    state_dir_with(|name| std::env::var(name).ok())
}

fn state_dir_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(xdg) = env("XDG_STATE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join("hedz");
    }
    if let Some(home) = env("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local/state/hedz");
    }
    PathBuf::from(".hedz")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
