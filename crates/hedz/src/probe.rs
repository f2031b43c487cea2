// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort OpenClaw status enrichment.
//!
//! The service on a freshly created or rebooted agent is often not up yet,
//! so every failure here means "no status" and is only logged at debug.

use std::time::Duration;

use reqwest::Client;

use crate::agent::{Agent, OpenClawStatus};

/// Path of the status document served by every agent.
pub const STATUS_PATH: &str = "/.well-known/openclaw.json";

/// Default hard timeout for one probe.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Where and how long to probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub scheme: String,
    /// Port override; `None` uses the scheme's default port.
    pub port: Option<u16>,
    pub timeout: Duration,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { scheme: "https".to_owned(), port: None, timeout: DEFAULT_PROBE_TIMEOUT }
    }
}

/// Fetches `/.well-known/openclaw.json` from agents.
pub struct StatusProbe {
    config: ProbeConfig,
    client: Client,
}

impl StatusProbe {
    pub fn new(config: ProbeConfig) -> Self {
        crate::ensure_crypto();
        let client = Client::builder().build().unwrap_or_default();
        Self { config, client }
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Status document URL for an agent address.
    pub fn status_url(&self, ip: &str) -> String {
        let host = if ip.contains(':') { format!("[{ip}]") } else { ip.to_owned() };
        match self.config.port {
            Some(port) => format!("{}://{host}:{port}{STATUS_PATH}", self.config.scheme),
            None => format!("{}://{host}{STATUS_PATH}", self.config.scheme),
        }
    }

    /// Fetch the status document, or `None` on any failure or timeout.
    pub async fn fetch(&self, ip: &str) -> Option<OpenClawStatus> {
        let url = self.status_url(ip);
        let attempt = async {
            let resp = self.client.get(&url).send().await?.error_for_status()?;
            resp.json::<OpenClawStatus>().await
        };
        match tokio::time::timeout(self.config.timeout, attempt).await {
            Ok(Ok(status)) => Some(status),
            Ok(Err(e)) => {
                tracing::debug!(%url, err = %e, "status probe failed");
                None
            }
            Err(_) => {
                tracing::debug!(%url, timeout = ?self.config.timeout, "status probe timed out");
                None
            }
        }
    }

    /// Attach OpenClaw status to an eligible agent. Never fails.
    pub async fn enrich(&self, mut agent: Agent) -> Agent {
        if !agent.is_probe_eligible() {
            return agent;
        }
        if let Some(ip) = agent.ip.as_deref() {
            agent.openclaw_status = self.fetch(ip).await;
        }
        agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_url_is_https_without_port() {
        let probe = StatusProbe::new(ProbeConfig::default());
        assert_eq!(probe.status_url("1.2.3.4"), "https://1.2.3.4/.well-known/openclaw.json");
        assert_eq!(probe.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn port_override_and_ipv6_brackets() {
        let probe = StatusProbe::new(ProbeConfig {
            scheme: "http".into(),
            port: Some(8080),
            timeout: Duration::from_millis(100),
        });
        assert_eq!(probe.status_url("127.0.0.1"), "http://127.0.0.1:8080/.well-known/openclaw.json");
        assert_eq!(probe.status_url("2a01::1"), "http://[2a01::1]:8080/.well-known/openclaw.json");
    }

    #[tokio::test]
    async fn ineligible_agent_is_returned_untouched() {
        let probe = StatusProbe::new(ProbeConfig::default());
        let agent = Agent {
            server_id: 1,
            name: "a".into(),
            ip: None,
            status: crate::agent::AgentStatus::Running,
            created: String::new(),
            datacenter: String::new(),
            server_type: String::new(),
            labels: Default::default(),
            openclaw_status: None,
        };
        assert_eq!(probe.enrich(agent.clone()).await, agent);
    }

    #[tokio::test]
    async fn unreachable_agent_yields_none() {
        // Port 9 (discard) on loopback is closed in test environments.
        let probe = StatusProbe::new(ProbeConfig {
            scheme: "http".into(),
            port: Some(9),
            timeout: Duration::from_millis(500),
        });
        assert_eq!(probe.fetch("127.0.0.1").await, None);
    }
}
