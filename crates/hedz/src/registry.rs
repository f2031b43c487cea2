// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory agent inventory reconciled against the provider.
//!
//! The registry merges two independently failing sources: the provider's
//! server list (authoritative; a failure leaves the previous list in place)
//! and per-agent OpenClaw status (best-effort; a failure just means no
//! status). The agent list is only ever replaced wholesale, so readers see
//! either the old list or the new one.
//!
//! Overlapping refreshes are not coalesced: whichever finishes last wins.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::join_all;
use parking_lot::RwLock;

use crate::agent::Agent;
use crate::bootstrap::{BootstrapScript, CloudInit};
use crate::config::RegistryConfig;
use crate::credential::store::CredentialStore;
use crate::error::RegistryError;
use crate::probe::StatusProbe;
use crate::provider::client::ProviderClient;
use crate::provider::mapper::map_server;
use crate::spawn::SpawnRequest;

#[derive(Default)]
struct RegistryState {
    agents: Arc<Vec<Agent>>,
    /// Number of refresh/spawn operations currently running.
    in_flight: usize,
    last_error: Option<String>,
}

/// Point-in-time view of the registry for rendering.
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    pub agents: Arc<Vec<Agent>>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

/// Decrements the in-flight counter on drop, on every exit path.
struct LoadingGuard<'a> {
    state: &'a RwLock<RegistryState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Owns the list of known agents and sequences lifecycle commands.
pub struct AgentRegistry {
    credentials: Arc<CredentialStore>,
    provider: ProviderClient,
    probe: StatusProbe,
    bootstrap: Arc<dyn BootstrapScript>,
    state: RwLock<RegistryState>,
}

impl AgentRegistry {
    pub fn new(config: &RegistryConfig, credentials: Arc<CredentialStore>) -> Self {
        Self {
            credentials,
            provider: ProviderClient::new(config.api_url.clone(), config.request_timeout),
            probe: StatusProbe::new(config.probe.clone()),
            bootstrap: Arc::new(CloudInit::default()),
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Replace the startup payload renderer used by [`spawn`](Self::spawn).
    pub fn with_bootstrap(mut self, bootstrap: impl BootstrapScript + 'static) -> Self {
        self.bootstrap = Arc::new(bootstrap);
        self
    }

    /// Current agents, in provider response order.
    pub fn agents(&self) -> Arc<Vec<Agent>> {
        Arc::clone(&self.state.read().agents)
    }

    pub fn get(&self, server_id: u64) -> Option<Agent> {
        self.state.read().agents.iter().find(|a| a.server_id == server_id).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().in_flight > 0
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().last_error.clone()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();
        RegistrySnapshot {
            agents: Arc::clone(&state.agents),
            is_loading: state.in_flight > 0,
            last_error: state.last_error.clone(),
        }
    }

    fn token(&self) -> Result<String, RegistryError> {
        self.credentials.provider_token().ok_or(RegistryError::NoToken)
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        let mut state = self.state.write();
        state.in_flight += 1;
        state.last_error = None;
        LoadingGuard { state: &self.state }
    }

    fn record_error(&self, err: &RegistryError) {
        self.state.write().last_error = Some(err.to_string());
    }

    /// Reload the agent list from the provider and enrich running agents.
    ///
    /// Failures are recorded in `last_error` as well as returned. On failure
    /// the previous agent list is kept.
    pub async fn refresh(&self) -> Result<(), RegistryError> {
        let token = match self.token() {
            Ok(token) => token,
            Err(e) => {
                self.record_error(&e);
                return Err(e);
            }
        };
        let _loading = self.begin_loading();

        let records = match self.provider.list_servers(&token).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(code = e.as_str(), err = %e, "agent list refresh failed");
                self.record_error(&e);
                return Err(e);
            }
        };

        let mut seen = HashSet::new();
        let agents: Vec<Agent> =
            records.into_iter().map(map_server).filter(|a| seen.insert(a.server_id)).collect();

        // All probes are in flight together; each carries its own timeout.
        let agents = join_all(agents.into_iter().map(|agent| self.probe.enrich(agent))).await;

        let enriched = agents.iter().filter(|a| a.openclaw_status.is_some()).count();
        tracing::info!(count = agents.len(), enriched, "agents refreshed");
        self.state.write().agents = Arc::new(agents);
        Ok(())
    }

    /// Create a new agent, then refresh once to pick it up.
    ///
    /// No local entry is synthesized: status and IP only become meaningful
    /// on a later poll.
    pub async fn spawn(&self, request: SpawnRequest) -> Result<(), RegistryError> {
        let token = self.token()?;
        let request = request.normalized();
        request.validate()?;

        let loading = self.begin_loading();
        let body = request.to_create_request(self.bootstrap.render(&request));
        tracing::info!(
            name = %request.name,
            server_name = %body.name,
            region = %request.region,
            size = %request.size,
            "creating agent"
        );

        if let Err(e) = self.provider.create_server(&token, &body).await {
            tracing::warn!(name = %request.name, code = e.as_str(), err = %e, "agent creation failed");
            self.record_error(&e);
            drop(loading);
            return Err(e);
        }

        if let Err(e) = self.refresh().await {
            tracing::debug!(err = %e, "refresh after spawn failed");
        }
        Ok(())
    }

    /// Reboot an agent, then refresh once.
    pub async fn reboot(&self, server_id: u64) -> Result<(), RegistryError> {
        let token = self.token()?;
        self.provider.reboot_server(&token, server_id).await?;
        tracing::info!(server_id, "agent rebooting");

        if let Err(e) = self.refresh().await {
            tracing::debug!(err = %e, "refresh after reboot failed");
        }
        Ok(())
    }

    /// Delete an agent and drop it from the local list immediately.
    ///
    /// The provider's list endpoint can lag the deletion, so no refresh.
    pub async fn destroy(&self, server_id: u64) -> Result<(), RegistryError> {
        let token = self.token()?;
        self.provider.delete_server(&token, server_id).await?;
        tracing::info!(server_id, "agent destroyed");

        let mut state = self.state.write();
        let remaining: Vec<Agent> =
            state.agents.iter().filter(|a| a.server_id != server_id).cloned().collect();
        state.agents = Arc::new(remaining);
        Ok(())
    }
}
