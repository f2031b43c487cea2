// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide context: one credential store and one registry.

use std::sync::Arc;

use crate::config::Config;
use crate::credential::storage::{FileStorage, SecretStorage};
use crate::credential::store::CredentialStore;
use crate::registry::AgentRegistry;

/// Long-lived state shared by every command. Built once at startup.
pub struct App {
    pub credentials: Arc<CredentialStore>,
    pub registry: Arc<AgentRegistry>,
}

impl App {
    /// Build the context over `storage` and load the stored credentials.
    pub async fn open(config: &Config, storage: Arc<dyn SecretStorage>) -> Self {
        let credentials = Arc::new(CredentialStore::new(storage));
        credentials.load().await;
        let registry =
            Arc::new(AgentRegistry::new(&config.registry_config(), Arc::clone(&credentials)));
        Self { credentials, registry }
    }

    /// Build the context over the on-disk credential file.
    pub async fn from_config(config: &Config) -> Self {
        let storage = FileStorage::new(config.state_dir());
        tracing::debug!(dir = %storage.dir().display(), "using credential storage");
        Self::open(config, Arc::new(storage)).await
    }
}
