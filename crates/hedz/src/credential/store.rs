// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Long-lived credential state backed by a [`SecretStorage`] blob.

use std::sync::Arc;

use anyhow::Context;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::credential::storage::SecretStorage;
use crate::credential::{Credentials, CREDENTIALS_KEY};

#[derive(Default)]
struct CredentialState {
    initialized: bool,
    credentials: Option<Credentials>,
}

/// Owns the user's credentials and persists them wholesale on every change.
///
/// Reads are synchronous snapshots. Writes go to storage first and only
/// touch memory once storage accepted them.
pub struct CredentialStore {
    storage: Arc<dyn SecretStorage>,
    state: RwLock<CredentialState>,
    /// Serializes read-modify-write sequences against each other.
    write_lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(storage: Arc<dyn SecretStorage>) -> Self {
        Self { storage, state: RwLock::new(CredentialState::default()), write_lock: Mutex::new(()) }
    }

    /// Whether [`load`](Self::load) has completed at least once.
    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }

    /// Snapshot of the current credentials.
    pub fn current(&self) -> Option<Credentials> {
        self.state.read().credentials.clone()
    }

    /// Provider token, if one is configured.
    pub fn provider_token(&self) -> Option<String> {
        self.state.read().credentials.as_ref()?.provider_token().map(str::to_owned)
    }

    /// Restore credentials from storage.
    ///
    /// A missing or unreadable blob leaves the store empty but initialized.
    pub async fn load(&self) {
        let _guard = self.write_lock.lock().await;
        let credentials = match self.storage.get(CREDENTIALS_KEY).await {
            Ok(Some(blob)) => match serde_json::from_str::<Credentials>(&blob) {
                Ok(creds) => Some(creds),
                Err(e) => {
                    tracing::warn!(err = %e, "ignoring unreadable credential blob");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("no stored credentials");
                None
            }
            Err(e) => {
                tracing::warn!(err = %e, "failed to read credential storage");
                None
            }
        };
        let mut state = self.state.write();
        state.credentials = credentials;
        state.initialized = true;
    }

    /// Persist `credentials`, replacing whatever was stored.
    pub async fn save(&self, credentials: Credentials) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        self.save_locked(credentials).await
    }

    /// Delete the stored blob and forget the in-memory credentials.
    pub async fn clear(&self) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        self.storage.delete(CREDENTIALS_KEY).await.context("clearing credentials")?;
        self.state.write().credentials = None;
        tracing::info!("credentials cleared");
        Ok(())
    }

    pub async fn update_token(&self, token: &str) -> anyhow::Result<()> {
        let token = token.to_owned();
        self.modify(move |creds| creds.provider_token = token).await
    }

    pub async fn update_secondary_key(&self, key: &str) -> anyhow::Result<()> {
        let key = key.to_owned();
        self.modify(move |creds| creds.secondary_key = key).await
    }

    /// Add a bot, replacing the token of an existing bot with the same name.
    pub async fn add_bot(&self, name: &str, token: &str) -> anyhow::Result<()> {
        let (name, token) = (name.to_owned(), token.to_owned());
        self.modify(move |creds| {
            creds.bots.insert(name, token);
        })
        .await
    }

    /// Remove a bot by name. No-op when nothing is stored.
    pub async fn remove_bot(&self, name: &str) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let Some(mut creds) = self.current() else {
            return Ok(());
        };
        creds.bots.shift_remove(name);
        self.save_locked(creds).await
    }

    async fn modify(&self, f: impl FnOnce(&mut Credentials)) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut creds = self.current().unwrap_or_default();
        f(&mut creds);
        self.save_locked(creds).await
    }

    async fn save_locked(&self, credentials: Credentials) -> anyhow::Result<()> {
        let blob = serde_json::to_string(&credentials).context("serializing credentials")?;
        self.storage.set(CREDENTIALS_KEY, &blob).await.context("saving credentials")?;
        self.state.write().credentials = Some(credentials);
        tracing::debug!("credentials saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
