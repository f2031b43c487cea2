// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the Hetzner Cloud API.
//!
//! Every call is attempted exactly once; retrying is left to the user.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::error::RegistryError;
use crate::provider::wire::{CreateServerRequest, ErrorEnvelope, ServerListResponse, ServerRecord};
use crate::provider::MANAGED_LABEL;

/// Servers requested per page of `GET /servers`.
const PAGE_SIZE: u32 = 50;

/// Bearer-authenticated client for one Hetzner Cloud project.
pub struct ProviderClient {
    base_url: String,
    client: Client,
}

impl ProviderClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        crate::ensure_crypto();
        let client = Client::builder().timeout(timeout).build().unwrap_or_default();
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, client }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List every server carrying the managed label, following pagination.
    ///
    /// A failure on any page fails the whole listing.
    pub async fn list_servers(&self, token: &str) -> Result<Vec<ServerRecord>, RegistryError> {
        let selector = format!("{MANAGED_LABEL}=true");
        let mut servers = Vec::new();
        let mut page = 1u32;

        loop {
            let resp = self
                .client
                .get(self.url("/servers"))
                .bearer_auth(token)
                .query(&[("label_selector", selector.as_str())])
                .query(&[("page", page), ("per_page", PAGE_SIZE)])
                .send()
                .await?;
            if !resp.status().is_success() {
                return Err(provider_failure(resp).await);
            }

            let body: ServerListResponse = resp.json().await?;
            let next = body.next_page();
            servers.extend(body.servers);

            match next {
                Some(n) if n > page => page = n,
                _ => break,
            }
        }

        Ok(servers)
    }

    /// Create a server. The response body is not used on success.
    pub async fn create_server(
        &self,
        token: &str,
        body: &CreateServerRequest,
    ) -> Result<(), RegistryError> {
        let resp =
            self.client.post(self.url("/servers")).bearer_auth(token).json(body).send().await?;
        if !resp.status().is_success() {
            return Err(provider_failure(resp).await);
        }
        Ok(())
    }

    pub async fn reboot_server(&self, token: &str, server_id: u64) -> Result<(), RegistryError> {
        let resp = self
            .client
            .post(self.url(&format!("/servers/{server_id}/actions/reboot")))
            .bearer_auth(token)
            .send()
            .await?;
        check_action(&resp, "reboot")
    }

    pub async fn delete_server(&self, token: &str, server_id: u64) -> Result<(), RegistryError> {
        let resp = self
            .client
            .delete(self.url(&format!("/servers/{server_id}")))
            .bearer_auth(token)
            .send()
            .await?;
        check_action(&resp, "destroy")
    }
}

fn check_action(resp: &Response, action: &str) -> Result<(), RegistryError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let status = status.as_u16();
    Err(RegistryError::Provider { status, message: format!("failed to {action}: {status}") })
}

/// Turn a non-2xx response into an error, preferring the provider's own message.
async fn provider_failure(resp: Response) -> RegistryError {
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message =
        ErrorEnvelope::message_from(&body).unwrap_or_else(|| format!("provider error {status}"));
    RegistryError::Provider { status, message }
}
