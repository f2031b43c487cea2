// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process fake of the Hetzner Cloud API plus an OpenClaw status endpoint.
//!
//! Both live on one loopback listener. Agents reported with IP `127.0.0.1`
//! are probed against the same server, so the registry is exercised end to
//! end over real HTTP.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use hedz::config::RegistryConfig;
use hedz::credential::storage::MemoryStorage;
use hedz::credential::store::CredentialStore;
use hedz::probe::ProbeConfig;
use hedz::registry::AgentRegistry;

pub const TOKEN: &str = "test-token";

/// Shared, mutable behaviour of the fake plus call counters.
#[derive(Default)]
pub struct FakeCloud {
    pub servers: Mutex<Vec<Value>>,
    /// Servers per page; 0 means everything on one page.
    pub page_size: AtomicUsize,
    pub list_delay: Mutex<Duration>,
    pub list_failure: Mutex<Option<(u16, Value)>>,
    pub create_failure: Mutex<Option<(u16, Value)>>,
    /// Status for reboot and delete; `None` answers 201/204.
    pub action_status: Mutex<Option<u16>>,
    /// Status document; `None` answers 404.
    pub status_doc: Mutex<Option<Value>>,
    pub status_delay: Mutex<Duration>,

    pub list_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub reboot_calls: AtomicUsize,
    pub delete_calls: AtomicUsize,
    pub status_calls: AtomicUsize,
    pub created: Mutex<Vec<Value>>,
    pub auth_headers: Mutex<Vec<String>>,
    pub selectors: Mutex<Vec<String>>,
}

impl FakeCloud {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    pub fn set_servers(&self, servers: Vec<Value>) {
        *self.servers.lock() = servers;
    }
}

/// A running fake with its address.
pub struct Harness {
    pub fake: Arc<FakeCloud>,
    pub addr: SocketAddr,
}

impl Harness {
    pub async fn start() -> anyhow::Result<Self> {
        let fake = Arc::new(FakeCloud::default());
        let router = Router::new()
            .route("/servers", get(list_servers).post(create_server))
            .route("/servers/{id}", axum::routing::delete(delete_server))
            .route("/servers/{id}/actions/reboot", post(reboot_server))
            .route("/.well-known/openclaw.json", get(status_doc))
            .with_state(Arc::clone(&fake));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Ok(Self { fake, addr })
    }

    /// Registry settings pointing both the provider and probes at the fake.
    pub fn config(&self, probe_timeout: Duration) -> RegistryConfig {
        RegistryConfig {
            api_url: format!("http://{}", self.addr),
            request_timeout: Duration::from_secs(5),
            probe: ProbeConfig {
                scheme: "http".to_owned(),
                port: Some(self.addr.port()),
                timeout: probe_timeout,
            },
        }
    }

    /// Registry whose credential store holds [`TOKEN`].
    pub async fn registry(&self) -> anyhow::Result<AgentRegistry> {
        let store = credentials(Some(TOKEN)).await?;
        Ok(AgentRegistry::new(&self.config(Duration::from_millis(500)), store))
    }
}

/// Loaded credential store over memory, optionally holding a provider token.
pub async fn credentials(token: Option<&str>) -> anyhow::Result<Arc<CredentialStore>> {
    let store = Arc::new(CredentialStore::new(Arc::new(MemoryStorage::new())));
    store.load().await;
    if let Some(token) = token {
        store.update_token(token).await?;
    }
    Ok(store)
}

/// Server record in the provider's wire shape.
pub fn server(id: u64, status: &str, ip: Option<&str>) -> Value {
    let public_net = match ip {
        Some(ip) => json!({ "ipv4": { "ip": ip }, "ipv6": null }),
        None => Value::Null,
    };
    json!({
        "id": id,
        "name": format!("agent-{id}"),
        "status": status,
        "public_net": public_net,
        "created": "2026-01-02T03:04:05+00:00",
        "datacenter": { "name": "fsn1-dc14", "description": "Falkenstein 1 virtual DC 14" },
        "server_type": { "name": "cx22", "description": "CX22" },
        "labels": { "openclaw": "true" },
    })
}

pub fn status_document() -> Value {
    json!({
        "name": "Pete",
        "version": "1.4.2",
        "status": "running",
        "channels": ["telegram"],
        "telegramBot": "@pete_bot",
        "uptime": 3600,
    })
}

fn reply(status: u16, body: Value) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body)).into_response()
}

async fn list_servers(
    State(fake): State<Arc<FakeCloud>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    fake.list_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        fake.auth_headers.lock().push(auth.to_owned());
    }
    if let Some(selector) = query.get("label_selector") {
        fake.selectors.lock().push(selector.clone());
    }

    let delay = *fake.list_delay.lock();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let failure = fake.list_failure.lock().clone();
    if let Some((status, body)) = failure {
        return reply(status, body);
    }

    let servers = fake.servers.lock().clone();
    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1).max(1);
    let size = match fake.page_size.load(Ordering::SeqCst) {
        0 => servers.len().max(1),
        n => n,
    };
    let start = (page - 1) * size;
    let chunk: Vec<Value> = servers.iter().skip(start).take(size).cloned().collect();
    let next_page = if start + size < servers.len() { json!(page + 1) } else { Value::Null };

    reply(
        200,
        json!({
            "servers": chunk,
            "meta": { "pagination": { "page": page, "per_page": size, "next_page": next_page } },
        }),
    )
}

async fn create_server(State(fake): State<Arc<FakeCloud>>, Json(body): Json<Value>) -> Response {
    let n = fake.create_calls.fetch_add(1, Ordering::SeqCst);
    fake.created.lock().push(body.clone());

    let failure = fake.create_failure.lock().clone();
    if let Some((status, body)) = failure {
        return reply(status, body);
    }

    let mut record = server(100 + n as u64, "initializing", None);
    record["name"] = body["name"].clone();
    record["labels"] = body["labels"].clone();
    fake.servers.lock().push(record.clone());
    reply(201, json!({ "server": record }))
}

async fn reboot_server(State(fake): State<Arc<FakeCloud>>, Path(id): Path<u64>) -> Response {
    fake.reboot_calls.fetch_add(1, Ordering::SeqCst);
    let status = fake.action_status.lock().unwrap_or(201);
    reply(status, json!({ "action": { "command": "reboot_server", "resources": [{ "id": id }] } }))
}

async fn delete_server(State(fake): State<Arc<FakeCloud>>, Path(id): Path<u64>) -> Response {
    fake.delete_calls.fetch_add(1, Ordering::SeqCst);
    let status = *fake.action_status.lock();
    match status {
        Some(status) => reply(status, json!({ "error": { "code": "server_error" } })),
        None => {
            fake.servers.lock().retain(|s| s["id"].as_u64() != Some(id));
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

async fn status_doc(State(fake): State<Arc<FakeCloud>>) -> Response {
    fake.status_calls.fetch_add(1, Ordering::SeqCst);
    let delay = *fake.status_delay.lock();
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    let doc = fake.status_doc.lock().clone();
    match doc {
        Some(doc) => reply(200, doc),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
