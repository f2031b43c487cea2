// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hedz: provision and monitor OpenClaw agents on Hetzner Cloud.

pub mod agent;
pub mod app;
pub mod bootstrap;
pub mod command;
pub mod config;
pub mod credential;
pub mod error;
pub mod probe;
pub mod provider;
pub mod registry;
pub mod spawn;

use std::sync::Once;

use crate::app::App;
use crate::config::{Command, Config};

static CRYPTO_INIT: Once = Once::new();

/// Install the ring TLS provider. reqwest is built without a default one.
pub fn ensure_crypto() {
    CRYPTO_INIT.call_once(|| {
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Run one CLI command. Returns a process exit code.
pub async fn run(config: Config) -> i32 {
    let app = App::from_config(&config).await;
    match &config.command {
        Command::List(args) => command::agents::list(&app, args).await,
        Command::Show(args) => command::agents::show(&app, args).await,
        Command::Spawn(args) => command::agents::spawn(&app, args).await,
        Command::Reboot(args) => command::agents::reboot(&app, args).await,
        Command::Destroy(args) => command::agents::destroy(&app, args).await,
        Command::Creds(args) => command::creds::run(&app.credentials, args).await,
    }
}
