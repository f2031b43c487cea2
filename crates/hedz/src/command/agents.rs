// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hedz list|show|spawn|reboot|destroy`: agent inventory and lifecycle.

use std::fmt::Write as _;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::agent::{format_uptime, Agent};
use crate::app::App;
use crate::credential::Credentials;
use crate::error::RegistryError;
use crate::probe::STATUS_PATH;
use crate::spawn::{Region, ServerSize, SpawnRequest};

/// CLI arguments for `hedz list`.
#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Print agents as JSON.
    #[arg(long)]
    pub json: bool,

    /// Keep refreshing until interrupted.
    #[arg(long)]
    pub watch: bool,

    /// Refresh interval for `--watch` in milliseconds.
    #[arg(long, default_value_t = 15_000, requires = "watch")]
    pub interval_ms: u64,
}

/// CLI arguments for commands addressing one server.
#[derive(Debug, clap::Args)]
pub struct ServerArgs {
    /// Hetzner server ID.
    pub server_id: u64,

    /// Print as JSON.
    #[arg(long)]
    pub json: bool,
}

/// CLI arguments for `hedz destroy`.
#[derive(Debug, clap::Args)]
pub struct DestroyArgs {
    /// Hetzner server ID.
    pub server_id: u64,

    /// Confirm permanent deletion.
    #[arg(long)]
    pub yes: bool,
}

/// CLI arguments for `hedz spawn`.
#[derive(Debug, clap::Args)]
pub struct SpawnArgs {
    /// Agent display name. Defaults to the selected bot's name.
    #[arg(long)]
    pub name: Option<String>,

    /// Hetzner location.
    #[arg(long, value_enum, default_value_t = Region::Fsn1)]
    pub region: Region,

    /// Hetzner server type.
    #[arg(long, value_enum, default_value_t = ServerSize::Cx22)]
    pub size: ServerSize,

    /// Anthropic API key. Defaults to the stored key.
    #[arg(long, env = "HEDZ_ANTHROPIC_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Use a stored Telegram bot by name.
    #[arg(long, conflicts_with = "bot_token")]
    pub bot: Option<String>,

    /// Telegram bot token to hand to the agent.
    #[arg(long)]
    pub bot_token: Option<String>,
}

/// Exit code for a registry failure: 2 for local problems, 1 for remote ones.
fn exit_code(err: &RegistryError) -> i32 {
    if err.is_local() {
        2
    } else {
        1
    }
}

/// Run `hedz list`. Returns a process exit code.
pub async fn list(app: &App, args: &ListArgs) -> i32 {
    if !args.watch {
        if let Err(e) = app.registry.refresh().await {
            eprintln!("error: {e}");
            return exit_code(&e);
        }
        print_agents(&app.registry.agents(), args.json);
        return 0;
    }

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            shutdown.cancel();
        });
    }
    watch(app, args, shutdown).await
}

async fn watch(app: &App, args: &ListArgs, shutdown: CancellationToken) -> i32 {
    let mut timer = tokio::time::interval(Duration::from_millis(args.interval_ms.max(1)));
    timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = timer.tick() => {}
        }

        let outcome = tokio::select! {
            _ = shutdown.cancelled() => break,
            r = app.registry.refresh() => r,
        };
        if let Err(e) = outcome {
            if e.is_local() {
                eprintln!("error: {e}");
                return exit_code(&e);
            }
        }
        // A remote failure keeps the last good list; the next tick tries again.
        let snapshot = app.registry.snapshot();
        print_agents(&snapshot.agents, args.json);
        if let Some(err) = snapshot.last_error {
            eprintln!("error: {err}");
        }
    }
    0
}

fn print_agents(agents: &[Agent], json: bool) {
    if json {
        match serde_json::to_string_pretty(agents) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("error: {e}"),
        }
    } else {
        print!("{}", render_table(agents));
    }
}

/// Render the agent list as a fixed-width table.
pub fn render_table(agents: &[Agent]) -> String {
    if agents.is_empty() {
        return "No agents yet. Create one with `hedz spawn`.\n".to_owned();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<20} {:<11} {:<16} {:<8} {:<24}",
        "ID", "NAME", "STATUS", "IP", "REGION", "OPENCLAW"
    );
    let _ = writeln!(out, "{}", "-".repeat(92));
    for agent in agents {
        let ip = agent.ip.as_deref().unwrap_or("-");
        let region = agent.datacenter.split('-').next().unwrap_or_default();
        let openclaw = match agent.openclaw_status {
            Some(ref oc) => format!("{} {}", oc.version, oc.status),
            None => "-".to_owned(),
        };
        let _ = writeln!(
            out,
            "{:<10} {:<20} {:<11} {:<16} {:<8} {:<24}",
            agent.server_id, agent.name, agent.status, ip, region, openclaw
        );
    }
    out
}

/// Render one agent's detail view.
pub fn render_detail(agent: &Agent) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", agent.name, agent.status);
    let _ = writeln!(out);
    let _ = writeln!(out, "Infrastructure");
    let _ = writeln!(out, "  {:<12} {}", "Server ID", agent.server_id);
    let _ = writeln!(out, "  {:<12} {}", "IP Address", agent.ip.as_deref().unwrap_or("Pending..."));
    let _ = writeln!(out, "  {:<12} {}", "Datacenter", agent.datacenter);
    let _ = writeln!(out, "  {:<12} {}", "Type", agent.server_type);
    let _ = writeln!(out, "  {:<12} {}", "Created", agent.created);

    if let Some(ref oc) = agent.openclaw_status {
        let channels = if oc.channels.is_empty() { "None".to_owned() } else { oc.channels.join(", ") };
        let _ = writeln!(out);
        let _ = writeln!(out, "OpenClaw");
        let _ = writeln!(out, "  {:<12} {}", "Version", oc.version);
        let _ = writeln!(out, "  {:<12} {}", "Status", oc.status);
        let _ = writeln!(out, "  {:<12} {}", "Channels", channels);
        if let Some(uptime) = oc.uptime_seconds {
            let _ = writeln!(out, "  {:<12} {}", "Uptime", format_uptime(uptime));
        }
        if let (Some(bot), Some(link)) = (oc.telegram_bot.as_deref(), oc.telegram_link()) {
            let _ = writeln!(out, "  {:<12} {} ({})", "Telegram", bot, link);
        }
    } else if let (true, Some(ip)) = (agent.is_probe_eligible(), agent.ip.as_deref()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "OpenClaw status unavailable. It may still be starting up.");
        let _ = writeln!(out, "Discovery endpoint: https://{ip}{STATUS_PATH}");
    }
    out
}

/// Run `hedz show`. Returns a process exit code.
pub async fn show(app: &App, args: &ServerArgs) -> i32 {
    if let Err(e) = app.registry.refresh().await {
        eprintln!("error: {e}");
        return exit_code(&e);
    }
    let Some(agent) = app.registry.get(args.server_id) else {
        eprintln!("error: agent {} not found", args.server_id);
        return 1;
    };
    if args.json {
        match serde_json::to_string_pretty(&agent) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: {e}");
                return 1;
            }
        }
    } else {
        print!("{}", render_detail(&agent));
    }
    0
}

/// Fill a spawn request from CLI arguments and stored credentials.
///
/// A stored bot supplies the bot token and, when no name was given, the
/// agent name. The stored Anthropic key is the fallback for `--key`.
pub fn resolve_spawn_request(
    args: &SpawnArgs,
    credentials: &Credentials,
) -> anyhow::Result<SpawnRequest> {
    let (bot_name, bot_token) = match (&args.bot, &args.bot_token) {
        (Some(name), _) => {
            let token = credentials
                .bot_token(name)
                .ok_or_else(|| anyhow::anyhow!("no stored bot named {name:?}"))?;
            (Some(name.clone()), Some(token.to_owned()))
        }
        (None, token) => (None, token.clone()),
    };

    let name = args
        .name
        .clone()
        .filter(|n| !n.trim().is_empty())
        .or(bot_name)
        .ok_or_else(|| anyhow::anyhow!("Agent name is required (use --name or --bot)"))?;
    let secondary_key = args
        .key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .or_else(|| credentials.default_secondary_key().map(str::to_owned))
        .unwrap_or_default();

    Ok(SpawnRequest { name, region: args.region, size: args.size, secondary_key, bot_token }
        .normalized())
}

/// Run `hedz spawn`. Returns a process exit code.
pub async fn spawn(app: &App, args: &SpawnArgs) -> i32 {
    let credentials = app.credentials.current().unwrap_or_default();
    let request = match resolve_spawn_request(args, &credentials) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let name = request.name.clone();
    let (region, size) = (request.region, request.size);

    match app.registry.spawn(request).await {
        Ok(()) => {
            println!(
                "{name} is being created in {} as {}. It may take 2-3 minutes to become available.",
                region.label(),
                size.label()
            );
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit_code(&e)
        }
    }
}

/// Run `hedz reboot`. Returns a process exit code.
pub async fn reboot(app: &App, args: &ServerArgs) -> i32 {
    match app.registry.reboot(args.server_id).await {
        Ok(()) => {
            println!("Agent {} is rebooting.", args.server_id);
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit_code(&e)
        }
    }
}

/// Run `hedz destroy`. Returns a process exit code.
pub async fn destroy(app: &App, args: &DestroyArgs) -> i32 {
    if !args.yes {
        eprintln!(
            "error: destroying agent {} cannot be undone; pass --yes to confirm",
            args.server_id
        );
        return 2;
    }
    match app.registry.destroy(args.server_id).await {
        Ok(()) => {
            println!("Agent {} destroyed.", args.server_id);
            0
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit_code(&e)
        }
    }
}

#[cfg(test)]
#[path = "agents_tests.rs"]
mod tests;
