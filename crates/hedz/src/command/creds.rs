// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `hedz creds`: manage the stored Hetzner token, Anthropic key and bots.

use std::fmt::Write as _;

use crate::credential::store::CredentialStore;
use crate::credential::Credentials;

/// CLI arguments for `hedz creds`.
#[derive(Debug, clap::Args)]
pub struct CredsArgs {
    #[command(subcommand)]
    pub command: CredsCommand,
}

#[derive(Debug, clap::Subcommand)]
pub enum CredsCommand {
    /// Show stored credentials with secrets masked.
    Show,
    /// Store the Hetzner Cloud API token.
    SetToken(ValueArgs),
    /// Store the default Anthropic API key for new agents.
    SetKey(ValueArgs),
    /// Store a Telegram bot token under a name.
    AddBot(AddBotArgs),
    /// Forget a stored Telegram bot.
    RemoveBot(RemoveBotArgs),
    /// Delete all stored credentials.
    Clear,
}

#[derive(Debug, clap::Args)]
pub struct ValueArgs {
    /// Secret value.
    pub value: String,
}

#[derive(Debug, clap::Args)]
pub struct AddBotArgs {
    /// Bot name (case-sensitive).
    pub name: String,
    /// Bot token from @BotFather.
    pub token: String,
}

#[derive(Debug, clap::Args)]
pub struct RemoveBotArgs {
    /// Bot name (case-sensitive).
    pub name: String,
}

/// Run the `hedz creds` subcommand. Returns a process exit code.
pub async fn run(store: &CredentialStore, args: &CredsArgs) -> i32 {
    let result = match &args.command {
        CredsCommand::Show => {
            print!("{}", render(store.current().as_ref()));
            return 0;
        }
        CredsCommand::SetToken(v) => match required(&v.value, "token") {
            Ok(value) => store.update_token(value).await.map(|()| "Hetzner token saved."),
            Err(code) => return code,
        },
        CredsCommand::SetKey(v) => match required(&v.value, "key") {
            Ok(value) => store.update_secondary_key(value).await.map(|()| "Anthropic key saved."),
            Err(code) => return code,
        },
        CredsCommand::AddBot(a) => {
            let (name, token) = match (required(&a.name, "bot name"), required(&a.token, "token")) {
                (Ok(n), Ok(t)) => (n, t),
                (Err(code), _) | (_, Err(code)) => return code,
            };
            store.add_bot(name, token).await.map(|()| "Bot saved.")
        }
        CredsCommand::RemoveBot(r) => store.remove_bot(&r.name).await.map(|()| "Bot removed."),
        CredsCommand::Clear => store.clear().await.map(|()| "Credentials cleared."),
    };

    match result {
        Ok(msg) => {
            println!("{msg}");
            0
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            1
        }
    }
}

fn required<'a>(value: &'a str, what: &str) -> Result<&'a str, i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        eprintln!("error: {what} must not be empty");
        return Err(2);
    }
    Ok(trimmed)
}

/// Render stored credentials with every secret masked.
pub fn render(credentials: Option<&Credentials>) -> String {
    let Some(creds) = credentials else {
        return "No credentials stored. Start with `hedz creds set-token <TOKEN>`.\n".to_owned();
    };

    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {}", "Hetzner token", mask_or_unset(&creds.provider_token));
    let _ = writeln!(out, "{:<16} {}", "Anthropic key", mask_or_unset(&creds.secondary_key));
    if creds.bots.is_empty() {
        let _ = writeln!(out, "{:<16} none", "Telegram bots");
    } else {
        let _ = writeln!(out, "Telegram bots");
        for (name, token) in &creds.bots {
            let _ = writeln!(out, "  {:<14} {}", name, mask(token));
        }
    }
    out
}

fn mask_or_unset(secret: &str) -> String {
    if secret.trim().is_empty() {
        "(not set)".to_owned()
    } else {
        mask(secret)
    }
}

/// Keep the last four characters of long secrets; hide short ones entirely.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_owned();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
#[path = "creds_tests.rs"]
mod tests;
