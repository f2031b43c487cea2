// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup payload (`user_data`) rendered for new agents.

use crate::spawn::SpawnRequest;

/// Repository cloned onto new agents to install OpenClaw.
pub const DEFAULT_SPAWN_REPO: &str = "https://github.com/PeteBrabec/openclaw-spawn.git";

/// Renders the startup payload embedded in a create call.
pub trait BootstrapScript: Send + Sync {
    fn render(&self, request: &SpawnRequest) -> String;
}

impl<F> BootstrapScript for F
where
    F: Fn(&SpawnRequest) -> String + Send + Sync,
{
    fn render(&self, request: &SpawnRequest) -> String {
        self(request)
    }
}

/// Minimal cloud-init document that installs docker and runs the spawn script.
#[derive(Debug, Clone)]
pub struct CloudInit {
    pub repo_url: String,
}

impl Default for CloudInit {
    fn default() -> Self {
        Self { repo_url: DEFAULT_SPAWN_REPO.to_owned() }
    }
}

impl BootstrapScript for CloudInit {
    fn render(&self, request: &SpawnRequest) -> String {
        let mut secrets = format!("    ANTHROPIC_API_KEY={}\n", request.secondary_key);
        if let Some(ref token) = request.bot_token {
            secrets.push_str(&format!("    TELEGRAM_BOT_TOKEN={token}\n"));
        }
        secrets.push_str(&format!("    AGENT_NAME={}\n", request.name));

        format!(
            "#cloud-config
package_update: true
package_upgrade: true

packages:
  - docker.io
  - docker-compose

runcmd:
  - systemctl enable docker
  - systemctl start docker
  - |
    git clone {repo} /opt/openclaw-spawn
    cd /opt/openclaw-spawn

    cat > secrets.env << 'SECRETS_EOF'
{secrets}    SECRETS_EOF

    bash spawn.sh
",
            repo = self.repo_url,
        )
    }
}
