//! Terminal permission prompt.
//!
//! Stands in for the platform permission dialog: when activity recognition
//! has not been granted, the user is asked on the terminal and a "yes" is
//! remembered in the config file.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use stepbase::config::Config;
use stepbase::permission::{Capability, PermissionGate, PermissionStatus};

/// Permission gate backed by the config file and a y/N prompt.
pub struct PromptPermissionGate {
    config: Config,
    granted: AtomicBool,
    interactive: bool,
}

impl PromptPermissionGate {
    /// Builds a gate that prompts only when stdin is a terminal.
    ///
    /// `stdin_in_use` marks stdin as already consumed for input, in which
    /// case there is no one left to answer and the gate never prompts.
    pub fn new(config: Config, stdin_in_use: bool) -> Self {
        let interactive = !stdin_in_use && io::stdin().is_terminal();
        Self::with_interactive(config, interactive)
    }

    /// Builds a gate with prompting explicitly on or off.
    pub fn with_interactive(config: Config, interactive: bool) -> Self {
        let granted = AtomicBool::new(config.permission_granted);
        Self {
            config,
            granted,
            interactive,
        }
    }

    fn remember_grant(&self) {
        let mut config = self.config.clone();
        config.permission_granted = true;
        if let Err(e) = config.save() {
            tracing::warn!("Failed to save permission grant: {e}");
        }
    }
}

impl PermissionGate for PromptPermissionGate {
    fn has_permission(&self, _capability: Capability) -> bool {
        self.granted.load(Ordering::SeqCst)
    }

    fn requires_runtime_grant(&self, _capability: Capability) -> bool {
        self.config.runtime_permission_required
    }

    async fn request(&self, capability: Capability) -> PermissionStatus {
        if !self.interactive {
            return PermissionStatus::Denied;
        }

        let question = format!("Allow stepbase to use {}?", capability.to_string().cyan());
        match prompt_yes_no(&question, false) {
            Ok(true) => {
                self.granted.store(true, Ordering::SeqCst);
                self.remember_grant();
                PermissionStatus::Granted
            }
            Ok(false) => PermissionStatus::Denied,
            Err(e) => {
                tracing::warn!("Permission prompt failed: {e}");
                PermissionStatus::Denied
            }
        }
    }
}

/// Asks a yes/no question on the terminal.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    print!("{prompt} {hint} ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();

    if input.is_empty() {
        return Ok(default);
    }

    match input.as_str() {
        "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Ok(default),
    }
}
