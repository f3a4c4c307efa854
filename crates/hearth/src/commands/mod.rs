//! CLI command handlers.

pub mod auth;
pub mod events;
pub mod meals;
pub mod recipes;
pub mod status;

use std::path::PathBuf;

use anyhow::Result;
use console::{Style, style};
use hearth_client::HearthClient;
use serde::Serialize;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Session-aware API client.
    pub client: HearthClient,
    /// Effective API base URL.
    pub api_url: String,
    /// Where the session is persisted.
    pub session_file: PathBuf,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a bold heading followed by a rule.
pub fn heading(title: &str) {
    let dim = Style::new().dim();
    println!("{}", style(title).bold());
    println!("{}", dim.apply_to("─".repeat(50)));
}

/// Print a green check mark and a message.
pub fn success(message: impl std::fmt::Display) {
    let green = Style::new().green();
    println!("{} {}", green.apply_to("✓"), message);
}

pub fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_chars {
        s
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
