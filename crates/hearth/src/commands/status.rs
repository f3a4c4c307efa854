//! Status command - shows the configured backend and session state.

use anyhow::Result;
use clap::Args;
use console::Style;
use serde::Serialize;

use super::{Context, heading, print_json};

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Status response for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    api_url: String,
    session_file: String,
    authenticated: bool,
    username: Option<String>,
}

/// Run the status command. Does not contact the backend.
pub fn run(_args: StatusArgs, ctx: &Context) -> Result<()> {
    let output = StatusOutput {
        api_url: ctx.api_url.clone(),
        session_file: ctx.session_file.display().to_string(),
        authenticated: ctx.client.is_authenticated(),
        username: ctx.client.username(),
    };

    if ctx.json_output {
        return print_json(&output);
    }

    let green = Style::new().green();
    let red = Style::new().red();
    let dim = Style::new().dim();

    println!();
    heading("Hearth Status");
    println!();
    println!("  {} {}", dim.apply_to("API:"), output.api_url);
    if output.authenticated {
        println!(
            "  {} {}",
            dim.apply_to("Session:"),
            green.apply_to(format!(
                "● logged in as {}",
                output.username.as_deref().unwrap_or("unknown user")
            ))
        );
    } else {
        println!(
            "  {} {}",
            dim.apply_to("Session:"),
            red.apply_to("● not logged in")
        );
    }
    if ctx.verbose {
        println!("  {} {}", dim.apply_to("Session file:"), output.session_file);
    }
    if !output.authenticated {
        println!();
        println!("  {}", dim.apply_to("Log in with: hearth login <username>"));
    }
    println!();
    Ok(())
}
