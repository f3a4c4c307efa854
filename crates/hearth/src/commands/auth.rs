//! Login, registration and logout.

use std::io::BufRead;

use anyhow::{Result, bail};
use clap::Args;
use console::Style;
use hearth_client::{Error, FieldErrors, RegistrationRequest};
use serde::Serialize;

use super::{Context, print_json, success};

/// Arguments for the login command.
#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account name
    pub username: String,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

/// Arguments for the register command.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account name
    pub username: String,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// First name
    #[arg(long)]
    pub first_name: Option<String>,

    /// Last name
    #[arg(long)]
    pub last_name: Option<String>,

    /// Read the password from stdin instead of prompting (used for both fields)
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Debug, Serialize)]
struct SessionOutput<'a> {
    username: &'a str,
    authenticated: bool,
}

/// Run the login command.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let password = read_password("Password: ", args.password_stdin)?;
    ctx.client.login(&args.username, &password).await?;
    tracing::info!(username = %args.username, "Logged in");

    if ctx.json_output {
        print_json(&SessionOutput {
            username: &args.username,
            authenticated: true,
        })?;
    } else {
        success(format!("Logged in as {}", args.username));
    }
    Ok(())
}

/// Run the register command.
pub async fn register(args: RegisterArgs, ctx: &Context) -> Result<()> {
    let (password, password2) = if args.password_stdin {
        let password = read_password("", true)?;
        (password.clone(), password)
    } else {
        (
            read_password("Password: ", false)?,
            read_password("Confirm password: ", false)?,
        )
    };

    let request = RegistrationRequest {
        username: args.username.clone(),
        password,
        password2,
        email: args.email,
        first_name: args.first_name,
        last_name: args.last_name,
    };

    match ctx.client.register(&request).await {
        Ok(_) => {}
        Err(Error::Validation(errors)) => {
            print_field_errors(&errors);
            bail!("registration rejected");
        }
        Err(Error::RegistrationSucceededLoginFailed { username, source }) => {
            let yellow = Style::new().yellow();
            eprintln!(
                "{} Account '{}' was created, but logging in failed: {}",
                yellow.apply_to("!"),
                username,
                source
            );
            bail!("run `hearth login {}` to sign in", username);
        }
        Err(e) => return Err(e.into()),
    }

    if ctx.json_output {
        print_json(&SessionOutput {
            username: &args.username,
            authenticated: true,
        })?;
    } else {
        success(format!("Account created, logged in as {}", args.username));
    }
    Ok(())
}

/// Run the logout command.
pub fn logout(ctx: &Context) -> Result<()> {
    let was_logged_in = ctx.client.is_authenticated();
    ctx.client.logout()?;

    if ctx.json_output {
        print_json(&serde_json::json!({ "logged_out": was_logged_in }))?;
    } else if was_logged_in {
        success("Logged out");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

fn read_password(prompt: &str, from_stdin: bool) -> Result<String> {
    let password = if from_stdin {
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else {
        rpassword::prompt_password(prompt)?
    };
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}

fn print_field_errors(errors: &FieldErrors) {
    let red = Style::new().red();
    let dim = Style::new().dim();
    for (field, messages) in errors.iter() {
        for message in messages {
            if field == "non_field_errors" || field == "detail" {
                eprintln!("  {} {}", red.apply_to("✗"), message);
            } else {
                eprintln!("  {} {} {}", red.apply_to("✗"), dim.apply_to(field), message);
            }
        }
    }
}
