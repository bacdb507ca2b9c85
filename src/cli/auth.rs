use inquire::Text;

use super::Context;
use super::credentials::{SessionCredentials, delete_credentials, save_credentials};
use crate::session::SessionState;

const DEFAULT_REDIRECT: &str = "http://localhost:3000";

pub async fn run_auth_login(
    ctx: &Context,
    callback: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let mut gate = ctx.session_gate().await;
    let redirect_to = ctx
        .config
        .redirect_to
        .as_deref()
        .unwrap_or(DEFAULT_REDIRECT);

    let callback = if let Some(c) = callback {
        c
    } else if non_interactive {
        anyhow::bail!("--callback is required in non-interactive mode");
    } else {
        let url = gate
            .start_sign_in(&ctx.config.auth_provider, redirect_to)
            .await?;
        println!();
        println!("Open this URL in a browser to sign in:");
        println!();
        println!("  {url}");
        println!();
        Text::new("Paste the URL you were redirected to (or the access token):").prompt()?
    };

    let state = gate
        .complete_sign_in(&callback)
        .await
        .map_err(|e| anyhow::anyhow!("Sign-in failed: {e}"))?;
    let SessionState::Authenticated(session) = state else {
        anyhow::bail!("Sign-in failed: no session returned");
    };

    save_credentials(&SessionCredentials {
        service_url: ctx.config.service_url()?.to_string(),
        access_token: session.access_token.clone(),
    })?;

    println!();
    println!(
        "Logged in as {}",
        session.email().unwrap_or(session.user.id.as_str())
    );
    if gate.is_elevated() {
        println!("Admin access enabled.");
    }
    println!();
    Ok(())
}

pub async fn run_auth_logout(ctx: &Context) -> anyhow::Result<()> {
    let mut gate = ctx.session_gate().await;
    if let Err(e) = gate.sign_out().await {
        eprintln!("Error logging out: {e}");
    }

    println!();
    if delete_credentials()? {
        println!("Logged out successfully.");
    } else {
        println!("No credentials found.");
    }
    println!();
    Ok(())
}

pub async fn run_auth_status(ctx: &Context) -> anyhow::Result<()> {
    let gate = ctx.session_gate().await;
    match gate.state() {
        SessionState::Anonymous => println!("Not logged in."),
        SessionState::Authenticated(session) => {
            let who = session.email().unwrap_or(session.user.id.as_str());
            if gate.is_elevated() {
                println!("Logged in as {who} [Admin]");
            } else {
                println!("Logged in as {who}");
            }
        }
    }
    Ok(())
}
