// ABOUTME: Login and logout commands
// ABOUTME: Stores or removes the session token on disk

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Password};

use super::Console;
use crate::session::Session;

pub async fn login(console: &mut Console, username: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()
            .context("Failed to read password")?,
    };

    let session = console.client.login(username, &password).await?;
    session.save(&console.config.session_path()?)?;
    console.session = session;

    tracing::info!("Logged in as {}", username);
    println!("Logged in as {}", username);
    Ok(())
}

pub fn logout(console: &mut Console) -> Result<()> {
    Session::clear(&console.config.session_path()?)?;
    console.session = Session::anonymous();
    println!("Logged out");
    Ok(())
}
