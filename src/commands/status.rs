// ABOUTME: Backend health and email lookup commands

use anyhow::Result;

use super::Console;
use crate::error::ConsoleError;

pub async fn show(console: &Console) -> Result<()> {
    let status = console.client.backend_status().await?;

    println!("Backend:        {}", console.client.base_url());
    println!("Database found: {}", if status.database_exists { "yes" } else { "no" });
    if let Some(count) = status.profile_count {
        println!("Profiles:       {}", count);
    }
    if let Some(path) = &status.database_path {
        println!("Database path:  {}", path);
    }
    if let Some(error) = &status.error {
        println!("Error:          {}", error);
    }
    Ok(())
}

pub async fn email_search(console: &Console) -> Result<()> {
    println!("Looking up emails for unchecked profiles. This can take a while...");
    let response = console.client.run_email_search().await?;

    if response.status.as_deref() == Some("error") {
        let message = response
            .error
            .unwrap_or_else(|| "Email search failed".to_string());
        return Err(ConsoleError::Application(message).into());
    }

    println!(
        "{}",
        response
            .message
            .unwrap_or_else(|| "Email search finished".to_string())
    );
    Ok(())
}
