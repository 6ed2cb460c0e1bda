// ABOUTME: Profile listing command
// ABOUTME: Lists all profiles or those of one search, optionally filtered

use anyhow::Result;

use super::{output, Console};
use crate::remote::Profile;
use crate::selection::filter_profiles;

/// Fetches all profiles, or only those found by `search_id`.
pub async fn fetch(console: &Console, search_id: Option<i64>) -> Result<Vec<Profile>> {
    match search_id {
        Some(id) => console.client.search_profiles(id).await,
        None => console.client.profiles().await,
    }
}

pub async fn list(console: &Console, search_id: Option<i64>, filter: Option<&str>) -> Result<()> {
    let profiles = fetch(console, search_id).await?;
    let visible = filter_profiles(&profiles, filter.unwrap_or_default());
    tracing::debug!("{} of {} profiles match", visible.len(), profiles.len());

    output::print_profiles(&visible);
    Ok(())
}
