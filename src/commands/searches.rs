// ABOUTME: Saved search management commands
// ABOUTME: CRUD over /api/searches plus per-search profiles and statistics

use anyhow::Result;

use super::{output, Console};
use crate::error::ConsoleError;
use crate::remote::{NewSearch, SearchUpdate};
use crate::selection::filter_profiles;

pub async fn list(console: &Console) -> Result<()> {
    let searches = console.client.searches().await?;
    output::print_searches(&searches);
    Ok(())
}

pub async fn show(console: &Console, search_id: i64) -> Result<()> {
    let search = console.client.search(search_id).await?;
    output::print_search(&search);
    Ok(())
}

pub async fn create(console: &Console, search: NewSearch) -> Result<()> {
    if search.name.trim().is_empty() || search.search_url.trim().is_empty() {
        return Err(ConsoleError::Validation("search name and URL are required".to_string()).into());
    }

    let created = console.client.create_search(&search).await?;
    tracing::info!("Created search {} ({})", created.id, created.name);
    output::print_search(&created);
    Ok(())
}

pub async fn update(console: &Console, search_id: i64, update: SearchUpdate) -> Result<()> {
    if update.name.is_none() && update.description.is_none() && update.status.is_none() {
        return Err(ConsoleError::Validation(
            "nothing to update: pass --name, --description or --status".to_string(),
        )
        .into());
    }

    let updated = console.client.update_search(search_id, &update).await?;
    output::print_search(&updated);
    Ok(())
}

pub async fn delete(console: &Console, search_id: i64) -> Result<()> {
    let message = console.client.delete_search(search_id).await?;
    tracing::info!("Deleted search {}", search_id);
    println!("{}", message);
    Ok(())
}

pub async fn profiles(console: &Console, search_id: i64, filter: Option<&str>) -> Result<()> {
    let profiles = console.client.search_profiles(search_id).await?;
    output::print_profiles(&filter_profiles(&profiles, filter.unwrap_or_default()));
    Ok(())
}

pub async fn statistics(console: &Console) -> Result<()> {
    let stats = console.client.search_statistics().await?;
    output::print_statistics(&stats);
    Ok(())
}
