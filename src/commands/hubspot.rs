// ABOUTME: Contact selection and HubSpot export command
// ABOUTME: Contacts come from ids, --all, or an interactive multi-select

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, MultiSelect};

use super::{output, profiles, Console};
use crate::error::ConsoleError;
use crate::remote::Profile;
use crate::selection::{filter_profiles, ContactSelection};

#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    pub ids: Vec<i64>,
    pub all: bool,
    pub filter: Option<String>,
    pub search_id: Option<i64>,
}

pub async fn send(console: &Console, options: SendOptions) -> Result<()> {
    console.require_login()?;

    let profiles = profiles::fetch(console, options.search_id).await?;
    let visible = filter_profiles(&profiles, options.filter.as_deref().unwrap_or_default());
    let selection = select(&visible, &options)?;

    if selection.is_empty() {
        return Err(ConsoleError::Validation("no contacts selected".to_string()).into());
    }

    println!("Sending {} contact(s) to HubSpot...", selection.len());
    let result = console
        .client
        .send_to_hubspot(&console.session, selection.contacts())
        .await;

    if !result.success {
        return Err(ConsoleError::Application(result.message).into());
    }

    println!("{}", result.message);
    for failed in &result.failed_contacts {
        let name = failed.get("name").and_then(|v| v.as_str()).unwrap_or("N/A");
        let error = failed.get("error").and_then(|v| v.as_str()).unwrap_or("unknown error");
        println!("  failed: {} ({})", name, error);
    }
    Ok(())
}

fn select(visible: &[&Profile], options: &SendOptions) -> Result<ContactSelection> {
    let mut selection = ContactSelection::new();

    if options.all {
        selection.toggle_all(visible);
    } else if !options.ids.is_empty() {
        pick_ids(&mut selection, visible, &options.ids);
    } else if !visible.is_empty() {
        let labels: Vec<String> = visible.iter().map(|p| output::profile_line(p)).collect();
        let picked = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt("Select contacts (space to toggle, enter to confirm)")
            .items(&labels)
            .interact()
            .context("Failed to read contact selection")?;
        for index in picked {
            selection.toggle(visible[index]);
        }
    }

    Ok(selection)
}

fn pick_ids(selection: &mut ContactSelection, visible: &[&Profile], ids: &[i64]) {
    for id in ids {
        match visible.iter().find(|p| p.id == *id) {
            Some(profile) if !selection.is_selected(*id) => selection.toggle(profile),
            Some(_) => {}
            None => tracing::warn!("Profile {} is not in the current list, skipping", id),
        }
    }
}
