// ABOUTME: Profile filtering, contact status and contact selection bookkeeping
// ABOUTME: Pure in-memory helpers used before exporting contacts to HubSpot

use std::fmt;

use crate::remote::Profile;

/// Case-insensitive substring match over name, headline, location, email and
/// mobile number. An empty term keeps every profile.
pub fn filter_profiles<'a>(profiles: &'a [Profile], term: &str) -> Vec<&'a Profile> {
    let needle = term.trim().to_lowercase();
    profiles
        .iter()
        .filter(|profile| needle.is_empty() || matches_term(profile, &needle))
        .collect()
}

fn matches_term(profile: &Profile, needle: &str) -> bool {
    [
        &profile.full_name,
        &profile.headline,
        &profile.location,
        &profile.email,
        &profile.mobile_number,
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactStatus {
    Found,
    NoContact,
    Pending,
}

impl ContactStatus {
    pub fn of(profile: &Profile) -> Self {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|v| !v.is_empty());
        if present(&profile.email) || present(&profile.mobile_number) {
            ContactStatus::Found
        } else if profile.email_checked {
            ContactStatus::NoContact
        } else {
            ContactStatus::Pending
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            ContactStatus::Found => "contact found",
            ContactStatus::NoContact => "no contact",
            ContactStatus::Pending => "pending",
        };
        f.write_str(label)
    }
}

/// Selected contacts in the order they were picked, unique by profile id.
#[derive(Debug, Clone, Default)]
pub struct ContactSelection {
    contacts: Vec<Profile>,
}

impl ContactSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn contacts(&self) -> &[Profile] {
        &self.contacts
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.contacts.iter().any(|c| c.id == id)
    }

    /// Adds the profile, or removes it if it was already selected.
    pub fn toggle(&mut self, profile: &Profile) {
        if self.is_selected(profile.id) {
            self.contacts.retain(|c| c.id != profile.id);
        } else {
            self.contacts.push(profile.clone());
        }
    }

    pub fn all_selected(&self, visible: &[&Profile]) -> bool {
        !visible.is_empty() && visible.iter().all(|p| self.is_selected(p.id))
    }

    /// Clears the selection when every visible profile is already selected,
    /// otherwise replaces it with all visible profiles.
    pub fn toggle_all(&mut self, visible: &[&Profile]) {
        if self.all_selected(visible) {
            self.clear();
        } else {
            self.contacts = visible.iter().map(|p| (*p).clone()).collect();
        }
    }

    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}
