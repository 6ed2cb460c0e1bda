// ABOUTME: Plain-text table rendering for profiles, searches and statistics
// ABOUTME: Missing values print as N/A

use crate::remote::{Profile, Search, SearchStatistics};
use crate::selection::ContactStatus;

const MISSING: &str = "N/A";

fn cell(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => MISSING,
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut short: String = value.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}

pub fn profile_line(profile: &Profile) -> String {
    format!(
        "{:>5}  {:<24}  {:<32}  {:<18}  {:<28}  {:<16}  {}",
        profile.id,
        truncate(cell(&profile.full_name), 24),
        truncate(cell(&profile.headline), 32),
        truncate(cell(&profile.location), 18),
        truncate(cell(&profile.email), 28),
        truncate(cell(&profile.mobile_number), 16),
        ContactStatus::of(profile),
    )
}

pub fn print_profiles(profiles: &[&Profile]) {
    if profiles.is_empty() {
        println!("No profiles to show. Run a scraping job to collect some.");
        return;
    }

    println!(
        "{:>5}  {:<24}  {:<32}  {:<18}  {:<28}  {:<16}  {}",
        "ID", "NAME", "HEADLINE", "LOCATION", "EMAIL", "PHONE", "STATUS"
    );
    for profile in profiles {
        println!("{}", profile_line(profile));
    }
    println!();
    println!("{} profile(s)", profiles.len());
}

pub fn print_searches(searches: &[Search]) {
    if searches.is_empty() {
        println!("No saved searches.");
        return;
    }

    println!("{:>5}  {:<28}  {:<8}  {:<20}  URL", "ID", "NAME", "STATUS", "CREATED");
    for search in searches {
        println!(
            "{:>5}  {:<28}  {:<8}  {:<20}  {}",
            search.id,
            truncate(&search.name, 28),
            cell(&search.status),
            cell(&search.created_at),
            search.search_url,
        );
    }
}

pub fn print_search(search: &Search) {
    println!("Search #{}", search.id);
    println!("  Name:        {}", search.name);
    println!("  Description: {}", cell(&search.description));
    println!("  URL:         {}", search.search_url);
    println!("  Status:      {}", cell(&search.status));
    println!("  Created:     {}", cell(&search.created_at));
    println!("  Updated:     {}", cell(&search.updated_at));
}

pub fn print_statistics(stats: &SearchStatistics) {
    println!("Searches:        {}", stats.total_searches);
    println!("Active searches: {}", stats.active_searches);
    println!("Unique profiles: {}", stats.unique_profiles);
    if !stats.top_searches.is_empty() {
        println!("Top searches:");
        for top in &stats.top_searches {
            println!("  {:<28} {}", truncate(&top.name, 28), top.count);
        }
    }
}
