//! Profile command handler

use anyhow::Result;
use colored::*;

use crate::config::{Config, ProfileStore};

/// List configured server profiles
pub fn list_profiles(config: &Config) -> Result<()> {
    let store = ProfileStore::load(&config.profiles_path)?;
    let profiles: Vec<_> = store.iter().collect();

    if profiles.is_empty() {
        println!("{}", "No profiles configured.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} profile(s):", profiles.len()).bold());
    for profile in profiles {
        println!("  {} {}", "▸".cyan(), profile.name.bold());
        println!("    URL:  {}", profile.url.dimmed());
        if let Some(user_name) = &profile.user_name {
            println!("    User: {}", user_name.dimmed());
        }
    }

    Ok(())
}
