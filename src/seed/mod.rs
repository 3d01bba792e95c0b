//! Startup seed loading.
//!
//! The server starts from a known dataset: all tables are dropped and
//! recreated, then every record from the seed file is inserted with its
//! nested skills. Duplicate emails within the pass follow a first-wins
//! policy — the whole colliding record, skills included, is skipped and the
//! skip is logged rather than surfaced as an error.

use crate::registry::{NewUser, RegistryStore, SkillEntry};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSkill {
    pub skill: String,
    pub rating: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub skills: Vec<SeedSkill>,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped_duplicates: usize,
}

pub fn load_seed_file<P: AsRef<Path>>(path: P) -> Result<Vec<SeedUser>> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("Failed to open seed dataset {:?}", path.as_ref()))?;
    let users: Vec<SeedUser> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse seed dataset {:?}", path.as_ref()))?;
    Ok(users)
}

/// Wipes the store and repopulates it from the given records.
pub fn seed_store(store: &dyn RegistryStore, users: &[SeedUser]) -> Result<SeedReport> {
    store.wipe()?;

    let mut report = SeedReport::default();
    let mut seen_emails: HashSet<&str> = HashSet::new();

    for user in users {
        if !seen_emails.insert(user.email.as_str()) {
            debug!("Skipping duplicate seed email {}", user.email);
            report.skipped_duplicates += 1;
            continue;
        }

        let new_user = NewUser {
            name: user.name.clone(),
            company: user.company.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
        };
        let skills: Vec<SkillEntry> = user
            .skills
            .iter()
            .map(|s| SkillEntry {
                skill: s.skill.clone(),
                rating: s.rating,
            })
            .collect();

        store
            .create_user_with_skills(&new_user, &skills)
            .with_context(|| format!("Failed to seed user {}", user.email))?;
        report.inserted += 1;
    }

    info!(
        "Seeded {} users ({} duplicate emails skipped)",
        report.inserted, report.skipped_duplicates
    );
    Ok(report)
}
