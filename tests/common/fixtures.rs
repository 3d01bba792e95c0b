//! Fixture files for end-to-end tests
//!
//! Each test server gets its own temp directory with a freshly written seed
//! dataset and events catalog, so tests never share state.

use super::constants::*;
use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;
use tempfile::TempDir;

/// Writes the seed dataset used by every test server.
///
/// The file intentionally contains a duplicate of Alice's email to exercise
/// the first-wins seeding policy.
pub fn create_seed_file(dir: &TempDir) -> Result<PathBuf> {
    let path = dir.path().join("seed_users.json");
    let users = json!([
        {
            "name": "Alice",
            "company": "Initech",
            "email": ALICE_EMAIL,
            "phone": "555-0100",
            "skills": [
                { "skill": "Python", "rating": 5 },
                { "skill": "SQL", "rating": 3 }
            ]
        },
        {
            "name": "Bob",
            "company": "Globex",
            "email": BOB_EMAIL,
            "phone": "555-0101",
            "skills": [
                { "skill": "Python", "rating": 4 }
            ]
        },
        {
            "name": "Carol",
            "company": "Initech",
            "email": CAROL_EMAIL,
            "phone": "555-0102",
            "skills": []
        },
        {
            "name": "Alice Impostor",
            "company": "Hooli",
            "email": ALICE_EMAIL,
            "phone": "555-0199",
            "skills": [
                { "skill": "Go", "rating": 1 }
            ]
        }
    ]);
    std::fs::write(&path, serde_json::to_string_pretty(&users)?)?;
    Ok(path)
}

/// Writes the registrable (event, category) pairs.
pub fn create_catalog_file(dir: &TempDir) -> Result<PathBuf> {
    let path = dir.path().join("events_catalog.json");
    let entries = json!([
        { "event": EVENT_OPENING, "category": CATEGORY_KEYNOTE },
        { "event": EVENT_RUST_WORKSHOP, "category": CATEGORY_WORKSHOP },
        { "event": EVENT_CAREER_FAIR, "category": CATEGORY_NETWORKING }
    ]);
    std::fs::write(&path, serde_json::to_string_pretty(&entries)?)?;
    Ok(path)
}
