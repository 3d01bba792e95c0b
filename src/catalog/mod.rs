//! The fixed catalog of valid events.
//!
//! Event registration is gated by this list: a request is only accepted when
//! its exact (event, category) pair appears here. The catalog is supplied as
//! a JSON file and loaded once at startup.

use crate::registry::EventEntry;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub struct EventCatalog {
    entries: Vec<EventEntry>,
}

impl EventCatalog {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open events catalog {:?}", path.as_ref()))?;
        let entries: Vec<EventEntry> = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse events catalog {:?}", path.as_ref()))?;
        info!("Loaded events catalog with {} entries", entries.len());
        Ok(EventCatalog { entries })
    }

    pub fn from_entries(entries: Vec<EventEntry>) -> Self {
        EventCatalog { entries }
    }

    pub fn contains(&self, event: &str, category: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.event == event && entry.category == category)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
