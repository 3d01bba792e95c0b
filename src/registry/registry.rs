use super::error::RegistryError;
use super::models::{
    EventEntry, EventFrequency, EventPayload, NewUser, SkillEntry, SkillFrequency, SkillPayload,
    UserPayload, UserProfile, UserUpdate,
};
use super::registry_store::RegistryStore;
use crate::catalog::EventCatalog;
use std::sync::Arc;
use tracing::debug;

/// Optional post-aggregation bounds on a frequency table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrequencyFilter {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl FrequencyFilter {
    fn keeps(&self, count: u64) -> bool {
        if let Some(min) = self.min {
            if count < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if count > max {
                return false;
            }
        }
        true
    }
}

/// The domain rules of the registry: validation and mutation for users,
/// skills and events, plus the filtered frequency queries. All storage goes
/// through the injected [`RegistryStore`].
pub struct Registry {
    store: Arc<dyn RegistryStore>,
    catalog: EventCatalog,
}

impl Registry {
    pub fn new(store: Arc<dyn RegistryStore>, catalog: EventCatalog) -> Self {
        Registry { store, catalog }
    }

    pub fn store(&self) -> &Arc<dyn RegistryStore> {
        &self.store
    }

    pub fn list_users(&self) -> Result<Vec<UserProfile>, RegistryError> {
        Ok(self.store.get_all_users()?)
    }

    pub fn get_user(&self, email: &str) -> Result<UserProfile, RegistryError> {
        self.store
            .get_user_by_email(email)?
            .ok_or_else(|| user_not_found(email))
    }

    /// Registers a new user. Skill entries are validated before anything is
    /// written, and the user plus skill rows are committed in one
    /// transaction, so a rejected request leaves the store untouched.
    pub fn register_user(&self, payload: &UserPayload) -> Result<String, RegistryError> {
        let user = NewUser {
            name: required_field(&payload.name)?,
            company: required_field(&payload.company)?,
            email: required_field(&payload.email)?,
            phone: required_field(&payload.phone)?,
        };

        let skills = match &payload.skills {
            Some(entries) => validate_skills(entries)?,
            None => Vec::new(),
        };

        if self.store.get_user_by_email(&user.email)?.is_some() {
            return Err(RegistryError::Conflict(format!(
                "User '{}' already exists",
                user.email
            )));
        }

        let user_id = self.store.create_user_with_skills(&user, &skills)?;
        debug!("Registered user {} with id {}", user.email, user_id);
        Ok(format!("User '{}' was successfully registered", user.email))
    }

    /// Partial-field update. Present fields replace stored values; a present
    /// skill list purges and replaces the whole skill set. An email change is
    /// rejected when the new email is already taken.
    pub fn update_user(&self, email: &str, payload: &UserPayload) -> Result<String, RegistryError> {
        let user = self
            .store
            .get_user_by_email(email)?
            .ok_or_else(|| user_not_found(email))?;

        let mut update = UserUpdate {
            name: present_field(&payload.name),
            company: present_field(&payload.company),
            email: None,
            phone: present_field(&payload.phone),
            skills: None,
        };

        if let Some(new_email) = present_field(&payload.email) {
            if new_email != user.email && self.store.get_user_by_email(&new_email)?.is_some() {
                return Err(RegistryError::Conflict(format!(
                    "Update failed, user with email '{}' already exists",
                    new_email
                )));
            }
            update.email = Some(new_email);
        }

        if let Some(entries) = &payload.skills {
            update.skills = Some(validate_skills(entries)?);
        }

        self.store.update_user(user.id, &update)?;
        Ok(format!("User '{}' was successfully updated", email))
    }

    pub fn delete_user(&self, email: &str) -> Result<String, RegistryError> {
        if !self.store.delete_user(email)? {
            return Err(user_not_found(email));
        }
        Ok(format!("User '{}' was successfully deleted", email))
    }

    pub fn list_user_events(&self, email: &str) -> Result<Vec<EventEntry>, RegistryError> {
        let user = self
            .store
            .get_user_by_email(email)?
            .ok_or_else(|| user_not_found(email))?;
        Ok(self.store.get_user_events(user.id)?)
    }

    /// Registers a user to an event. The (event, category) pair must be in
    /// the catalog, and a user cannot register twice for the same pair.
    pub fn register_event(
        &self,
        email: &str,
        payload: &EventPayload,
    ) -> Result<String, RegistryError> {
        let user = self
            .store
            .get_user_by_email(email)?
            .ok_or_else(|| user_not_found(email))?;

        let event = required_field(&payload.event)?;
        let category = required_field(&payload.category)?;

        if !self.catalog.contains(&event, &category) {
            return Err(RegistryError::Validation(
                "Invalid event data in body".to_string(),
            ));
        }

        if self.store.has_user_event(user.id, &event, &category)? {
            return Err(RegistryError::Conflict(format!(
                "User '{}' is already registered to event",
                email
            )));
        }

        self.store.add_user_event(user.id, &event, &category)?;
        Ok(format!("Successfully registered event to user '{}'", email))
    }

    pub fn skills_frequency(
        &self,
        filter: FrequencyFilter,
    ) -> Result<Vec<SkillFrequency>, RegistryError> {
        let mut frequencies = self.store.skill_frequencies()?;
        frequencies.retain(|f| filter.keeps(f.count));
        Ok(frequencies)
    }

    pub fn events_frequency(
        &self,
        category: Option<&str>,
        filter: FrequencyFilter,
    ) -> Result<Vec<EventFrequency>, RegistryError> {
        let mut frequencies = self.store.event_frequencies()?;
        if let Some(category) = category {
            frequencies.retain(|f| f.category == category);
        }
        frequencies.retain(|f| filter.keeps(f.count));
        Ok(frequencies)
    }
}

fn user_not_found(email: &str) -> RegistryError {
    RegistryError::NotFound(format!("User '{}' does not exist", email))
}

/// A required body field: must be present and non-empty.
fn required_field(field: &Option<String>) -> Result<String, RegistryError> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(RegistryError::Validation(
            "Missing fields in body".to_string(),
        )),
    }
}

/// An optional body field: empty strings are treated as absent.
fn present_field(field: &Option<String>) -> Option<String> {
    field
        .as_ref()
        .filter(|value| !value.trim().is_empty())
        .cloned()
}

fn validate_skills(entries: &[SkillPayload]) -> Result<Vec<SkillEntry>, RegistryError> {
    entries
        .iter()
        .map(|entry| match (&entry.skill, entry.rating) {
            (Some(skill), Some(rating)) if !skill.trim().is_empty() => Ok(SkillEntry {
                skill: skill.clone(),
                rating,
            }),
            _ => Err(RegistryError::Validation(
                "Invalid skill entry provided".to_string(),
            )),
        })
        .collect()
}
