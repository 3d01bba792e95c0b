use super::models::{
    EventEntry, EventFrequency, NewUser, SkillEntry, SkillFrequency, UserProfile, UserUpdate,
};
use anyhow::Result;

/// Storage seam for the registry. All reads and writes go through this trait,
/// so the domain rules can be exercised against any backing store.
pub trait RegistryStore: Send + Sync {
    /// Returns all users with their nested skills and events, ordered by id.
    /// Returns Err if there is a database error.
    fn get_all_users(&self) -> Result<Vec<UserProfile>>;

    /// Returns a user with their nested skills and events, looked up by email.
    /// Returns Ok(None) if the user does not exist.
    /// Returns Err if there is a database error.
    fn get_user_by_email(&self, email: &str) -> Result<Option<UserProfile>>;

    /// Creates a user row and its skill rows in a single transaction, so a
    /// failure never leaves a half-registered user. Returns the new user id.
    fn create_user_with_skills(&self, user: &NewUser, skills: &[SkillEntry]) -> Result<i64>;

    /// Applies a partial-field update. A `Some` skill list purges the user's
    /// existing skill rows and inserts the new set; everything runs in a
    /// single transaction.
    fn update_user(&self, user_id: i64, update: &UserUpdate) -> Result<()>;

    /// Deletes a user by email; skill and event rows go with it via cascade.
    /// Returns false if no user had that email.
    fn delete_user(&self, email: &str) -> Result<bool>;

    /// Returns the user's events, ordered by insertion.
    fn get_user_events(&self, user_id: i64) -> Result<Vec<EventEntry>>;

    /// Returns whether the user is already registered for the exact
    /// (event, category) pair.
    fn has_user_event(&self, user_id: i64, event: &str, category: &str) -> Result<bool>;

    /// Registers the user to the event.
    fn add_user_event(&self, user_id: i64, event: &str, category: &str) -> Result<()>;

    /// Skill rows grouped by skill name with occurrence counts, ordered
    /// descending by count (name-ascending on ties).
    fn skill_frequencies(&self) -> Result<Vec<SkillFrequency>>;

    /// Event rows grouped by event name with occurrence counts, ordered
    /// descending by count (name-ascending on ties). The retained category
    /// per group is that of the first-inserted row.
    fn event_frequencies(&self) -> Result<Vec<EventFrequency>>;

    /// Drops and recreates all tables. Used by the seed loader before a
    /// repopulation pass.
    fn wipe(&self) -> Result<()>;
}
