use serde::{Deserialize, Serialize};

/// A named skill with a self-assigned rating, owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub skill: String,
    pub rating: i64,
}

/// An event a user has checked into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEntry {
    pub event: String,
    pub category: String,
}

/// A registered user with their nested skills and events, as served on the
/// wire and as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub skills: Vec<SkillEntry>,
    pub events: Vec<EventEntry>,
}

/// The validated field set required to create a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
}

/// A partial-field update. `None` leaves the stored value untouched; a
/// `Some` skill list replaces the user's whole skill set.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<SkillEntry>>,
}

/// Inbound user registration/update body. Every field is optional at the
/// deserialization boundary; presence rules are enforced by the domain layer
/// so that missing fields produce a validation error instead of a 422.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<SkillPayload>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SkillPayload {
    pub skill: Option<String>,
    pub rating: Option<i64>,
}

/// Inbound event registration body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    pub event: Option<String>,
    pub category: Option<String>,
}

/// One row of the skills frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFrequency {
    pub skill: String,
    pub count: u64,
}

/// One row of the events frequency table. The category is the one of the
/// first-inserted row in the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFrequency {
    pub event: String,
    pub category: String,
    pub count: u64,
}
