mod error;
pub mod models;
#[allow(clippy::module_inception)]
mod registry;
mod registry_store;
mod sqlite_registry_store;

pub use error::RegistryError;
pub use models::{
    EventEntry, EventFrequency, EventPayload, NewUser, SkillEntry, SkillFrequency, SkillPayload,
    UserPayload, UserProfile, UserUpdate,
};
pub use registry::{FrequencyFilter, Registry};
pub use registry_store::RegistryStore;
pub use sqlite_registry_store::SqliteRegistryStore;
