//! Hackathon Registry Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod registry;
pub mod seed;
pub mod server;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog::EventCatalog;
pub use registry::{Registry, RegistryStore, SqliteRegistryStore};
pub use server::{run_server, RequestsLoggingLevel};
