//! Shared constants for end-to-end tests
//!
//! When the seed fixture or catalog fixture changes, update only this file
//! and `fixtures.rs`.

// ============================================================================
// Seeded Users
// ============================================================================

/// Seeded user with two skills
pub const ALICE_EMAIL: &str = "alice@example.com";

/// Seeded user with one skill
pub const BOB_EMAIL: &str = "bob@example.com";

/// Seeded user with no skills
pub const CAROL_EMAIL: &str = "carol@example.com";

/// Number of users in the seed fixture (after duplicate skipping)
pub const SEEDED_USER_COUNT: usize = 3;

// ============================================================================
// Catalog Entries
// ============================================================================

pub const EVENT_OPENING: &str = "Opening Ceremony";
pub const CATEGORY_KEYNOTE: &str = "Keynote";

pub const EVENT_RUST_WORKSHOP: &str = "Intro to Rust";
pub const CATEGORY_WORKSHOP: &str = "Workshop";

pub const EVENT_CAREER_FAIR: &str = "Career Fair";
pub const CATEGORY_NETWORKING: &str = "Networking";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the test server to start answering
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Poll interval while waiting for the server to come up
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 10;

/// Per-request timeout for test clients
pub const REQUEST_TIMEOUT_SECS: u64 = 5;
