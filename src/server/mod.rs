pub mod config;
mod requests_logging;
pub mod server;
mod slowdown;
pub mod state;

pub use config::ServerConfig;
pub use requests_logging::{log_requests, RequestsLoggingLevel};
#[allow(unused_imports)] // Used under the slowdown feature
pub(self) use slowdown::slowdown_request;
#[allow(unused_imports)] // Used by main.rs
pub use server::run_server;
