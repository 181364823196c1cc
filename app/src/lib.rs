//! Grocery client library: screens, domain rules and backend adapters.

pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod screens;
pub mod telemetry;

pub use bootstrap::build_backend;
pub use config::AppSettings;
