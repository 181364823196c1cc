//! In-process adapters for local runs and tests.

mod item_store;
mod session_service;

pub use item_store::InMemoryItemStore;
pub use session_service::InMemorySessionService;
