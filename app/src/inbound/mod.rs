//! Inbound adapters driving the screens.

pub mod console;
