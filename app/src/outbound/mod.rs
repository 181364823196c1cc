//! Outbound adapters implementing the driven ports.
//!
//! `memory` keeps everything in process and mirrors the hosted backend's
//! observable rules; `firebase` talks to the hosted REST APIs.

pub mod firebase;
pub mod memory;
