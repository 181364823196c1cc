//! Terminal front-end.
//!
//! Implements the navigation and notification ports for a line-oriented
//! console and drives the screens from typed commands.

mod command;
mod render;
mod session;
mod surfaces;

pub use command::{Command, CommandError, parse};
pub use session::ConsoleApp;
pub use surfaces::{ConsoleNavigator, ConsoleNotifier};
