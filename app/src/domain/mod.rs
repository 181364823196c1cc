//! Domain primitives, validation rules and ports.
//!
//! Purpose: define the strongly typed values the screens exchange with the
//! hosted backend, the pure field checks that gate every submission, and the
//! port traits adapters implement. Nothing here performs I/O.
//!
//! Public surface:
//! - Credentials / Identity (alias to `auth::*`): sign-in inputs and results.
//! - GroceryItem / Snapshot (alias to `grocery::*`): list model.
//! - Failure (alias to `error::Failure`): user-facing failure taxonomy.
//! - Route / Transition / NavigationStack: navigation surface.
//! - validation: field checks shared by the screens.

pub mod auth;
pub mod error;
pub mod grocery;
pub mod navigation;
pub mod notice;
pub mod ports;
pub mod rejection;
pub mod validation;

pub use self::auth::{Credentials, CredentialsValidationError, Identity, SessionToken};
pub use self::error::{Failure, FailureKind, FailureValidationError};
pub use self::grocery::{
    GROCERIES_COLLECTION, GroceryItem, ItemDraft, ItemId, ItemIdValidationError, ItemOrder,
    ItemPatch, Snapshot, parse_quantity,
};
pub use self::navigation::{NavigationStack, Route, Transition};
pub use self::notice::{Notice, NoticeLevel};
pub use self::rejection::{SignInRejection, SignUpRejection};
pub use self::validation::FieldCheck;
