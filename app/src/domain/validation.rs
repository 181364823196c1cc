//! Form field checks run before any collaborator is contacted.
//!
//! Every check is pure and synchronous. Screens decide when to run them:
//! the login screen validates on submit only, while the register screen
//! re-validates the email on every edit.

use std::sync::OnceLock;

use regex::Regex;

/// Domain suffix every accepted email address must carry.
pub const EMAIL_DOMAIN_SUFFIX: &str = "@gmail.com";
/// Minimum character count for a new account password.
pub const REGISTER_PASSWORD_MIN: usize = 8;
/// Maximum character count for a new account password.
pub const REGISTER_PASSWORD_MAX: usize = 20;

/// Message shown when an email lacks [`EMAIL_DOMAIN_SUFFIX`].
pub const EMAIL_SUFFIX_MESSAGE: &str = "Email must end with @gmail.com";
/// Message shown when the login password is blank.
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Password is required.";
/// Message shown when a new password fails the strength rules.
pub const WEAK_PASSWORD_MESSAGE: &str =
    "Password must be 8-20 characters, include uppercase, lowercase, and a special character.";
/// Message shown when the confirmation differs from the password.
pub const CONFIRMATION_MISMATCH_MESSAGE: &str = "Passwords do not match";

/// Result of a single field check.
///
/// # Examples
/// ```
/// use grocery_app::domain::validation::{validate_email, FieldCheck};
///
/// assert_eq!(validate_email("ada@gmail.com"), FieldCheck::Valid);
/// assert!(!validate_email("ada@example.com").is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldCheck {
    /// The value satisfies the rule.
    Valid,
    /// The value breaks the rule; carries the message to display.
    Invalid(&'static str),
}

impl FieldCheck {
    /// Whether the value passed.
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Message to display next to the field, if the check failed.
    pub const fn message(self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message),
        }
    }

    const fn from_rule(passed: bool, message: &'static str) -> Self {
        if passed {
            Self::Valid
        } else {
            Self::Invalid(message)
        }
    }
}

/// Accept addresses ending with [`EMAIL_DOMAIN_SUFFIX`]; nothing else is
/// inspected.
pub fn validate_email(email: &str) -> FieldCheck {
    FieldCheck::from_rule(email.ends_with(EMAIL_DOMAIN_SUFFIX), EMAIL_SUFFIX_MESSAGE)
}

/// Accept any non-empty login password.
pub fn validate_login_password(password: &str) -> FieldCheck {
    FieldCheck::from_rule(!password.is_empty(), PASSWORD_REQUIRED_MESSAGE)
}

/// Accept passwords of 8–20 characters containing a lowercase letter, an
/// uppercase letter, and a character that is not a letter, digit or
/// underscore.
pub fn validate_register_password(password: &str) -> FieldCheck {
    let length = password.chars().count();
    let within_bounds = (REGISTER_PASSWORD_MIN..=REGISTER_PASSWORD_MAX).contains(&length);
    let classes = password_class_regexes();
    let passed = within_bounds && classes.iter().all(|class| class.is_match(password));
    FieldCheck::from_rule(passed, WEAK_PASSWORD_MESSAGE)
}

/// Accept a confirmation identical to the password.
pub fn validate_confirmation(password: &str, confirmation: &str) -> FieldCheck {
    FieldCheck::from_rule(password == confirmation, CONFIRMATION_MISMATCH_MESSAGE)
}

static PASSWORD_CLASSES: OnceLock<[Regex; 3]> = OnceLock::new();

fn password_class_regexes() -> &'static [Regex; 3] {
    PASSWORD_CLASSES.get_or_init(|| {
        // Classes are ASCII; anything outside letters, digits and `_` counts as special.
        ["[a-z]", "[A-Z]", "[^A-Za-z0-9_]"].map(|pattern| {
            Regex::new(pattern)
                .unwrap_or_else(|error| panic!("password class regex failed to compile: {error}"))
        })
    })
}
