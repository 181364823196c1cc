//! Authentication primitives: submitted credentials and the identity the
//! session service hands back.
//!
//! Screens build [`Credentials`] only after their validation gate passes and
//! drop them as soon as the collaborator call resolves. Secrets are wrapped in
//! [`Zeroizing`] so their memory is wiped on drop.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when credential values are structurally unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was empty.
    EmptyEmail,
    /// Password was empty.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Email/password pair submitted to the session service.
///
/// ## Invariants
/// - `email` and `password` are non-empty.
/// - Both values keep caller-provided whitespace; the session service decides
///   how to treat it.
///
/// # Examples
/// ```
/// use grocery_app::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("ada@gmail.com", "Secret1!").unwrap();
/// assert_eq!(creds.email(), "ada@gmail.com");
/// assert_eq!(creds.password(), "Secret1!");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        if email.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }

        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used as the account key.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the user.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opaque bearer token issued by the session service.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Wrap a raw token string.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Borrow the raw token for transport headers.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Authenticated identity returned by sign-in and sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    email: String,
    token: SessionToken,
}

impl Identity {
    /// Build an identity from the service's response.
    pub fn new(email: impl Into<String>, token: SessionToken) -> Self {
        Self {
            email: email.into(),
            token,
        }
    }

    /// Email of the signed-in account, used for the welcome message.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Session token for authenticated collaborator calls.
    pub fn token(&self) -> &SessionToken {
        &self.token
    }
}
