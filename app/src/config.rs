//! Application configuration loaded via OrthoConfig.
//!
//! Every field is optional; accessors supply defaults so an empty
//! environment runs the in-memory backend.

use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::outbound::firebase::{DEFAULT_AUTH_ENDPOINT, DEFAULT_FIRESTORE_ENDPOINT};
use crate::screens::DEFAULT_REDIRECT_DELAY;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;

/// Which collaborator implementations to wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// Everything in process; nothing persists past exit.
    #[default]
    Memory,
    /// Hosted Firebase project over REST.
    Firebase,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "firebase" => Ok(Self::Firebase),
            _ => Err(ConfigError::UnknownBackend {
                value: value.to_owned(),
            }),
        }
    }
}

/// Invalid or missing configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `backend` names no known implementation.
    #[error("unknown backend `{value}`; expected `memory` or `firebase`")]
    UnknownBackend { value: String },
    /// A value the Firebase backend needs is absent.
    #[error("`{field}` is required when backend is `firebase`")]
    Missing { field: &'static str },
    /// An endpoint override is not a URL.
    #[error("`{field}` is not a valid URL: {message}")]
    InvalidUrl { field: &'static str, message: String },
    /// A duration is zero.
    #[error("`{field}` must be greater than zero")]
    ZeroDuration { field: &'static str },
}

/// Settings for the grocery client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GROCERY")]
pub struct AppSettings {
    /// Backend implementation: `memory` or `firebase`.
    pub backend: Option<String>,
    /// Firebase web API key.
    pub api_key: Option<String>,
    /// Firebase project id.
    pub project_id: Option<String>,
    /// Identity Toolkit origin override, e.g. an emulator.
    pub auth_endpoint: Option<String>,
    /// Firestore origin override, e.g. an emulator.
    pub firestore_endpoint: Option<String>,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: Option<u64>,
    /// Interval between Firestore list refreshes.
    pub poll_interval_ms: Option<u64>,
    /// Pause between a successful registration and the login redirect.
    pub redirect_delay_ms: Option<u64>,
}

impl AppSettings {
    /// Selected backend, defaulting to [`BackendKind::Memory`].
    ///
    /// # Errors
    /// Returns [`ConfigError::UnknownBackend`] for unrecognised names.
    pub fn backend(&self) -> Result<BackendKind, ConfigError> {
        self.backend
            .as_deref()
            .map_or(Ok(BackendKind::default()), BackendKind::from_str)
    }

    /// Firebase API key.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] when unset or blank.
    pub fn api_key(&self) -> Result<&str, ConfigError> {
        required(self.api_key.as_deref(), "api_key")
    }

    /// Firebase project id.
    ///
    /// # Errors
    /// Returns [`ConfigError::Missing`] when unset or blank.
    pub fn project_id(&self) -> Result<&str, ConfigError> {
        required(self.project_id.as_deref(), "project_id")
    }

    /// Identity Toolkit origin.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidUrl`] when the override does not parse.
    pub fn auth_endpoint(&self) -> Result<Url, ConfigError> {
        parse_url(
            self.auth_endpoint.as_deref().unwrap_or(DEFAULT_AUTH_ENDPOINT),
            "auth_endpoint",
        )
    }

    /// Firestore origin.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidUrl`] when the override does not parse.
    pub fn firestore_endpoint(&self) -> Result<Url, ConfigError> {
        parse_url(
            self.firestore_endpoint
                .as_deref()
                .unwrap_or(DEFAULT_FIRESTORE_ENDPOINT),
            "firestore_endpoint",
        )
    }

    /// HTTP request timeout.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroDuration`] for a zero override.
    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        non_zero(
            Duration::from_secs(
                self.request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            "request_timeout_secs",
        )
    }

    /// Firestore polling interval.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroDuration`] for a zero override.
    pub fn poll_interval(&self) -> Result<Duration, ConfigError> {
        non_zero(
            Duration::from_millis(self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS)),
            "poll_interval_ms",
        )
    }

    /// Redirect delay after registration. Zero is allowed.
    pub fn redirect_delay(&self) -> Duration {
        self.redirect_delay_ms
            .map_or(DEFAULT_REDIRECT_DELAY, Duration::from_millis)
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ConfigError> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or(ConfigError::Missing { field })
}

fn parse_url(value: &str, field: &'static str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|err| ConfigError::InvalidUrl {
        field,
        message: err.to_string(),
    })
}

fn non_zero(value: Duration, field: &'static str) -> Result<Duration, ConfigError> {
    if value.is_zero() {
        Err(ConfigError::ZeroDuration { field })
    } else {
        Ok(value)
    }
}
