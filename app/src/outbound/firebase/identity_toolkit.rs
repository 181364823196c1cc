//! Reqwest-backed session service for the Firebase Identity Toolkit API.
//!
//! Sign-in and sign-up are single POSTs keyed by the project's web API key.
//! The API reports failures as an error code in `error.message`; this adapter
//! owns the translation of those codes into [`SessionServiceError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use super::SessionSlot;
use super::dto::{ErrorEnvelopeDto, PasswordRequestDto, PasswordResponseDto};
use super::http::{body_preview, endpoint_url};
use crate::domain::ports::{SessionService, SessionServiceError};
use crate::domain::{Credentials, Identity, SessionToken};

const SIGN_IN_PATH: &str = "v1/accounts:signInWithPassword";
const SIGN_UP_PATH: &str = "v1/accounts:signUp";

/// Session service calling the hosted Identity Toolkit.
pub struct FirebaseSessionService {
    client: Client,
    sign_in_url: Url,
    sign_up_url: Url,
    session: SessionSlot,
}

impl FirebaseSessionService {
    /// Build the adapter for `endpoint` with an explicit request timeout.
    ///
    /// # Errors
    /// Returns an error when the endpoint cannot be extended with the API
    /// paths or the reqwest client cannot be constructed.
    pub fn new(
        endpoint: &Url,
        api_key: &str,
        timeout: Duration,
        session: SessionSlot,
    ) -> Result<Self, SessionServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SessionServiceError::unavailable(err.to_string()))?;
        Ok(Self {
            client,
            sign_in_url: keyed_url(endpoint, SIGN_IN_PATH, api_key)?,
            sign_up_url: keyed_url(endpoint, SIGN_UP_PATH, api_key)?,
            session,
        })
    }

    async fn exchange(
        &self,
        url: &Url,
        credentials: &Credentials,
    ) -> Result<Identity, SessionServiceError> {
        let response = self
            .client
            .post(url.clone())
            .json(&PasswordRequestDto {
                email: credentials.email(),
                password: credentials.password(),
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = Zeroizing::new(response.bytes().await.map_err(map_transport_error)?.to_vec());
        if !status.is_success() {
            return Err(map_error_response(status, &body));
        }

        let decoded: PasswordResponseDto = serde_json::from_slice(&body).map_err(|err| {
            SessionServiceError::unavailable(format!("invalid Identity Toolkit payload: {err}"))
        })?;
        let token = SessionToken::new(decoded.id_token);
        self.session.store(token.clone());
        let email = decoded
            .email
            .unwrap_or_else(|| credentials.email().to_owned());
        Ok(Identity::new(email, token))
    }
}

#[async_trait]
impl SessionService for FirebaseSessionService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity, SessionServiceError> {
        debug!("requesting password sign-in");
        self.exchange(&self.sign_in_url, credentials).await
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity, SessionServiceError> {
        debug!("requesting account creation");
        self.exchange(&self.sign_up_url, credentials).await
    }

    async fn sign_out(&self) -> Result<(), SessionServiceError> {
        // ID tokens are stateless; signing out forgets the local copy.
        self.session.clear();
        Ok(())
    }
}

fn keyed_url(endpoint: &Url, path: &str, api_key: &str) -> Result<Url, SessionServiceError> {
    let mut url = endpoint_url(endpoint, path).map_err(|err| {
        SessionServiceError::unavailable(format!("invalid Identity Toolkit endpoint: {err}"))
    })?;
    url.query_pairs_mut().append_pair("key", api_key);
    Ok(url)
}

fn map_transport_error(error: reqwest::Error) -> SessionServiceError {
    SessionServiceError::unavailable(error.to_string())
}

fn map_error_response(status: StatusCode, body: &[u8]) -> SessionServiceError {
    match serde_json::from_slice::<ErrorEnvelopeDto>(body) {
        Ok(envelope) => map_error_code(envelope.error.code()),
        Err(_) if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS => {
            SessionServiceError::unavailable(format!(
                "status {}: {}",
                status.as_u16(),
                body_preview(body)
            ))
        }
        Err(_) => SessionServiceError::unknown(format!("HTTP_{}", status.as_u16())),
    }
}

fn map_error_code(code: &str) -> SessionServiceError {
    match code {
        "EMAIL_NOT_FOUND" => SessionServiceError::user_not_found(),
        "INVALID_PASSWORD" => SessionServiceError::wrong_password(),
        "INVALID_EMAIL" => SessionServiceError::invalid_email(),
        "WEAK_PASSWORD" => SessionServiceError::weak_password(),
        "EMAIL_EXISTS" => SessionServiceError::email_already_in_use(),
        other => SessionServiceError::unknown(other),
    }
}
