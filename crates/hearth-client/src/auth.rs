//! Token issuance: login, registration and access-token refresh.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, FieldErrors, Result};
use crate::token_store::TokenStore;
use crate::transport::{ApiRequest, ApiResponse, Transport};
use crate::types::{
    Credentials, RefreshRequest, RefreshResponse, RegistrationRequest, RegistrationResponse,
    TokenPair,
};

const LOGIN_PATH: &str = "token/";
const REFRESH_PATH: &str = "token/refresh/";
const REGISTER_PATH: &str = "register/";

const DEFAULT_LOGIN_ERROR: &str = "Invalid username or password";

/// One-shot flag guarding the session-expired notification.
///
/// Set by the first escalation after a login; re-armed only by the next
/// successful login or registration.
#[derive(Debug, Clone, Default)]
pub struct ExpiryLatch {
    fired: Arc<AtomicBool>,
}

impl ExpiryLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` for exactly one caller until [`reset`](Self::reset).
    pub fn try_fire(&self) -> bool {
        self.fired
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    pub fn reset(&self) {
        self.fired.store(false, Ordering::Release);
    }
}

/// Exchanges credentials and refresh tokens for access tokens.
#[derive(Debug, Clone)]
pub struct Authenticator {
    transport: Transport,
    store: TokenStore,
    latch: ExpiryLatch,
}

impl Authenticator {
    pub fn new(transport: Transport, store: TokenStore, latch: ExpiryLatch) -> Self {
        Self {
            transport,
            store,
            latch,
        }
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    pub fn latch(&self) -> &ExpiryLatch {
        &self.latch
    }

    /// Log in and persist the issued token pair.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let credentials = Credentials::new(username, password);
        let tokens = self.request_tokens(&credentials).await?;
        self.start_session(&tokens, username)?;
        tracing::info!(username, "Logged in");
        Ok(tokens)
    }

    /// Create an account, then log into it.
    ///
    /// If the backend already returned tokens with the new account those are
    /// used directly and no separate login call is made.
    pub async fn register(&self, fields: &RegistrationRequest) -> Result<TokenPair> {
        let request = ApiRequest::post(REGISTER_PATH).json(fields)?;
        let response = self.transport.send(&request, None).await?;

        if !response.is_success() {
            return Err(registration_error(response));
        }
        tracing::info!(username = %fields.username, "Account created");

        let issued = response
            .json::<RegistrationResponse>()
            .ok()
            .and_then(RegistrationResponse::tokens);
        let tokens = match issued {
            Some(tokens) => tokens,
            None => {
                let credentials = Credentials::new(&fields.username, &fields.password);
                self.request_tokens(&credentials).await.map_err(|e| {
                    tracing::warn!(username = %fields.username, error = %e, "Login after registration failed");
                    Error::RegistrationSucceededLoginFailed {
                        username: fields.username.clone(),
                        source: Box::new(e),
                    }
                })?
            }
        };

        self.start_session(&tokens, &fields.username)?;
        Ok(tokens)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Does not touch the token store.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let request = ApiRequest::post(REFRESH_PATH).json(&RefreshRequest {
            refresh: refresh_token,
        })?;
        let response = self.transport.send(&request, None).await?;

        if !response.is_success() {
            return Err(Error::RefreshRejected {
                status: response.status().as_u16(),
                message: response.error_message(),
            });
        }

        let body: RefreshResponse = response.json().map_err(|e| Error::RefreshRejected {
            status: response.status().as_u16(),
            message: format!("Malformed refresh response: {}", e),
        })?;
        if body.access.is_empty() {
            return Err(Error::RefreshRejected {
                status: response.status().as_u16(),
                message: "Refresh response carried no access token".to_string(),
            });
        }
        Ok(body.access)
    }

    /// Forget the stored session.
    pub fn logout(&self) -> Result<()> {
        self.store.clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    async fn request_tokens(&self, credentials: &Credentials) -> Result<TokenPair> {
        let request = ApiRequest::post(LOGIN_PATH).json(credentials)?;
        let response = self.transport.send(&request, None).await?;

        if !response.is_success() {
            let message = response
                .json_value()
                .as_ref()
                .and_then(crate::error::extract_message)
                .unwrap_or_else(|| DEFAULT_LOGIN_ERROR.to_string());
            return Err(Error::InvalidCredentials(message));
        }

        response.json()
    }

    fn start_session(&self, tokens: &TokenPair, username: &str) -> Result<()> {
        self.store.save_session(tokens, username)?;
        self.latch.reset();
        Ok(())
    }
}

fn registration_error(response: ApiResponse) -> Error {
    if response.status().as_u16() == 400 {
        let errors = response
            .json_value()
            .map(|body| FieldErrors::from_body(&body))
            .unwrap_or_default();
        if !errors.is_empty() {
            return Error::Validation(errors);
        }
        return Error::Validation(FieldErrors::single(
            "non_field_errors",
            response.error_message(),
        ));
    }
    response.into_error()
}
