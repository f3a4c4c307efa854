//! Session-aware request execution.
//!
//! Every domain request goes through [`SessionClient::execute`], which
//! attaches the stored access token, and on a 401 refreshes it once and
//! re-sends a clone of the original request. When the session cannot be
//! recovered the stored tokens are purged, the [`SessionObserver`] is told
//! (once per lost session), and the caller gets [`Error::SessionExpired`].
//!
//! ```text
//!  Unauthenticated ─┐
//!                   ├─> Sent ─> 2xx ─────────────> Success
//!  Attached ────────┘     ├──> other error ──────> passed through
//!                         └──> 401 ─┬─ no refresh token ─────────> Unrecoverable
//!                                   ├─ refresh fails ────────────> Unrecoverable
//!                                   └─ refreshed ─> resend clone ─┬─ 401 ─> Unrecoverable
//!                                                                 └─ anything else is final
//! ```

use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;
use tokio::sync::Mutex;
use url::Url;

use crate::auth::Authenticator;
use crate::error::{Error, Result};
use crate::token_store::TokenStore;
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Receives the "go back to login" signal when a session is lost.
pub trait SessionObserver: Send + Sync {
    /// Called at most once per lost session.
    fn session_expired(&self);
}

/// Observer that ignores the signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl SessionObserver for NoopObserver {
    fn session_expired(&self) {}
}

impl<F> SessionObserver for F
where
    F: Fn() + Send + Sync,
{
    fn session_expired(&self) {
        self()
    }
}

/// Sends requests with the stored access token, refreshing it on demand.
#[derive(Clone)]
pub struct SessionClient {
    transport: Transport,
    auth: Authenticator,
    observer: Arc<dyn SessionObserver>,
    refresh_gate: Arc<Mutex<()>>,
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient")
            .field("base_url", &self.transport.base_url().as_str())
            .field("authenticated", &self.store().is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionClient {
    pub fn new(
        transport: Transport,
        auth: Authenticator,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        Self {
            transport,
            auth,
            observer,
            refresh_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn base_url(&self) -> &Url {
        self.transport.base_url()
    }

    pub fn store(&self) -> &TokenStore {
        self.auth.store()
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// Send a request, handling the refresh-and-retry cycle.
    ///
    /// Returns the response for any 2xx status. Other failures are returned
    /// as errors unchanged; only 401 is handled here.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let sent_with = self.store().access_token();
        let response = self.transport.send(&request, sent_with.as_deref()).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return finish(response);
        }

        tracing::debug!(path = request.path(), "Request rejected with 401, refreshing");
        let access = match self.refreshed_access_token(sent_with.as_deref()).await {
            Ok(access) => access,
            Err(reason) => return Err(self.expire(&reason)),
        };

        let retry = request.clone();
        let response = self.transport.send(&retry, Some(&access)).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(self.expire("retried request was rejected"));
        }
        finish(response)
    }

    /// Obtain an access token to retry with after `rejected` got a 401.
    ///
    /// Refreshes are serialized; a task that waited on another task's refresh
    /// reuses the token it stored instead of refreshing again.
    async fn refreshed_access_token(
        &self,
        rejected: Option<&str>,
    ) -> std::result::Result<String, String> {
        let _gate = self.refresh_gate.lock().await;

        if let Some(rejected) = rejected
            && let Some(current) = self.store().access_token()
            && current != rejected
        {
            tracing::debug!("Access token already refreshed by a concurrent request");
            return Ok(current);
        }

        let refresh_token = self
            .store()
            .refresh_token()
            .ok_or_else(|| "no refresh token stored".to_string())?;

        let access = self
            .auth
            .refresh(&refresh_token)
            .await
            .map_err(|e| format!("refresh failed: {}", e))?;

        self.store()
            .set_access_token(&access)
            .map_err(|e| format!("could not store refreshed token: {}", e))?;
        tracing::info!("Access token refreshed");
        Ok(access)
    }

    /// Tear the session down and produce the terminal error.
    ///
    /// `SessionExpired` is only returned once the store is empty. When the
    /// purge fails the observer still fires and the `Store` error is returned.
    fn expire(&self, reason: &str) -> Error {
        let purged = self.store().clear();
        if self.auth.latch().try_fire() {
            tracing::warn!(reason, "Session expired");
            self.observer.session_expired();
        } else {
            tracing::debug!(reason, "Session already expired");
        }
        match purged {
            Ok(()) => Error::SessionExpired,
            Err(e) => {
                tracing::error!(error = %e, "Failed to purge stored session");
                e
            }
        }
    }
}

fn finish(response: ApiResponse) -> Result<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(response.into_error())
    }
}
