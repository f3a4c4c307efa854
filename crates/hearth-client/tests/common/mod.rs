//! Shared helpers for the mock-backend tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use hearth_client::{HearthClient, TokenPair, TokenStore};
use wiremock::MockServer;

/// A client wired to a mock backend, plus handles to inspect it.
pub struct Harness {
    pub server: MockServer,
    pub client: HearthClient,
    pub store: TokenStore,
    expirations: Arc<AtomicUsize>,
}

impl Harness {
    pub async fn start() -> Self {
        Self::start_with(TokenStore::in_memory(), Duration::from_secs(30)).await
    }

    /// Start with a custom backing store and request timeout.
    pub async fn start_with(store: TokenStore, timeout: Duration) -> Self {
        let server = MockServer::start().await;
        let expirations = Arc::new(AtomicUsize::new(0));

        let counter = expirations.clone();
        let client = HearthClient::builder()
            .base_url(format!("{}/api", server.uri()))
            .timeout(timeout)
            .token_store(store.clone())
            .on_session_expired(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .build()
            .unwrap();

        Self {
            server,
            client,
            store,
            expirations,
        }
    }

    /// Start with a logged-in session.
    pub async fn logged_in(access: &str, refresh: &str) -> Self {
        let harness = Self::start().await;
        harness
            .store
            .save_session(
                &TokenPair {
                    access: access.to_string(),
                    refresh: refresh.to_string(),
                },
                "alice",
            )
            .unwrap();
        harness
    }

    /// How many times the session-expired callback ran.
    pub fn expirations(&self) -> usize {
        self.expirations.load(Ordering::SeqCst)
    }

    /// Requests the mock backend received for a path.
    pub async fn requests_to(&self, path: &str) -> Vec<wiremock::Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == path)
            .collect()
    }
}

/// Authorization header values carried by a request.
pub fn authorization_headers(request: &wiremock::Request) -> Vec<String> {
    request
        .headers
        .get_all("authorization")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

pub fn event_json(id: i64, title: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": null,
        "date": "2024-05-04",
        "time": "09:30:00",
        "assigned_to": "Sam",
    })
}
