//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{CatalogApi, EventsApi, MealPlansApi, MealSlotsApi, RecipesApi};
use crate::auth::{Authenticator, ExpiryLatch};
use crate::error::{Error, Result};
use crate::session::{NoopObserver, SessionClient, SessionObserver};
use crate::token_store::TokenStore;
use crate::transport::{ApiRequest, Transport};
use crate::types::{RegistrationRequest, TokenPair};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Hearth API client.
///
/// Provides typed access to the family organizer endpoints. Cloning is cheap
/// and clones share the session.
///
/// # Example
///
/// ```no_run
/// use hearth_client::HearthClient;
///
/// # async fn example() -> hearth_client::Result<()> {
/// let client = HearthClient::builder()
///     .base_url("http://localhost:8000/api")
///     .build()?;
///
/// client.login("alice", "secret").await?;
/// let events = client.events().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct HearthClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    session: SessionClient,
}

impl HearthClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client for the default local backend with an in-memory session.
    pub fn localhost() -> Result<Self> {
        Self::builder().build()
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &Url {
        self.session().base_url()
    }

    pub(crate) fn session(&self) -> &SessionClient {
        &self.inner.session
    }

    /// The token store backing this client's session.
    pub fn token_store(&self) -> &TokenStore {
        self.session().store()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    /// Log in with a username and password.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        self.session().authenticator().login(username, password).await
    }

    /// Register a new account and log into it.
    pub async fn register(&self, fields: &RegistrationRequest) -> Result<TokenPair> {
        self.session().authenticator().register(fields).await
    }

    /// Forget the stored session.
    pub fn logout(&self) -> Result<()> {
        self.session().authenticator().logout()
    }

    /// Whether an access token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.token_store().is_authenticated()
    }

    /// Name of the logged-in user, if any.
    pub fn username(&self) -> Option<String> {
        self.token_store().username()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the calendar events API.
    pub fn events(&self) -> EventsApi {
        EventsApi::new(self.clone())
    }

    /// Access the recipes API.
    pub fn recipes(&self) -> RecipesApi {
        RecipesApi::new(self.clone())
    }

    /// Access the meal plans API.
    pub fn meal_plans(&self) -> MealPlansApi {
        MealPlansApi::new(self.clone())
    }

    /// Access the meal slots API.
    pub fn meal_slots(&self) -> MealSlotsApi {
        MealSlotsApi::new(self.clone())
    }

    /// Access the recipe catalog lookups (categories, tags, ingredients).
    pub fn catalog(&self) -> CatalogApi {
        CatalogApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.session().execute(ApiRequest::get(path)).await?.json()
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = ApiRequest::get(path).query(query)?;
        self.session().execute(request).await?.json()
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::post(path).json(body)?;
        self.session().execute(request).await?.json()
    }

    /// Make a PUT request.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::put(path).json(body)?;
        self.session().execute(request).await?.json()
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = ApiRequest::patch(path).json(body)?;
        self.session().execute(request).await?.json()
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.session().execute(ApiRequest::delete(path)).await?;
        Ok(())
    }
}

/// Builder for creating a [`HearthClient`].
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    store: Option<TokenStore>,
    observer: Option<Arc<dyn SessionObserver>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .field("store", &self.store)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            store: None,
            observer: None,
        }
    }

    /// Set the API base URL (including any `/api` prefix).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Use the given token store. Defaults to an in-memory store.
    pub fn token_store(mut self, store: TokenStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Register the callback run when the session is lost for good.
    pub fn on_session_expired(mut self, observer: impl SessionObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<HearthClient> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if base_url.trim().is_empty() {
            return Err(Error::Config("base_url must not be empty".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("hearth-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        let transport = Transport::new(http, &base_url, self.timeout)?;
        let store = self.store.unwrap_or_else(TokenStore::in_memory);
        let auth = Authenticator::new(transport.clone(), store, ExpiryLatch::new());
        let observer = self
            .observer
            .unwrap_or_else(|| Arc::new(NoopObserver) as Arc<dyn SessionObserver>);

        Ok(HearthClient {
            inner: Arc::new(ClientInner {
                session: SessionClient::new(transport, auth, observer),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
