//! HTTP client SDK for the Hearth family organizer.
//!
//! This crate provides a typed, session-aware client for the Hearth REST API:
//! calendar events, recipes, and meal plans.
//!
//! # Sessions
//!
//! Logging in stores an access/refresh token pair in a [`TokenStore`]. Every
//! request made through the domain APIs carries the stored access token. When
//! the backend answers 401 the client refreshes the access token once and
//! re-sends the request; if that is not possible the stored session is purged,
//! the `on_session_expired` callback runs, and the call fails with
//! [`Error::SessionExpired`].
//!
//! # Example
//!
//! ```no_run
//! use hearth_client::{HearthClient, Result, TokenStore};
//!
//! # async fn example() -> Result<()> {
//! let client = HearthClient::builder()
//!     .base_url("http://localhost:8000/api")
//!     .token_store(TokenStore::file("/tmp/hearth-session.json"))
//!     .on_session_expired(|| eprintln!("Please log in again"))
//!     .build()?;
//!
//! if !client.is_authenticated() {
//!     client.login("alice", "secret").await?;
//! }
//!
//! for event in client.events().list().await? {
//!     println!("{} {} {}", event.date, event.time, event.title);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Auth**: login, register, logout, token refresh
//! - **Events**: CRUD for calendar events
//! - **Recipes**: CRUD plus import from a URL
//! - **Meal plans**: CRUD plus bulk slot creation
//! - **Meal slots**: CRUD
//! - **Catalog**: categories, tags, ingredients

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod session;
pub mod token_store;
pub mod transport;
pub mod types;

pub use auth::{Authenticator, ExpiryLatch};
pub use client::{ClientBuilder, DEFAULT_BASE_URL, HearthClient};
pub use error::{Error, FieldErrors, Result};
pub use session::{NoopObserver, SessionClient, SessionObserver};
pub use token_store::{FileStore, KeyValueStore, MemoryStore, TokenStore};
pub use transport::{ApiRequest, ApiResponse, Transport};
pub use types::*;

pub use api::ListMealSlotsQuery;
