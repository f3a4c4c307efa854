//! Calendar events API.

use crate::client::HearthClient;
use crate::error::Result;
use crate::types::{Event, EventInput, Id};

/// Events API client.
pub struct EventsApi {
    client: HearthClient,
}

impl EventsApi {
    pub(crate) fn new(client: HearthClient) -> Self {
        Self { client }
    }

    /// List all events.
    pub async fn list(&self) -> Result<Vec<Event>> {
        self.client.get("events/").await
    }

    /// Get an event by ID.
    pub async fn get(&self, id: Id) -> Result<Event> {
        self.client.get(&format!("events/{}/", id)).await
    }

    /// Create a new event.
    pub async fn create(&self, event: &EventInput) -> Result<Event> {
        self.client.post("events/", event).await
    }

    /// Replace an event.
    pub async fn update(&self, id: Id, event: &EventInput) -> Result<Event> {
        self.client.put(&format!("events/{}/", id), event).await
    }

    /// Delete an event.
    pub async fn delete(&self, id: Id) -> Result<()> {
        self.client.delete(&format!("events/{}/", id)).await
    }
}
