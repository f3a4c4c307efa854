//! Read-only recipe catalog lookups.

use crate::client::HearthClient;
use crate::error::Result;
use crate::types::CatalogEntry;

/// Catalog API client.
pub struct CatalogApi {
    client: HearthClient,
}

impl CatalogApi {
    pub(crate) fn new(client: HearthClient) -> Self {
        Self { client }
    }

    /// List recipe categories.
    pub async fn categories(&self) -> Result<Vec<CatalogEntry>> {
        self.client.get("categories/").await
    }

    /// List recipe tags.
    pub async fn tags(&self) -> Result<Vec<CatalogEntry>> {
        self.client.get("tags/").await
    }

    /// List known ingredients.
    pub async fn ingredients(&self) -> Result<Vec<CatalogEntry>> {
        self.client.get("ingredients/").await
    }
}
