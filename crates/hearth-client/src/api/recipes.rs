//! Recipes API.

use serde_json::Value;

use crate::client::HearthClient;
use crate::error::Result;
use crate::types::{Id, ImportRecipeRequest, Recipe, RecipeInput};

/// Recipes API client.
pub struct RecipesApi {
    client: HearthClient,
}

impl RecipesApi {
    pub(crate) fn new(client: HearthClient) -> Self {
        Self { client }
    }

    /// List all recipes.
    pub async fn list(&self) -> Result<Vec<Recipe>> {
        self.client.get("recipes/").await
    }

    /// Get a recipe by ID.
    pub async fn get(&self, id: Id) -> Result<Recipe> {
        self.client.get(&format!("recipes/{}/", id)).await
    }

    /// Create a new recipe.
    pub async fn create(&self, recipe: &RecipeInput) -> Result<Recipe> {
        self.client.post("recipes/", recipe).await
    }

    /// Replace a recipe.
    pub async fn update(&self, id: Id, recipe: &RecipeInput) -> Result<Recipe> {
        self.client.put(&format!("recipes/{}/", id), recipe).await
    }

    /// Change selected fields of a recipe.
    pub async fn patch(&self, id: Id, fields: &Value) -> Result<Recipe> {
        self.client.patch(&format!("recipes/{}/", id), fields).await
    }

    /// Delete a recipe.
    pub async fn delete(&self, id: Id) -> Result<()> {
        self.client.delete(&format!("recipes/{}/", id)).await
    }

    /// Have the backend scrape a recipe from a web page.
    pub async fn import_from_url(&self, url: &str) -> Result<Recipe> {
        self.client
            .post("recipes/import_from_url/", &ImportRecipeRequest { url })
            .await
    }
}
