//! Meal slots API.

use crate::client::HearthClient;
use crate::error::Result;
use crate::types::{Id, MealSlot, MealSlotInput};

/// Query parameters for listing meal slots.
#[derive(Debug, Default, serde::Serialize)]
pub struct ListMealSlotsQuery {
    /// Only slots belonging to this plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal_plan: Option<Id>,
}

/// Meal slots API client.
pub struct MealSlotsApi {
    client: HearthClient,
}

impl MealSlotsApi {
    pub(crate) fn new(client: HearthClient) -> Self {
        Self { client }
    }

    /// List all meal slots.
    pub async fn list(&self) -> Result<Vec<MealSlot>> {
        self.client.get("meal-slots/").await
    }

    /// List the slots of one meal plan.
    pub async fn list_for_plan(&self, meal_plan: Id) -> Result<Vec<MealSlot>> {
        let query = ListMealSlotsQuery {
            meal_plan: Some(meal_plan),
        };
        self.client.get_with_query("meal-slots/", &query).await
    }

    /// Get a meal slot by ID.
    pub async fn get(&self, id: Id) -> Result<MealSlot> {
        self.client.get(&format!("meal-slots/{}/", id)).await
    }

    /// Create a meal slot. `slot.meal_plan` must be set.
    pub async fn create(&self, slot: &MealSlotInput) -> Result<MealSlot> {
        self.client.post("meal-slots/", slot).await
    }

    /// Replace a meal slot.
    pub async fn update(&self, id: Id, slot: &MealSlotInput) -> Result<MealSlot> {
        self.client.put(&format!("meal-slots/{}/", id), slot).await
    }

    /// Delete a meal slot.
    pub async fn delete(&self, id: Id) -> Result<()> {
        self.client.delete(&format!("meal-slots/{}/", id)).await
    }
}
