//! Meal plans API.

use crate::client::HearthClient;
use crate::error::Result;
use crate::types::{Id, MealPlan, MealPlanInput, MealSlot, MealSlotInput};

/// Meal plans API client.
pub struct MealPlansApi {
    client: HearthClient,
}

impl MealPlansApi {
    pub(crate) fn new(client: HearthClient) -> Self {
        Self { client }
    }

    /// List all meal plans.
    pub async fn list(&self) -> Result<Vec<MealPlan>> {
        self.client.get("meal-plans/").await
    }

    /// Get a meal plan, including its slots.
    pub async fn get(&self, id: Id) -> Result<MealPlan> {
        self.client.get(&format!("meal-plans/{}/", id)).await
    }

    /// Create a new meal plan.
    pub async fn create(&self, plan: &MealPlanInput) -> Result<MealPlan> {
        self.client.post("meal-plans/", plan).await
    }

    /// Replace a meal plan's own fields.
    pub async fn update(&self, id: Id, plan: &MealPlanInput) -> Result<MealPlan> {
        self.client.put(&format!("meal-plans/{}/", id), plan).await
    }

    /// Delete a meal plan.
    pub async fn delete(&self, id: Id) -> Result<()> {
        self.client.delete(&format!("meal-plans/{}/", id)).await
    }

    /// Add several slots to a plan in one request.
    ///
    /// The body is the bare JSON array of slots; the plan comes from the path.
    pub async fn bulk_create_slots(
        &self,
        id: Id,
        slots: &[MealSlotInput],
    ) -> Result<Vec<MealSlot>> {
        self.client
            .post(&format!("meal-plans/{}/bulk_create_slots/", id), slots)
            .await
    }
}
