//! API endpoint implementations.

mod catalog;
mod events;
mod meal_plans;
mod meal_slots;
mod recipes;

pub use catalog::CatalogApi;
pub use events::EventsApi;
pub use meal_plans::MealPlansApi;
pub use meal_slots::{ListMealSlotsQuery, MealSlotsApi};
pub use recipes::RecipesApi;
