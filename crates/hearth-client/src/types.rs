//! Request and response types for the Hearth API.
//!
//! These types mirror the backend's JSON contract. Resource types keep any
//! field they do not model in `extra`, so updating a resource never drops
//! data the backend added.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-assigned resource identifier.
pub type Id = i64;

// ─────────────────────────────────────────────────────────────────────────────
// Authentication
// ─────────────────────────────────────────────────────────────────────────────

/// Username/password pair. Never persisted.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Access/refresh token pair issued by `POST /token/`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl std::fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenPair").finish_non_exhaustive()
    }
}

/// Body of `POST /token/refresh/`.
#[derive(Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Response of `POST /token/refresh/`.
#[derive(Deserialize)]
pub(crate) struct RefreshResponse {
    pub access: String,
}

/// Account registration fields for `POST /register/`.
#[derive(Clone, Default, Serialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub password: String,
    /// Password confirmation; checked by the backend.
    pub password2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl std::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Response of `POST /register/`. Tokens are only present when the backend
/// logs the new account in directly.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RegistrationResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl RegistrationResponse {
    pub fn tokens(self) -> Option<TokenPair> {
        match (self.access, self.refresh) {
            (Some(access), Some(refresh)) if !access.is_empty() && !refresh.is_empty() => {
                Some(TokenPair { access, refresh })
            }
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

/// A calendar event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Id,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    /// Time of day (`HH:MM` or `HH:MM:SS`).
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields for creating or replacing an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInput {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    /// Fields carried over from the server copy.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&Event> for EventInput {
    fn from(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date,
            time: event.time.clone(),
            assigned_to: event.assigned_to.clone(),
            extra: event.extra.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recipes
// ─────────────────────────────────────────────────────────────────────────────

/// A recipe in the family catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Id,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Preparation time in minutes.
    #[serde(default)]
    pub prep_time: u32,
    /// Cooking time in minutes.
    #[serde(default)]
    pub cook_time: u32,
    #[serde(default)]
    pub servings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One ingredient line of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Ingredient reference: an id, a name, or a nested object.
    pub ingredient: Value,
    pub quantity: Value,
    #[serde(default, alias = "units")]
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub order: u32,
}

/// Fields for creating or replacing a recipe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecipeInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    pub instructions: String,
    #[serde(default)]
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&Recipe> for RecipeInput {
    fn from(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.clone(),
            description: recipe.description.clone(),
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            difficulty: recipe.difficulty.clone(),
            instructions: recipe.instructions.clone(),
            ingredients: recipe.ingredients.clone(),
            url: recipe.url.clone(),
            extra: recipe.extra.clone(),
        }
    }
}

/// Body of `POST /recipes/import_from_url/`.
#[derive(Debug, Serialize)]
pub(crate) struct ImportRecipeRequest<'a> {
    pub url: &'a str,
}

/// A named catalog entry (category, tag or ingredient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: Id,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Meal planning
// ─────────────────────────────────────────────────────────────────────────────

/// Meal of the day a slot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("unknown meal type '{}'", other)),
        }
    }
}

/// A meal plan spanning some days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    pub id: Id,
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub meal_slots: Vec<MealSlot>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields for creating or replacing a meal plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlanInput {
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A recipe scheduled for a meal on a given day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSlot {
    pub id: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_plan: Option<Id>,
    pub recipe: Value,
    pub date: NaiveDate,
    pub meal_type: MealType,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Fields for creating a meal slot.
///
/// `meal_plan` is required by `POST /meal-slots/` and ignored by the bulk
/// endpoint, which takes the plan from its path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealSlotInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_plan: Option<Id>,
    pub recipe: Id,
    pub date: NaiveDate,
    pub meal_type: MealType,
    #[serde(default = "default_servings")]
    pub servings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_servings() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_keeps_unknown_fields() {
        let event: Event = serde_json::from_value(json!({
            "id": 7,
            "title": "Soccer practice",
            "date": "2024-05-04",
            "time": "09:30:00",
            "assigned_to": "Sam",
            "user": 3,
        }))
        .unwrap();

        assert_eq!(event.id, 7);
        assert_eq!(event.date, NaiveDate::from_ymd_opt(2024, 5, 4).unwrap());
        assert!(event.description.is_none());
        assert_eq!(event.extra.get("user"), Some(&json!(3)));

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["user"], json!(3));
        assert!(back.get("description").is_none());
    }

    #[test]
    fn test_recipe_ingredient_accepts_units_alias() {
        let line: RecipeIngredient = serde_json::from_value(json!({
            "ingredient": "flour",
            "quantity": "2.50",
            "units": "cup",
            "order": 1,
        }))
        .unwrap();
        assert_eq!(line.unit, "cup");
        assert!(!line.optional);
    }

    #[test]
    fn test_meal_type_parsing() {
        assert_eq!("Dinner".parse::<MealType>().unwrap(), MealType::Dinner);
        assert!("brunch".parse::<MealType>().is_err());
        assert_eq!(
            serde_json::to_value(MealType::Breakfast).unwrap(),
            json!("breakfast")
        );
    }

    #[test]
    fn test_registration_response_tokens() {
        let with_tokens: RegistrationResponse =
            serde_json::from_value(json!({ "id": 1, "access": "A1", "refresh": "R1" })).unwrap();
        assert_eq!(
            with_tokens.tokens(),
            Some(TokenPair {
                access: "A1".into(),
                refresh: "R1".into()
            })
        );

        let account_only: RegistrationResponse =
            serde_json::from_value(json!({ "id": 1, "username": "alice" })).unwrap();
        assert!(account_only.tokens().is_none());
    }

    #[test]
    fn test_secrets_are_not_debug_printed() {
        let creds = Credentials::new("alice", "hunter2");
        let pair = TokenPair {
            access: "A1".into(),
            refresh: "R1".into(),
        };
        assert!(!format!("{:?}", creds).contains("hunter2"));
        assert!(!format!("{:?}", pair).contains("A1"));
    }
}
