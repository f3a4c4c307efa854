//! Domain API tests: paths, methods and bodies sent to the backend.

mod common;

use chrono::NaiveDate;
use common::{Harness, authorization_headers, event_json};
use hearth_client::{
    EventInput, MealPlanInput, MealSlotInput, MealType, RecipeIngredient, RecipeInput,
};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn recipe_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "description": "Weeknight staple",
        "prep_time": 10,
        "cook_time": 25,
        "servings": 4,
        "difficulty": "easy",
        "instructions": "Boil. Stir. Serve.",
        "ingredients": [
            { "ingredient": { "id": 3, "name": "pasta" }, "quantity": "400", "units": "g", "order": 0 }
        ],
        "category": 2,
        "created_at": "2024-05-01T10:00:00Z",
    })
}

fn slot_json(id: i64, plan: i64, day: &str, meal_type: &str) -> serde_json::Value {
    json!({
        "id": id,
        "meal_plan": plan,
        "recipe": { "id": 7, "name": "Pasta" },
        "date": day,
        "meal_type": meal_type,
        "servings": 2,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_events_crud() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("GET"))
        .and(path("/api/events/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json(3, "Swim class")))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/events/3/"))
        .and(body_json(json!({
            "title": "Swim class (moved)",
            "date": "2024-05-04",
            "time": "10:30",
            "assigned_to": "Sam",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json(3, "Swim class (moved)")))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/events/3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    let event = h.client.events().get(3).await.unwrap();
    assert_eq!(event.date, date("2024-05-04"));
    assert_eq!(event.assigned_to.as_deref(), Some("Sam"));
    assert!(event.description.is_none());

    let mut input = EventInput::from(&event);
    input.title = "Swim class (moved)".to_string();
    input.time = "10:30".to_string();
    let updated = h.client.events().update(3, &input).await.unwrap();
    assert_eq!(updated.title, "Swim class (moved)");

    h.client.events().delete(3).await.unwrap();
}

#[tokio::test]
async fn test_event_create_sends_json_body() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/events/"))
        .and(body_json(json!({
            "title": "Dentist",
            "description": "Bring insurance card",
            "date": "2024-06-01",
            "time": "14:00",
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(event_json(11, "Dentist")))
        .expect(1)
        .mount(&h.server)
        .await;

    let created = h
        .client
        .events()
        .create(&EventInput {
            title: "Dentist".to_string(),
            description: Some("Bring insurance card".to_string()),
            date: date("2024-06-01"),
            time: "14:00".to_string(),
            assigned_to: None,
            extra: Default::default(),
        })
        .await
        .unwrap();

    assert_eq!(created.id, 11);
}

#[tokio::test]
async fn test_unknown_fields_are_kept() {
    let h = Harness::logged_in("A1", "R1").await;
    let mut body = event_json(5, "Soccer");
    body["location"] = json!("Field 4");
    Mock::given(method("GET"))
        .and(path("/api/events/5/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&h.server)
        .await;

    let event = h.client.events().get(5).await.unwrap();
    assert_eq!(event.extra.get("location"), Some(&json!("Field 4")));
}

#[tokio::test]
async fn test_event_update_resends_unknown_fields() {
    let h = Harness::logged_in("A1", "R1").await;
    let mut body = event_json(7, "Soccer");
    body["user"] = json!(3);
    body["location"] = json!("Field 4");
    Mock::given(method("GET"))
        .and(path("/api/events/7/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/events/7/"))
        .and(body_json(json!({
            "title": "Soccer finals",
            "date": "2024-05-04",
            "time": "09:30:00",
            "assigned_to": "Sam",
            "user": 3,
            "location": "Field 4",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(event_json(7, "Soccer finals")))
        .expect(1)
        .mount(&h.server)
        .await;

    let event = h.client.events().get(7).await.unwrap();
    let mut input = EventInput::from(&event);
    input.title = "Soccer finals".to_string();
    h.client.events().update(7, &input).await.unwrap();
}

// ─────────────────────────────────────────────────────────────────────────────
// Recipes and catalog
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_recipes_list_and_get() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("GET"))
        .and(path("/api/recipes/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([recipe_json(1, "Pasta"), recipe_json(2, "Soup")])),
        )
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recipes/1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipe_json(1, "Pasta")))
        .mount(&h.server)
        .await;

    let recipes = h.client.recipes().list().await.unwrap();
    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[1].name, "Soup");

    let recipe = h.client.recipes().get(1).await.unwrap();
    assert_eq!(recipe.cook_time, 25);
    assert_eq!(recipe.ingredients[0].unit, "g");
    assert_eq!(recipe.ingredients[0].ingredient["name"], "pasta");
    assert_eq!(recipe.extra.get("category"), Some(&json!(2)));
}

#[tokio::test]
async fn test_recipe_create_patch_and_delete() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/recipes/"))
        .and(body_json(json!({
            "name": "Pancakes",
            "prep_time": 5,
            "cook_time": 15,
            "servings": 4,
            "instructions": "Mix and fry.",
            "ingredients": [
                { "ingredient": "flour", "quantity": 200, "unit": "g", "optional": false, "order": 0 }
            ],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(recipe_json(8, "Pancakes")))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/recipes/8/"))
        .and(body_json(json!({ "servings": 6 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipe_json(8, "Pancakes")))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/recipes/8/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    let input = RecipeInput {
        name: "Pancakes".to_string(),
        prep_time: 5,
        cook_time: 15,
        servings: 4,
        instructions: "Mix and fry.".to_string(),
        ingredients: vec![RecipeIngredient {
            ingredient: json!("flour"),
            quantity: json!(200),
            unit: "g".to_string(),
            notes: None,
            optional: false,
            order: 0,
        }],
        ..Default::default()
    };
    let created = h.client.recipes().create(&input).await.unwrap();
    assert_eq!(created.id, 8);

    h.client
        .recipes()
        .patch(8, &json!({ "servings": 6 }))
        .await
        .unwrap();
    h.client.recipes().delete(8).await.unwrap();
}

#[tokio::test]
async fn test_recipe_update_resends_url_and_unknown_fields() {
    let h = Harness::logged_in("A1", "R1").await;
    let mut body = recipe_json(4, "Chili");
    body["url"] = json!("https://cooking.example.com/chili");
    Mock::given(method("GET"))
        .and(path("/api/recipes/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&h.server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/recipes/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipe_json(4, "Chili")))
        .expect(1)
        .mount(&h.server)
        .await;

    let recipe = h.client.recipes().get(4).await.unwrap();
    let mut input = RecipeInput::from(&recipe);
    input.servings = 8;
    h.client.recipes().update(4, &input).await.unwrap();

    let puts: Vec<_> = h
        .requests_to("/api/recipes/4/")
        .await
        .into_iter()
        .filter(|r| r.method.as_str() == "PUT")
        .collect();
    assert_eq!(puts.len(), 1);
    let sent: serde_json::Value = serde_json::from_slice(&puts[0].body).unwrap();
    assert_eq!(sent["servings"], json!(8));
    assert_eq!(sent["url"], json!("https://cooking.example.com/chili"));
    assert_eq!(sent["category"], json!(2));
    assert_eq!(sent["created_at"], json!("2024-05-01T10:00:00Z"));
}

#[tokio::test]
async fn test_recipe_import_from_url() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/recipes/import_from_url/"))
        .and(body_json(json!({ "url": "https://cooking.example.com/shakshuka" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(recipe_json(20, "Shakshuka")))
        .expect(1)
        .mount(&h.server)
        .await;

    let recipe = h
        .client
        .recipes()
        .import_from_url("https://cooking.example.com/shakshuka")
        .await
        .unwrap();
    assert_eq!(recipe.name, "Shakshuka");
}

#[tokio::test]
async fn test_recipe_validation_error_is_passed_through() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/recipes/import_from_url/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "Could not parse a recipe from that page" })),
        )
        .mount(&h.server)
        .await;

    let err = h
        .client
        .recipes()
        .import_from_url("https://example.com/blog")
        .await
        .unwrap_err();

    match err {
        hearth_client::Error::Api { status, message, .. } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Could not parse a recipe from that page");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(h.client.is_authenticated());
}

#[tokio::test]
async fn test_catalog_lookups() {
    let h = Harness::logged_in("A1", "R1").await;
    for (resource, name) in [
        ("categories", "Dinner"),
        ("tags", "vegetarian"),
        ("ingredients", "garlic"),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/api/{resource}/")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{ "id": 1, "name": name }])),
            )
            .expect(1)
            .mount(&h.server)
            .await;
    }

    let catalog = h.client.catalog();
    assert_eq!(catalog.categories().await.unwrap()[0].name, "Dinner");
    assert_eq!(catalog.tags().await.unwrap()[0].name, "vegetarian");
    assert_eq!(catalog.ingredients().await.unwrap()[0].name, "garlic");
}

// ─────────────────────────────────────────────────────────────────────────────
// Meal planning
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_meal_plan_create_and_get() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/meal-plans/"))
        .and(body_json(json!({ "name": "Week 23", "start_date": "2024-06-03" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 4,
            "name": "Week 23",
            "start_date": "2024-06-03",
            "meal_slots": [],
        })))
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/meal-plans/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "name": "Week 23",
            "start_date": "2024-06-03",
            "end_date": "2024-06-09",
            "meal_slots": [slot_json(30, 4, "2024-06-03", "dinner")],
        })))
        .mount(&h.server)
        .await;

    let plan = h
        .client
        .meal_plans()
        .create(&MealPlanInput {
            name: "Week 23".to_string(),
            start_date: date("2024-06-03"),
            notes: None,
        })
        .await
        .unwrap();
    assert!(plan.meal_slots.is_empty());

    let plan = h.client.meal_plans().get(4).await.unwrap();
    assert_eq!(plan.meal_slots.len(), 1);
    assert_eq!(plan.meal_slots[0].meal_type, MealType::Dinner);
    assert_eq!(plan.extra.get("end_date"), Some(&json!("2024-06-09")));
}

#[tokio::test]
async fn test_bulk_create_slots_posts_bare_array() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/meal-plans/4/bulk_create_slots/"))
        .and(body_json(json!([
            { "recipe": 7, "date": "2024-06-03", "meal_type": "dinner", "servings": 4 },
            { "recipe": 9, "date": "2024-06-04", "meal_type": "lunch", "servings": 1, "notes": "leftovers" },
        ])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            slot_json(31, 4, "2024-06-03", "dinner"),
            slot_json(32, 4, "2024-06-04", "lunch"),
        ])))
        .expect(1)
        .mount(&h.server)
        .await;

    let slots = vec![
        MealSlotInput {
            meal_plan: None,
            recipe: 7,
            date: date("2024-06-03"),
            meal_type: MealType::Dinner,
            servings: 4,
            notes: None,
        },
        MealSlotInput {
            meal_plan: None,
            recipe: 9,
            date: date("2024-06-04"),
            meal_type: MealType::Lunch,
            servings: 1,
            notes: Some("leftovers".to_string()),
        },
    ];

    let created = h.client.meal_plans().bulk_create_slots(4, &slots).await.unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[1].meal_type, MealType::Lunch);
    assert_eq!(created[1].meal_plan, Some(4));
}

#[tokio::test]
async fn test_meal_slots_filtered_by_plan() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("GET"))
        .and(path("/api/meal-slots/"))
        .and(query_param("meal_plan", "4"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([slot_json(31, 4, "2024-06-03", "breakfast")])),
        )
        .expect(1)
        .mount(&h.server)
        .await;

    let slots = h.client.meal_slots().list_for_plan(4).await.unwrap();
    assert_eq!(slots[0].meal_type, MealType::Breakfast);
    assert_eq!(slots[0].recipe["name"], "Pasta");
}

#[tokio::test]
async fn test_meal_slot_create_and_delete() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("POST"))
        .and(path("/api/meal-slots/"))
        .and(body_json(json!({
            "meal_plan": 4,
            "recipe": 7,
            "date": "2024-06-05",
            "meal_type": "snack",
            "servings": 1,
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(slot_json(40, 4, "2024-06-05", "snack")),
        )
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/meal-slots/40/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&h.server)
        .await;

    let slot = h
        .client
        .meal_slots()
        .create(&MealSlotInput {
            meal_plan: Some(4),
            recipe: 7,
            date: date("2024-06-05"),
            meal_type: MealType::Snack,
            servings: 1,
            notes: None,
        })
        .await
        .unwrap();
    h.client.meal_slots().delete(slot.id).await.unwrap();

    let deletes = h.requests_to("/api/meal-slots/40/").await;
    assert_eq!(authorization_headers(&deletes[0]), vec!["Bearer A1"]);
}

#[tokio::test]
async fn test_meal_plan_delete_missing_is_not_found() {
    let h = Harness::logged_in("A1", "R1").await;
    Mock::given(method("DELETE"))
        .and(path("/api/meal-plans/99/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found." })))
        .mount(&h.server)
        .await;

    let err = h.client.meal_plans().delete(99).await.unwrap_err();
    assert!(err.is_not_found());
}
