//! Recipes command - recipe catalog management.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use hearth_client::{CatalogEntry, Id, Recipe, RecipeIngredient, RecipeInput};
use serde_json::Value;

use super::{Context, heading, print_json, success, truncate};

/// Arguments for the recipes command.
#[derive(Args, Debug)]
pub struct RecipesArgs {
    #[command(subcommand)]
    pub command: RecipesCommand,
}

#[derive(Subcommand, Debug)]
pub enum RecipesCommand {
    /// List recipes
    List {
        /// Only recipes whose name contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a recipe with its ingredients and instructions
    Show {
        /// Recipe ID
        id: Id,
    },

    /// Add a recipe
    Add {
        /// Recipe name
        name: String,

        #[arg(long)]
        description: Option<String>,

        /// Preparation time in minutes
        #[arg(long, default_value = "0")]
        prep_time: u32,

        /// Cooking time in minutes
        #[arg(long, default_value = "0")]
        cook_time: u32,

        #[arg(long, default_value = "1")]
        servings: u32,

        /// easy, medium or hard
        #[arg(long)]
        difficulty: Option<String>,

        #[arg(long, default_value = "")]
        instructions: String,

        /// Ingredient as NAME[:QUANTITY[:UNIT]] (repeatable)
        #[arg(short, long = "ingredient", value_parser = parse_ingredient)]
        ingredients: Vec<RecipeIngredient>,
    },

    /// Delete a recipe
    Delete {
        /// Recipe ID
        id: Id,
    },

    /// Import a recipe from a web page
    Import {
        /// Page URL
        url: String,
    },

    /// List recipe categories
    Categories,

    /// List recipe tags
    Tags,

    /// List known ingredients
    Ingredients,
}

/// Run the recipes command.
pub async fn run(args: RecipesArgs, ctx: &Context) -> Result<()> {
    let recipes = ctx.client.recipes();

    match args.command {
        RecipesCommand::List { search } => {
            let needle = search.map(|s| s.to_lowercase());
            let mut list: Vec<Recipe> = recipes
                .list()
                .await?
                .into_iter()
                .filter(|r| {
                    needle
                        .as_deref()
                        .is_none_or(|n| r.name.to_lowercase().contains(n))
                })
                .collect();
            list.sort_by_key(|r| r.name.to_lowercase());

            if ctx.json_output {
                return print_json(&list);
            }
            heading("Recipes");
            if list.is_empty() {
                println!("{}", Style::new().dim().apply_to("No recipes found"));
            }
            for recipe in &list {
                print_recipe_line(recipe);
            }
        }
        RecipesCommand::Show { id } => {
            let recipe = recipes.get(id).await?;
            if ctx.json_output {
                return print_json(&recipe);
            }
            print_recipe(&recipe);
        }
        RecipesCommand::Add {
            name,
            description,
            prep_time,
            cook_time,
            servings,
            difficulty,
            instructions,
            mut ingredients,
        } => {
            for (order, ingredient) in ingredients.iter_mut().enumerate() {
                ingredient.order = order as u32;
            }
            let input = RecipeInput {
                name,
                description,
                prep_time,
                cook_time,
                servings,
                difficulty,
                instructions,
                ingredients,
                ..Default::default()
            };
            let recipe = recipes.create(&input).await?;
            if ctx.json_output {
                return print_json(&recipe);
            }
            success(format!("Recipe created: {} [#{}]", recipe.name, recipe.id));
        }
        RecipesCommand::Delete { id } => {
            recipes.delete(id).await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            success(format!("Recipe #{} deleted", id));
        }
        RecipesCommand::Import { url } => {
            if ctx.verbose {
                println!("{}", Style::new().dim().apply_to(format!("Importing {}", url)));
            }
            let recipe = recipes.import_from_url(&url).await?;
            if ctx.json_output {
                return print_json(&recipe);
            }
            success(format!("Recipe imported: {} [#{}]", recipe.name, recipe.id));
        }
        RecipesCommand::Categories => {
            let entries = ctx.client.catalog().categories().await?;
            print_catalog("Categories", &entries, ctx)?;
        }
        RecipesCommand::Tags => {
            let entries = ctx.client.catalog().tags().await?;
            print_catalog("Tags", &entries, ctx)?;
        }
        RecipesCommand::Ingredients => {
            let entries = ctx.client.catalog().ingredients().await?;
            print_catalog("Ingredients", &entries, ctx)?;
        }
    }

    Ok(())
}

/// Parse `NAME[:QUANTITY[:UNIT]]`.
fn parse_ingredient(s: &str) -> std::result::Result<RecipeIngredient, String> {
    let mut parts = s.splitn(3, ':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err("ingredient name must not be empty".to_string());
    }
    let quantity = match parts.next() {
        None | Some("") => Value::Null,
        Some(q) => match q.parse::<f64>() {
            Ok(_) => Value::String(q.to_string()),
            Err(_) => return Err(format!("'{}' is not a quantity", q)),
        },
    };
    let unit = parts.next().unwrap_or_default().to_string();

    Ok(RecipeIngredient {
        ingredient: Value::String(name.to_string()),
        quantity,
        unit,
        notes: None,
        optional: false,
        order: 0,
    })
}

/// Display name of an ingredient reference (id, name or nested object).
fn ingredient_name(value: &Value) -> String {
    match value {
        Value::String(name) => name.clone(),
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        Value::Number(id) => format!("ingredient #{}", id),
        other => other.to_string(),
    }
}

fn quantity_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(q) => q.clone(),
        other => other.to_string(),
    }
}

fn print_recipe_line(recipe: &Recipe) {
    let dim = Style::new().dim();
    let total = recipe.prep_time + recipe.cook_time;
    println!(
        "{} {} {}",
        truncate(&recipe.name, 40),
        dim.apply_to(format!("{} min, serves {}", total, recipe.servings)),
        dim.apply_to(format!("[#{}]", recipe.id))
    );
}

fn print_recipe(recipe: &Recipe) {
    let dim = Style::new().dim();
    heading(&recipe.name);
    if let Some(description) = &recipe.description {
        println!("{}", description);
        println!();
    }
    println!(
        "  {} {} min prep, {} min cook",
        dim.apply_to("Time:"),
        recipe.prep_time,
        recipe.cook_time
    );
    println!("  {} {}", dim.apply_to("Serves:"), recipe.servings);
    if let Some(difficulty) = &recipe.difficulty {
        println!("  {} {}", dim.apply_to("Difficulty:"), difficulty);
    }
    if let Some(url) = &recipe.url {
        println!("  {} {}", dim.apply_to("Source:"), url);
    }

    if !recipe.ingredients.is_empty() {
        println!();
        println!("{}", style("Ingredients").bold());
        let mut ingredients: Vec<&RecipeIngredient> = recipe.ingredients.iter().collect();
        ingredients.sort_by_key(|i| i.order);
        for item in ingredients {
            let amount = format!("{} {}", quantity_text(&item.quantity), item.unit);
            let optional = if item.optional { " (optional)" } else { "" };
            println!(
                "  • {}{} {}",
                ingredient_name(&item.ingredient),
                optional,
                dim.apply_to(amount.trim())
            );
        }
    }

    if !recipe.instructions.is_empty() {
        println!();
        println!("{}", style("Instructions").bold());
        println!("{}", recipe.instructions);
    }
}

fn print_catalog(title: &str, entries: &[CatalogEntry], ctx: &Context) -> Result<()> {
    if ctx.json_output {
        return print_json(entries);
    }
    let dim = Style::new().dim();
    heading(title);
    if entries.is_empty() {
        println!("{}", dim.apply_to("Nothing found"));
    }
    for entry in entries {
        println!("{} {}", entry.name, dim.apply_to(format!("[#{}]", entry.id)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ingredient() {
        let full = parse_ingredient("flour:200:g").unwrap();
        assert_eq!(full.ingredient, json!("flour"));
        assert_eq!(full.quantity, json!("200"));
        assert_eq!(full.unit, "g");

        let bare = parse_ingredient("salt").unwrap();
        assert_eq!(bare.quantity, Value::Null);
        assert_eq!(bare.unit, "");

        assert!(parse_ingredient(":2").is_err());
        assert!(parse_ingredient("eggs:a few").is_err());
    }

    #[test]
    fn test_ingredient_name() {
        assert_eq!(ingredient_name(&json!("basil")), "basil");
        assert_eq!(ingredient_name(&json!({ "id": 3, "name": "garlic" })), "garlic");
        assert_eq!(ingredient_name(&json!(3)), "ingredient #3");
    }
}
