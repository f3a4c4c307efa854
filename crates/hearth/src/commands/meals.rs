//! Meals command - meal plans and their slots.

use anyhow::{Result, bail};
use chrono::{Days, NaiveDate};
use clap::{Args, Subcommand};
use console::{Style, style};
use hearth_client::{Id, MealPlan, MealPlanInput, MealSlot, MealSlotInput, MealType};
use serde_json::Value;

use super::{Context, heading, print_json, success};

/// Arguments for the meals command.
#[derive(Args, Debug)]
pub struct MealsArgs {
    #[command(subcommand)]
    pub command: MealsCommand,
}

#[derive(Subcommand, Debug)]
pub enum MealsCommand {
    /// List meal plans
    List,

    /// Show a meal plan day by day
    Show {
        /// Meal plan ID
        id: Id,
    },

    /// Create a meal plan
    Create {
        /// Plan name
        name: String,

        /// First day of the plan (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Delete a meal plan and its slots
    Delete {
        /// Meal plan ID
        id: Id,
    },

    /// Schedule a recipe in a plan
    AddSlot {
        /// Meal plan ID
        plan: Id,

        /// Recipe ID
        #[arg(long)]
        recipe: Id,

        /// Day (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// breakfast, lunch, dinner or snack
        #[arg(long)]
        meal_type: MealType,

        #[arg(long, default_value = "1")]
        servings: u32,

        #[arg(long)]
        notes: Option<String>,

        /// Repeat on this many consecutive days (sent as one bulk request)
        #[arg(long, default_value = "1")]
        days: u32,
    },

    /// List the slots of a plan
    Slots {
        /// Meal plan ID
        plan: Id,
    },

    /// Remove a slot
    RemoveSlot {
        /// Meal slot ID
        id: Id,
    },
}

/// Run the meals command.
pub async fn run(args: MealsArgs, ctx: &Context) -> Result<()> {
    let plans = ctx.client.meal_plans();

    match args.command {
        MealsCommand::List => {
            let mut list = plans.list().await?;
            list.sort_by_key(|p| p.start_date);
            if ctx.json_output {
                return print_json(&list);
            }
            heading("Meal Plans");
            let dim = Style::new().dim();
            if list.is_empty() {
                println!("{}", dim.apply_to("No meal plans found"));
            }
            for plan in &list {
                println!(
                    "{} {} {}",
                    plan.start_date,
                    plan.name,
                    dim.apply_to(format!("{} meals [#{}]", plan.meal_slots.len(), plan.id))
                );
            }
        }
        MealsCommand::Show { id } => {
            let plan = plans.get(id).await?;
            if ctx.json_output {
                return print_json(&plan);
            }
            print_plan(&plan);
        }
        MealsCommand::Create {
            name,
            start_date,
            notes,
        } => {
            let plan = plans
                .create(&MealPlanInput {
                    name,
                    start_date,
                    notes,
                })
                .await?;
            if ctx.json_output {
                return print_json(&plan);
            }
            success(format!("Meal plan created: {} [#{}]", plan.name, plan.id));
        }
        MealsCommand::Delete { id } => {
            plans.delete(id).await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            success(format!("Meal plan #{} deleted", id));
        }
        MealsCommand::AddSlot {
            plan,
            recipe,
            date,
            meal_type,
            servings,
            notes,
            days,
        } => {
            if days == 0 {
                bail!("--days must be at least 1");
            }
            let slot = MealSlotInput {
                meal_plan: Some(plan),
                recipe,
                date,
                meal_type,
                servings,
                notes,
            };

            let created = if days == 1 {
                vec![ctx.client.meal_slots().create(&slot).await?]
            } else {
                let slots = repeat_daily(&slot, days)?;
                plans.bulk_create_slots(plan, &slots).await?
            };

            if ctx.json_output {
                return print_json(&created);
            }
            success(format!(
                "Added {} {} slot(s) to plan #{}",
                created.len(),
                meal_type,
                plan
            ));
        }
        MealsCommand::Slots { plan } => {
            let mut slots = ctx.client.meal_slots().list_for_plan(plan).await?;
            sort_slots(&mut slots);
            if ctx.json_output {
                return print_json(&slots);
            }
            heading(&format!("Slots of plan #{}", plan));
            if slots.is_empty() {
                println!("{}", Style::new().dim().apply_to("No meals scheduled"));
            }
            for slot in &slots {
                print_slot_line(slot, true);
            }
        }
        MealsCommand::RemoveSlot { id } => {
            ctx.client.meal_slots().delete(id).await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            success(format!("Meal slot #{} removed", id));
        }
    }

    Ok(())
}

/// Copies of `slot` on `days` consecutive days starting at its date.
///
/// The plan id is dropped; the bulk endpoint takes it from the path.
fn repeat_daily(slot: &MealSlotInput, days: u32) -> Result<Vec<MealSlotInput>> {
    (0..days)
        .map(|offset| {
            let Some(date) = slot.date.checked_add_days(Days::new(u64::from(offset))) else {
                bail!("date out of range");
            };
            Ok(MealSlotInput {
                meal_plan: None,
                date,
                ..slot.clone()
            })
        })
        .collect()
}

fn sort_slots(slots: &mut [MealSlot]) {
    slots.sort_by_key(|s| (s.date, s.meal_type));
}

/// Display name of a slot's recipe (id or nested object).
fn recipe_label(recipe: &Value) -> String {
    match recipe {
        Value::Object(map) => map
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| recipe.to_string()),
        Value::Number(id) => format!("recipe #{}", id),
        other => other.to_string(),
    }
}

fn print_slot_line(slot: &MealSlot, with_date: bool) {
    let dim = Style::new().dim();
    let date = if with_date {
        format!("{} ", slot.date.format("%a %Y-%m-%d"))
    } else {
        String::from("  ")
    };
    println!(
        "{}{:<9} {} {}",
        date,
        style(slot.meal_type).cyan(),
        recipe_label(&slot.recipe),
        dim.apply_to(format!("x{} [#{}]", slot.servings, slot.id))
    );
}

fn print_plan(plan: &MealPlan) {
    let dim = Style::new().dim();
    heading(&plan.name);
    println!("  {} {}", dim.apply_to("Starts:"), plan.start_date);
    if let Some(notes) = &plan.notes {
        println!("  {} {}", dim.apply_to("Notes:"), notes);
    }

    let mut slots = plan.meal_slots.clone();
    sort_slots(&mut slots);
    let mut current: Option<NaiveDate> = None;
    for slot in &slots {
        if current != Some(slot.date) {
            println!();
            println!("{}", style(slot.date.format("%A %Y-%m-%d")).bold());
            current = Some(slot.date);
        }
        print_slot_line(slot, false);
    }
    if slots.is_empty() {
        println!();
        println!("{}", dim.apply_to("No meals scheduled"));
    }
}
