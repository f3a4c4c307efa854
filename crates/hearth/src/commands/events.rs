//! Events command - calendar management.

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Subcommand};
use console::{Style, style};
use hearth_client::{Event, EventInput, Id};

use super::{Context, heading, print_json, success, truncate};

/// Arguments for the events command.
#[derive(Args, Debug)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Subcommand, Debug)]
pub enum EventsCommand {
    /// List events in date order
    List {
        /// Only events on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Only events on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Show a single event
    Show {
        /// Event ID
        id: Id,
    },

    /// Add an event
    Add {
        /// Event title
        title: String,

        /// Day of the event (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Time of day (HH:MM)
        #[arg(long, value_parser = parse_time)]
        time: String,

        /// Longer description
        #[arg(long)]
        description: Option<String>,

        /// Family member responsible
        #[arg(long)]
        assigned_to: Option<String>,
    },

    /// Change fields of an event
    Update {
        /// Event ID
        id: Id,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, value_parser = parse_time)]
        time: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        assigned_to: Option<String>,
    },

    /// Delete an event
    Delete {
        /// Event ID
        id: Id,
    },
}

/// Run the events command.
pub async fn run(args: EventsArgs, ctx: &Context) -> Result<()> {
    let events = ctx.client.events();

    match args.command {
        EventsCommand::List { from, to } => {
            let mut list: Vec<Event> = events
                .list()
                .await?
                .into_iter()
                .filter(|e| from.is_none_or(|from| e.date >= from))
                .filter(|e| to.is_none_or(|to| e.date <= to))
                .collect();
            list.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));

            if ctx.json_output {
                return print_json(&list);
            }
            heading("Events");
            if list.is_empty() {
                println!("{}", Style::new().dim().apply_to("No events found"));
            }
            for event in &list {
                print_event_line(event);
            }
        }
        EventsCommand::Show { id } => {
            let event = events.get(id).await?;
            if ctx.json_output {
                return print_json(&event);
            }
            print_event(&event);
        }
        EventsCommand::Add {
            title,
            date,
            time,
            description,
            assigned_to,
        } => {
            let input = EventInput {
                title,
                description,
                date,
                time,
                assigned_to,
                extra: Default::default(),
            };
            let event = events.create(&input).await?;
            if ctx.json_output {
                return print_json(&event);
            }
            success(format!("Event created: {} [#{}]", event.title, event.id));
        }
        EventsCommand::Update {
            id,
            title,
            date,
            time,
            description,
            assigned_to,
        } => {
            let current = events.get(id).await?;
            let mut input = EventInput::from(&current);
            if let Some(title) = title {
                input.title = title;
            }
            if let Some(date) = date {
                input.date = date;
            }
            if let Some(time) = time {
                input.time = time;
            }
            if description.is_some() {
                input.description = description;
            }
            if assigned_to.is_some() {
                input.assigned_to = assigned_to;
            }

            let event = events.update(id, &input).await?;
            if ctx.json_output {
                return print_json(&event);
            }
            success(format!("Event updated: {} [#{}]", event.title, event.id));
        }
        EventsCommand::Delete { id } => {
            events.delete(id).await?;
            if ctx.json_output {
                return print_json(&serde_json::json!({ "deleted": id }));
            }
            success(format!("Event #{} deleted", id));
        }
    }

    Ok(())
}

fn parse_time(s: &str) -> std::result::Result<String, String> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map(|_| s.to_string())
        .map_err(|_| format!("'{}' is not a time of day (expected HH:MM)", s))
}

fn short_time(time: &str) -> &str {
    time.get(..5).unwrap_or(time)
}

fn print_event_line(event: &Event) {
    let dim = Style::new().dim();
    let who = event
        .assigned_to
        .as_deref()
        .map(|who| format!(" ({})", who))
        .unwrap_or_default();
    println!(
        "{} {} {}{} {}",
        event.date.format("%a %Y-%m-%d"),
        style(short_time(&event.time)).cyan(),
        truncate(&event.title, 40),
        who,
        dim.apply_to(format!("[#{}]", event.id))
    );
}

fn print_event(event: &Event) {
    let dim = Style::new().dim();
    heading(&event.title);
    println!(
        "  {} {} {}",
        dim.apply_to("When:"),
        event.date.format("%A %Y-%m-%d"),
        short_time(&event.time)
    );
    if let Some(who) = &event.assigned_to {
        println!("  {} {}", dim.apply_to("Who:"), who);
    }
    if let Some(description) = &event.description {
        println!();
        println!("{}", description);
    }
    println!();
    println!("{}", dim.apply_to(format!("Event #{}", event.id)));
}
