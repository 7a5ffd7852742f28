//! Chore management commands for CLI.

use chrono::NaiveTime;
use clap::Subcommand;
use office_chores_core::{Chore, ChoreStore, Config, KeyValueStore, Priority, Recurrence};

use super::{local_due, parse_date, parse_time};

#[derive(Subcommand)]
pub enum ChoreAction {
    /// Create a new chore
    Add {
        /// Chore title
        title: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
        /// Due time (HH:MM, local)
        #[arg(long, default_value = "09:00")]
        time: String,
        /// Repeat rule: none, daily, weekly or monthly
        #[arg(long, default_value = "none")]
        recurrence: String,
        /// Category id
        #[arg(long, default_value = "other")]
        category: String,
        /// Priority: low, medium or high
        #[arg(long, default_value = "medium")]
        priority: String,
        /// Assignee name (repeatable)
        #[arg(long = "assignee")]
        assignees: Vec<String>,
        /// Chore description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List chores
    List {
        /// Only chores assigned to this name
        #[arg(long)]
        assignee: Option<String>,
        /// Hide completed chores
        #[arg(long)]
        open: bool,
    },
    /// Get chore details
    Get {
        /// Chore ID
        id: String,
    },
    /// Update a chore
    Update {
        /// Chore ID
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// New due date (YYYY-MM-DD); keeps the current time unless --time is given
        #[arg(long)]
        due: Option<String>,
        /// New due time (HH:MM, local)
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        recurrence: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        /// Replace assignees (repeatable)
        #[arg(long = "assignee")]
        assignees: Option<Vec<String>>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark a chore as done
    Complete {
        /// Chore ID
        id: String,
        /// Mark as not done instead
        #[arg(long)]
        undo: bool,
    },
    /// Delete a chore
    Delete {
        /// Chore ID
        id: String,
    },
    /// List occurrences of a chore between two dates (inclusive)
    Occurrences {
        /// Chore ID
        id: String,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: String,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: String,
    },
    /// Check whether a chore occurs on a date
    On {
        /// Chore ID
        id: String,
        /// Day to check (YYYY-MM-DD)
        date: String,
    },
}

fn check_category<S: KeyValueStore>(store: &ChoreStore<S>, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let categories = store.categories()?;
    if categories.iter().any(|c| c.id == id) {
        return Ok(());
    }
    let known: Vec<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    Err(format!("unknown category '{id}', expected one of: {}", known.join(", ")).into())
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    Priority::parse(value).ok_or_else(|| format!("invalid priority '{value}', expected low, medium or high"))
}

pub fn run(action: ChoreAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ChoreStore::open()?;
    let engine = Config::load_or_default().engine();

    match action {
        ChoreAction::Add {
            title,
            due,
            time,
            recurrence,
            category,
            priority,
            assignees,
            description,
        } => {
            let due_date = local_due(&engine, parse_date(&due)?, parse_time(&time)?);
            let mut chore = Chore::new(title, due_date).with_recurrence(Recurrence::parse(&recurrence));
            check_category(&store, &category)?;
            chore.category = category;
            chore.priority = parse_priority(&priority)?;
            chore.assignees = assignees;
            chore.description = description.trim().to_string();

            let chore = store.add_chore(chore)?;
            println!("Chore created: {}", chore.id);
            println!("{}", serde_json::to_string_pretty(&chore)?);
        }
        ChoreAction::List { assignee, open } => {
            let chores: Vec<Chore> = store
                .chores()?
                .into_iter()
                .filter(|c| !open || !c.completed)
                .filter(|c| match assignee {
                    Some(ref name) => c.assignees.iter().any(|a| a == name),
                    None => true,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&chores)?);
        }
        ChoreAction::Get { id } => match store.get_chore(&id)? {
            Some(chore) => println!("{}", serde_json::to_string_pretty(&chore)?),
            None => println!("Chore not found: {id}"),
        },
        ChoreAction::Update {
            id,
            title,
            due,
            time,
            recurrence,
            category,
            priority,
            assignees,
            description,
            completed,
        } => {
            let mut chore = store.get_chore(&id)?.ok_or(format!("Chore not found: {id}"))?;

            if let Some(t) = title { chore.title = t.trim().to_string(); }
            if due.is_some() || time.is_some() {
                let current = engine.to_local(&chore.due_date);
                let date = due.as_deref().map(parse_date).transpose()?.unwrap_or(current.date());
                let time: NaiveTime = time.as_deref().map(parse_time).transpose()?.unwrap_or(current.time());
                chore.due_date = local_due(&engine, date, time);
            }
            if let Some(r) = recurrence { chore.recurrence = Recurrence::parse(&r); }
            if let Some(c) = category {
                check_category(&store, &c)?;
                chore.category = c;
            }
            if let Some(p) = priority { chore.priority = parse_priority(&p)?; }
            if let Some(a) = assignees { chore.assignees = a; }
            if let Some(d) = description { chore.description = d.trim().to_string(); }
            if let Some(c) = completed { chore.completed = c; }

            store.update_chore(&chore)?;
            println!("Chore updated:");
            println!("{}", serde_json::to_string_pretty(&chore)?);
        }
        ChoreAction::Complete { id, undo } => {
            let chore = store.set_completed(&id, !undo)?;
            let state = if chore.completed { "done" } else { "open" };
            println!("Chore {id} marked {state}");
        }
        ChoreAction::Delete { id } => {
            if store.delete_chore(&id)? {
                println!("Chore deleted: {id}");
            } else {
                println!("Chore not found: {id}");
            }
        }
        ChoreAction::Occurrences { id, from, to } => {
            let chore = store.get_chore(&id)?.ok_or(format!("Chore not found: {id}"))?;
            let occurrences = engine.try_expand_in_range(&chore, parse_date(&from)?, parse_date(&to)?)?;
            println!("{}", serde_json::to_string_pretty(&occurrences)?);
        }
        ChoreAction::On { id, date } => {
            let chore = store.get_chore(&id)?.ok_or(format!("Chore not found: {id}"))?;
            let date = parse_date(&date)?;
            println!("{}", engine.is_occurrence_on_date(&chore, date));
        }
    }
    Ok(())
}
