use chrono::Utc;
use clap::Args;
use office_chores_core::summary::{summary_window, upcoming};
use office_chores_core::{ChoreStore, Config, WeekSummary};

use super::due_label;

#[derive(Args)]
pub struct SummaryArgs {
    /// Maximum number of upcoming chores (defaults to summary.upcoming_limit)
    #[arg(long)]
    limit: Option<usize>,
    /// Window length in days (defaults to summary.window_days)
    #[arg(long)]
    days: Option<u64>,
}

pub fn run(args: SummaryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let engine = config.engine();
    let store = ChoreStore::open()?;
    let chores = store.chores()?;

    let now = Utc::now();
    let window_days = args.days.unwrap_or(config.summary.window_days);
    let limit = args.limit.unwrap_or(config.summary.upcoming_limit);
    let (start, end) = summary_window(&engine, &now, window_days);
    let today = engine.local_day(&now);

    let stats = WeekSummary::compute(&engine, &chores, &now, window_days);
    let upcoming: Vec<serde_json::Value> = upcoming(&engine, &chores, &now, window_days, limit)
        .into_iter()
        .map(|occ| {
            serde_json::json!({
                "occurrence_id": occ.occurrence_id,
                "chore_id": occ.chore.id,
                "title": occ.chore.title,
                "occurrence_date": occ.occurrence_date,
                "label": due_label(engine.to_local(&occ.occurrence_date), today),
                "assignees": occ.chore.assignee_label(),
                "priority": occ.chore.priority,
            })
        })
        .collect();

    let out = serde_json::json!({
        "window": { "start": start, "end": end },
        "stats": stats,
        "upcoming": upcoming,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
