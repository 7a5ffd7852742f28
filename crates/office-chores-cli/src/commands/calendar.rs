use chrono::Local;
use clap::Args;
use office_chores_core::calendar::CalendarMonth;
use office_chores_core::{ChoreStore, Config, MonthGrid};

const CELL_WIDTH: usize = 14;

#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM); defaults to the current month
    #[arg(long)]
    month: Option<String>,
    /// Print the bucketed month as JSON
    #[arg(long)]
    json: bool,
}

fn parse_month(value: &str) -> Result<(i32, u32), String> {
    let invalid = || format!("invalid month '{value}', expected YYYY-MM");
    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    Ok((
        year.parse().map_err(|_| invalid())?,
        month.parse().map_err(|_| invalid())?,
    ))
}

fn cell(text: &str) -> String {
    let clipped: String = text.chars().take(CELL_WIDTH - 1).collect();
    format!("{clipped:<CELL_WIDTH$}")
}

/// Plain-text month grid, `limit` chores per day plus "+N more".
pub fn render(month: &CalendarMonth, limit: usize) -> String {
    let width = CELL_WIDTH * 7;
    let mut out = format!("{:^width$}\n", month.title);
    for label in month.week_start.labels() {
        out.push_str(&cell(label));
    }
    out.push('\n');

    for week in month.weeks() {
        let numbers: String = week
            .iter()
            .map(|day| {
                let n = day.date.format("%-d").to_string();
                let marked = match (day.is_today, day.in_month) {
                    (true, _) => format!("[{n}]"),
                    (false, true) => n,
                    (false, false) => format!("({n})"),
                };
                cell(&marked)
            })
            .collect();
        out.push_str(numbers.trim_end());
        out.push('\n');

        let rows = week.iter().map(|d| d.visible(limit).len()).max().unwrap_or(0);
        for row in 0..rows {
            let line: String = week
                .iter()
                .map(|day| {
                    let title = day
                        .visible(limit)
                        .get(row)
                        .map(|occ| format!("- {}", occ.chore.title))
                        .unwrap_or_default();
                    cell(&title)
                })
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }

        if week.iter().any(|d| d.overflow(limit) > 0) {
            let line: String = week
                .iter()
                .map(|day| match day.overflow(limit) {
                    0 => cell(""),
                    n => cell(&format!("+{n} more")),
                })
                .collect();
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
    out
}

pub fn run(args: CalendarArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let engine = config.engine();
    let store = ChoreStore::open()?;
    let today = Local::now().date_naive();
    let week_start = config.calendar.week_starts_on;

    let grid = match args.month {
        Some(ref value) => {
            let (year, month) = parse_month(value)?;
            MonthGrid::new(year, month, week_start)?
        }
        None => MonthGrid::containing(today, week_start),
    };

    let month = grid.bucket(&engine, &store.chores()?, today);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&month)?);
    } else {
        print!("{}", render(&month, config.calendar.display_limit));
    }
    Ok(())
}
