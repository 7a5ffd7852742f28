use chrono::Utc;
use clap::Subcommand;
use office_chores_core::{ChoreStore, Config, Notifier, Reminder, ReminderScheduler};
use std::time::Duration;

#[derive(Subcommand)]
pub enum RemindAction {
    /// Show the next reminder for every open chore
    List,
    /// Stay running and print reminders as they come due
    Watch {
        /// Seconds between re-reading the chore list
        #[arg(long, default_value_t = 60)]
        rescan: u64,
    },
}

struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn notify(&self, reminder: &Reminder) {
        println!("{}", reminder.title);
        println!("  {}", reminder.body);
    }
}

fn pending_reminders(config: &Config) -> Result<Vec<Reminder>, Box<dyn std::error::Error>> {
    let engine = config.engine();
    let chores = ChoreStore::open()?.chores()?;
    let now = Utc::now();
    let mut reminders: Vec<Reminder> = chores
        .iter()
        .filter_map(|chore| Reminder::next_for(&engine, chore, config.reminders.minutes_before, &now))
        .collect();
    reminders.sort_by_key(|r| r.fire_at);
    Ok(reminders)
}

async fn watch(config: Config, rescan: Duration) -> Result<(), Box<dyn std::error::Error>> {
    let engine = config.engine();
    let scheduler = ReminderScheduler::new(StdoutNotifier);
    let mut ticker = tokio::time::interval(rescan);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let chores = ChoreStore::open()?.chores()?;
                let scheduled = scheduler.reschedule_all(
                    &engine,
                    &chores,
                    config.reminders.minutes_before,
                    &Utc::now(),
                );
                tracing::debug!(scheduled, "reminders rescheduled");
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("stopping reminder watch");
                break;
            }
        }
    }
    Ok(())
}

pub fn run(action: RemindAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        RemindAction::List => {
            println!("{}", serde_json::to_string_pretty(&pending_reminders(&config)?)?);
        }
        RemindAction::Watch { rescan } => {
            if !config.reminders.enabled {
                println!("Reminders are disabled (reminders.enabled = false)");
                return Ok(());
            }
            println!(
                "Watching for reminders {} minutes ahead. Press Ctrl+C to stop.",
                config.reminders.minutes_before
            );
            let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
            runtime.block_on(watch(config, Duration::from_secs(rescan.max(1))))?;
        }
    }
    Ok(())
}
