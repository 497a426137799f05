//! Periodic birthday sweep.
//!
//! Logs today's birthdays and the reminders due to subscribers. There is no
//! delivery channel; the log line is the notification.

use std::time::Duration;

use account_store::{AccountResult, AccountService, AccountStore};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::state::SharedState;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Users whose birthday is on the swept date.
    pub birthdays: usize,
    /// Reminders due on the swept date.
    pub reminders: usize,
}

/// Runs one sweep for `today`.
pub async fn run_sweep<S: AccountStore>(
    accounts: &AccountService<S>,
    today: NaiveDate,
) -> AccountResult<SweepReport> {
    let birthdays = accounts.list_born_on(today).await?;
    for user in &birthdays {
        info!(email = %user.email, name = %user.name, "Birthday today");
    }

    let reminders = accounts.reminders_on(today).await?;
    for reminder in &reminders {
        info!(
            recipient = %reminder.recipient,
            celebrant = %reminder.celebrant.email,
            days_until = reminder.days_until,
            "Birthday reminder"
        );
    }

    Ok(SweepReport {
        birthdays: birthdays.len(),
        reminders: reminders.len(),
    })
}

/// Spawns the sweep on a fixed period. The first sweep runs immediately.
pub fn spawn_birthday_sweep<S: AccountStore + 'static>(
    state: SharedState<S>,
    period: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            match run_sweep(&state.accounts, Local::now().date_naive()).await {
                Ok(report) => info!(
                    birthdays = report.birthdays,
                    reminders = report.reminders,
                    "Birthday sweep finished"
                ),
                Err(e) => warn!(error = %e, "Birthday sweep failed"),
            }
        }
    })
}
