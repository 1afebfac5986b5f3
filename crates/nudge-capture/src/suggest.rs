//! Due-time suggestions from completion history.
//!
//! Completed reminders vote for the local hour their due time fell in; the
//! most frequent hours become "today at H" / "tomorrow at H" candidates.
//! With no usable history a fixed fallback set is offered instead.

use chrono::{DateTime, Local, NaiveTime, Timelike};
use std::collections::HashMap;
use tracing::debug;

use nudge_core::config::SuggestConfig;
use nudge_core::types::{Reminder, Timestamp};

/// How many distinct hours from history feed the candidate list.
const TOP_HOURS: usize = 3;

pub struct SuggestionEngine {
    config: SuggestConfig,
}

impl SuggestionEngine {
    pub fn new(config: SuggestConfig) -> Self {
        Self { config }
    }

    /// Likely due times for a new reminder, most plausible first.
    ///
    /// Advisory only; the caller shows these as tappable options and is
    /// free to ignore them.
    pub fn suggest(
        &self,
        title: &str,
        completed: &[Reminder],
        now: DateTime<Local>,
    ) -> Vec<Timestamp> {
        let hours = frequent_hours(completed);
        debug!(title, hours = ?hours, "suggesting due times");

        let mut suggestions = Vec::new();
        for hour in hours {
            if let Some(today) = local_at(now, 0, hour) {
                if today > now {
                    suggestions.push(Timestamp::from_local(today));
                }
            }
            if let Some(tomorrow) = local_at(now, 1, hour) {
                suggestions.push(Timestamp::from_local(tomorrow));
            }
        }

        if suggestions.is_empty() {
            suggestions.push(Timestamp::from_local(now + chrono::Duration::hours(1)));
            if let Some(evening) = local_at(now, 0, 18) {
                if evening > now {
                    suggestions.push(Timestamp::from_local(evening));
                }
            }
            if let Some(morning) = local_at(now, 1, 9) {
                suggestions.push(Timestamp::from_local(morning));
            }
        }

        suggestions.truncate(self.config.max_suggestions);
        suggestions
    }
}

/// Top due-hours across completed reminders, most frequent first, ties
/// broken toward the earlier hour.
fn frequent_hours(completed: &[Reminder]) -> Vec<u32> {
    let mut counts: HashMap<u32, usize> = HashMap::new();
    for reminder in completed {
        if let Some(due) = reminder.due_at {
            let hour = due.to_datetime().with_timezone(&Local).hour();
            *counts.entry(hour).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(u32, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.into_iter().take(TOP_HOURS).map(|(h, _)| h).collect()
}

fn local_at(now: DateTime<Local>, days_ahead: u64, hour: u32) -> Option<DateTime<Local>> {
    let date = now
        .date_naive()
        .checked_add_days(chrono::Days::new(days_ahead))?;
    date.and_time(NaiveTime::from_hms_opt(hour, 0, 0)?)
        .and_local_timezone(Local)
        .single()
}

// =============================================================================
// Tests
// =============================================================================
