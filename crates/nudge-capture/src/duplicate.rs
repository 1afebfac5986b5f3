//! Near-duplicate detection for freshly captured reminders.
//!
//! Two reminders count as duplicates when their titles share most of their
//! significant words (Jaccard similarity over lowercased word sets) and
//! their due times fall inside a configurable window. Completed reminders
//! and reminders without a due time never match.

use std::collections::HashSet;
use tracing::debug;

use nudge_core::config::DuplicateConfig;
use nudge_core::types::{Reminder, Timestamp};

/// Words too common to carry identity even though they pass the length cut.
const STOP_WORDS: &[&str] = &["the", "and", "for", "with", "about", "from", "into"];

pub struct DuplicateDetector {
    config: DuplicateConfig,
}

impl DuplicateDetector {
    pub fn new(config: DuplicateConfig) -> Self {
        Self { config }
    }

    /// First open reminder that duplicates `title` at `due`, if any.
    ///
    /// `existing` is scanned in the order given; callers that care which
    /// duplicate wins should sort before calling.
    pub fn find_duplicate<'a>(
        &self,
        title: &str,
        due: Timestamp,
        existing: &'a [Reminder],
    ) -> Option<&'a Reminder> {
        let words = significant_words(title);
        if words.is_empty() {
            return None;
        }

        for reminder in existing {
            if !reminder.is_open() {
                continue;
            }
            let Some(existing_due) = reminder.due_at else {
                continue;
            };
            if existing_due.distance_seconds(due) > self.config.time_window_seconds {
                continue;
            }
            let similarity = jaccard(&words, &significant_words(&reminder.title));
            if similarity > self.config.similarity_threshold {
                debug!(
                    id = %reminder.id,
                    similarity,
                    "duplicate reminder detected"
                );
                return Some(reminder);
            }
        }
        None
    }
}

/// Lowercased words longer than two characters, minus stop words.
fn significant_words(title: &str) -> HashSet<String> {
    title
        .split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(&word.as_str()))
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

// =============================================================================
// Tests
// =============================================================================
