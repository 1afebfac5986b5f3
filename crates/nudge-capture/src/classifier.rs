//! Routing for fresh utterances.
//!
//! Checks run in a fixed order so a phrase like "cancel the reminder to
//! change the oil" is a cancellation, never an edit: cancel verbs first,
//! then edit verbs, with reminder creation as the fallback. The classifier
//! never mutates anything; it only names the action and its arguments.

use chrono::{DateTime, Local};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::normalize::Utterance;
use crate::temporal::TemporalParser;
use crate::types::VoiceCommand;

static CANCEL_VERB: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:cancel|delete|remove)\b").expect("Invalid cancel regex")
});

static CANCEL_LAST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:last|previous|latest)\b").expect("Invalid cancel-last regex")
});

static CANCEL_ALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\ball\b").expect("Invalid cancel-all regex"));

/// "<edit verb> [the|my] <target> to <new value>". Non-greedy so the first
/// " to " splits target from value.
static EDIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:change|move|reschedule|update)\s+(?:the\s+|my\s+)?(.+?)\s+to\s+(.+)$")
        .expect("Invalid edit regex")
});

/// Words that carry no search signal once the verb is known.
const SEARCH_FILLER: &[&str] = &[
    "the",
    "my",
    "a",
    "an",
    "to",
    "for",
    "about",
    "reminder",
    "reminders",
    "that",
    "one",
    "all",
];

/// Classifies an idle-state utterance into a [`VoiceCommand`].
pub struct CommandClassifier {
    parser: TemporalParser,
}

impl Default for CommandClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandClassifier {
    pub fn new() -> Self {
        // The early-alert default never matters on these paths; only the
        // date and time passes are consulted.
        Self {
            parser: TemporalParser::new(0),
        }
    }

    pub fn classify(&self, utterance: &Utterance, now: DateTime<Local>) -> VoiceCommand {
        let text = utterance.as_str();

        if CANCEL_VERB.is_match(text) {
            if CANCEL_LAST.is_match(text) {
                debug!("classified as cancel-last");
                return VoiceCommand::CancelLast;
            }
            if CANCEL_ALL.is_match(text) {
                if let Some(date) = self.parser.extract_base_date(utterance, now) {
                    debug!(%date, "classified as cancel-all-for-date");
                    return VoiceCommand::CancelAllForDate { date };
                }
            }
            let search_term = search_term_after_verb(text, &CANCEL_VERB);
            if !search_term.is_empty() {
                debug!(%search_term, "classified as cancel-named");
                return VoiceCommand::CancelNamed { search_term };
            }
            // A bare "cancel" with nothing to search on falls through.
        }

        if let Some(caps) = EDIT.captures(text) {
            let search_term = strip_filler(&caps[1]);
            let target = caps[2].trim().to_string();
            if !search_term.is_empty() && !target.is_empty() {
                let new_time = self
                    .parser
                    .parse_time_expression(&Utterance::new(&target), now);
                debug!(%search_term, time = new_time.is_some(), "classified as edit");
                return match new_time {
                    Some(ts) => VoiceCommand::EditReminder {
                        search_term,
                        new_time: Some(ts),
                        new_title: None,
                    },
                    None => VoiceCommand::EditReminder {
                        search_term,
                        new_time: None,
                        new_title: Some(target),
                    },
                };
            }
        }

        VoiceCommand::CreateReminder
    }
}

/// Everything after the cancel verb, minus filler words.
fn search_term_after_verb(text: &str, verb: &Regex) -> String {
    let rest = match verb.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    strip_filler(rest)
}

fn strip_filler(text: &str) -> String {
    text.split_whitespace()
        .filter(|word| {
            let bare = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            !bare.is_empty() && !SEARCH_FILLER.contains(&bare.as_str())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use nudge_core::types::Timestamp;

    /// Tuesday, March 10th 2026, 10:00 local.
    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap()
    }

    fn classify(text: &str) -> VoiceCommand {
        CommandClassifier::new().classify(&Utterance::new(text), fixed_now())
    }

    // =====================================================================
    // Cancellation
    // =====================================================================

    #[test]
    fn test_cancel_last() {
        assert_eq!(classify("cancel the last reminder"), VoiceCommand::CancelLast);
        assert_eq!(classify("delete my previous reminder"), VoiceCommand::CancelLast);
    }

    #[test]
    fn test_cancel_named() {
        assert_eq!(
            classify("cancel the dentist reminder"),
            VoiceCommand::CancelNamed {
                search_term: "dentist".into()
            }
        );
        assert_eq!(
            classify("remove the reminder about picking up groceries"),
            VoiceCommand::CancelNamed {
                search_term: "picking up groceries".into()
            }
        );
    }

    #[test]
    fn test_cancel_all_for_date() {
        assert_eq!(
            classify("cancel all reminders for tomorrow"),
            VoiceCommand::CancelAllForDate {
                date: NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()
            }
        );
        assert_eq!(
            classify("delete all my reminders for friday"),
            VoiceCommand::CancelAllForDate {
                date: NaiveDate::from_ymd_opt(2026, 3, 13).unwrap()
            }
        );
    }

    #[test]
    fn test_cancel_all_without_date_falls_back_to_named() {
        // No day reference, so "all" degrades to a named search.
        assert_eq!(
            classify("cancel all the gym reminders"),
            VoiceCommand::CancelNamed {
                search_term: "gym".into()
            }
        );
    }

    #[test]
    fn test_bare_cancel_is_create_fallback() {
        assert_eq!(classify("cancel the reminder"), VoiceCommand::CreateReminder);
    }

    // =====================================================================
    // Edits
    // =====================================================================

    #[test]
    fn test_edit_to_new_time() {
        let cmd = classify("move the dentist reminder to 5 pm");
        assert_eq!(
            cmd,
            VoiceCommand::EditReminder {
                search_term: "dentist".into(),
                new_time: Some(Timestamp::from_local(
                    Local.with_ymd_and_hms(2026, 3, 10, 17, 0, 0).unwrap()
                )),
                new_title: None,
            }
        );
    }

    #[test]
    fn test_edit_to_day_and_time() {
        let cmd = classify("reschedule my gym reminder to tomorrow at 7 am");
        match cmd {
            VoiceCommand::EditReminder {
                search_term,
                new_time: Some(ts),
                new_title: None,
            } => {
                assert_eq!(search_term, "gym");
                assert_eq!(
                    ts,
                    Timestamp::from_local(Local.with_ymd_and_hms(2026, 3, 11, 7, 0, 0).unwrap())
                );
            }
            other => panic!("expected timed edit, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_to_new_title() {
        let cmd = classify("change the dentist reminder to say orthodontist appointment");
        assert_eq!(
            cmd,
            VoiceCommand::EditReminder {
                search_term: "dentist".into(),
                new_time: None,
                new_title: Some("say orthodontist appointment".into()),
            }
        );
    }

    #[test]
    fn test_cancel_wins_over_edit_wording() {
        // Both a cancel verb and an edit verb present; cancel checks first.
        assert_eq!(
            classify("cancel the reminder to change the oil"),
            VoiceCommand::CancelNamed {
                search_term: "change oil".into()
            }
        );
    }

    // =====================================================================
    // Create fallback
    // =====================================================================

    #[test]
    fn test_plain_utterance_creates() {
        assert_eq!(
            classify("remind me to call mom tomorrow at 3 pm"),
            VoiceCommand::CreateReminder
        );
        assert_eq!(classify("buy milk"), VoiceCommand::CreateReminder);
    }

    #[test]
    fn test_mentioning_cancel_inside_a_task_still_cancels_named() {
        // Deliberate: verb presence routes to cancellation even when the
        // utterance reads like a task. Callers confirm before deleting.
        assert_eq!(
            classify("remind me to cancel the gym membership"),
            VoiceCommand::CancelNamed {
                search_term: "gym membership".into()
            }
        );
    }
}
