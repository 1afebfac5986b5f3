use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// Timestamp
// =============================================================================

/// Unix timestamp in seconds.
///
/// Compared by value. Two Timestamps with the same inner value are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp())
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp())
    }

    pub fn from_local(dt: DateTime<Local>) -> Self {
        Self(dt.timestamp())
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.0, 0).unwrap_or_default()
    }

    /// Absolute distance to another timestamp, in seconds.
    pub fn distance_seconds(&self, other: Timestamp) -> i64 {
        (self.0 - other.0).abs()
    }
}

// =============================================================================
// Writing style
// =============================================================================

/// Title casing applied when a draft is finalized.
///
/// Supplied by the settings collaborator; the dialogue applies it once, at
/// finalize time, never while the title is still being assembled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritingStyle {
    /// First letter capitalized, rest left as spoken.
    #[default]
    Sentence,
    /// Every word capitalized.
    Title,
    /// Everything uppercase.
    AllCaps,
}

impl WritingStyle {
    /// Apply this style to a finalized title.
    pub fn apply(&self, text: &str) -> String {
        match self {
            WritingStyle::Sentence => {
                let mut chars = text.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            }
            WritingStyle::Title => text
                .split_whitespace()
                .map(|word| {
                    let mut chars = word.chars();
                    match chars.next() {
                        Some(first) => {
                            first.to_uppercase().collect::<String>()
                                + &chars.as_str().to_lowercase()
                        }
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
            WritingStyle::AllCaps => text.to_uppercase(),
        }
    }
}

impl fmt::Display for WritingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritingStyle::Sentence => write!(f, "sentence"),
            WritingStyle::Title => write!(f, "title"),
            WritingStyle::AllCaps => write!(f, "all_caps"),
        }
    }
}

impl std::str::FromStr for WritingStyle {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sentence" => Ok(WritingStyle::Sentence),
            "title" => Ok(WritingStyle::Title),
            "all_caps" => Ok(WritingStyle::AllCaps),
            _ => Err(format!("Unknown writing style: {}", s)),
        }
    }
}

// =============================================================================
// Domain structs
// =============================================================================

/// A partially or fully specified reminder, not yet persisted.
///
/// Finalized only once `due_at` is resolved or explicitly declined; the
/// persistence collaborator takes ownership immediately after finalize and
/// this core never retains it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReminderDraft {
    /// Original utterance the draft was built from, unmodified.
    pub raw_transcript: String,
    /// Title with all scheduling phrases stripped and the writing style applied.
    pub title: String,
    pub due_at: Option<Timestamp>,
    pub wants_main_alert: bool,
    pub early_alert_offset_minutes: Option<u32>,
}

impl ReminderDraft {
    pub fn new(raw_transcript: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            raw_transcript: raw_transcript.into(),
            title: title.into(),
            due_at: None,
            wants_main_alert: false,
            early_alert_offset_minutes: None,
        }
    }
}

/// Caller-supplied snapshot of a persisted reminder.
///
/// The duplicate detector and suggestion engine read these; this core never
/// creates one and never mutates one. ID assignment belongs to the
/// persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub title: String,
    pub due_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

impl Reminder {
    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }
}

// =============================================================================
// Tests
// =============================================================================
