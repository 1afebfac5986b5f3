//! Core types for the capture pipeline.
//!
//! The three tagged unions here (`ParseOutcome`, `VoiceCommand`,
//! `CaptureState`) carry exactly the fields already known at each point, so
//! impossible combinations (an offset answer without a due time, say) do not
//! typecheck.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use nudge_core::types::{ReminderDraft, Timestamp};

// =============================================================================
// Parse outcome
// =============================================================================

/// A time-of-day word that narrows but does not fully resolve a due time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodHint {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl PeriodHint {
    pub(crate) fn from_keyword(word: &str) -> Option<Self> {
        match word.to_lowercase().as_str() {
            "morning" => Some(PeriodHint::Morning),
            "afternoon" => Some(PeriodHint::Afternoon),
            "evening" | "tonight" => Some(PeriodHint::Evening),
            "night" => Some(PeriodHint::Night),
            _ => None,
        }
    }
}

impl fmt::Display for PeriodHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodHint::Morning => write!(f, "morning"),
            PeriodHint::Afternoon => write!(f, "afternoon"),
            PeriodHint::Evening => write!(f, "evening"),
            PeriodHint::Night => write!(f, "night"),
        }
    }
}

/// Result of running the temporal passes over one utterance.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Day and time both resolved; the draft carries the due timestamp and
    /// any early-alert offset extracted from the utterance.
    Complete(ReminderDraft),
    /// A day was established but no clock time; the dialogue must ask for one.
    NeedsTime {
        title: String,
        base_date: NaiveDate,
        period: Option<PeriodHint>,
    },
    /// Neither day nor usable time was found.
    NeedsWhen { title: String, raw_text: String },
}

// =============================================================================
// Voice commands
// =============================================================================

/// Routing decision for a fresh (idle-state) utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "command")]
pub enum VoiceCommand {
    /// Routes to the temporal parser and capture dialogue.
    CreateReminder,
    /// Mutation applied by the persistence collaborator to a searched target.
    EditReminder {
        search_term: String,
        new_time: Option<Timestamp>,
        new_title: Option<String>,
    },
    CancelLast,
    CancelNamed { search_term: String },
    CancelAllForDate { date: NaiveDate },
}

// =============================================================================
// Dialogue state
// =============================================================================

/// State of one in-flight capture conversation.
///
/// One instance per conversation; resets to `Idle` after finalize or
/// explicit abandonment. Each variant carries only what has been confirmed
/// so far. `early_offset` is present where an offset was already extracted
/// from the opening utterance.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Idle,
    HaveTitle {
        title: String,
        raw_text: String,
        early_offset: Option<u32>,
    },
    AwaitingMainAlertAnswer {
        title: String,
        raw_text: String,
        due: Timestamp,
        early_offset: Option<u32>,
    },
    AwaitingSecondAlertAnswer {
        title: String,
        raw_text: String,
        due: Timestamp,
        wants_main: bool,
    },
    AwaitingOffsetAnswer {
        title: String,
        raw_text: String,
        due: Timestamp,
        wants_main: bool,
    },
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureState::Idle => write!(f, "Idle"),
            CaptureState::HaveTitle { .. } => write!(f, "HaveTitle"),
            CaptureState::AwaitingMainAlertAnswer { .. } => write!(f, "AwaitingMainAlertAnswer"),
            CaptureState::AwaitingSecondAlertAnswer { .. } => {
                write!(f, "AwaitingSecondAlertAnswer")
            }
            CaptureState::AwaitingOffsetAnswer { .. } => write!(f, "AwaitingOffsetAnswer"),
        }
    }
}

/// Output of one dialogue turn: the prompt to show, plus the finalized
/// draft when this turn completed the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub prompt: String,
    pub draft: Option<ReminderDraft>,
}

impl Turn {
    pub(crate) fn prompt(text: impl Into<String>) -> Self {
        Self {
            prompt: text.into(),
            draft: None,
        }
    }

    pub(crate) fn finalized(text: impl Into<String>, draft: ReminderDraft) -> Self {
        Self {
            prompt: text.into(),
            draft: Some(draft),
        }
    }
}
