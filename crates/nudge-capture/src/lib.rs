//! Voice reminder capture core.
//!
//! Turns finalized speech transcripts into reminder drafts: one utterance
//! per turn flows through the [`CommandClassifier`] for routing, then (on
//! the create path) through the [`TemporalParser`] and the
//! [`CaptureDialogue`] state machine until a [`ReminderDraft`] is complete.
//! [`DuplicateDetector`] and [`SuggestionEngine`] advise the caller on
//! near-duplicates and likely due times.
//!
//! Everything here is synchronous and side-effect free; persistence,
//! notification scheduling, and transcription are external collaborators
//! that exchange the value types from `nudge-core`.
//!
//! [`ReminderDraft`]: nudge_core::types::ReminderDraft

pub mod classifier;
pub mod dialogue;
pub mod duplicate;
pub mod normalize;
pub mod suggest;
pub mod temporal;
pub mod types;

pub use classifier::CommandClassifier;
pub use dialogue::CaptureDialogue;
pub use duplicate::DuplicateDetector;
pub use normalize::Utterance;
pub use suggest::SuggestionEngine;
pub use temporal::TemporalParser;
pub use types::{CaptureState, ParseOutcome, PeriodHint, Turn, VoiceCommand};
