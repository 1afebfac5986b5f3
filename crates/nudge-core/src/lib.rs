//! Shared foundation for the Nudge reminder-capture core.
//!
//! Defines the configuration surface, the workspace error type, and the
//! domain value types exchanged with external collaborators (persistence,
//! settings, transcription).

pub mod config;
pub mod error;
pub mod types;

pub use config::{CaptureConfig, DuplicateConfig, NudgeConfig, SuggestConfig};
pub use error::{NudgeError, Result};
pub use types::{Reminder, ReminderDraft, Timestamp, WritingStyle};
