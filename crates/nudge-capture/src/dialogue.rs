//! Capture dialogue state machine.
//!
//! Drives one conversation from a raw utterance to a finalized draft:
//! Idle -> (parse) -> HaveTitle or AwaitingMainAlertAnswer ->
//! AwaitingSecondAlertAnswer -> AwaitingOffsetAnswer -> Idle.
//!
//! No transition errors or panics; an unparseable turn re-prompts in place
//! and the "retry" is simply the next conversational turn. One instance
//! models exactly one in-flight conversation and must not be shared across
//! sessions.

use chrono::{DateTime, Local, NaiveDate};
use tracing::debug;

use nudge_core::config::CaptureConfig;
use nudge_core::types::{ReminderDraft, Timestamp, WritingStyle};

use crate::normalize::Utterance;
use crate::temporal::patterns::OFFSET_ANSWER;
use crate::temporal::TemporalParser;
use crate::types::{CaptureState, ParseOutcome, PeriodHint, Turn};

const PROMPT_WHEN: &str = "When should I remind you?";
const PROMPT_WHEN_RETRY: &str =
    "Sorry, I didn't catch a time. Try something like \"tomorrow at 9 am\".";
const PROMPT_MAIN_ALERT: &str = "Should I alert you at the due time?";
const PROMPT_MAIN_ALERT_RETRY: &str = "Please answer yes or no — alert you at the due time?";
const PROMPT_SECOND_ALERT: &str = "Do you want a second, earlier alert?";
const PROMPT_SECOND_ALERT_RETRY: &str = "Please answer yes or no — a second, earlier alert?";
const PROMPT_OFFSET: &str = "How long before should the early alert fire?";
const PROMPT_OFFSET_RETRY: &str = "Try a duration like \"30 minutes\" or \"2 hours\".";

/// Finite-state conversation manager for one capture session.
///
/// Owned by the caller's session object; a multi-session host needs one
/// instance per session.
pub struct CaptureDialogue {
    parser: TemporalParser,
    style: WritingStyle,
    state: CaptureState,
}

impl CaptureDialogue {
    pub fn new(config: &CaptureConfig) -> Self {
        Self {
            parser: TemporalParser::new(config.default_early_alert_minutes),
            style: config.writing_style,
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    /// Explicit abandon transition back to `Idle`.
    ///
    /// Idle-timeout policy belongs to the calling session manager; it calls
    /// this, there is no timer inside the dialogue.
    pub fn reset(&mut self) {
        debug!(from = %self.state, "dialogue reset");
        self.state = CaptureState::Idle;
    }

    /// Consume one utterance and produce the next prompt, plus the
    /// finalized draft when this turn completed the conversation.
    pub fn advance(&mut self, utterance: &Utterance, now: DateTime<Local>) -> Turn {
        let state = std::mem::replace(&mut self.state, CaptureState::Idle);
        let (next, turn) = self.step(state, utterance, now);
        self.state = next;
        debug!(state = %self.state, finalized = turn.draft.is_some(), "dialogue turn");
        turn
    }

    fn step(
        &self,
        state: CaptureState,
        utterance: &Utterance,
        now: DateTime<Local>,
    ) -> (CaptureState, Turn) {
        match state {
            CaptureState::Idle => self.step_idle(utterance, now),

            CaptureState::HaveTitle {
                title,
                raw_text,
                early_offset,
            } => {
                // Offsets may arrive late ("tomorrow at 9 with a 10 minute
                // warning"); the reply's offset wins over the stashed one.
                let early_offset = self
                    .parser
                    .extract_early_alert(utterance)
                    .or(early_offset);
                match self.parser.parse_time_expression(utterance, now) {
                    Some(due) => (
                        CaptureState::AwaitingMainAlertAnswer {
                            title,
                            raw_text,
                            due,
                            early_offset,
                        },
                        Turn::prompt(PROMPT_MAIN_ALERT),
                    ),
                    None => (
                        CaptureState::HaveTitle {
                            title,
                            raw_text,
                            early_offset,
                        },
                        Turn::prompt(PROMPT_WHEN_RETRY),
                    ),
                }
            }

            CaptureState::AwaitingMainAlertAnswer {
                title,
                raw_text,
                due,
                early_offset,
            } => match parse_yes_no(utterance.as_str()) {
                Some(wants_main) => match early_offset {
                    // The opening utterance already asked for an early
                    // alert; nothing left to clarify.
                    Some(offset) => (
                        CaptureState::Idle,
                        self.finalize(title, raw_text, due, wants_main, Some(offset), now),
                    ),
                    None => (
                        CaptureState::AwaitingSecondAlertAnswer {
                            title,
                            raw_text,
                            due,
                            wants_main,
                        },
                        Turn::prompt(PROMPT_SECOND_ALERT),
                    ),
                },
                None => (
                    CaptureState::AwaitingMainAlertAnswer {
                        title,
                        raw_text,
                        due,
                        early_offset,
                    },
                    Turn::prompt(PROMPT_MAIN_ALERT_RETRY),
                ),
            },

            CaptureState::AwaitingSecondAlertAnswer {
                title,
                raw_text,
                due,
                wants_main,
            } => match parse_yes_no(utterance.as_str()) {
                Some(true) => (
                    CaptureState::AwaitingOffsetAnswer {
                        title,
                        raw_text,
                        due,
                        wants_main,
                    },
                    Turn::prompt(PROMPT_OFFSET),
                ),
                Some(false) => (
                    CaptureState::Idle,
                    self.finalize(title, raw_text, due, wants_main, None, now),
                ),
                None => (
                    CaptureState::AwaitingSecondAlertAnswer {
                        title,
                        raw_text,
                        due,
                        wants_main,
                    },
                    Turn::prompt(PROMPT_SECOND_ALERT_RETRY),
                ),
            },

            CaptureState::AwaitingOffsetAnswer {
                title,
                raw_text,
                due,
                wants_main,
            } => match parse_offset_minutes(utterance.as_str()) {
                Some(offset) => (
                    CaptureState::Idle,
                    self.finalize(title, raw_text, due, wants_main, Some(offset), now),
                ),
                None => (
                    CaptureState::AwaitingOffsetAnswer {
                        title,
                        raw_text,
                        due,
                        wants_main,
                    },
                    Turn::prompt(PROMPT_OFFSET_RETRY),
                ),
            },
        }
    }

    fn step_idle(&self, utterance: &Utterance, now: DateTime<Local>) -> (CaptureState, Turn) {
        match self.parser.parse(utterance, now) {
            ParseOutcome::Complete(draft) => match draft.due_at {
                Some(due) => (
                    CaptureState::AwaitingMainAlertAnswer {
                        title: draft.title,
                        raw_text: draft.raw_transcript,
                        due,
                        early_offset: draft.early_alert_offset_minutes,
                    },
                    Turn::prompt(PROMPT_MAIN_ALERT),
                ),
                // A Complete outcome always carries a due time; if it ever
                // did not, fall back to asking rather than crashing.
                None => (
                    CaptureState::HaveTitle {
                        title: draft.title,
                        raw_text: draft.raw_transcript,
                        early_offset: draft.early_alert_offset_minutes,
                    },
                    Turn::prompt(PROMPT_WHEN),
                ),
            },
            ParseOutcome::NeedsTime {
                title, base_date, period,
            } => (
                CaptureState::HaveTitle {
                    title,
                    raw_text: utterance.as_str().to_string(),
                    early_offset: self.parser.extract_early_alert(utterance),
                },
                Turn::prompt(needs_time_prompt(base_date, period)),
            ),
            ParseOutcome::NeedsWhen { title, raw_text } => (
                CaptureState::HaveTitle {
                    title,
                    raw_text,
                    early_offset: self.parser.extract_early_alert(utterance),
                },
                Turn::prompt(PROMPT_WHEN),
            ),
        }
    }

    fn finalize(
        &self,
        title: String,
        raw_text: String,
        due: Timestamp,
        wants_main: bool,
        early_offset: Option<u32>,
        now: DateTime<Local>,
    ) -> Turn {
        // An early alert that would already be in the past is dropped
        // silently; the reminder itself still stands.
        let early_offset = early_offset.filter(|offset| {
            let fires_at = due.0 - i64::from(*offset) * 60;
            fires_at > now.timestamp()
        });
        let title = self.style.apply(&title);
        let prompt = format!("Saved \"{}\".", title);
        let draft = ReminderDraft {
            raw_transcript: raw_text,
            title,
            due_at: Some(due),
            wants_main_alert: wants_main,
            early_alert_offset_minutes: early_offset,
        };
        Turn::finalized(prompt, draft)
    }
}

fn needs_time_prompt(base_date: NaiveDate, period: Option<PeriodHint>) -> String {
    match period {
        Some(period) => format!(
            "What time on {} — you said {}?",
            base_date.format("%A"),
            period
        ),
        None => format!("What time on {}?", base_date.format("%A")),
    }
}

/// Affirmative/negative answer words accepted mid-dialogue.
fn parse_yes_no(text: &str) -> Option<bool> {
    for token in text
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
    {
        match token.to_lowercase().as_str() {
            "yes" | "yeah" | "yep" | "yup" | "sure" | "ok" | "okay" => return Some(true),
            "no" | "nope" | "nah" => return Some(false),
            _ => continue,
        }
    }
    None
}

/// Duration answer to the offset question, in minutes.
fn parse_offset_minutes(text: &str) -> Option<u32> {
    let caps = OFFSET_ANSWER.captures(text)?;
    let n: u32 = caps[1].parse().ok()?;
    let unit = caps[2].to_lowercase();
    let minutes = match unit.as_str() {
        "minute" | "min" => n,
        "hour" | "hr" => n.checked_mul(60)?,
        "day" => n.checked_mul(1_440)?,
        _ => return None,
    };
    Some(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dialogue() -> CaptureDialogue {
        CaptureDialogue::new(&CaptureConfig::default())
    }

    /// Tuesday, March 10th 2026, 10:00 local.
    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 10, 0, 0).unwrap()
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Timestamp {
        Timestamp::from_local(Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap())
    }

    fn say(d: &mut CaptureDialogue, text: &str) -> Turn {
        d.advance(&Utterance::new(text), fixed_now())
    }

    // =====================================================================
    // Opening turns
    // =====================================================================

    #[test]
    fn test_complete_utterance_goes_to_main_alert_question() {
        let mut d = dialogue();
        let turn = say(&mut d, "Call the dentist tomorrow at 3 pm");
        assert_eq!(turn.prompt, PROMPT_MAIN_ALERT);
        assert!(turn.draft.is_none());
        match d.state() {
            CaptureState::AwaitingMainAlertAnswer { title, due, .. } => {
                assert_eq!(title, "Call the dentist");
                assert_eq!(*due, local(2026, 3, 11, 15, 0));
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_title_only_asks_when_then_accepts_time() {
        let mut d = dialogue();
        let turn = say(&mut d, "Buy milk");
        assert_eq!(turn.prompt, PROMPT_WHEN);
        match d.state() {
            CaptureState::HaveTitle { title, .. } => assert_eq!(title, "Buy milk"),
            other => panic!("unexpected state {:?}", other),
        }

        let turn = say(&mut d, "tomorrow at 9 am");
        assert_eq!(turn.prompt, PROMPT_MAIN_ALERT);
        match d.state() {
            CaptureState::AwaitingMainAlertAnswer { title, due, .. } => {
                assert_eq!(title, "Buy milk");
                assert_eq!(*due, local(2026, 3, 11, 9, 0));
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_needs_time_prompt_mentions_day() {
        let mut d = dialogue();
        let turn = say(&mut d, "dentist tomorrow");
        assert!(turn.prompt.contains("Wednesday"), "prompt: {}", turn.prompt);
    }

    // =====================================================================
    // Full conversation paths
    // =====================================================================

    #[test]
    fn test_happy_path_no_second_alert() {
        let mut d = dialogue();
        say(&mut d, "call the dentist tomorrow at 3 pm");
        let turn = say(&mut d, "yes");
        assert_eq!(turn.prompt, PROMPT_SECOND_ALERT);
        let turn = say(&mut d, "no");

        let draft = turn.draft.expect("draft should finalize");
        assert_eq!(draft.title, "Call the dentist"); // sentence style
        assert_eq!(draft.due_at, Some(local(2026, 3, 11, 15, 0)));
        assert!(draft.wants_main_alert);
        assert_eq!(draft.early_alert_offset_minutes, None);
        assert_eq!(*d.state(), CaptureState::Idle);
    }

    #[test]
    fn test_second_alert_with_offset() {
        let mut d = dialogue();
        say(&mut d, "submit expenses tomorrow at 4 pm");
        say(&mut d, "yes");
        let turn = say(&mut d, "yes");
        assert_eq!(turn.prompt, PROMPT_OFFSET);

        let turn = say(&mut d, "30 minutes");
        let draft = turn.draft.expect("draft should finalize");
        assert_eq!(draft.early_alert_offset_minutes, Some(30));
        assert_eq!(*d.state(), CaptureState::Idle);
    }

    #[test]
    fn test_offset_in_hours() {
        let mut d = dialogue();
        say(&mut d, "board flight tomorrow at 6 pm");
        say(&mut d, "yes");
        say(&mut d, "yes");
        let turn = say(&mut d, "2 hours");
        let draft = turn.draft.unwrap();
        assert_eq!(draft.early_alert_offset_minutes, Some(120));
    }

    #[test]
    fn test_declining_main_alert_still_finalizes() {
        let mut d = dialogue();
        say(&mut d, "water plants tomorrow at 8 am");
        say(&mut d, "no");
        let turn = say(&mut d, "no");
        let draft = turn.draft.unwrap();
        assert!(!draft.wants_main_alert);
    }

    // =====================================================================
    // Re-prompting (never aborts, never errors)
    // =====================================================================

    #[test]
    fn test_unparseable_time_re_prompts_in_place() {
        let mut d = dialogue();
        say(&mut d, "Buy milk");
        let turn = say(&mut d, "whenever you feel like it");
        assert_eq!(turn.prompt, PROMPT_WHEN_RETRY);
        assert!(matches!(d.state(), CaptureState::HaveTitle { .. }));

        // Dialogue is still alive; a usable answer proceeds.
        let turn = say(&mut d, "in 2 hours");
        assert_eq!(turn.prompt, PROMPT_MAIN_ALERT);
    }

    #[test]
    fn test_garbled_yes_no_re_prompts() {
        let mut d = dialogue();
        say(&mut d, "call bob tomorrow at 2 pm");
        let turn = say(&mut d, "banana");
        assert_eq!(turn.prompt, PROMPT_MAIN_ALERT_RETRY);
        assert!(matches!(
            d.state(),
            CaptureState::AwaitingMainAlertAnswer { .. }
        ));
    }

    #[test]
    fn test_garbled_offset_re_prompts() {
        let mut d = dialogue();
        say(&mut d, "call bob tomorrow at 2 pm");
        say(&mut d, "yes");
        say(&mut d, "yes");
        let turn = say(&mut d, "a little while before");
        assert_eq!(turn.prompt, PROMPT_OFFSET_RETRY);
        assert!(matches!(
            d.state(),
            CaptureState::AwaitingOffsetAnswer { .. }
        ));
    }

    // =====================================================================
    // Early-alert handling
    // =====================================================================

    #[test]
    fn test_preseeded_offset_skips_second_alert_question() {
        let mut d = dialogue();
        say(&mut d, "take out trash tomorrow at 6 pm with a 15 minute warning");
        let turn = say(&mut d, "yes");
        let draft = turn.draft.expect("should finalize without second question");
        assert_eq!(draft.early_alert_offset_minutes, Some(15));
        assert!(draft.wants_main_alert);
        assert_eq!(*d.state(), CaptureState::Idle);
    }

    #[test]
    fn test_offset_survives_needs_when_path() {
        let mut d = dialogue();
        say(&mut d, "buy cake with a 10 minute warning");
        say(&mut d, "tomorrow at 2 pm");
        let turn = say(&mut d, "yes");
        let draft = turn.draft.unwrap();
        assert_eq!(draft.early_alert_offset_minutes, Some(10));
    }

    #[test]
    fn test_past_due_early_alert_silently_dropped() {
        let mut d = dialogue();
        // Due in 10 minutes; a 2-hour early alert would fire in the past.
        say(&mut d, "join the call in 10 minutes");
        say(&mut d, "yes");
        say(&mut d, "yes");
        let turn = say(&mut d, "2 hours");
        let draft = turn.draft.expect("finalizes despite dropped offset");
        assert_eq!(draft.early_alert_offset_minutes, None);
    }

    // =====================================================================
    // Style, reset, transcript
    // =====================================================================

    #[test]
    fn test_writing_style_applied_at_finalize() {
        let config = CaptureConfig {
            writing_style: WritingStyle::AllCaps,
            ..CaptureConfig::default()
        };
        let mut d = CaptureDialogue::new(&config);
        say(&mut d, "buy milk tomorrow at 9 am");
        say(&mut d, "yes");
        let turn = say(&mut d, "no");
        assert_eq!(turn.draft.unwrap().title, "BUY MILK");
    }

    #[test]
    fn test_reset_returns_to_idle_from_any_state() {
        let mut d = dialogue();
        say(&mut d, "call bob tomorrow at 2 pm");
        assert!(matches!(
            d.state(),
            CaptureState::AwaitingMainAlertAnswer { .. }
        ));
        d.reset();
        assert_eq!(*d.state(), CaptureState::Idle);
    }

    #[test]
    fn test_raw_transcript_is_opening_utterance() {
        let mut d = dialogue();
        say(&mut d, "remind me to stretch tomorrow at 9 am");
        say(&mut d, "yes");
        let turn = say(&mut d, "no");
        assert_eq!(
            turn.draft.unwrap().raw_transcript,
            "remind me to stretch tomorrow at 9 am"
        );
    }

    // =====================================================================
    // Answer-word parsing
    // =====================================================================

    #[test]
    fn test_parse_yes_no_variants() {
        assert_eq!(parse_yes_no("yes"), Some(true));
        assert_eq!(parse_yes_no("Yeah, do that"), Some(true));
        assert_eq!(parse_yes_no("yep"), Some(true));
        assert_eq!(parse_yes_no("sure"), Some(true));
        assert_eq!(parse_yes_no("no"), Some(false));
        assert_eq!(parse_yes_no("Nope."), Some(false));
        assert_eq!(parse_yes_no("nah"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
        assert_eq!(parse_yes_no(""), None);
    }

    #[test]
    fn test_parse_offset_minutes() {
        assert_eq!(parse_offset_minutes("30 minutes"), Some(30));
        assert_eq!(parse_offset_minutes("2 hours"), Some(120));
        assert_eq!(parse_offset_minutes("1 day"), Some(1_440));
        assert_eq!(parse_offset_minutes("an eternity"), None);
    }
}
