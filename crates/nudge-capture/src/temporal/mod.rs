//! Natural-language due-time parsing.
//!
//! Runs a fixed sequence of pattern passes over one utterance: early-alert
//! phrases, relative durations, specific dates, day keywords, vague
//! periods, explicit clock times. Whatever the passes consume is also what
//! gets stripped from the title, so the two stay in lockstep. Each pass is
//! its own step on a working copy of the text; later passes may re-match
//! text left by earlier ones, which keeps the ordering auditable.

pub(crate) mod patterns;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use regex::Regex;
use tracing::debug;

use nudge_core::types::{ReminderDraft, Timestamp};

use crate::normalize::Utterance;
use crate::types::{ParseOutcome, PeriodHint};
use patterns::{CLOCK, DATE, DAY, EARLY_ALERT, FILLER, PERIOD, RELATIVE_DURATION};

// =============================================================================
// Scan intermediates
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Clock {
    hour: u32,
    minute: u32,
    meridiem: Option<Meridiem>,
}

impl Clock {
    /// Resolve to a 24-hour (hour, minute) pair.
    ///
    /// Without a meridiem, hours 13-23 are already unambiguous. With an
    /// established day reference, a bare hour falls back to the daytime
    /// heuristic: 8-12 reads as AM, 1-7 as PM. Without a day reference a
    /// bare ambiguous hour resolves to nothing, forcing clarification.
    fn hour24(&self, has_day: bool) -> Option<(u32, u32)> {
        if self.minute > 59 {
            return None;
        }
        match self.meridiem {
            Some(Meridiem::Am) => match self.hour {
                12 => Some((0, self.minute)),
                1..=11 => Some((self.hour, self.minute)),
                _ => None,
            },
            Some(Meridiem::Pm) => match self.hour {
                12 => Some((12, self.minute)),
                1..=11 => Some((self.hour + 12, self.minute)),
                _ => None,
            },
            None => match self.hour {
                13..=23 => Some((self.hour, self.minute)),
                8..=12 if has_day => Some((self.hour, self.minute)),
                1..=7 if has_day => Some((self.hour + 12, self.minute)),
                0 if has_day => Some((0, self.minute)),
                _ => None,
            },
        }
    }
}

/// Everything one pass sequence pulled out of an utterance.
#[derive(Debug)]
struct Scan {
    early_offset_minutes: Option<u32>,
    duration: Option<Duration>,
    base_date: Option<NaiveDate>,
    period: Option<PeriodHint>,
    clock: Option<Clock>,
    title: String,
}

// =============================================================================
// TemporalParser
// =============================================================================

/// Stateless due-time extractor.
///
/// `now` is always a parameter so resolution is deterministic under test;
/// the only configuration is the default early-alert offset applied when
/// the user asks for an early alert without naming a duration.
pub struct TemporalParser {
    pub default_early_alert_minutes: u32,
}

impl TemporalParser {
    pub fn new(default_early_alert_minutes: u32) -> Self {
        Self {
            default_early_alert_minutes,
        }
    }

    /// Parse one utterance into a complete draft or a clarification request.
    pub fn parse(&self, utterance: &Utterance, now: DateTime<Local>) -> ParseOutcome {
        let scan = self.scan(utterance, now);

        // Relative durations always resolve and take precedence. A span
        // past the representable range reads as no duration at all.
        if let Some(duration) = scan.duration {
            if let Some(due) = now.checked_add_signed(duration) {
                debug!(due = due.timestamp(), "resolved relative duration");
                return ParseOutcome::Complete(self.draft(utterance, &scan, due));
            }
        }

        match (scan.base_date, scan.clock) {
            (Some(date), Some(clock)) => match resolve_on_date(date, clock, true) {
                Some(due) => {
                    debug!(due = due.timestamp(), "resolved day plus clock time");
                    ParseOutcome::Complete(self.draft(utterance, &scan, due))
                }
                // Clock digits were present but unusable (e.g. "at 25").
                None => ParseOutcome::NeedsTime {
                    title: scan.title,
                    base_date: date,
                    period: scan.period,
                },
            },
            (Some(date), None) => {
                debug!(%date, period = ?scan.period, "day established, time missing");
                ParseOutcome::NeedsTime {
                    title: scan.title,
                    base_date: date,
                    period: scan.period,
                }
            }
            (None, Some(clock)) => match resolve_today_or_tomorrow(clock, now) {
                Some(due) => {
                    debug!(due = due.timestamp(), "resolved bare clock time");
                    ParseOutcome::Complete(self.draft(utterance, &scan, due))
                }
                // Ambiguous bare hour: treated as no usable time at all.
                None => ParseOutcome::NeedsWhen {
                    title: scan.title,
                    raw_text: utterance.as_str().to_string(),
                },
            },
            (None, None) => ParseOutcome::NeedsWhen {
                title: scan.title,
                raw_text: utterance.as_str().to_string(),
            },
        }
    }

    /// Time-only re-parse for mid-dialogue replies and edit targets.
    ///
    /// Succeeds only when the reply fully resolves a due time; a bare day
    /// or vague period is not enough.
    pub fn parse_time_expression(
        &self,
        utterance: &Utterance,
        now: DateTime<Local>,
    ) -> Option<Timestamp> {
        let scan = self.scan(utterance, now);

        if let Some(duration) = scan.duration {
            return now.checked_add_signed(duration).map(Timestamp::from_local);
        }
        match (scan.base_date, scan.clock) {
            (Some(date), Some(clock)) => {
                resolve_on_date(date, clock, true).map(Timestamp::from_local)
            }
            (None, Some(clock)) => {
                resolve_today_or_tomorrow(clock, now).map(Timestamp::from_local)
            }
            _ => None,
        }
    }

    /// Early-alert offset named in the utterance, if any.
    ///
    /// Used by the dialogue to keep an offset confirmed in the opening
    /// utterance attached to whatever draft eventually results.
    pub fn extract_early_alert(&self, utterance: &Utterance) -> Option<u32> {
        let mut working = utterance.as_str().to_string();
        self.take_early_alert(&mut working)
    }

    /// Strip every scheduling phrase from `text` and tidy the remainder.
    ///
    /// Running this over an already-stripped title is a no-op.
    pub fn extract_title(&self, text: &str, now: DateTime<Local>) -> String {
        let utterance = Utterance::new(text);
        self.scan(&utterance, now).title
    }

    /// The day reference named in the utterance, if any (used by the
    /// command classifier for "all for <day>" cancellations).
    pub(crate) fn extract_base_date(
        &self,
        utterance: &Utterance,
        now: DateTime<Local>,
    ) -> Option<NaiveDate> {
        self.scan(utterance, now).base_date
    }

    // -----------------------------------------------------------------
    // Pass sequence
    // -----------------------------------------------------------------

    fn scan(&self, utterance: &Utterance, now: DateTime<Local>) -> Scan {
        let mut working = utterance.as_str().to_string();

        // Pass 1: early-alert phrases, independent of due-time resolution.
        let early_offset_minutes = self.take_early_alert(&mut working);

        // Leading command filler is not scheduling text but never belongs
        // in a title either.
        if let Some(m) = FILLER.leading.find(&working) {
            working.replace_range(m.range(), "");
        }

        // Pass 2: relative duration.
        let duration = take_duration(&mut working);

        // Pass 3: specific dates.
        let mut base_date = take_specific_date(&mut working, now.date_naive());

        // Pass 4: relative day keywords.
        let keyword_date = take_day_keyword(&mut working, now.date_naive());
        if base_date.is_none() {
            base_date = keyword_date;
        }

        // Pass 5: vague periods. "tonight" also anchors the day to today.
        let (period, tonight) = take_period(&mut working);
        if tonight && base_date.is_none() {
            base_date = Some(now.date_naive());
        }

        // Pass 6: explicit clock time.
        let clock = take_clock(&mut working);

        let title = tidy_title(&working, utterance.as_str());

        Scan {
            early_offset_minutes,
            duration,
            base_date,
            period,
            clock,
            title,
        }
    }

    fn take_early_alert(&self, working: &mut String) -> Option<u32> {
        for re in [&EARLY_ALERT.with_offset, &EARLY_ALERT.lead_offset] {
            if let Some(groups) = capture_and_blank(re, working) {
                let n: u32 = groups.first()?.as_deref()?.parse().ok()?;
                let unit = groups.get(1)?.as_deref()?.to_lowercase();
                let minutes = if unit.starts_with('h') {
                    n.checked_mul(60)?
                } else {
                    n
                };
                return Some(minutes);
            }
        }
        if let Some(m) = EARLY_ALERT.implicit.find(working) {
            let range = m.range();
            working.replace_range(range, " ");
            return Some(self.default_early_alert_minutes);
        }
        None
    }

    fn draft(&self, utterance: &Utterance, scan: &Scan, due: DateTime<Local>) -> ReminderDraft {
        ReminderDraft {
            raw_transcript: utterance.as_str().to_string(),
            title: scan.title.clone(),
            due_at: Some(Timestamp::from_local(due)),
            wants_main_alert: false,
            early_alert_offset_minutes: scan.early_offset_minutes,
        }
    }
}

// =============================================================================
// Individual passes
// =============================================================================

fn take_duration(working: &mut String) -> Option<Duration> {
    let groups = capture_and_blank(&RELATIVE_DURATION, working)?;
    let n: i64 = groups.first()?.as_deref()?.parse().ok()?;
    let unit = groups.get(1)?.as_deref()?.to_lowercase();
    // Spans the calendar cannot hold read as no duration at all.
    match unit.as_str() {
        "minute" | "min" => Duration::try_minutes(n),
        "hour" | "hr" => Duration::try_hours(n),
        "day" => Duration::try_days(n),
        _ => None,
    }
}

fn take_specific_date(working: &mut String, today: NaiveDate) -> Option<NaiveDate> {
    if let Some(caps) = DATE.month_day.captures(working) {
        let range = caps.get(0).map(|m| m.range())?;
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        if let Some(date) = rolled_date(today, month, day, None) {
            working.replace_range(range, " ");
            return Some(date);
        }
        return None;
    }

    if let Some(caps) = DATE.slash.captures(working) {
        let range = caps.get(0).map(|m| m.range())?;
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year: Option<i32> = caps.get(3).and_then(|m| {
            let y: i32 = m.as_str().parse().ok()?;
            Some(if y < 100 { 2000 + y } else { y })
        });
        if let Some(date) = rolled_date(today, month, day, year) {
            working.replace_range(range, " ");
            return Some(date);
        }
    }
    None
}

/// Default the year to the current one, rolling forward a year if that
/// lands in the past. An explicit year is taken literally.
fn rolled_date(today: NaiveDate, month: u32, day: u32, year: Option<i32>) -> Option<NaiveDate> {
    if let Some(y) = year {
        return NaiveDate::from_ymd_opt(y, month, day);
    }
    let candidate = NaiveDate::from_ymd_opt(today.year(), month, day)?;
    if candidate < today {
        NaiveDate::from_ymd_opt(today.year() + 1, month, day)
    } else {
        Some(candidate)
    }
}

fn take_day_keyword(working: &mut String, today: NaiveDate) -> Option<NaiveDate> {
    let mut found: Option<NaiveDate> = None;

    if let Some(m) = DAY.today.find(working) {
        let range = m.range();
        working.replace_range(range, " ");
        found = Some(today);
    }
    if let Some(m) = DAY.tomorrow.find(working) {
        let range = m.range();
        working.replace_range(range, " ");
        found = found.or_else(|| today.succ_opt());
    }
    if let Some(caps) = DAY.weekday.captures(working) {
        let range = caps.get(0).map(|m| m.range());
        let target = weekday_from_name(&caps[2]);
        if let (Some(range), Some(target)) = (range, target) {
            working.replace_range(range, " ");
            // "next <weekday>" on the matching weekday resolves 7 days out,
            // same as the bare form; both mean the next strictly-future
            // occurrence.
            found = found.or_else(|| Some(next_weekday(today, target)));
        }
    }
    found
}

/// Next strictly-future occurrence of `target` counted from `today`.
fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let ahead = (target.num_days_from_monday() as i64
        - today.weekday().num_days_from_monday() as i64
        + 7)
        % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    today + Duration::days(ahead)
}

fn take_period(working: &mut String) -> (Option<PeriodHint>, bool) {
    let mut tonight = false;
    if let Some(m) = PERIOD.tonight.find(working) {
        let range = m.range();
        working.replace_range(range, " ");
        tonight = true;
    }
    let mut period = tonight.then_some(PeriodHint::Evening);
    if let Some(caps) = PERIOD.named.captures(working) {
        let range = caps.get(0).map(|m| m.range());
        let hint = PeriodHint::from_keyword(&caps[1]);
        if let (Some(range), Some(hint)) = (range, hint) {
            working.replace_range(range, " ");
            period = period.or(Some(hint));
        }
    }
    (period, tonight)
}

fn take_clock(working: &mut String) -> Option<Clock> {
    if let Some(caps) = CLOCK.at_time.captures(working) {
        let range = caps.get(0).map(|m| m.range())?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        let meridiem = caps.get(3).map(|m| {
            if m.as_str().to_lowercase().starts_with('a') {
                Meridiem::Am
            } else {
                Meridiem::Pm
            }
        });
        if hour <= 23 {
            working.replace_range(range, " ");
            return Some(Clock {
                hour,
                minute,
                meridiem,
            });
        }
        return None;
    }

    // "5 pm" or "16:30" with no preposition, as in mid-dialogue replies
    // and edit targets.
    if let Some(caps) = CLOCK.bare_meridiem.captures(working) {
        let range = caps.get(0).map(|m| m.range())?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps
            .get(2)
            .map(|m| m.as_str().parse().unwrap_or(0))
            .unwrap_or(0);
        let meridiem = if caps[3].to_lowercase().starts_with('a') {
            Meridiem::Am
        } else {
            Meridiem::Pm
        };
        if hour <= 12 {
            working.replace_range(range, " ");
            return Some(Clock {
                hour,
                minute,
                meridiem: Some(meridiem),
            });
        }
        return None;
    }

    if let Some(caps) = CLOCK.bare_colon.captures(working) {
        let range = caps.get(0).map(|m| m.range())?;
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        if hour <= 23 {
            working.replace_range(range, " ");
            return Some(Clock {
                hour,
                minute,
                meridiem: None,
            });
        }
        return None;
    }

    if let Some(caps) = CLOCK.word_time.captures(working) {
        let range = caps.get(0).map(|m| m.range())?;
        let word = caps[1].to_lowercase();
        working.replace_range(range, " ");
        let clock = match word.as_str() {
            "noon" | "midday" => Clock {
                hour: 12,
                minute: 0,
                meridiem: Some(Meridiem::Pm),
            },
            _ => Clock {
                hour: 12,
                minute: 0,
                meridiem: Some(Meridiem::Am),
            },
        };
        return Some(clock);
    }
    None
}

// =============================================================================
// Resolution helpers
// =============================================================================

fn local_at(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Local>> {
    date.and_time(NaiveTime::from_hms_opt(hour, minute, 0)?)
        .and_local_timezone(Local)
        .single()
}

fn resolve_on_date(date: NaiveDate, clock: Clock, has_day: bool) -> Option<DateTime<Local>> {
    let (hour, minute) = clock.hour24(has_day)?;
    local_at(date, hour, minute)
}

/// A clock time with no day reference means today, rolling to tomorrow if
/// the moment already passed.
fn resolve_today_or_tomorrow(clock: Clock, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let (hour, minute) = clock.hour24(false)?;
    let today = local_at(now.date_naive(), hour, minute)?;
    if today > now {
        Some(today)
    } else {
        local_at(now.date_naive().succ_opt()?, hour, minute)
    }
}

// =============================================================================
// Title cleanup
// =============================================================================

fn tidy_title(stripped: &str, original: &str) -> String {
    let mut title = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    // A connector the schedule text was hanging off ("to stretch", "wash
    // the car at") is noise once that text is gone.
    static LEADING_CONNECTOR: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
        Regex::new(r"(?i)^(?:to|that|and)\s+").expect("Invalid connector regex")
    });
    title = LEADING_CONNECTOR.replace(&title, "").into_owned();
    loop {
        let next = FILLER.trailing_connector.replace(&title, "").into_owned();
        if next == title {
            break;
        }
        title = next;
    }

    let title = title.trim_matches([' ', ',', '.', '-']).to_string();
    if title.is_empty() {
        original.trim().to_string()
    } else {
        title
    }
}

// =============================================================================
// Small lookups
// =============================================================================

fn month_number(name: &str) -> Option<u32> {
    let n = match name.to_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(n)
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let wd = match name.to_lowercase().as_str() {
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(wd)
}

/// Remove the first match of `re` from `text`, returning its capture groups.
fn capture_and_blank(re: &Regex, text: &mut String) -> Option<Vec<Option<String>>> {
    let caps = re.captures(text)?;
    let whole = caps.get(0)?;
    let range = whole.range();
    let groups: Vec<Option<String>> = (1..caps.len())
        .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
        .collect();
    text.replace_range(range, " ");
    Some(groups)
}

// =============================================================================
// Tests
// =============================================================================
