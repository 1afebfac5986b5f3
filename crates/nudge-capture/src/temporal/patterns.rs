//! Compiled regex sets for the temporal passes.
//!
//! One static per pass, compiled once and reused across calls. The pass
//! order lives in the parser; this module only defines what each pass
//! matches. Later passes may re-match text left behind by earlier ones, so
//! every pattern must stand on its own.

use regex::Regex;
use std::sync::LazyLock;

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("Invalid temporal regex")
}

// =============================================================================
// Pass 1: early-alert phrases
// =============================================================================

pub(crate) struct EarlyAlertPatterns {
    /// "with [a] N minute/hour warning|alert|heads up"
    pub with_offset: Regex,
    /// "warn/alert/remind me N minute(s)/hour(s) before|early"
    pub lead_offset: Regex,
    /// "with [an] early alert|warning" (no duration; default applies)
    pub implicit: Regex,
}

pub(crate) static EARLY_ALERT: LazyLock<EarlyAlertPatterns> = LazyLock::new(|| EarlyAlertPatterns {
    with_offset: re(
        r"(?i)\bwith\s+(?:a\s+)?(\d+)\s*(minute|min|hour|hr)s?\s+(?:warning|alert|heads\s+up)\b",
    ),
    lead_offset: re(
        r"(?i)\b(?:warn|alert|remind)\s+me\s+(\d+)\s*(minute|min|hour|hr)s?\s+(?:before|early|earlier|ahead)\b",
    ),
    implicit: re(r"(?i)\bwith\s+(?:an?\s+)?early\s+(?:alert|warning|reminder)\b"),
});

// =============================================================================
// Pass 2: relative duration
// =============================================================================

/// "in N minute(s)/hour(s)/day(s)"
pub(crate) static RELATIVE_DURATION: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\bin\s+(\d+)\s*(minute|min|hour|hr|day)s?\b"));

// =============================================================================
// Pass 3: specific dates
// =============================================================================

pub(crate) struct DatePatterns {
    /// "January 19th", optionally preceded by "on"
    pub month_day: Regex,
    /// "M/D" or "M/D/YY" or "M/D/YYYY", optionally preceded by "on"
    pub slash: Regex,
}

pub(crate) static DATE: LazyLock<DatePatterns> = LazyLock::new(|| DatePatterns {
    month_day: re(
        r"(?i)\b(?:on\s+)?(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})(?:st|nd|rd|th)?\b",
    ),
    slash: re(r"(?i)\b(?:on\s+)?(\d{1,2})/(\d{1,2})(?:/(\d{2,4}))?\b"),
});

// =============================================================================
// Pass 4: relative day keywords
// =============================================================================

pub(crate) struct DayPatterns {
    pub today: Regex,
    pub tomorrow: Regex,
    /// optional "next" + weekday name, optionally preceded by "on"
    pub weekday: Regex,
}

pub(crate) static DAY: LazyLock<DayPatterns> = LazyLock::new(|| DayPatterns {
    today: re(r"(?i)\btoday\b"),
    tomorrow: re(r"(?i)\btomorrow\b"),
    weekday: re(
        r"(?i)\b(?:on\s+)?(?:(next)\s+)?(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b",
    ),
});

// =============================================================================
// Pass 5: vague periods
// =============================================================================

pub(crate) struct PeriodPatterns {
    /// "morning"/"afternoon"/"evening"/"night" with optional lead-in words
    pub named: Regex,
    /// "tonight" narrows to the evening and anchors the day to today
    pub tonight: Regex,
}

pub(crate) static PERIOD: LazyLock<PeriodPatterns> = LazyLock::new(|| PeriodPatterns {
    named: re(r"(?i)\b(?:in\s+the\s+|this\s+|at\s+)?(morning|afternoon|evening|night)\b"),
    tonight: re(r"(?i)\btonight\b"),
});

// =============================================================================
// Pass 6: explicit clock time
// =============================================================================

pub(crate) struct ClockPatterns {
    /// "(at|by) H[:MM] [am|pm]"
    pub at_time: Regex,
    /// "H[:MM] am|pm" without a preposition; the meridiem makes it a time.
    pub bare_meridiem: Regex,
    /// "H:MM" without a preposition; the colon makes it a time.
    pub bare_colon: Regex,
    /// "noon"/"midday"/"midnight", with or without "at"
    pub word_time: Regex,
}

pub(crate) static CLOCK: LazyLock<ClockPatterns> = LazyLock::new(|| ClockPatterns {
    at_time: re(
        r"(?i)\b(?:at|by)\s+(\d{1,2})(?::([0-5]\d))?\s*(am|pm|a\.m\.|p\.m\.)?(?:\b|\s|$)",
    ),
    bare_meridiem: re(r"(?i)\b(\d{1,2})(?::([0-5]\d))?\s*(am|pm|a\.m\.|p\.m\.)(?:\b|\s|$)"),
    bare_colon: re(r"(?i)\b(\d{1,2}):([0-5]\d)\b"),
    word_time: re(r"(?i)\b(?:(?:at|by)\s+)?(noon|midday|midnight)\b"),
});

/// Bare duration answer to the "how long before?" question:
/// "30 minutes", "2 hours", "1 day".
pub(crate) static OFFSET_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?i)\b(\d+)\s*(minute|min|hour|hr|day)s?\b"));

// =============================================================================
// Title cleanup
// =============================================================================

pub(crate) struct FillerPatterns {
    /// Leading command filler: "remind me to ...", "set a reminder for ..."
    pub leading: Regex,
    /// Connector left dangling at the end after scheduling text was removed.
    pub trailing_connector: Regex,
}

pub(crate) static FILLER: LazyLock<FillerPatterns> = LazyLock::new(|| FillerPatterns {
    leading: re(
        r"(?i)^(?:please\s+)?(?:remind\s+me(?:\s+(?:to|about|that))?|set\s+a\s+reminder(?:\s+(?:to|for|about))?|don'?t\s+(?:let\s+me\s+)?forget(?:\s+to)?|remember\s+to|i\s+need\s+to)\s+",
    ),
    trailing_connector: re(r"(?i)[\s,]+(?:at|on|by|for|in|and|the|a|an)$"),
});
