//! Utterance normalization.
//!
//! Converts spelled-out numbers to digits so that the downstream pattern
//! passes only ever deal with the digit form ("in fifteen minutes" becomes
//! "in 15 minutes"). One `Utterance` is created and consumed per turn.

use regex::Regex;
use std::sync::LazyLock;

/// Spelled-out numbers recognized by the normalizer.
///
/// Covers the values people actually say for reminder offsets and counts.
/// Compounds like "twenty five" normalize in two steps ("20 5") and are not
/// joined; the grammar never needs them.
static NUMBER_WORDS: &[(&str, &str)] = &[
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("twelve", "12"),
    ("thirteen", "13"),
    ("fourteen", "14"),
    ("fifteen", "15"),
    ("sixteen", "16"),
    ("seventeen", "17"),
    ("eighteen", "18"),
    ("nineteen", "19"),
    ("twenty", "20"),
    ("thirty", "30"),
    ("forty", "40"),
    ("fifty", "50"),
    ("sixty", "60"),
    ("ninety", "90"),
];

static NUMBER_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alts: Vec<&str> = NUMBER_WORDS.iter().map(|(w, _)| *w).collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", alts.join("|"))).expect("Invalid number-word regex")
});

// "in an hour", "with a minute warning" -> "in 1 hour", "with 1 minute warning"
static ARTICLE_UNIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(an?)\s+(minute|min|hour|hr|day)s?\b").expect("Invalid article-unit regex")
});

// "half an hour" -> "30 minutes"
static HALF_HOUR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bhalf\s+an?\s+(?:hour|hr)\b").expect("Invalid half-hour regex")
});

/// An immutable, normalized unit of user text; one per dialogue turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    text: String,
}

impl Utterance {
    /// Normalize raw transcript text into an utterance.
    ///
    /// Spelled-out numbers become digits, "half an hour" becomes
    /// "30 minutes", indefinite articles before a duration unit become "1",
    /// and runs of whitespace collapse. Case is preserved for the title.
    pub fn new(raw: &str) -> Self {
        let text = HALF_HOUR_RE.replace_all(raw.trim(), "30 minutes");
        let text = NUMBER_WORD_RE.replace_all(&text, |caps: &regex::Captures| {
            let word = caps.get(0).map_or("", |m| m.as_str()).to_lowercase();
            NUMBER_WORDS
                .iter()
                .find(|(w, _)| *w == word)
                .map(|(_, d)| (*d).to_string())
                .unwrap_or(word)
        });
        let text = ARTICLE_UNIT_RE.replace_all(&text, |caps: &regex::Captures| {
            let unit = caps.get(2).map_or("", |m| m.as_str());
            format!("1 {}", unit)
        });
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl std::fmt::Display for Utterance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}
