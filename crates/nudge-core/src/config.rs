use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{NudgeError, Result};
use crate::types::WritingStyle;

/// Top-level configuration for the Nudge capture core.
///
/// Loaded from `~/.nudge/config.toml` by default. Each section corresponds
/// to one component; hosts embed this in their own settings surface.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NudgeConfig {
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub duplicate: DuplicateConfig,
    #[serde(default)]
    pub suggest: SuggestConfig,
}

impl NudgeConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NudgeConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| NudgeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

/// Settings for the capture dialogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Casing applied to titles when a draft is finalized.
    #[serde(default)]
    pub writing_style: WritingStyle,
    /// Early-alert offset used when the user asks for an early alert
    /// without naming a duration.
    #[serde(default = "default_early_alert_minutes")]
    pub default_early_alert_minutes: u32,
}

fn default_early_alert_minutes() -> u32 {
    15
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            writing_style: WritingStyle::default(),
            default_early_alert_minutes: default_early_alert_minutes(),
        }
    }
}

/// Tuning for the duplicate detector.
///
/// The threshold and window came over from the legacy implementation as
/// undocumented constants; they are configuration here, not fixed law.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateConfig {
    /// Minimum Jaccard similarity between title word sets (exclusive).
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,
    /// Maximum distance between due times for two reminders to count as
    /// duplicates, in seconds.
    #[serde(default = "default_time_window_seconds")]
    pub time_window_seconds: i64,
}

fn default_similarity_threshold() -> f64 {
    0.6
}

fn default_time_window_seconds() -> i64 {
    7_200
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            time_window_seconds: default_time_window_seconds(),
        }
    }
}

/// Tuning for the suggestion engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Maximum number of due-time suggestions returned.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_max_suggestions() -> usize {
    4
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_suggestions: default_max_suggestions(),
        }
    }
}
