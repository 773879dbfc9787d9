//! Core types module - shared data structures and constants
//!
//! This module defines the data model shared by the puzzle engine, the catalog
//! store and the catalog service. Everything here is plain data (plus serde
//! derives), so it can be used in any context: engine logic, HTTP handlers,
//! file persistence or a front-end.
//!
//! # Catalog Records
//!
//! The persisted catalog is a JSON array of [`Series`], each with ordered
//! [`Season`]s, each with an ordered list of [`Episode`]s. Field names match the
//! on-disk format exactly (`seasonNumber`, `episode`, ...). The `episode` field
//! of an episode is its ground-truth air order (1-based).
//!
//! # Game Timing and Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `CHECK_STEP_MS` | 250 | Pacing between slots during a check pass |
//! | `DISPLAY_TICK_MS` | 1000 | Period of the elapsed-time display tick |
//! | `CORRECT_POINTS` | 10 | Points for a slot holding the right episode |
//! | `INCORRECT_PENALTY` | 5 | Points lost for a wrong slot (floored at 0) |
//! | `MULTIPLIER_MAX_TENTHS` | 20 | Time multiplier at 0s (2.0x) |
//! | `MULTIPLIER_FLOOR_TENTHS` | 10 | Lowest time multiplier (1.0x) |
//! | `MULTIPLIER_DECAY_SECS` | 5 | Seconds per 0.1x of multiplier decay |
//!
//! # Examples
//!
//! ```
//! use guesseries_types::{Episode, Language, LocalizedString, PuzzleAction};
//!
//! let json = r#"{"id":"tt1-S1E2","title":{"en":"Pilot","es":"Piloto"},
//!     "episode":2,"season":1,"image":"","description":"Opening night"}"#;
//! let ep: Episode = serde_json::from_str(json).unwrap();
//! assert_eq!(ep.air_order(), 2);
//! assert_eq!(ep.title.text(Language::Es), "Piloto");
//! assert_eq!(ep.description, LocalizedString::from("Opening night"));
//!
//! let action = PuzzleAction::from_str("browseNext").unwrap();
//! assert_eq!(action, PuzzleAction::BrowseNext);
//! ```

use serde::{Deserialize, Serialize};

/// Delay between two scored slots during a check pass (250ms)
pub const CHECK_STEP_MS: u32 = 250;

/// Period of the elapsed-time display tick (1s)
pub const DISPLAY_TICK_MS: u32 = 1000;

/// Points awarded for a correctly placed episode
pub const CORRECT_POINTS: u32 = 10;

/// Points removed for an incorrectly placed episode
pub const INCORRECT_PENALTY: u32 = 5;

/// Time multiplier ceiling in tenths (2.0x)
pub const MULTIPLIER_MAX_TENTHS: u32 = 20;

/// Time multiplier floor in tenths (1.0x)
pub const MULTIPLIER_FLOOR_TENTHS: u32 = 10;

/// Seconds of elapsed time per 0.1x multiplier decay
pub const MULTIPLIER_DECAY_SECS: u64 = 5;

#[cfg(test)]
mod constant_tests {
    use super::*;

    #[test]
    fn scoring_defaults() {
        assert_eq!(CHECK_STEP_MS, 250);
        assert_eq!(CORRECT_POINTS, 10);
        assert_eq!(INCORRECT_PENALTY, 5);
        assert_eq!(MULTIPLIER_MAX_TENTHS, 20);
        assert_eq!(MULTIPLIER_FLOOR_TENTHS, 10);
        assert_eq!(MULTIPLIER_DECAY_SECS, 5);
    }
}

/// Display languages for catalog text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    /// Parse language code (case-insensitive)
    ///
    /// ```
    /// use guesseries_types::Language;
    ///
    /// assert_eq!(Language::from_str("ES"), Some(Language::Es));
    /// assert_eq!(Language::from_str("fr"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en" => Some(Language::En),
            "es" => Some(Language::Es),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

/// Catalog text: a legacy plain string or an English/Spanish pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedString {
    Plain(String),
    Translated {
        #[serde(default)]
        en: String,
        #[serde(default)]
        es: String,
    },
}

impl LocalizedString {
    /// Text in the requested language.
    ///
    /// Falls back to English, then Spanish, then the empty string when the
    /// requested translation is empty. Plain strings are returned as-is.
    pub fn text(&self, language: Language) -> &str {
        match self {
            LocalizedString::Plain(s) => s,
            LocalizedString::Translated { en, es } => {
                let wanted = match language {
                    Language::En => en,
                    Language::Es => es,
                };
                [wanted, en, es]
                    .into_iter()
                    .find(|s| !s.is_empty())
                    .map(String::as_str)
                    .unwrap_or("")
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text(Language::En).is_empty()
    }
}

impl Default for LocalizedString {
    fn default() -> Self {
        LocalizedString::Plain(String::new())
    }
}

impl From<&str> for LocalizedString {
    fn from(value: &str) -> Self {
        LocalizedString::Plain(value.to_string())
    }
}

impl From<String> for LocalizedString {
    fn from(value: String) -> Self {
        LocalizedString::Plain(value)
    }
}

/// A single episode card.
///
/// `episode` is the ground-truth air order the puzzle checks against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: LocalizedString,
    #[serde(default)]
    pub episode: u32,
    #[serde(default)]
    pub season: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: LocalizedString,
}

impl Episode {
    pub fn new(id: impl Into<String>, air_order: u32, title: impl Into<LocalizedString>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            episode: air_order,
            season: 0,
            image: String::new(),
            description: LocalizedString::default(),
        }
    }

    /// Ground-truth 1-based position of this episode within its season
    pub fn air_order(&self) -> u32 {
        self.episode
    }
}

/// Older bundled data used numeric episode ids.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub season_number: u32,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub title: LocalizedString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub plot: LocalizedString,
    #[serde(default)]
    pub seasons: Vec<Season>,
}

impl Series {
    pub fn season(&self, season_number: u32) -> Option<&Season> {
        self.seasons
            .iter()
            .find(|s| s.season_number == season_number)
    }
}

/// Per-slot outcome of a check pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckResult {
    #[default]
    Unset,
    Correct,
    Incorrect,
}

impl CheckResult {
    pub fn is_set(&self) -> bool {
        !matches!(self, CheckResult::Unset)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckResult::Unset => "unset",
            CheckResult::Correct => "correct",
            CheckResult::Incorrect => "incorrect",
        }
    }
}

/// Puzzle transitions in command form.
///
/// Drag gestures are resolved by the presentation layer into `Place` (or
/// nothing, on cancel); the engine only sees committed placements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PuzzleAction {
    /// Show the next card still in hand
    BrowseNext,
    /// Show the previous card still in hand
    BrowsePrevious,
    /// Jump to a specific card still in hand (indicator dot)
    #[serde(rename_all = "camelCase")]
    BrowseTo { episode_id: String },
    /// Put an episode into a slot (from hand, or swap from another slot)
    #[serde(rename_all = "camelCase")]
    Place { episode_id: String, slot: usize },
    /// Send a slot's episode back to hand
    Remove { slot: usize },
    /// Start the paced check pass
    Check,
    /// Reshuffle and start over
    Reset,
}

impl PuzzleAction {
    /// Parse a parameterless action from its camelCase name
    ///
    /// `browseTo`, `place` and `remove` carry arguments and are only available
    /// through serde.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "browsenext" => Some(PuzzleAction::BrowseNext),
            "browseprevious" => Some(PuzzleAction::BrowsePrevious),
            "check" => Some(PuzzleAction::Check),
            "reset" => Some(PuzzleAction::Reset),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleAction::BrowseNext => "browseNext",
            PuzzleAction::BrowsePrevious => "browsePrevious",
            PuzzleAction::BrowseTo { .. } => "browseTo",
            PuzzleAction::Place { .. } => "place",
            PuzzleAction::Remove { .. } => "remove",
            PuzzleAction::Check => "check",
            PuzzleAction::Reset => "reset",
        }
    }
}
