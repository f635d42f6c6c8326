#![forbid(unsafe_code)]

//! Describe-policy configuration.
//!
//! [`EditableConfig::default()`] is the stock behavior. Deployments tune it
//! through environment variables:
//!
//! - `EDVOX_PASSWORD_MASK`: char shown on braille for each password char
//! - `EDVOX_SPEAK_DELETIONS`: `1/0/true/false`, echo deleted text
//! - `EDVOX_MAX_ECHO_CHARS`: longest utterance before truncation
//!
//! Values are clamped to valid ranges by [`EditableConfig::validated`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const ENV_PASSWORD_MASK: &str = "EDVOX_PASSWORD_MASK";
const ENV_SPEAK_DELETIONS: &str = "EDVOX_SPEAK_DELETIONS";
const ENV_MAX_ECHO_CHARS: &str = "EDVOX_MAX_ECHO_CHARS";

const MIN_ECHO_CHARS: usize = 1;
const MAX_ECHO_CHARS: usize = 10_000;

/// Canned announcements.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Phrases {
    pub blank: String,
    pub dot: String,
    /// Used for runs longer than one char; `{count}` is replaced.
    pub dots: String,
    pub end_of_text: String,
    pub selected: String,
    pub unselected: String,
}

impl Default for Phrases {
    fn default() -> Self {
        Self {
            blank: "blank".to_owned(),
            dot: "dot".to_owned(),
            dots: "{count} dots".to_owned(),
            end_of_text: "end of text".to_owned(),
            selected: "selected".to_owned(),
            unselected: "unselected".to_owned(),
        }
    }
}

impl Phrases {
    /// Phrase standing in for `count` hidden chars.
    #[must_use]
    pub fn dots_for(&self, count: usize) -> String {
        if count == 1 {
            self.dot.clone()
        } else {
            self.dots.replace("{count}", &count.to_string())
        }
    }
}

/// Tunables of the describe policy.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EditableConfig {
    /// Char substituted for each password char on braille.
    pub password_mask: char,
    /// Echo deleted text.
    pub speak_deletions: bool,
    /// Utterances longer than this many chars are truncated.
    pub max_echo_chars: usize,
    pub phrases: Phrases,
}

impl Default for EditableConfig {
    fn default() -> Self {
        Self {
            password_mask: '*',
            speak_deletions: true,
            max_echo_chars: 400,
            phrases: Phrases::default(),
        }
    }
}

impl EditableConfig {
    /// Load from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Load using a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = get_env(ENV_PASSWORD_MASK)
            && let Some(mask) = value.chars().next()
        {
            config.password_mask = mask;
        }

        if let Some(value) = get_env(ENV_SPEAK_DELETIONS)
            && let Some(parsed) = parse_bool(&value)
        {
            config.speak_deletions = parsed;
        }

        if let Some(value) = get_env(ENV_MAX_ECHO_CHARS)
            && let Ok(max) = value.trim().parse::<usize>()
        {
            config.max_echo_chars = max;
        }

        config.validated()
    }

    /// Clamp values to safe ranges.
    ///
    /// - `max_echo_chars` to `1..=10_000`
    /// - a control or whitespace `password_mask` falls back to `*`
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.max_echo_chars = self.max_echo_chars.clamp(MIN_ECHO_CHARS, MAX_ECHO_CHARS);
        if self.password_mask.is_control() || self.password_mask.is_whitespace() {
            self.password_mask = '*';
        }
        self
    }

    /// Parse a JSON document; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CoreError::InvalidConfig`] on malformed JSON.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        serde_json::from_str::<Self>(json)
            .map(Self::validated)
            .map_err(|err| crate::CoreError::invalid_config(err.to_string()))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
