//! Chirp body validation and redaction.

use crate::utils::toml_config::ContentConfig;
use std::collections::HashSet;

/// Longest accepted chirp body, in bytes.
pub const DEFAULT_MAX_LENGTH: usize = 140;

/// Replacement for a denylisted word.
pub const MASK: &str = "****";

pub const DEFAULT_DENYLIST: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("Chirp is too long")]
    TooLong { length: usize, max: usize },
}

/// Length check plus whole-word, case-insensitive redaction.
#[derive(Debug, Clone)]
pub struct ContentGuard {
    max_length: usize,
    denylist: HashSet<String>,
}

impl Default for ContentGuard {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            denylist: DEFAULT_DENYLIST.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl ContentGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ContentConfig) -> Self {
        Self::new()
            .with_max_length(config.max_length)
            .with_denylist(config.denylist.iter().map(String::as_str))
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Replaces the denylist. Words are matched lowercased.
    pub fn with_denylist<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.denylist = words.into_iter().map(str::to_lowercase).collect();
        self
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Validates `text` and returns it with denylisted words masked.
    ///
    /// Length is the UTF-8 byte count. Words are split on single spaces only,
    /// so runs of spaces survive as empty words and come back unchanged.
    pub fn check(&self, text: &str) -> Result<String, ContentError> {
        if text.len() > self.max_length {
            return Err(ContentError::TooLong {
                length: text.len(),
                max: self.max_length,
            });
        }

        let cleaned = text
            .split(' ')
            .map(|word| {
                if self.denylist.contains(&word.to_lowercase()) {
                    MASK
                } else {
                    word
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        Ok(cleaned)
    }
}
