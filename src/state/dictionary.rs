//! Word-membership index.
//!
//! Built once at startup and shared read-only afterwards, so lookups need no
//! locking.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::config::EngineConfig;
use super::error::DictionaryError;

/// Dictionary lookup used by move validation.
pub trait WordChecker {
    /// Case-insensitive membership test.
    fn check_word(&self, word: &str) -> bool;
}

impl<T: WordChecker + ?Sized> WordChecker for &T {
    fn check_word(&self, word: &str) -> bool {
        (**self).check_word(word)
    }
}

impl<T: WordChecker + ?Sized> WordChecker for Arc<T> {
    fn check_word(&self, word: &str) -> bool {
        (**self).check_word(word)
    }
}

/// Built-in word lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DictionaryKind {
    Sowpods,
    Twl06,
}

impl DictionaryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sowpods => "sowpods",
            Self::Twl06 => "twl06",
        }
    }

    /// Parse a dictionary name, ignoring case.
    pub fn from_name(name: &str) -> Result<Self, DictionaryError> {
        if name.eq_ignore_ascii_case("sowpods") {
            Ok(Self::Sowpods)
        } else if name.eq_ignore_ascii_case("twl06") {
            Ok(Self::Twl06)
        } else {
            Err(DictionaryError::UnknownKind(name.to_string()))
        }
    }

    /// File name inside the dictionary directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Sowpods => "SOWPODS.txt",
            Self::Twl06 => "TWL06.txt",
        }
    }
}

impl TryFrom<String> for DictionaryKind {
    type Error = DictionaryError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::from_name(&name)
    }
}

/// Words bucketed by length, then by lowercase first letter.
#[derive(Debug, Clone, Default)]
pub struct DictionaryIndex {
    buckets: HashMap<usize, HashMap<char, Vec<String>>>,
    word_count: usize,
}

impl DictionaryIndex {
    /// Read and index every file, one word per line.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, DictionaryError> {
        let mut index = Self::default();
        for path in paths {
            let path = path.as_ref();
            let content = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let before = index.word_count;
            index.extend(content.lines());
            info!(
                path = %path.display(),
                words = index.word_count - before,
                "dictionary file loaded"
            );
        }
        Ok(index)
    }

    /// Build from the configured sources.
    ///
    /// External files replace the built-in dictionaries when any are given.
    pub fn from_config(config: &EngineConfig) -> Result<Self, DictionaryError> {
        Self::load(&config.dictionary_paths())
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        index.extend(words);
        index
    }

    fn extend<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in words {
            let word = line.as_ref().trim();
            let Some(first) = first_lowercase(word) else {
                continue;
            };
            self.buckets
                .entry(word.chars().count())
                .or_default()
                .entry(first)
                .or_default()
                .push(word.to_string());
            self.word_count += 1;
        }
    }

    /// Number of indexed entries, duplicates included.
    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn check_word(&self, word: &str) -> bool {
        let Some(first) = first_lowercase(word) else {
            return false;
        };
        self.buckets
            .get(&word.chars().count())
            .and_then(|by_letter| by_letter.get(&first))
            .is_some_and(|candidates| candidates.iter().any(|c| eq_ignore_case(c, word)))
    }
}

impl WordChecker for DictionaryIndex {
    fn check_word(&self, word: &str) -> bool {
        DictionaryIndex::check_word(self, word)
    }
}

fn first_lowercase(word: &str) -> Option<char> {
    word.chars().next().and_then(|c| c.to_lowercase().next())
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
