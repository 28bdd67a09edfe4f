//! Engine configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::dictionary::DictionaryKind;
use super::error::ConfigError;
use super::game::{DEFAULT_BOARD_SIZE, DEFAULT_TILES_PER_PLAYER};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Built-in word lists to load
    pub dictionaries: Vec<DictionaryKind>,
    /// External word lists; replace the built-ins when non-empty
    pub files: Vec<PathBuf>,
    /// Directory holding the built-in word lists
    pub dictionary_dir: PathBuf,
    pub default_board_size: usize,
    pub default_tiles_per_player: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dictionaries: vec![DictionaryKind::Sowpods],
            files: Vec::new(),
            dictionary_dir: PathBuf::from("dictionary"),
            default_board_size: DEFAULT_BOARD_SIZE,
            default_tiles_per_player: DEFAULT_TILES_PER_PLAYER,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "engine config loaded");
        Ok(config)
    }

    /// Word list files to index.
    pub fn dictionary_paths(&self) -> Vec<PathBuf> {
        if !self.files.is_empty() {
            return self.files.clone();
        }
        self.dictionaries
            .iter()
            .map(|kind| self.dictionary_dir.join(kind.file_name()))
            .collect()
    }

    /// Board size to use when the caller passes zero.
    pub fn board_size_or_default(&self, board_size: usize) -> usize {
        if board_size == 0 {
            self.default_board_size
        } else {
            board_size
        }
    }

    /// Tile allotment to use when the caller passes zero.
    pub fn tiles_per_player_or_default(&self, tiles_per_player: usize) -> usize {
        if tiles_per_player == 0 {
            self.default_tiles_per_player
        } else {
            tiles_per_player
        }
    }
}
