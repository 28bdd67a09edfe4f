//! Error types shared by the engine and its persistence port.

use std::fmt;
use std::path::PathBuf;

use super::game::{GameId, PersonId, Player};
use super::lifecycle::GameState;

/// Which rule a rejected move broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailKind {
    /// Placement runs past the board edge.
    Boundary,
    /// A letter contradicts a tile already on the board.
    OverlapConflict,
    /// Every letter lands on an identical existing tile.
    FullOverlap,
    /// Nothing on the board is shared or adjacent.
    NoShare,
    /// The word, or a crossing word it forms, is not in the dictionary.
    DictionaryWord,
}

impl FailKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boundary => "boundary",
            Self::OverlapConflict => "overlap_conflict",
            Self::FullOverlap => "full_overlap",
            Self::NoShare => "no_share",
            Self::DictionaryWord => "dictionary_word",
        }
    }
}

/// The single explanation returned for a rejected move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailReason {
    pub kind: FailKind,
    pub reason: String,
}

impl FailReason {
    pub fn new(kind: FailKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

/// Errors raised by the match engine and the games store.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("invalid move: {0}")]
    InvalidMove(FailReason),

    #[error(
        "move made by incorrect player {}; it is player {}'s turn to make the move",
        .attempted.person.id,
        .expected.person.id
    )]
    TurnOrder {
        expected: Box<Player>,
        attempted: Box<Player>,
    },

    #[error("game {game_id} players and board size can only change while initialized (state: {state})")]
    LifecycleViolation { game_id: GameId, state: GameState },

    #[error("game with id {0} not found")]
    GameNotFound(GameId),

    #[error("person with id {0} not found")]
    PersonNotFound(PersonId),

    #[error("invalid player roster: {0}")]
    InvalidRoster(String),

    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl MatchError {
    /// The fail reason, if this is a rejected move.
    pub fn fail_reason(&self) -> Option<&FailReason> {
        match self {
            Self::InvalidMove(reason) => Some(reason),
            _ => None,
        }
    }
}

impl From<FailReason> for MatchError {
    fn from(reason: FailReason) -> Self {
        Self::InvalidMove(reason)
    }
}

/// Unknown numeric id on the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("incorrect game state id specified: {0}")]
    GameState(u8),
    #[error("incorrect move direction id specified: {0}")]
    MoveDirection(u8),
}

/// Failures while building a dictionary index.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported dictionary type specified: {0}")]
    UnknownKind(String),
}

/// Failures while loading engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
