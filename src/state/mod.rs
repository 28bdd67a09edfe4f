//! Match state for Lexigrid.
//!
//! This module provides the core types and services:
//!
//! - `game` - Persons, players, moves and the game aggregate
//! - `board` - Tile storage and the derived letter grid
//! - `lifecycle` - Game state machine (initialized, in progress, finished)
//! - `dictionary` - Word-membership index
//! - `validation` - Move legality rules
//! - `turn` - Whose move it is
//! - `store` - Games persistence port and the in-memory adapter
//! - `engine` - Match engine tying the above together
//! - `config` - Engine configuration
//! - `error` - Error and rejection types
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            MatchEngine                                  │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────┐          │
//! │  │  MoveValidator  │  │   turn order    │  │   GamesStore    │          │
//! │  │                 │  │                 │  │                 │          │
//! │  │ boundary        │  │ last mover →    │  │ game_id →       │          │
//! │  │ overlap / share │  │   next order    │  │   Game + moves  │          │
//! │  │ words formed    │  │                 │  │                 │          │
//! │  │       │         │  │                 │  │ per-game lock   │          │
//! │  │       ▼         │  │                 │  │ around commits  │          │
//! │  │ WordChecker     │  │                 │  │                 │          │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────┘          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     GameLifecycle (per game)                    │    │
//! │  │                                                                 │    │
//! │  │  Initialized ──first move──▶ InProgress ──▶ Finished            │    │
//! │  │       │                                                         │    │
//! │  │       └─ players / board size may change only here              │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use lexigrid_state::state::{
//!     DictionaryIndex, EngineConfig, InMemoryGamesStore, MatchEngine,
//! };
//!
//! let config = EngineConfig::load("lexigrid.toml")?;
//! let dictionary = DictionaryIndex::from_config(&config)?;
//! let engine = MatchEngine::new(InMemoryGamesStore::new(), dictionary, config);
//!
//! let game = engine.start_new_game(players, 0, 0)?;
//! let game = engine.make_move(&game, player_move)?;
//! ```

pub mod board;
pub mod config;
pub mod dictionary;
pub mod engine;
pub mod error;
pub mod game;
pub mod lifecycle;
pub mod store;
pub mod turn;
pub mod validation;

// Re-export commonly used types
pub use board::{Board, BoardMatrix, Tile, EMPTY_CELL};
pub use config::EngineConfig;
pub use dictionary::{DictionaryIndex, DictionaryKind, WordChecker};
pub use engine::MatchEngine;
pub use error::{ConfigError, DictionaryError, FailKind, FailReason, MatchError, WireError};
pub use game::{
    scoreboard, validate_roster, Game, GameId, Move, MoveDirection, Person, PersonId, Player,
    PlayerMove, DEFAULT_BOARD_SIZE, DEFAULT_TILES_PER_PLAYER,
};
pub use lifecycle::{GameLifecycle, GameState, LifecycleEvent, UpdateGameOptions};
pub use store::{GameView, GamesStore, InMemoryGamesStore, MoveGuard, PersonDirectory};
pub use validation::{CrossingWord, MoveValidator};
