//! Lexigrid State Library
//!
//! This crate provides the match logic for Lexigrid, a turn-based word
//! placement game played on a square letter grid.
//!
//! # Overview
//!
//! The state module provides:
//!
//! - **Move Validation** - Boundary, overlap, adjacency and dictionary rules,
//!   including every crossing word a placement completes.
//!
//! - **Dictionary Index** - Case-insensitive word lookup over one or more word
//!   lists, bucketed by length and first letter.
//!
//! - **Turn Order** - Players move in seat order, wrapping after the last seat.
//!
//! - **Game Lifecycle** - Initialized games start on their first move; players
//!   and board size are frozen once play begins.
//!
//! - **Games Store** - Persistence port with an in-memory adapter that commits
//!   each move atomically under a per-game lock.
//!
//! # Design Principles
//!
//! 1. **State machines validate transitions** - Invalid lifecycle changes are
//!    rejected with clear errors.
//!
//! 2. **Rejections are values** - An illegal move yields a `FailReason` with a
//!    kind and a human-readable reason.
//!
//! 3. **No networking** - This crate is pure game logic, no HTTP or sessions.
//!
//! 4. **Serialization-ready** - Games and moves convert to JSON for clients.
//!
//! # Example
//!
//! ```rust
//! use lexigrid_state::state::{
//!     DictionaryIndex, EngineConfig, GameState, InMemoryGamesStore, MatchEngine,
//!     MoveDirection, Person, Player, PlayerMove,
//! };
//!
//! let dictionary = DictionaryIndex::from_words(["cat", "tab"]);
//! let engine = MatchEngine::new(InMemoryGamesStore::new(), dictionary, EngineConfig::default());
//!
//! let alice = Player::new(Person::new(1, "alice", "Alice", "Liddell"), 1);
//! let bob = Player::new(Person::new(2, "bob", "Bob", "Dylan"), 2);
//! let game = engine.start_new_game(vec![alice.clone(), bob.clone()], 5, 25).unwrap();
//!
//! let game = engine
//!     .make_move(&game, PlayerMove::new("cat", 2, 1, MoveDirection::LeftRight, alice))
//!     .unwrap();
//! assert_eq!(game.state, GameState::InProgress);
//! assert_eq!(engine.next_turn_player(game.id).unwrap(), bob);
//! ```

pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
