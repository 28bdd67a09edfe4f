//! Game lifecycle state machine.
//!
//! Decides which mutations a game accepts in each state.
//!
//! # State Diagram
//!
//! ```text
//! ┌─────────────┐  first move committed  ┌────────────┐   set state   ┌──────────┐
//! │ Initialized │───────────────────────▶│ InProgress │──────────────▶│ Finished │
//! └──────┬──────┘                        └────────────┘               └──────────┘
//!        │ reconfigure (players / board size)
//!        └──▶ Initialized
//!
//! set state: any ──▶ any (administrative update)
//! ```

use std::fmt;

use serde_repr::{Deserialize_repr, Serialize_repr};
use tracing::info;

use super::error::{MatchError, WireError};
use super::game::{GameId, Player};

/// Game status. The numeric ids are part of the wire format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr,
)]
#[repr(u8)]
pub enum GameState {
    /// Created, no move played yet
    #[default]
    Initialized = 0,
    /// At least one move committed
    InProgress = 1,
    /// Closed by an administrative update
    Finished = 2,
}

impl GameState {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Result<Self, WireError> {
        match id {
            0 => Ok(Self::Initialized),
            1 => Ok(Self::InProgress),
            2 => Ok(Self::Finished),
            other => Err(WireError::GameState(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::InProgress => "in_progress",
            Self::Finished => "finished",
        }
    }

    /// Players and board size may only change in this state.
    pub fn allows_reconfiguration(&self) -> bool {
        matches!(self, Self::Initialized)
    }
}

impl TryFrom<u8> for GameState {
    type Error = WireError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle transition events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// A move was committed to the board.
    MoveCommitted,
    /// Players or board size are being replaced.
    Reconfigure,
    /// Explicit administrative state change.
    SetState(GameState),
}

/// Per-game lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameLifecycle {
    game_id: GameId,
    state: GameState,
}

impl GameLifecycle {
    /// A freshly created game.
    pub fn new(game_id: GameId) -> Self {
        Self::at(game_id, GameState::Initialized)
    }

    /// Restore a lifecycle at a known state.
    pub fn at(game_id: GameId, state: GameState) -> Self {
        Self { game_id, state }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Apply an event, returning the new lifecycle or an error.
    pub fn apply(&self, event: LifecycleEvent) -> Result<Self, MatchError> {
        Ok(Self {
            game_id: self.game_id,
            state: self.transition(event)?,
        })
    }

    /// Apply an event in place.
    pub fn apply_mut(&mut self, event: LifecycleEvent) -> Result<(), MatchError> {
        let next = self.transition(event)?;
        if next != self.state {
            info!(
                game_id = self.game_id,
                from = %self.state,
                to = %next,
                "game state transition"
            );
        }
        self.state = next;
        Ok(())
    }

    /// Check and apply every transition an update implies.
    ///
    /// The reconfiguration check runs against the current state, before any
    /// requested state change, so an update cannot reopen a game and resize it
    /// in the same step.
    pub fn apply_update(&mut self, options: &UpdateGameOptions) -> Result<(), MatchError> {
        let mut next = *self;
        if options.reconfigures() {
            next.apply_mut(LifecycleEvent::Reconfigure)?;
        }
        if let Some(state) = options.state {
            next.apply_mut(LifecycleEvent::SetState(state))?;
        }
        *self = next;
        Ok(())
    }

    fn transition(&self, event: LifecycleEvent) -> Result<GameState, MatchError> {
        use GameState::*;
        use LifecycleEvent::*;

        match (self.state, event) {
            (Initialized, MoveCommitted) => Ok(InProgress),
            (state, MoveCommitted) => Ok(state),

            (Initialized, Reconfigure) => Ok(Initialized),
            (state, Reconfigure) => Err(MatchError::LifecycleViolation {
                game_id: self.game_id,
                state,
            }),

            (_, SetState(target)) => Ok(target),
        }
    }
}

/// A partial update of a game. Absent fields are left untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateGameOptions {
    pub game_id: GameId,
    pub board_size: Option<usize>,
    pub players: Option<Vec<Player>>,
    pub state: Option<GameState>,
}

impl UpdateGameOptions {
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            ..Self::default()
        }
    }

    pub fn with_board_size(mut self, board_size: usize) -> Self {
        self.board_size = Some(board_size);
        self
    }

    pub fn with_players(mut self, players: Vec<Player>) -> Self {
        self.players = Some(players);
        self
    }

    pub fn with_state(mut self, state: GameState) -> Self {
        self.state = Some(state);
        self
    }

    /// Whether players or board size are being replaced.
    pub fn reconfigures(&self) -> bool {
        self.board_size.is_some() || self.players.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.reconfigures() && self.state.is_none()
    }
}
