//! Game, player and move data.
//!
//! Plain values owned by the games store; validation and turn logic read them
//! but never mutate them.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use super::board::Board;
use super::error::{MatchError, WireError};
use super::lifecycle::{GameLifecycle, GameState};

/// Game identifier.
pub type GameId = i64;

/// Person identifier.
pub type PersonId = i64;

/// Standard board edge length.
pub const DEFAULT_BOARD_SIZE: usize = 15;

/// Standard tile allotment per player.
pub const DEFAULT_TILES_PER_PLAYER: usize = DEFAULT_BOARD_SIZE * DEFAULT_BOARD_SIZE;

/// Identity of a person. Owned outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub user_name: String,
    pub first_name: String,
    pub last_name: String,
}

impl Person {
    pub fn new(
        id: PersonId,
        user_name: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_name: user_name.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

/// A person seated in a game.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub person: Person,
    /// 1-based turn position, unique within a game
    pub order: u8,
}

impl Player {
    pub fn new(person: Person, order: u8) -> Self {
        Self { person, order }
    }

    pub fn person_id(&self) -> PersonId {
        self.person.id
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.person.id,
            "user_name": self.person.user_name,
            "first_name": self.person.first_name,
            "last_name": self.person.last_name,
            "order": self.order
        })
    }
}

/// Placement direction. The numeric ids are part of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum MoveDirection {
    LeftRight = 0,
    TopBottom = 1,
}

impl MoveDirection {
    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Result<Self, WireError> {
        match id {
            0 => Ok(Self::LeftRight),
            1 => Ok(Self::TopBottom),
            other => Err(WireError::MoveDirection(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LeftRight => "left_right",
            Self::TopBottom => "top_bottom",
        }
    }

    /// Cell `offset` steps from `(row, col)` along this direction.
    ///
    /// Saturates at `usize::MAX`, which lies off every board.
    pub fn step(self, row: usize, col: usize, offset: usize) -> (usize, usize) {
        match self {
            Self::LeftRight => (row, col.saturating_add(offset)),
            Self::TopBottom => (row.saturating_add(offset), col),
        }
    }
}

impl TryFrom<u8> for MoveDirection {
    type Error = WireError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pending word placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMove {
    pub word: String,
    pub row: usize,
    pub col: usize,
    pub direction: MoveDirection,
    pub player: Player,
}

impl PlayerMove {
    pub fn new(
        word: impl Into<String>,
        row: usize,
        col: usize,
        direction: MoveDirection,
        player: Player,
    ) -> Self {
        Self {
            word: word.into(),
            row,
            col,
            direction,
            player,
        }
    }

    /// Letter count of the word.
    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Each letter with the cell it lands on, in placement order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.word.chars().enumerate().map(move |(i, letter)| {
            let (row, col) = self.direction.step(self.row, self.col, i);
            (row, col, letter)
        })
    }
}

/// A committed move. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub word: String,
    pub row: usize,
    pub col: usize,
    pub direction: MoveDirection,
    pub player: Player,
    pub time: chrono::DateTime<chrono::Utc>,
    /// Commit sequence within the game, breaks timestamp ties
    pub seq: u64,
}

impl Move {
    pub fn record(
        player_move: PlayerMove,
        time: chrono::DateTime<chrono::Utc>,
        seq: u64,
    ) -> Self {
        Self {
            word: player_move.word,
            row: player_move.row,
            col: player_move.col,
            direction: player_move.direction,
            player: player_move.player,
            time,
            seq,
        }
    }

    /// Points scored: one per letter. Tile boosts are not applied.
    pub fn points(&self) -> u32 {
        self.word.chars().count() as u32
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "word": self.word,
            "row": self.row,
            "col": self.col,
            "direction": self.direction.id(),
            "player": self.player.to_json(),
            "time": self.time.to_rfc3339(),
            "points": self.points()
        })
    }
}

/// Total points per person, highest first. Ties keep first-scorer order.
pub fn scoreboard(history: &[Move]) -> Vec<(PersonId, u32)> {
    let mut totals: Vec<(PersonId, u32)> = Vec::new();
    let mut index: HashMap<PersonId, usize> = HashMap::new();

    for mv in history {
        let id = mv.player.person_id();
        match index.get(&id) {
            Some(&i) => totals[i].1 += mv.points(),
            None => {
                index.insert(id, totals.len());
                totals.push((id, mv.points()));
            }
        }
    }

    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

/// Check that player orders form exactly `1..=N` and persons are distinct.
pub fn validate_roster(players: &[Player]) -> Result<(), MatchError> {
    if players.is_empty() {
        return Err(MatchError::InvalidRoster("a game needs at least one player".into()));
    }

    let mut orders = HashSet::new();
    let mut persons = HashSet::new();
    for player in players {
        if !persons.insert(player.person_id()) {
            return Err(MatchError::InvalidRoster(format!(
                "person {} is seated more than once",
                player.person_id()
            )));
        }
        if player.order == 0 || usize::from(player.order) > players.len() {
            return Err(MatchError::InvalidRoster(format!(
                "player order {} outside 1..={}",
                player.order,
                players.len()
            )));
        }
        if !orders.insert(player.order) {
            return Err(MatchError::InvalidRoster(format!(
                "player order {} is used more than once",
                player.order
            )));
        }
    }

    Ok(())
}

/// A game session.
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: GameId,

    /// Players in seating order as stored
    pub players: Vec<Player>,

    pub board: Board,

    pub state: GameState,

    pub tiles_per_player: usize,

    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Game {
    /// Create a new game with an empty board.
    pub fn new(
        id: GameId,
        players: Vec<Player>,
        board_size: usize,
        tiles_per_player: usize,
    ) -> Self {
        Self {
            id,
            players,
            board: Board::empty(board_size),
            state: GameState::Initialized,
            tiles_per_player,
            created_at: chrono::Utc::now(),
        }
    }

    pub fn board_size(&self) -> usize {
        self.board.size()
    }

    /// No move has been committed yet.
    pub fn is_opening(&self) -> bool {
        self.state == GameState::Initialized
    }

    pub fn lifecycle(&self) -> GameLifecycle {
        GameLifecycle::at(self.id, self.state)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player_by_order(&self, order: u8) -> Option<&Player> {
        self.players.iter().find(|p| p.order == order)
    }

    pub fn player_for_person(&self, person_id: PersonId) -> Option<&Player> {
        self.players.iter().find(|p| p.person_id() == person_id)
    }

    pub fn has_person(&self, person_id: PersonId) -> bool {
        self.player_for_person(person_id).is_some()
    }

    /// Convert full game state to JSON snapshot.
    pub fn to_json(&self) -> serde_json::Value {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by_key(|p| p.order);

        serde_json::json!({
            "id": self.id,
            "state": self.state.id(),
            "board_size": self.board_size(),
            "tiles_per_player": self.tiles_per_player,
            "players": players.iter().map(|p| p.to_json()).collect::<Vec<_>>(),
            "board": self.board.to_json(),
            "created_at": self.created_at.to_rfc3339()
        })
    }
}
