//! Games persistence port and its in-memory adapter.
//!
//! The store owns games, boards and move history. `make_move` is the single
//! atomic commit: the caller's guard (validation and turn check) runs against
//! the locked game and the write happens only if the guard passes.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::info;

use super::board::Board;
use super::error::MatchError;
use super::game::{validate_roster, Game, GameId, Move, Person, PersonId, Player, PlayerMove};
use super::lifecycle::{GameState, LifecycleEvent, UpdateGameOptions};
use super::turn;

/// Check run on the locked game before a move is committed.
pub type MoveGuard<'a> = &'a dyn Fn(&Game, &[Move]) -> Result<(), MatchError>;

/// Persistence operations the match engine relies on.
pub trait GamesStore: Send + Sync {
    /// Create a game with an empty board in the initialized state.
    fn create_game(
        &self,
        players: Vec<Player>,
        board_size: usize,
        tiles_per_player: usize,
    ) -> Result<Game, MatchError>;

    /// Fails with `GameNotFound` if absent.
    fn get_game(&self, game_id: GameId) -> Result<Game, MatchError>;

    fn lookup_game(&self, game_id: GameId) -> Option<Game>;

    /// Apply a partial update. Players and board size only change while the
    /// game is initialized.
    fn update_game(&self, options: UpdateGameOptions) -> Result<(), MatchError>;

    fn delete_game(&self, game_id: GameId) -> Result<(), MatchError>;

    /// Games matching a view, ascending by id.
    fn get_games(&self, view: &GameView, offset: usize, limit: usize) -> Vec<Game>;

    fn games_count(&self, view: &GameView) -> usize;

    /// Moves ascending by time.
    fn game_history(
        &self,
        game_id: GameId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Move>, MatchError>;

    fn game_history_count(&self, game_id: GameId) -> Result<usize, MatchError>;

    fn next_turn_player(&self, game_id: GameId) -> Result<Player, MatchError>;

    /// Record a move, write its tiles and start the game if this is its first
    /// move, all under one per-game lock. Returns the updated game.
    fn make_move(
        &self,
        game_id: GameId,
        player_move: PlayerMove,
        guard: MoveGuard<'_>,
    ) -> Result<Game, MatchError>;
}

/// Filter for listing games. Empty lists match everything; every non-empty
/// list must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameView {
    pub persons: Vec<PersonId>,
    pub states: Vec<GameState>,
    pub board_sizes: Vec<usize>,
}

impl GameView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_persons(mut self, persons: Vec<PersonId>) -> Self {
        self.persons = persons;
        self
    }

    pub fn with_states(mut self, states: Vec<GameState>) -> Self {
        self.states = states;
        self
    }

    pub fn with_board_sizes(mut self, board_sizes: Vec<usize>) -> Self {
        self.board_sizes = board_sizes;
        self
    }

    pub fn matches(&self, game: &Game) -> bool {
        (self.persons.is_empty() || self.persons.iter().any(|id| game.has_person(*id)))
            && (self.states.is_empty() || self.states.contains(&game.state))
            && (self.board_sizes.is_empty() || self.board_sizes.contains(&game.board_size()))
    }
}

#[derive(Debug)]
struct GameRecord {
    game: Game,
    history: Vec<Move>,
    next_seq: u64,
    deleted: bool,
}

/// In-memory games store.
///
/// The table lock is only held to find a record; each game has its own mutex,
/// so work on different games runs in parallel while moves on one game are
/// serialized.
#[derive(Debug)]
pub struct InMemoryGamesStore {
    games: RwLock<BTreeMap<GameId, Arc<Mutex<GameRecord>>>>,
    next_id: AtomicI64,
}

impl Default for InMemoryGamesStore {
    fn default() -> Self {
        Self {
            games: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryGamesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total game count.
    pub fn count(&self) -> usize {
        self.games.read().len()
    }

    fn record(&self, game_id: GameId) -> Result<Arc<Mutex<GameRecord>>, MatchError> {
        self.games
            .read()
            .get(&game_id)
            .cloned()
            .ok_or(MatchError::GameNotFound(game_id))
    }

    fn records(&self) -> Vec<Arc<Mutex<GameRecord>>> {
        self.games.read().values().cloned().collect()
    }

    /// Run `f` on a live record under its lock.
    fn with_record<R>(
        &self,
        game_id: GameId,
        f: impl FnOnce(&mut GameRecord) -> Result<R, MatchError>,
    ) -> Result<R, MatchError> {
        let record = self.record(game_id)?;
        let mut record = record.lock();
        if record.deleted {
            return Err(MatchError::GameNotFound(game_id));
        }
        f(&mut record)
    }

    fn matching(&self, view: &GameView) -> Vec<Game> {
        self.records()
            .iter()
            .filter_map(|record| {
                let record = record.lock();
                (!record.deleted && view.matches(&record.game)).then(|| record.game.clone())
            })
            .collect()
    }
}

impl GamesStore for InMemoryGamesStore {
    fn create_game(
        &self,
        players: Vec<Player>,
        board_size: usize,
        tiles_per_player: usize,
    ) -> Result<Game, MatchError> {
        validate_roster(&players)?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let game = Game::new(id, players, board_size, tiles_per_player);
        let record = GameRecord {
            game: game.clone(),
            history: Vec::new(),
            next_seq: 0,
            deleted: false,
        };
        self.games.write().insert(id, Arc::new(Mutex::new(record)));

        info!(
            game_id = id,
            board_size,
            players = game.player_count(),
            "game created"
        );
        Ok(game)
    }

    fn get_game(&self, game_id: GameId) -> Result<Game, MatchError> {
        self.with_record(game_id, |record| Ok(record.game.clone()))
    }

    fn lookup_game(&self, game_id: GameId) -> Option<Game> {
        self.get_game(game_id).ok()
    }

    fn update_game(&self, options: UpdateGameOptions) -> Result<(), MatchError> {
        self.with_record(options.game_id, |record| {
            let mut lifecycle = record.game.lifecycle();
            lifecycle.apply_update(&options)?;
            if let Some(players) = &options.players {
                validate_roster(players)?;
            }

            if let Some(players) = options.players {
                record.game.players = players;
            }
            if let Some(board_size) = options.board_size {
                record.game.board = Board::empty(board_size);
            }
            record.game.state = lifecycle.state();
            Ok(())
        })
    }

    fn delete_game(&self, game_id: GameId) -> Result<(), MatchError> {
        let record = self
            .games
            .write()
            .remove(&game_id)
            .ok_or(MatchError::GameNotFound(game_id))?;
        record.lock().deleted = true;
        info!(game_id, "game deleted");
        Ok(())
    }

    fn get_games(&self, view: &GameView, offset: usize, limit: usize) -> Vec<Game> {
        self.matching(view)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect()
    }

    fn games_count(&self, view: &GameView) -> usize {
        self.matching(view).len()
    }

    fn game_history(
        &self,
        game_id: GameId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Move>, MatchError> {
        self.with_record(game_id, |record| {
            Ok(record
                .history
                .iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect())
        })
    }

    fn game_history_count(&self, game_id: GameId) -> Result<usize, MatchError> {
        self.with_record(game_id, |record| Ok(record.history.len()))
    }

    fn next_turn_player(&self, game_id: GameId) -> Result<Player, MatchError> {
        self.with_record(game_id, |record| {
            turn::next_turn_player(&record.game, &record.history)
        })
    }

    fn make_move(
        &self,
        game_id: GameId,
        player_move: PlayerMove,
        guard: MoveGuard<'_>,
    ) -> Result<Game, MatchError> {
        self.with_record(game_id, |record| {
            guard(&record.game, &record.history)?;

            let mut lifecycle = record.game.lifecycle();
            lifecycle.apply_mut(LifecycleEvent::MoveCommitted)?;

            // Clock never runs backwards within a game
            let now = chrono::Utc::now();
            let time = record.history.last().map_or(now, |last| last.time.max(now));
            let seq = record.next_seq;
            record.next_seq += 1;

            let changed = record.game.board.place(&player_move);
            info!(
                game_id,
                word = %player_move.word,
                row = player_move.row,
                col = player_move.col,
                direction = %player_move.direction,
                person_id = player_move.player.person_id(),
                changed,
                "move committed"
            );
            record.history.push(Move::record(player_move, time, seq));
            record.game.state = lifecycle.state();

            Ok(record.game.clone())
        })
    }
}

/// Lookup of persons known to the application.
#[derive(Debug, Default)]
pub struct PersonDirectory {
    persons: RwLock<HashMap<PersonId, Person>>,
}

impl PersonDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a person.
    pub fn register_person(&self, person: Person) {
        self.persons.write().insert(person.id, person);
    }

    pub fn get_person(&self, id: PersonId) -> Result<Person, MatchError> {
        self.persons
            .read()
            .get(&id)
            .cloned()
            .ok_or(MatchError::PersonNotFound(id))
    }

    /// Known persons among `ids`, ascending by id. Unknown ids are skipped.
    pub fn get_persons(&self, ids: &[PersonId]) -> Vec<Person> {
        let persons = self.persons.read();
        let mut found: Vec<Person> = ids.iter().filter_map(|id| persons.get(id).cloned()).collect();
        found.sort_by_key(|p| p.id);
        found.dedup_by_key(|p| p.id);
        found
    }
}
